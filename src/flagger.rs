//! Follow-up heuristic for rewritten files
//!
//! `logger.Debug` needs a logger value in scope. Text substitution cannot add
//! the parameter, so files that now call the logger without any sign of one
//! being passed in are flagged for manual editing. False positives and false
//! negatives are both possible.

use crate::rules::DESTINATION_CALL;
use std::path::Path;

/// Parameter declarations that show the logger is already threaded through
const LOGGER_PARAM_DECLARATIONS: [&str; 2] =
    ["logger *TerraformLogger", "logger *services.TerraformLogger"];

/// Looser shape: any pointer-typed parameter named `logger`
const LOGGER_PARAM_SHAPE: &str = "logger *";

/// Directory whose files already receive the logger
const EXEMPT_DIR: &str = "services";

/// Decide whether a rewritten file likely needs a logger parameter added
pub fn needs_logger_param(text: &str, path: &Path) -> bool {
    if LOGGER_PARAM_DECLARATIONS
        .iter()
        .any(|decl| text.contains(decl))
    {
        return false;
    }

    if path.components().any(|c| c.as_os_str() == EXEMPT_DIR) {
        return false;
    }

    text.contains(DESTINATION_CALL) && !text.contains(LOGGER_PARAM_SHAPE)
}
