//! Error helper functions for creating actionable per-file error messages

use std::io;
use std::path::Path;

/// Check if an IO error is a permission denied error
pub fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Check if an IO error is a "not found" error
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Check if an IO error comes from a file that is not valid UTF-8
pub fn is_invalid_utf8(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::InvalidData
}

/// Build the message for a failed per-file operation.
///
/// `operation` reads as a verb phrase, e.g. "reading" or "writing backup for".
pub fn file_error(path: &Path, operation: &str, err: &io::Error) -> String {
    if is_permission_denied(err) {
        permission_error(path, operation)
    } else if is_not_found(err) {
        not_found_error(path, operation)
    } else if is_invalid_utf8(err) {
        format!(
            "'{}' is not valid UTF-8 text and was left untouched",
            path.display()
        )
    } else {
        format!("Failed {} '{}': {}", operation, path.display(), err)
    }
}

/// Create an enhanced error message for file permission issues
pub fn permission_error(path: &Path, operation: &str) -> String {
    let parent_dir = path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());

    format!(
        "Permission denied when {} '{}'\n\n\
         Possible fixes:\n\
         1. Check file permissions: ls -l '{}'\n\
         2. Ensure the directory is writable (backups are written next to the file): chmod u+w '{}'\n\
         3. Use --dry-run to preview the rewrite without writing",
        operation,
        path.display(),
        path.display(),
        parent_dir
    )
}

/// Create an enhanced error message for files that vanished mid-run
pub fn not_found_error(path: &Path, operation: &str) -> String {
    format!(
        "File not found when {} '{}'\n\n\
         The file was listed while scanning but no longer exists.\n\
         Check whether another process is modifying the tree.",
        operation,
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_is_permission_denied() {
        let perm_err = io::Error::new(ErrorKind::PermissionDenied, "access denied");
        assert!(is_permission_denied(&perm_err));

        let not_found_err = io::Error::new(ErrorKind::NotFound, "not found");
        assert!(!is_permission_denied(&not_found_err));
    }

    #[test]
    fn test_is_not_found() {
        let not_found_err = io::Error::new(ErrorKind::NotFound, "not found");
        assert!(is_not_found(&not_found_err));

        let perm_err = io::Error::new(ErrorKind::PermissionDenied, "access denied");
        assert!(!is_not_found(&perm_err));
    }

    #[test]
    fn test_permission_error_formatting() {
        let path = Path::new("/tmp/backend/main.go");
        let msg = permission_error(path, "writing");
        assert!(msg.contains("Permission denied"));
        assert!(msg.contains("writing"));
        assert!(msg.contains("/tmp/backend/main.go"));
        assert!(msg.contains("Possible fixes"));
    }

    #[test]
    fn test_file_error_dispatch() {
        let path = Path::new("backend/main.go");

        let msg = file_error(path, "reading", &io::Error::new(ErrorKind::InvalidData, "bad"));
        assert!(msg.contains("not valid UTF-8"));

        let msg = file_error(path, "reading", &io::Error::new(ErrorKind::NotFound, "gone"));
        assert!(msg.contains("File not found"));

        let msg = file_error(path, "writing", &io::Error::other("disk full"));
        assert_eq!(msg, "Failed writing 'backend/main.go': disk full");
    }
}
