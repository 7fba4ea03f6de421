//! Rewrite rules for the `log` → `logger.Debug` migration
//!
//! Rules run in a fixed order over the full text of a file, each one seeing
//! the output of the previous one. Within a rule, sub-patterns also run in
//! order: the quoted-literal form before the catch-all expression form, so a
//! call already rewritten by the first is never re-matched by the second.

use anyhow::{Context, Result};
use regex::{Regex, RegexSet};
use serde::Serialize;

/// Destination call every source form is rewritten to
pub const DESTINATION_CALL: &str = "logger.Debug";

/// Patterns used by the pre-check, one per source call form
const SOURCE_CALL_PATTERNS: [&str; 3] = [r"log\.Printf\(", r"log\.Print\(", r"log\.Println\("];

/// A single source call form and the ordered substitutions that replace it
#[derive(Debug, Clone)]
pub struct Rule {
    /// Source call this rule rewrites, e.g. `log.Println`
    pub source_call: &'static str,
    substitutions: Vec<(Regex, &'static str)>,
}

impl Rule {
    fn new(source_call: &'static str, substitutions: &[(&str, &'static str)]) -> Result<Self> {
        let substitutions = substitutions
            .iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid regex pattern: {}", pattern))
                    .map(|re| (re, *replacement))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source_call,
            substitutions,
        })
    }

    /// Apply every sub-pattern in order, returning the new text and the
    /// number of substitutions made
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut current = text.to_string();
        let mut count = 0;

        for (re, replacement) in &self.substitutions {
            let matches = re.find_iter(&current).count();
            if matches == 0 {
                continue;
            }
            count += matches;
            current = re.replace_all(&current, *replacement).into_owned();
        }

        (current, count)
    }
}

/// Number of substitutions a rule made in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCount {
    pub rule: &'static str,
    pub count: usize,
}

/// Result of running the rule engine over one file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub counts: Vec<RuleCount>,
}

impl Rewrite {
    /// Total substitutions across all rules
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}

pub struct RuleEngine {
    precheck: RegexSet,
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new() -> Result<Self> {
        let precheck =
            RegexSet::new(SOURCE_CALL_PATTERNS).context("Invalid source call pre-check patterns")?;

        let rules = vec![
            Rule::new("log.Printf", &[(r"log\.Printf\(", "logger.Debug(")])?,
            Rule::new(
                "log.Print",
                &[
                    (r#"log\.Print\("([^"]+)"\)"#, r#"logger.Debug("${1}")"#),
                    (r"log\.Print\(([^)]+)\)", r#"logger.Debug("%v", ${1})"#),
                ],
            )?,
            // Println's trailing newline is dropped: logger.Debug adds its own
            Rule::new(
                "log.Println",
                &[
                    (r#"log\.Println\("([^"]+)"\)"#, r#"logger.Debug("${1}")"#),
                    (r"log\.Println\(([^)]+)\)", r#"logger.Debug("%v", ${1})"#),
                ],
            )?,
        ];

        Ok(Self { precheck, rules })
    }

    /// Rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// True if the text contains at least one source call form
    pub fn has_source_calls(&self, text: &str) -> bool {
        self.precheck.is_match(text)
    }

    /// Rewrite the full text of a file
    pub fn rewrite(&self, text: &str) -> Rewrite {
        if !self.has_source_calls(text) {
            return Rewrite {
                text: text.to_string(),
                counts: self.zero_counts(),
            };
        }

        let mut current = text.to_string();
        let mut counts = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (next, count) = rule.apply(&current);
            current = next;
            counts.push(RuleCount {
                rule: rule.source_call,
                count,
            });
        }

        Rewrite {
            text: current,
            counts,
        }
    }

    fn zero_counts(&self) -> Vec<RuleCount> {
        self.rules
            .iter()
            .map(|rule| RuleCount {
                rule: rule.source_call,
                count: 0,
            })
            .collect()
    }
}
