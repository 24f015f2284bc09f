//! Line-level detection of diagnostic statements.
//!
//! This module decides, one physical line at a time, whether a line is a
//! removable diagnostic call and what kind of statement it is. It is a
//! textual heuristic, not a parser.
//!
//! Two tables are kept on purpose:
//!
//! - **Match rules** ([`CONSOLE_RULES`], [`PYTHON_RULES`]) decide *whether* a
//!   line is removed.
//! - **Classification** ([`classify`]) re-derives a statement tag from the
//!   line with plain substring tests.
//!
//! The two can disagree: a line may be removed by a match rule yet classify
//! as `"unknown"`. Both behaviours are relied upon by the statistics.

use std::sync::LazyLock;

use regex::Regex;

use crate::source::category::FileCategory;

/// `console` methods whose calls are removed from C-style scripts.
pub const CONSOLE_METHODS: &[&str] = &[
    "log",
    "error",
    "warn",
    "info",
    "debug",
    "trace",
    "dir",
    "dirxml",
    "table",
    "count",
    "countReset",
    "assert",
    "clear",
    "group",
    "groupEnd",
    "groupCollapsed",
    "time",
    "timeEnd",
    "timeLog",
    "profile",
    "profileEnd",
];

/// Tag used when a removed line cannot be attributed to a statement kind.
pub const UNKNOWN_STATEMENT: &str = "unknown";

/// A compiled removal pattern.
#[derive(Debug)]
pub struct MatchRule {
    /// Short name of what the rule catches
    pub name: &'static str,
    /// Pattern searched for anywhere in the line
    pub pattern: Regex,
}

impl MatchRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: compile(pattern),
        }
    }

    /// Whether the rule matches somewhere in the line.
    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Removal rules for JavaScript/TypeScript.
///
/// The call span runs from `console.` through the nearest `)` that is not
/// preceded by a `;`, plus an optional trailing `;`.
pub static CONSOLE_RULES: LazyLock<Vec<MatchRule>> = LazyLock::new(|| {
    let methods = CONSOLE_METHODS.join("|");
    vec![MatchRule::new(
        "console_call",
        &format!(r"(?s)\bconsole\.({methods})\s*\([^;]*?\);?"),
    )]
});

/// Removal rules for Python, tried in order.
pub static PYTHON_RULES: LazyLock<Vec<MatchRule>> = LazyLock::new(|| {
    vec![
        MatchRule::new("logging_import", r"import\s+logging\s*(?:as\s+\w+)?\s*"),
        MatchRule::new("logging_from_import", r"from\s+logging\s+import\s+.*"),
        MatchRule::new(
            "logger_definition",
            r"_?logger\s*=\s*logging\.getLogger\([^)]*\)",
        ),
        MatchRule::new("logging_call", r"logging\.[a-zA-Z]+\([^)]*\)"),
        MatchRule::new("logger_call", r"_?logger\.[a-zA-Z]+\([^)]*\)"),
        MatchRule::new("logging_call_spaced", r"(?s)logging\.[a-zA-Z]+\s*\([^()]*?\)"),
        MatchRule::new("logger_call_spaced", r"(?s)_?logger\.[a-zA-Z]+\s*\([^()]*?\)"),
    ]
});

static CONSOLE_METHOD: LazyLock<Regex> = LazyLock::new(|| compile(r"console\.(\w+)"));
static LOGGER_METHOD: LazyLock<Regex> = LazyLock::new(|| compile(r"_?logger\.(\w+)"));
static LOGGING_METHOD: LazyLock<Regex> = LazyLock::new(|| compile(r"logging\.(\w+)"));

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("built-in pattern {pattern:?} must compile: {err}"),
    }
}

/// Lines that are never removable, whatever the category.
///
/// Only `#` comments are exempt; `//` comments in C-style scripts are still
/// tested against the console rules.
fn is_exempt(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn rules_for(category: FileCategory) -> &'static [MatchRule] {
    match category {
        FileCategory::CStyleScript => CONSOLE_RULES.as_slice(),
        FileCategory::PythonScript => PYTHON_RULES.as_slice(),
        FileCategory::Unrecognized => &[],
    }
}

/// The first rule that makes this line removable, if any.
pub fn matching_rule(line: &str, category: FileCategory) -> Option<&'static MatchRule> {
    if is_exempt(line) {
        return None;
    }
    rules_for(category).iter().find(|rule| rule.is_match(line))
}

/// Decide whether a line is a removable diagnostic statement.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::{should_remove, FileCategory};
///
/// assert!(should_remove("  console.log('x');\n", FileCategory::CStyleScript));
/// assert!(should_remove("logger.info('x')\n", FileCategory::PythonScript));
/// assert!(!should_remove("# logging.info('x')\n", FileCategory::PythonScript));
/// assert!(!should_remove("console.log('x');\n", FileCategory::Unrecognized));
/// ```
pub fn should_remove(line: &str, category: FileCategory) -> bool {
    matching_rule(line, category).is_some()
}

/// Tag a line with the kind of diagnostic statement it contains.
///
/// Tags look like `"console.log"`, `"logger.info"`, `"logging.debug"`,
/// `"logging_import"` or `"logger_definition"`; `"unknown"` when nothing
/// recognisable is found. This does not re-check the match rules.
pub fn classify(line: &str, category: FileCategory) -> String {
    match category {
        FileCategory::CStyleScript => classify_console(line),
        FileCategory::PythonScript => classify_python(line),
        FileCategory::Unrecognized => UNKNOWN_STATEMENT.to_string(),
    }
}

fn classify_console(line: &str) -> String {
    CONSOLE_METHOD
        .captures(line)
        .map(|caps| format!("console.{}", &caps[1]))
        .unwrap_or_else(|| UNKNOWN_STATEMENT.to_string())
}

fn classify_python(line: &str) -> String {
    if line.contains("import logging") {
        "logging_import".to_string()
    } else if line.contains("getLogger") {
        "logger_definition".to_string()
    } else if line.contains("_logger.") || line.contains("logger.") {
        LOGGER_METHOD
            .captures(line)
            .map(|caps| format!("logger.{}", &caps[1]))
            .unwrap_or_else(|| "logger_statement".to_string())
    } else if line.contains("logging.") {
        LOGGING_METHOD
            .captures(line)
            .map(|caps| format!("logging.{}", &caps[1]))
            .unwrap_or_else(|| "logging_statement".to_string())
    } else {
        UNKNOWN_STATEMENT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS: FileCategory = FileCategory::CStyleScript;
    const PY: FileCategory = FileCategory::PythonScript;

    #[test]
    fn blank_lines_never_removed() {
        for category in [JS, PY, FileCategory::Unrecognized] {
            assert!(!should_remove("", category));
            assert!(!should_remove("   \t \n", category));
        }
    }

    #[test]
    fn hash_comments_exempt_in_every_category() {
        assert!(!should_remove("# logging.info('test')\n", PY));
        assert!(!should_remove("    # logger.debug(x)", PY));
        assert!(!should_remove("# console.log('x');", JS));
    }

    #[test]
    fn slash_comments_not_exempt() {
        assert!(should_remove("// console.log('debug');\n", JS));
    }

    #[test]
    fn console_methods_removed() {
        for method in CONSOLE_METHODS {
            let line = format!("console.{method}('value');\n");
            assert!(should_remove(&line, JS), "{line}");
            assert_eq!(classify(&line, JS), format!("console.{method}"));
        }
    }

    #[test]
    fn console_with_concatenation_and_spaces() {
        let line = "    console.log ( 'total: ' + total + ' items' );\n";
        assert!(should_remove(line, JS));
        assert_eq!(classify(line, JS), "console.log");
    }

    #[test]
    fn console_without_semicolon() {
        assert!(should_remove("console.warn(`careful`)\n", JS));
    }

    #[test]
    fn console_unknown_method_kept() {
        assert!(!should_remove("console.custom('x');\n", JS));
        assert!(!should_remove("console.logger('x');\n", JS));
        assert!(!should_remove("myconsole.log('x');\n", JS));
    }

    #[test]
    fn console_unclosed_call_kept() {
        // Multi-line calls are only removed when the span fits on one line.
        assert!(!should_remove("console.log(\n", JS));
        assert!(!should_remove("console.log('a'; b)\n", JS));
    }

    #[test]
    fn console_rules_ignored_for_python() {
        assert!(!should_remove("console.log('x');\n", PY));
    }

    #[test]
    fn python_logging_import() {
        assert!(should_remove("import logging\n", PY));
        assert!(should_remove("import logging as log\n", PY));
        assert_eq!(classify("import logging\n", PY), "logging_import");
    }

    #[test]
    fn python_from_import_falls_through() {
        let line = "from logging import getLogger\n";
        assert!(should_remove(line, PY));
        // Classified by the substring pass, not by the rule that matched.
        assert_eq!(classify(line, PY), "logger_definition");

        let line = "from logging import handlers\n";
        assert!(should_remove(line, PY));
        assert_eq!(classify(line, PY), UNKNOWN_STATEMENT);
    }

    #[test]
    fn python_logger_definition() {
        let line = "logger = logging.getLogger(__name__)\n";
        assert!(should_remove(line, PY));
        assert_eq!(classify(line, PY), "logger_definition");

        let line = "_logger = logging.getLogger('app')\n";
        assert!(should_remove(line, PY));
        assert_eq!(classify(line, PY), "logger_definition");
    }

    #[test]
    fn python_logging_calls() {
        let line = "    logging.debug('value=%s', value)\n";
        assert!(should_remove(line, PY));
        assert_eq!(classify(line, PY), "logging.debug");
    }

    #[test]
    fn python_logger_calls() {
        assert_eq!(classify("logger.info('test')\n", PY), "logger.info");
        assert_eq!(classify("self._logger.warning('x')\n", PY), "logger.warning");
        assert!(should_remove("logger.info('test')\n", PY));
        assert!(should_remove("self._logger.warning('x')\n", PY));
    }

    #[test]
    fn python_spaced_call() {
        let line = "logger.error ('failed: ' + reason)\n";
        assert!(should_remove(line, PY));
        assert_eq!(classify(line, PY), "logger.error");
    }

    #[test]
    fn python_ordinary_code_kept() {
        assert!(!should_remove("import os\n", PY));
        assert!(!should_remove("value = compute(logger_count)\n", PY));
        assert!(!should_remove("print('logging is fun')\n", PY));
    }

    #[test]
    fn unrecognized_category_never_removes() {
        assert!(!should_remove("console.log('x');", FileCategory::Unrecognized));
        assert!(!should_remove("import logging", FileCategory::Unrecognized));
        assert_eq!(classify("console.log('x');", FileCategory::Unrecognized), "unknown");
    }

    #[test]
    fn matching_rule_reports_first_rule() {
        let rule = matching_rule("import logging\n", PY).unwrap();
        assert_eq!(rule.name, "logging_import");

        let rule = matching_rule("logging.info('x')\n", PY).unwrap();
        assert_eq!(rule.name, "logging_call");

        assert!(matching_rule("x = 1\n", PY).is_none());
    }
}
