use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Severity levels ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Whether lines at this severity count toward `error_lines`.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Critical | Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule as declared in configuration, before compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub pattern: String,
    pub severity: Severity,
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule '{label}' has an empty pattern")]
    EmptyPattern { label: String },
    #[error("rule '{label}' confidence {value} is outside 0.0..=1.0")]
    ConfidenceRange { label: String, value: f64 },
    #[error("rule '{label}' pattern '{pattern}' failed to compile")]
    BadPattern {
        label: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug)]
struct Rule {
    matcher: Regex,
    severity: Severity,
    label: String,
    base_confidence: f64,
}

/// Outcome of matching one line against a rule set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch<'a> {
    pub severity: Severity,
    pub label: &'a str,
    pub confidence: f64,
}

/// An ordered, compiled list of classification rules.
///
/// Order is significant: [`RuleSet::match_line`] returns the first rule
/// whose pattern matches, so specific rules must precede generic ones.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile rule definitions in order. Any invalid definition aborts
    /// the whole compilation; a rule set is never partially built.
    pub fn compile(defs: &[RuleDef]) -> Result<Self, RuleError> {
        let mut rules = Vec::with_capacity(defs.len());
        for def in defs {
            if def.pattern.trim().is_empty() {
                return Err(RuleError::EmptyPattern {
                    label: def.label.clone(),
                });
            }
            if !(0.0..=1.0).contains(&def.confidence) {
                return Err(RuleError::ConfidenceRange {
                    label: def.label.clone(),
                    value: def.confidence,
                });
            }
            let matcher = RegexBuilder::new(&def.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RuleError::BadPattern {
                    label: def.label.clone(),
                    pattern: def.pattern.clone(),
                    source,
                })?;
            rules.push(Rule {
                matcher,
                severity: def.severity,
                label: def.label.clone(),
                base_confidence: def.confidence,
            });
        }
        Ok(RuleSet { rules })
    }

    /// First-match-wins lookup over the rule list.
    pub fn match_line(&self, text: &str) -> Option<RuleMatch<'_>> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.is_match(text))
            .map(|rule| RuleMatch {
                severity: rule.severity,
                label: &rule.label,
                confidence: rule.base_confidence,
            })
    }

    /// Severity of the first rule carrying `label`, if any rule does.
    /// Used to assign a severity to fallback predictions that reuse a
    /// known label.
    pub fn severity_for_label(&self, label: &str) -> Option<Severity> {
        self.rules
            .iter()
            .find(|rule| rule.label == label)
            .map(|rule| rule.severity)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// Ordered most-specific first. The generic error/warning/debug catch-alls
// sit at the bottom so labeled failures are never swallowed by them.
const DEFAULT_RULES: &[(&str, Severity, &str, f64)] = &[
    ("connection refused", Severity::Error, "connection_refused", 0.95),
    (
        r"connection reset|broken pipe",
        Severity::Error,
        "connection_reset",
        0.9,
    ),
    (
        r"null pointer|nullpointerexception",
        Severity::Error,
        "null_pointer",
        0.95,
    ),
    (
        r"out of memory|oom-?kill|cannot allocate memory",
        Severity::Critical,
        "out_of_memory",
        0.95,
    ),
    (
        r"segmentation fault|segfault",
        Severity::Critical,
        "segfault",
        0.95,
    ),
    (r"\bpanic\b|panicked at", Severity::Critical, "panic", 0.9),
    (r"timed out|\btimeout\b", Severity::Error, "timeout", 0.9),
    (
        r"authentication fail|authorization fail|invalid credentials|login fail|\bunauthorized\b",
        Severity::Error,
        "auth_failure",
        0.9,
    ),
    (
        r"permission denied|access denied|\bforbidden\b",
        Severity::Error,
        "permission_denied",
        0.85,
    ),
    (
        r"no space left|disk (?:is )?full|disk at \d+%|low disk space",
        Severity::Warning,
        "disk_space",
        0.85,
    ),
    (r"\bdeadlock\b", Severity::Error, "deadlock", 0.9),
    (
        r"database (?:error|unavailable|connection)",
        Severity::Error,
        "database_error",
        0.8,
    ),
    (
        r"certificate (?:error|expired|invalid)|ssl error|tls (?:error|handshake fail)",
        Severity::Error,
        "tls_error",
        0.85,
    ),
    (
        r"could not connect|connection (?:error|fail)|\bunreachable\b",
        Severity::Error,
        "connection_failed",
        0.8,
    ),
    (r"\bexception\b|traceback", Severity::Error, "exception", 0.7),
    (r"deprecat", Severity::Warning, "deprecation", 0.7),
    (r"\bfatal\b|\bcritical\b", Severity::Critical, "fatal", 0.6),
    (
        r"\berror\b|\berr\b|\bfail(?:ed|ure)?\b",
        Severity::Error,
        "generic_error",
        0.5,
    ),
    (r"\bwarn(?:ing)?\b", Severity::Warning, "generic_warning", 0.5),
    (r"\bdebug\b|\btrace\b", Severity::Debug, "debug_noise", 0.4),
];

/// The built-in rule table as plain definitions, for callers that want to
/// extend or reorder it before compiling.
pub fn default_rule_defs() -> Vec<RuleDef> {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, severity, label, confidence)| RuleDef {
            pattern: (*pattern).to_string(),
            severity: *severity,
            label: (*label).to_string(),
            confidence: *confidence,
        })
        .collect()
}

static BUILTIN: Lazy<Arc<RuleSet>> = Lazy::new(|| {
    Arc::new(RuleSet::compile(&default_rule_defs()).expect("built-in rules must compile"))
});

/// Shared handle to the compiled built-in rule set.
pub fn builtin() -> Arc<RuleSet> {
    BUILTIN.clone()
}
