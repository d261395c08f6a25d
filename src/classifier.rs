use crate::normalizer::LogLine;
use crate::rules::{RuleSet, Severity};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Label assigned when no rule matches and no fallback prediction is
/// available.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Classification outcome for one line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineResult {
    pub line: LogLine,
    pub severity: Severity,
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
#[error("fallback inference failed: {0}")]
pub struct FallbackError(pub String);

#[derive(Debug, Clone)]
pub struct FallbackPrediction {
    pub label: String,
    pub confidence: f64,
}

/// Secondary classifier consulted only when no rule matches.
///
/// Implementations must be safe to call from rayon worker threads. A
/// failing prediction is logged and the line falls through to
/// [`UNKNOWN_LABEL`]; it never aborts the analysis.
pub trait FallbackClassifier: Send + Sync {
    fn predict(&self, text: &str) -> Result<FallbackPrediction, FallbackError>;

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Classify a single line: rules first, fallback second, unknown last.
pub fn classify_line(
    line: &LogLine,
    rules: &RuleSet,
    fallback: Option<&dyn FallbackClassifier>,
) -> LineResult {
    if let Some(m) = rules.match_line(&line.raw_text) {
        return LineResult {
            line: line.clone(),
            severity: m.severity,
            label: m.label.to_string(),
            confidence: m.confidence,
        };
    }
    if let Some(model) = fallback {
        match model.predict(&line.raw_text) {
            Ok(pred) => {
                // Severity comes from the rule table when the predicted
                // label is a known one; anything else is informational.
                let severity = rules
                    .severity_for_label(&pred.label)
                    .unwrap_or(Severity::Info);
                return LineResult {
                    line: line.clone(),
                    severity,
                    label: pred.label,
                    confidence: pred.confidence.clamp(0.0, 1.0),
                };
            }
            Err(err) => {
                warn!(
                    model = model.name(),
                    line = line.line_number,
                    error = %err,
                    "fallback classifier error"
                );
            }
        }
    }
    LineResult {
        line: line.clone(),
        severity: Severity::Info,
        label: UNKNOWN_LABEL.to_string(),
        confidence: 0.0,
    }
}

/// Classify a batch of lines in parallel, preserving input order.
pub fn classify_lines(
    lines: &[LogLine],
    rules: &RuleSet,
    fallback: Option<&dyn FallbackClassifier>,
) -> Vec<LineResult> {
    lines
        .par_iter()
        .map(|line| classify_line(line, rules, fallback))
        .collect()
}
