use crate::aggregate::{self, AnalysisSummary, PatternCount};
use crate::classifier::{self, FallbackClassifier, LineResult, UNKNOWN_LABEL};
use crate::normalizer;
use crate::recommend;
use crate::rules::{self, RuleSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

fn default_max_lines() -> usize {
    20_000
}

fn default_preview_size() -> usize {
    50
}

fn default_top_n_patterns() -> usize {
    10
}

fn default_top_k_recommendations() -> usize {
    2
}

fn default_fallback_enabled() -> bool {
    true
}

/// Tunables for one engine instance. All fields have serving defaults so
/// a partial JSON config deserializes cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default = "default_preview_size")]
    pub preview_size: usize,
    #[serde(default = "default_top_n_patterns")]
    pub top_n_patterns: usize,
    #[serde(default = "default_top_k_recommendations")]
    pub top_k_recommendations: usize,
    #[serde(default = "default_fallback_enabled")]
    pub fallback_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_lines: default_max_lines(),
            preview_size: default_preview_size(),
            top_n_patterns: default_top_n_patterns(),
            top_k_recommendations: default_top_k_recommendations(),
            fallback_enabled: default_fallback_enabled(),
        }
    }
}

/// Result of one analysis run, before an id is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: AnalysisSummary,
    pub top_patterns: Vec<PatternCount>,
    pub recommendations: Vec<String>,
    pub results_preview: Vec<LineResult>,
}

impl Analysis {
    pub fn into_report(self, analyze_id: impl Into<String>) -> AnalysisReport {
        AnalysisReport {
            analyze_id: analyze_id.into(),
            summary: self.summary,
            top_patterns: self.top_patterns,
            recommendations: self.recommendations,
            results_preview: self.results_preview,
        }
    }
}

/// The full report payload handed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analyze_id: String,
    pub summary: AnalysisSummary,
    pub top_patterns: Vec<PatternCount>,
    pub recommendations: Vec<String>,
    pub results_preview: Vec<LineResult>,
}

impl AnalysisReport {
    /// Most frequent label, or the unknown label for empty input.
    pub fn top_label(&self) -> &str {
        self.summary
            .top_labels
            .first()
            .map(|lc| lc.label.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Classification pipeline: normalize, classify, aggregate, recommend.
///
/// Rule-only operation is the default; a fallback classifier is attached
/// explicitly with [`Engine::with_fallback`] and can still be switched
/// off per-config without detaching it.
pub struct Engine {
    rules: Arc<RuleSet>,
    fallback: Option<Arc<dyn FallbackClassifier>>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(rules: Arc<RuleSet>, config: EngineConfig) -> Self {
        Engine {
            rules,
            fallback: None,
            config,
        }
    }

    /// Engine over the built-in rule table.
    pub fn with_defaults(config: EngineConfig) -> Self {
        Engine::new(rules::builtin(), config)
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackClassifier>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether a fallback is both attached and enabled.
    pub fn fallback_active(&self) -> bool {
        self.config.fallback_enabled && self.fallback.is_some()
    }

    /// Run the full pipeline over a raw text blob.
    pub fn analyze(&self, text: &str) -> Analysis {
        let input = normalizer::normalize(text, self.config.max_lines);
        if input.truncated {
            debug!(
                kept = input.lines.len(),
                max_lines = self.config.max_lines,
                "input truncated to line cap"
            );
        }

        let fallback = if self.config.fallback_enabled {
            self.fallback.as_deref()
        } else {
            None
        };
        let mut results = classifier::classify_lines(&input.lines, &self.rules, fallback);

        let summary = aggregate::aggregate(&results, input.truncated, self.config.top_n_patterns);

        let labels: Vec<&str> = summary
            .top_labels
            .iter()
            .map(|lc| lc.label.as_str())
            .collect();
        let recommendations = recommend::recommend(&labels, self.config.top_k_recommendations);

        let top_patterns = summary.top_patterns.clone();
        results.truncate(self.config.preview_size);

        Analysis {
            summary,
            top_patterns,
            recommendations,
            results_preview: results,
        }
    }
}
