use crate::classifier::{LineResult, UNKNOWN_LABEL};
use crate::masking::pattern_signature;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub pattern: String,
    pub count: usize,
}

/// Corpus-level rollup of a classified batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_lines: usize,
    pub error_lines: usize,
    pub truncated: bool,
    pub top_labels: Vec<LabelCount>,
    pub top_patterns: Vec<PatternCount>,
}

/// Roll classified lines up into counts.
///
/// `top_labels` ranks the recognized labels; `unknown` lines count toward
/// the totals but carry no label entry, so the histogram stays an issue
/// taxonomy. `top_patterns` groups every line (unknown included) by masked
/// signature and keeps only the `top_n_patterns` most frequent. Both are
/// sorted by descending count, and the sort is stable so ties keep first
/// appearance order.
pub fn aggregate(
    results: &[LineResult],
    truncated: bool,
    top_n_patterns: usize,
) -> AnalysisSummary {
    let mut label_counts: AHashMap<&str, usize> = AHashMap::new();
    let mut label_order: Vec<&str> = Vec::new();
    let mut pattern_counts: AHashMap<String, usize> = AHashMap::new();
    let mut pattern_order: Vec<String> = Vec::new();
    let mut error_lines = 0usize;

    for result in results {
        if result.severity.is_error() {
            error_lines += 1;
        }
        if result.label != UNKNOWN_LABEL {
            let slot = label_counts.entry(result.label.as_str()).or_insert(0);
            if *slot == 0 {
                label_order.push(result.label.as_str());
            }
            *slot += 1;
        }

        let signature = pattern_signature(&result.label, &result.line.raw_text);
        if let Some(slot) = pattern_counts.get_mut(&signature) {
            *slot += 1;
        } else {
            pattern_order.push(signature.clone());
            pattern_counts.insert(signature, 1);
        }
    }

    let mut top_labels: Vec<LabelCount> = label_order
        .into_iter()
        .map(|label| LabelCount {
            label: label.to_string(),
            count: label_counts[label],
        })
        .collect();
    top_labels.sort_by(|a, b| b.count.cmp(&a.count));

    let mut top_patterns: Vec<PatternCount> = pattern_order
        .into_iter()
        .map(|pattern| {
            let count = pattern_counts[&pattern];
            PatternCount { pattern, count }
        })
        .collect();
    top_patterns.sort_by(|a, b| b.count.cmp(&a.count));
    top_patterns.truncate(top_n_patterns);

    AnalysisSummary {
        total_lines: results.len(),
        error_lines,
        truncated,
        top_labels,
        top_patterns,
    }
}
