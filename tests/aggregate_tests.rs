use logtriage::aggregate::aggregate;
use logtriage::classifier::LineResult;
use logtriage::normalizer::LogLine;
use logtriage::rules::Severity;

fn result(text: &str, number: usize, severity: Severity, label: &str) -> LineResult {
    LineResult {
        line: LogLine {
            raw_text: text.to_string(),
            line_number: number,
        },
        severity,
        label: label.to_string(),
        confidence: 0.9,
    }
}

#[test]
fn totals_count_all_lines_and_error_severities() {
    let results = vec![
        result("connection refused", 1, Severity::Error, "connection_refused"),
        result("fatal disk failure", 2, Severity::Critical, "fatal"),
        result("disk at 90%", 3, Severity::Warning, "disk_space"),
        result("OK", 4, Severity::Info, "unknown"),
    ];
    let summary = aggregate(&results, false, 10);
    assert_eq!(summary.total_lines, 4);
    assert_eq!(summary.error_lines, 2);
    assert!(!summary.truncated);
}

#[test]
fn label_counts_sum_to_total_lines_when_everything_is_labeled() {
    let results = vec![
        result("a", 1, Severity::Error, "x"),
        result("b", 2, Severity::Error, "x"),
        result("c", 3, Severity::Info, "y"),
        result("d", 4, Severity::Info, "z"),
    ];
    let summary = aggregate(&results, false, 10);
    let sum: usize = summary.top_labels.iter().map(|lc| lc.count).sum();
    assert_eq!(sum, summary.total_lines);
}

#[test]
fn unknown_lines_count_toward_totals_but_not_the_label_histogram() {
    let results = vec![
        result("connection refused", 1, Severity::Error, "connection_refused"),
        result("OK", 2, Severity::Info, "unknown"),
        result("ready", 3, Severity::Info, "unknown"),
    ];
    let summary = aggregate(&results, false, 10);
    assert_eq!(summary.total_lines, 3);
    assert_eq!(summary.top_labels.len(), 1);
    assert_eq!(summary.top_labels[0].label, "connection_refused");
    let sum: usize = summary.top_labels.iter().map(|lc| lc.count).sum();
    assert!(sum <= summary.total_lines);
    // Unknown lines still participate in pattern grouping
    assert!(summary
        .top_patterns
        .iter()
        .any(|pc| pc.pattern.starts_with("unknown: ")));
}

#[test]
fn labels_sort_by_count_with_ties_in_first_seen_order() {
    let results = vec![
        result("1", 1, Severity::Info, "beta"),
        result("2", 2, Severity::Info, "alpha"),
        result("3", 3, Severity::Info, "alpha"),
        result("4", 4, Severity::Info, "gamma"),
        result("5", 5, Severity::Info, "beta"),
    ];
    let summary = aggregate(&results, false, 10);
    let ordered: Vec<(&str, usize)> = summary
        .top_labels
        .iter()
        .map(|lc| (lc.label.as_str(), lc.count))
        .collect();
    // beta and alpha both count 2; beta appeared first
    assert_eq!(ordered, vec![("beta", 2), ("alpha", 2), ("gamma", 1)]);
}

#[test]
fn parameter_bearing_lines_collapse_into_one_pattern() {
    let results = vec![
        result("timed out after 120ms", 1, Severity::Error, "timeout"),
        result("timed out after 450ms", 2, Severity::Error, "timeout"),
        result("timed out after 900ms", 3, Severity::Error, "timeout"),
    ];
    let summary = aggregate(&results, false, 10);
    assert_eq!(summary.top_patterns.len(), 1);
    assert_eq!(summary.top_patterns[0].pattern, "timeout: timed out after <NUM>ms");
    assert_eq!(summary.top_patterns[0].count, 3);
}

#[test]
fn patterns_are_capped_but_labels_are_not() {
    let results: Vec<LineResult> = (0..6)
        .map(|i| {
            result(
                &format!("distinct failure shape {}", "x".repeat(i + 1)),
                i + 1,
                Severity::Error,
                &format!("label_{i}"),
            )
        })
        .collect();
    let summary = aggregate(&results, false, 2);
    assert_eq!(summary.top_patterns.len(), 2);
    assert_eq!(summary.top_labels.len(), 6);
}

#[test]
fn pattern_cap_keeps_the_most_frequent_templates() {
    let mut results = Vec::new();
    for i in 0..5 {
        results.push(result("disk at 90%", i + 1, Severity::Warning, "disk_space"));
    }
    for i in 0..3 {
        results.push(result("timed out after 10ms", i + 6, Severity::Error, "timeout"));
    }
    results.push(result("one-off oddity", 9, Severity::Info, "unknown"));
    let summary = aggregate(&results, false, 2);
    assert_eq!(summary.top_patterns.len(), 2);
    assert_eq!(summary.top_patterns[0].count, 5);
    assert_eq!(summary.top_patterns[1].count, 3);
}

#[test]
fn empty_results_produce_zero_counts_not_errors() {
    let summary = aggregate(&[], false, 10);
    assert_eq!(summary.total_lines, 0);
    assert_eq!(summary.error_lines, 0);
    assert!(summary.top_labels.is_empty());
    assert!(summary.top_patterns.is_empty());
}

#[test]
fn truncation_flag_is_carried_through() {
    let summary = aggregate(&[], true, 10);
    assert!(summary.truncated);
}
