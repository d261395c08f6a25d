use std::fs;
use std::time::Instant;

use logtriage::normalizer::LogLine;
use logtriage::rules;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <log_file>", args[0]);
        std::process::exit(1);
    }

    let content = fs::read_to_string(&args[1])?;
    let lines: Vec<LogLine> = content
        .lines()
        .take(10000)
        .enumerate()
        .map(|(i, l)| LogLine {
            raw_text: l.to_string(),
            line_number: i + 1,
        })
        .collect();

    println!("Benchmarking rule classification on {} lines...", lines.len());

    let rules = rules::builtin();

    // Warmup
    for line in lines.iter().take(100) {
        let _ = logtriage::classifier::classify_line(line, &rules, None);
    }

    // Benchmark
    let start = Instant::now();
    let mut rule_hits = 0;
    let mut total_confidence = 0.0;

    for line in &lines {
        let result = logtriage::classifier::classify_line(line, &rules, None);
        if result.label != logtriage::classifier::UNKNOWN_LABEL {
            rule_hits += 1;
        }
        total_confidence += result.confidence;
    }

    let duration = start.elapsed();
    let lines_per_sec = lines.len() as f64 / duration.as_secs_f64();
    let avg_confidence = total_confidence / lines.len() as f64;

    println!("Results:");
    println!("  Total time: {:.3}s", duration.as_secs_f64());
    println!("  Lines per second: {:.0}", lines_per_sec);
    println!(
        "  Rule hits: {} / {} ({:.1}%)",
        rule_hits,
        lines.len(),
        rule_hits as f64 / lines.len() as f64 * 100.0
    );
    println!("  Average confidence: {:.3}", avg_confidence);

    Ok(())
}
