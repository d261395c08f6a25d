use anyhow::Context;
use clap::Parser;
use logtriage::engine::{Engine, EngineConfig};
use logtriage::rules::{self, RuleDef, RuleSet};
use rand::Rng;
use std::fs;
use std::io::{self, Read};
use std::sync::{Arc, Once};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_parallelism() {
    static START: Once = Once::new();
    START.call_once(|| {
        let n = num_cpus::get();
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    });
}

#[derive(Parser, Debug)]
#[command(name = "logtriage", version, about = "Rule-driven log classification and triage")]
struct Cli {
    /// Input files (`-` for stdin). May be repeated.
    #[arg(required = false)]
    input: Vec<String>,

    /// Origin tag recorded with the analysis: paste | upload
    #[arg(long)]
    source: Option<String>,

    /// JSON file with rule definitions replacing the built-in table
    #[arg(long)]
    rules: Option<String>,

    /// JSON file with engine settings
    #[arg(long)]
    config: Option<String>,

    /// Maximum lines retained per analysis
    #[arg(long = "max-lines")]
    max_lines: Option<usize>,

    /// Classified lines echoed back in the report
    #[arg(long)]
    preview: Option<usize>,

    /// Pattern templates kept in the summary
    #[arg(long = "top-patterns")]
    top_patterns: Option<usize>,

    /// Recommendation entries derived from the top labels
    #[arg(long = "top-recommendations")]
    top_recommendations: Option<usize>,

    /// Single-line JSON output even on a terminal
    #[arg(long, default_value_t = false)]
    compact: bool,
}

/// Concatenate the requested sources. Undecodable bytes are replaced, not
/// fatal: half-binary logs still classify on their readable lines.
fn read_input(cli: &Cli) -> anyhow::Result<(String, String)> {
    let paths = if cli.input.is_empty() {
        vec!["-".to_string()]
    } else {
        cli.input.clone()
    };
    let mut chunks = Vec::with_capacity(paths.len());
    let mut from_files = false;
    for p in &paths {
        if p == "-" {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            chunks.push(String::from_utf8_lossy(&buf).into_owned());
        } else {
            from_files = true;
            let buf = fs::read(p).with_context(|| format!("reading {p}"))?;
            chunks.push(String::from_utf8_lossy(&buf).into_owned());
        }
    }
    let source = cli
        .source
        .clone()
        .unwrap_or_else(|| if from_files { "upload".into() } else { "paste".into() });
    Ok((chunks.join("\n"), source))
}

fn load_rules(path: Option<&str>) -> anyhow::Result<Arc<RuleSet>> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            let defs: Vec<RuleDef> =
                serde_json::from_str(&raw).with_context(|| format!("parsing rules in {path}"))?;
            let set = RuleSet::compile(&defs).with_context(|| format!("compiling rules in {path}"))?;
            Ok(Arc::new(set))
        }
        None => Ok(rules::builtin()),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config in {path}"))?
        }
        None => EngineConfig::default(),
    };
    if let Some(v) = cli.max_lines {
        config.max_lines = v;
    }
    if let Some(v) = cli.preview {
        config.preview_size = v;
    }
    if let Some(v) = cli.top_patterns {
        config.top_n_patterns = v;
    }
    if let Some(v) = cli.top_recommendations {
        config.top_k_recommendations = v;
    }
    Ok(config)
}

fn mint_analyze_id() -> String {
    let n: u32 = rand::thread_rng().gen();
    format!("{n:08x}")
}

fn main() -> anyhow::Result<()> {
    init_parallelism();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    // Malformed rule or config files abort here, before any input is read.
    let rules = load_rules(cli.rules.as_deref())?;
    let config = load_config(&cli)?;
    let engine = Engine::new(rules, config);

    info!(
        rules = engine.rules().len(),
        fallback_enabled = engine.config().fallback_enabled,
        fallback_loaded = engine.fallback_active(),
        "engine ready"
    );

    let (text, source) = read_input(&cli)?;
    let report = engine.analyze(&text).into_report(mint_analyze_id());

    info!(
        analyze_id = %report.analyze_id,
        source = %source,
        total_lines = report.summary.total_lines,
        error_lines = report.summary.error_lines,
        truncated = report.summary.truncated,
        top_label = report.top_label(),
        "analysis complete"
    );

    if !cli.compact && atty::is(atty::Stream::Stdout) {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}
