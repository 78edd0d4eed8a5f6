//! # httpse
//!
//! Command-line front end for the httpse URL rewriting engine.

mod bench;
mod bootstrap;

use anyhow::Context;
use clap::{Parser, Subcommand};
use httpse_domain::TargetHost;
use httpse_engine::{decode_bundle, Rewriter, EMBEDDED_RULESETS};
use tracing::info;
use url::Url;

#[derive(Parser)]
#[command(name = "httpse")]
#[command(version = "0.1.0")]
#[command(about = "HTTPS Everywhere URL rewriting engine")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite one URL against the embedded rule sets
    Rewrite {
        /// The http URL to rewrite
        url: String,
    },
    /// Show bundle and index statistics
    Inspect,
    /// Hammer the engine from many tasks and report timings
    Bench(bench::BenchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = bootstrap::config::load_config(cli.config.as_deref())?;
    bootstrap::logging::init_logging(&config);
    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        "configuration loaded"
    );

    match cli.command {
        Command::Rewrite { url } => {
            let parsed = Url::parse(&url).context("invalid URL")?;
            let rewriter = Rewriter::embedded_blocking(&config.engine)?;
            let (rewritten, hit) = rewriter.rewrite(&parsed);
            if hit {
                println!("{rewritten}");
            } else {
                println!("{parsed}");
                println!("(no rule applied)");
            }
        }
        Command::Inspect => inspect(&config.engine)?,
        Command::Bench(args) => bench::run(&config, args).await?,
    }

    Ok(())
}

fn inspect(engine_config: &httpse_domain::EngineConfig) -> anyhow::Result<()> {
    let records = decode_bundle(EMBEDDED_RULESETS)?;

    let mut exact = 0usize;
    let mut prefix = 0usize;
    let mut suffix = 0usize;
    let mut malformed = 0usize;
    let mut exclusions = 0usize;
    let mut rules = 0usize;
    for record in &records {
        exclusions += record.exclusions.len();
        rules += record.rules.len();
        for target in &record.targets {
            match TargetHost::classify(&target.host) {
                Ok(TargetHost::Exact(_)) => exact += 1,
                Ok(TargetHost::PrefixWildcard(_)) => prefix += 1,
                Ok(TargetHost::SuffixWildcard(_)) => suffix += 1,
                Err(_) => malformed += 1,
            }
        }
    }

    let rewriter = Rewriter::embedded_blocking(engine_config)?;

    println!("bundle: {} bytes, {} records", EMBEDDED_RULESETS.len(), records.len());
    println!("targets: {exact} exact, {prefix} prefix-wildcard, {suffix} suffix-wildcard, {malformed} malformed");
    println!("patterns: {exclusions} exclusions, {rules} rules");
    println!("compiled rule sets: {}", rewriter.compiled_ruleset_count());
    Ok(())
}
