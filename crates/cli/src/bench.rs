//! Aggregation benchmark: message-passed stats versus a mutex-guarded
//! accumulator, measured under concurrent rewrite load.
//!
//! The mutex mode exists as the losing baseline: every caller takes a global
//! lock around the counter update, which is exactly what the channel design
//! removes from the serving path.

use clap::{Args, ValueEnum};
use httpse_domain::Config;
use httpse_engine::{RewriteStats, Rewriter};
use std::hint::black_box;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AggregationMode {
    /// Bounded queue drained by a single consumer task (the engine default)
    Channel,
    /// Mutex-guarded accumulator updated inline by every caller
    Mutex,
}

#[derive(Args)]
pub struct BenchArgs {
    /// Total rewrite calls, split across tasks
    #[arg(long, default_value_t = 200_000)]
    pub iterations: usize,

    /// Concurrent tasks
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    #[arg(long, value_enum, default_value = "channel")]
    pub aggregation: AggregationMode,
}

/// Mixed corpus: exact, wildcard and exclusion hits plus guaranteed misses.
fn corpus() -> Vec<Url> {
    [
        "http://bundler.io",
        "http://www.airbnb.com.au/",
        "http://fr.wikipedia.org/wiki/Chose",
        "http://test.googlevideo.com/stream",
        "http://stackoverflow.com/users/",
        "http://stackoverflow.com/users/authenticate/",
        "http://www.samknows.com/",
        "http://unknowndomainthatshouldnotmatch.com/",
    ]
    .iter()
    .map(|s| Url::parse(s).expect("static corpus URL"))
    .collect()
}

pub async fn run(config: &Config, args: BenchArgs) -> anyhow::Result<()> {
    let concurrency = args.concurrency.max(1);
    let per_task = args.iterations.div_ceil(concurrency);
    let total_ops = per_task * concurrency;
    let urls = Arc::new(corpus());

    match args.aggregation {
        AggregationMode::Channel => run_channel(config, concurrency, per_task, total_ops, urls).await,
        AggregationMode::Mutex => run_mutex(config, concurrency, per_task, total_ops, urls).await,
    }
}

async fn run_channel(
    config: &Config,
    concurrency: usize,
    per_task: usize,
    total_ops: usize,
    urls: Arc<Vec<Url>>,
) -> anyhow::Result<()> {
    let mut engine_config = config.engine.clone();
    engine_config.stats.enabled = true;

    let rewriter = Rewriter::spawn_embedded(&engine_config);
    while rewriter.compiled_ruleset_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let started = Instant::now();
    let mut tasks = Vec::with_capacity(concurrency);
    for _ in 0..concurrency {
        let rewriter = Arc::clone(&rewriter);
        let urls = Arc::clone(&urls);
        tasks.push(tokio::spawn(async move {
            for i in 0..per_task {
                black_box(rewriter.rewrite(&urls[i % urls.len()]));
            }
        }));
    }
    for task in tasks {
        task.await?;
    }
    let elapsed = started.elapsed();

    report("channel", total_ops, elapsed);
    if let Some(stats) = rewriter.stats().await {
        report_stats(&stats, total_ops);
    }
    Ok(())
}

async fn run_mutex(
    config: &Config,
    concurrency: usize,
    per_task: usize,
    total_ops: usize,
    urls: Arc<Vec<Url>>,
) -> anyhow::Result<()> {
    let mut engine_config = config.engine.clone();
    engine_config.stats.enabled = false;

    let rewriter = Arc::new(Rewriter::embedded_blocking(&engine_config)?);
    let stats = Arc::new(Mutex::new(RewriteStats::default()));

    let started = Instant::now();
    let mut tasks = Vec::with_capacity(concurrency);
    for _ in 0..concurrency {
        let rewriter = Arc::clone(&rewriter);
        let stats = Arc::clone(&stats);
        let urls = Arc::clone(&urls);
        tasks.push(tokio::spawn(async move {
            for i in 0..per_task {
                let url = &urls[i % urls.len()];
                let call_start = Instant::now();
                black_box(rewriter.rewrite(url));
                let dur = call_start.elapsed();
                stats
                    .lock()
                    .expect("stats mutex poisoned")
                    .record(url.host_str().unwrap_or_default(), dur);
            }
        }));
    }
    for task in tasks {
        task.await?;
    }
    let elapsed = started.elapsed();

    report("mutex", total_ops, elapsed);
    let stats = stats.lock().expect("stats mutex poisoned").clone();
    report_stats(&stats, total_ops);
    Ok(())
}

fn report(mode: &str, ops: usize, elapsed: Duration) {
    let rate = ops as f64 / elapsed.as_secs_f64();
    println!("{mode}: {ops} rewrites in {elapsed:.2?} ({rate:.0} ops/s)");
}

fn report_stats(stats: &RewriteStats, ops: usize) {
    println!(
        "samples: {} consumed, {} dropped",
        stats.runs,
        ops as u64 - stats.runs.min(ops as u64)
    );
    println!(
        "latency: avg {:?}, max {:?} ({})",
        stats.average(),
        stats.max,
        stats.max_host
    );
}
