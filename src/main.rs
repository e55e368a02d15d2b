// SPDX-License-Identifier: Apache-2.0 OR MIT
use anyhow::{Context, Result};
use clap::Parser;
use frag::logging::global;
use frag::{frag_debug, frag_error, frag_fatal, frag_info, frag_trace, frag_warn};
use frag::{LoggingConfig, Severity};
use std::path::PathBuf;
use std::thread;

#[derive(Parser, Debug, PartialEq)]
#[command(author, version, about = "Fragmental engine logger demo", long_about = None)]
struct Args {
    /// JSON5 logging configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum severity (trace, debug, info, warn, error, fatal)
    #[arg(long)]
    level: Option<Severity>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Color the whole line instead of only the level tag
    #[arg(long)]
    color_whole_message: bool,

    /// Messages per thread in the burst phase
    #[arg(long, default_value_t = 0)]
    burst: usize,

    /// Producer threads in the burst phase
    #[arg(long, default_value_t = 4)]
    threads: usize,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied
    fn logging_config(&self) -> Result<LoggingConfig> {
        let mut config = match &self.config {
            Some(path) => LoggingConfig::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => LoggingConfig::default(),
        };
        if let Some(level) = self.level {
            config.min_level = level;
        }
        if self.no_color {
            config.color = false;
        }
        if self.color_whole_message {
            config.color_whole_message = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.logging_config()?;
    let logger = global::init(&config)?;

    frag_trace!("Hello World! {}", 2);
    frag_debug!("Hello World! {}", 3);
    frag_info!("Hello World! {}", 1);
    frag_warn!("Hello World! {}", 5);
    frag_error!("Hello World! {}", 4);
    frag_fatal!("Hello World! {}", 5);

    let burst = args.burst;
    if burst > 0 {
        thread::scope(|s| {
            for t in 0..args.threads.max(1) {
                s.spawn(move || {
                    for i in 0..burst {
                        frag_info!("thread {} message {}", t, i);
                    }
                });
            }
        });
    }

    // Libraries using the `log` facade land in the same ring
    log::info!("burst finished, {} messages logged", logger.total_logged());

    global::shutdown();

    let stats = logger.stats();
    eprintln!(
        "logged={} written={} write_errors={} backpressure_waits={} rejected={}",
        stats.logged, stats.written, stats.write_errors, stats.backpressure_waits, stats.rejected
    );
    Ok(())
}
