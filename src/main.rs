mod backend;
mod battery;
mod config;
mod errors;
mod exec;

use std::path::PathBuf;
use std::process;

use backend::Backend;
use battery::{PolicyConfig, Severity};
use clap::Parser;
use config::Config;
use tracing::{debug, info};

/// Nagios exit status for plugin-level failures that are not a battery verdict.
const UNKNOWN_EXIT: i32 = 3;

/// BBU health check - reports RAID controller battery state to Nagios
#[derive(Parser)]
#[command(name = "check-lsi-bbu")]
#[command(version)]
#[command(about = "Health check for LSI/Broadcom RAID controller batteries", long_about = None)]
struct Cli {
    /// Omit performance data from the status line
    #[arg(short = 's', long = "no-stats")]
    no_stats: bool,

    /// Do not warn for a degraded battery while a learn cycle is requested
    #[arg(short = 'l', long = "learn-ok")]
    learn_ok: bool,

    /// Trace each field as it is parsed
    #[arg(short, long)]
    verbose: bool,

    /// Also dump raw tool output when a query fails
    #[arg(short, long)]
    debug: bool,

    /// Path to a TOML file overriding the tool search paths
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(severity) => process::exit(severity.exit_code()),
        Err(err) => {
            println!("UNKNOWN - {:#}", err);
            process::exit(UNKNOWN_EXIT);
        }
    }
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        // The plugin line on stdout must stay clean for the monitoring caller.
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("check_lsi_bbu={}", level).parse()?),
        )
        .init();

    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<Severity> {
    init_tracing(cli)?;

    let config = Config::load(cli.config.as_deref())?;
    debug!("configuration: {:?}", config);

    let Some(backend) = Backend::locate(&config.paths) else {
        println!("Could not find storcli64, storcli, MegaCli64 or MegaCli");
        return Ok(Severity::Warning);
    };
    info!(
        "using {} at {}",
        backend.vendor().name(),
        backend.tool().display()
    );

    let poll = backend.collect()?;

    if poll.is_empty() {
        let mut line = "No adapter found.".to_string();
        let mut severity = Severity::Ok;
        // Both tools silently report nothing without sufficient privilege.
        if !nix::unistd::geteuid().is_root() {
            line.push_str(" Not running as root.");
            severity = Severity::Warning;
        }
        println!("{}", line);
        debug!("status: {}", severity);
        return Ok(severity);
    }

    let policy = PolicyConfig {
        learn_cycle_degraded_ok: cli.learn_ok,
    };
    let (severity, mut line) = poll.aggregate_status(&policy);

    if !cli.no_stats {
        line.push('|');
        line.push_str(&poll.aggregate_statistics());
    }

    println!("{}", line);
    debug!("status: {}", severity);
    Ok(severity)
}
