use clap::Parser;
use ibgrove_rs::config::ConfigError;
use ibgrove_rs::dispatch::{Dispatcher, Progress, default_concurrency};
use ibgrove_rs::fabric::SwitchLid;
use ibgrove_rs::parse::switch_lids;
use ibgrove_rs::query::{ExternalCommand, FabricQuery};
use std::error::Error;
use std::io::Write;

#[derive(Debug, Parser)]
#[command(
    name = "bulk-query",
    about = "Run a per-lid diagnostic command across many lids in parallel and print outputs in order"
)]
struct Args {
    /// Comma separated lids to query
    #[arg(short = 'l', long, value_delimiter = ',', conflicts_with = "all_switches")]
    lids: Vec<SwitchLid>,

    /// Query every switch reported by the switch enumeration command
    #[arg(long)]
    all_switches: bool,

    /// Per-lid command, invoked as `<cmd> <args...> <lid>`
    #[arg(long, default_value = "ibccquery")]
    command: String,

    /// Switch enumeration command used with --all-switches
    #[arg(long, default_value = "ibswitches")]
    switches_command: String,

    /// Number of worker threads (default: logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Do not print per-lid progress on stderr
    #[arg(long)]
    no_progress: bool,

    /// Extra arguments passed to the per-lid command before the lid
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command_args: Vec<String>,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let lids: Vec<SwitchLid> = if args.all_switches {
        let Some(text) = ExternalCommand::new(&args.switches_command).run(&[]) else {
            return Err(format!("failed to run {}", args.switches_command).into());
        };
        switch_lids(&text).into_iter().map(SwitchLid).collect()
    } else {
        args.lids
    };
    if lids.is_empty() {
        return Err(ConfigError::Missing("a lid list").into());
    }

    let threads = match args.threads {
        Some(0) => return Err(ConfigError::Zero("threads").into()),
        Some(n) => n,
        None => default_concurrency(),
    };
    let mut dispatcher = Dispatcher::new(threads);
    if !args.no_progress {
        dispatcher = dispatcher.with_progress(Progress::stderr("query lid"));
    }

    let query = ExternalCommand::new(args.command).with_args(args.command_args);
    let results = dispatcher.run(&lids, |lid| query.query(&lid.to_string()));

    let mut out = std::io::stdout().lock();
    for (_, text) in results.iter() {
        if let Some(text) = text {
            out.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
