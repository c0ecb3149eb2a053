use clap::Parser;
use ibgrove_rs::fabric::SwitchLid;
use ibgrove_rs::input::{PairMap, read_node_list};
use ibgrove_rs::parse::{PortNum, RoutePatterns, uplink_nodes_on_port};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "find-nodes-using",
    about = "List upstream nodes routed over one switch port and the downstream nodes mapped to them"
)]
struct Args {
    /// File with one in-use downstream node name per line
    #[arg(short = 'i', long)]
    ion_set: PathBuf,

    /// Saved multi-switch route dump (dump_lfts output)
    #[arg(short = 'r', long)]
    route_dump: PathBuf,

    /// Node map file with `downstream, upstream` lines
    #[arg(short = 'o', long)]
    optimal_map: PathBuf,

    /// Switch lid to inspect
    #[arg(short = 'l', long)]
    lid: SwitchLid,

    /// Switch port to inspect
    #[arg(short = 'p', long)]
    port: PortNum,

    /// Upstream node name prefix
    #[arg(short = 'c', long, default_value = "grove")]
    cluster: String,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let used = read_node_list(&args.ion_set)?;
    let map = PairMap::read(&args.optimal_map)?;
    let dump = fs::read_to_string(&args.route_dump)
        .map_err(|e| format!("failed to read {}: {e}", args.route_dump.display()))?;
    let patterns = RoutePatterns::new(&args.cluster, None)?;

    for up in uplink_nodes_on_port(&dump, args.lid.0, args.port, &patterns) {
        let down = map.reverse_lookup(&up).unwrap_or("<no match>");
        let mark = if used.iter().any(|u| u == down) {
            " ***"
        } else {
            ""
        };
        println!("{down}, {up}{mark}");
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
