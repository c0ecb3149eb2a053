use clap::Parser;
use ibgrove_rs::assign::{BalancedAssigner, CapacityLedger};
use ibgrove_rs::config::FabricConfig;
use ibgrove_rs::fabric::{SwitchLid, collect_topology};
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "grove-map",
    about = "Compute a balanced downstream-to-upstream node map from switch routing tables"
)]
struct Args {
    /// JSON config file; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upstream (storage) node name prefix to balance, e.g. grove
    #[arg(short = 'c', long)]
    cluster: Option<String>,

    /// Downstream (compute) node name prefix, e.g. seqio
    #[arg(short = 'C', long)]
    downlink_cluster: Option<String>,

    /// Comma separated switch lids to query
    #[arg(short = 'l', long, value_delimiter = ',')]
    lids: Vec<SwitchLid>,

    /// Only print the discovered per-switch port map
    #[arg(short = 'p', long)]
    print_only: bool,

    /// Max downstream nodes per upstream node (default 2)
    #[arg(long)]
    capacity: Option<u32>,

    /// Assignments per switch before the port threshold rises (default 6)
    #[arg(long)]
    threshold_divisor: Option<usize>,

    /// Size of the upstream node pool; its upper half is never assigned (default 768)
    #[arg(long)]
    upstream_pool: Option<usize>,

    /// Number of worker threads (default: logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Route dump command, invoked as `<cmd> <lid>` (default ibroute)
    #[arg(long)]
    route_command: Option<String>,

    /// Print the assignment as JSON
    #[arg(long)]
    json: bool,

    /// Do not print per-lid progress on stderr
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn overrides(&self) -> FabricConfig {
        FabricConfig {
            cluster: self.cluster.clone(),
            downlink_cluster: self.downlink_cluster.clone(),
            lids: (!self.lids.is_empty()).then(|| self.lids.clone()),
            threads: self.threads,
            capacity: self.capacity,
            threshold_divisor: self.threshold_divisor,
            upstream_pool: self.upstream_pool,
            route_command: self.route_command.clone(),
            ..FabricConfig::default()
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => FabricConfig::load(path)?,
        None => FabricConfig::default(),
    };
    let cfg = base.merge(args.overrides());

    let cluster = cfg.cluster()?;
    let lids = cfg.lids()?;
    if !args.print_only {
        cfg.require_downlink_cluster()?;
    }
    let opts = cfg.assign_opts()?;
    let patterns = cfg.route_patterns()?;
    let dispatcher = cfg.dispatcher(!args.no_progress)?;

    let topology = collect_topology(lids, &cfg.route_query(), &patterns, &dispatcher);

    if args.print_only {
        for lid in lids {
            if let Some(sw) = topology.get(*lid) {
                print!("SW {lid}: {sw}");
            }
        }
        return Ok(());
    }

    let ledger = CapacityLedger::with_reserved_pool(opts.capacity, cluster, cfg.upstream_pool());
    let result = BalancedAssigner::with_ledger(ledger, opts.threshold_divisor).run(&topology);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{result}");
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
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
