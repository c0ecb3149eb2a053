use clap::Parser;
use ibgrove_rs::config::FabricConfig;
use ibgrove_rs::fabric::{SwitchLid, collect_topology};
use ibgrove_rs::sim::{SimOpts, Simulation};
use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sw-balance",
    about = "Inspect switch uplink balance and simulate file traffic over edge uplinks"
)]
struct Args {
    /// JSON config file; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upstream (storage) node name prefix, e.g. grove
    #[arg(short = 'c', long)]
    cluster: Option<String>,

    /// Downstream (compute) node name prefix, e.g. seqio
    #[arg(short = 'C', long)]
    downlink_cluster: Option<String>,

    /// Comma separated switch lids to query
    #[arg(short = 'l', long, value_delimiter = ',')]
    lids: Vec<SwitchLid>,

    /// Skip the port map and run the traffic simulation instead
    #[arg(short = 's', long)]
    simulate: bool,

    /// Number of independent simulation trials
    #[arg(short = 'i', long)]
    iterations: Option<usize>,

    /// Number of files to simulate (default: compute node count)
    #[arg(short = 'n', long)]
    files: Option<usize>,

    /// Compute node pool size (default 768)
    #[arg(long)]
    compute_nodes: Option<usize>,

    /// Storage node pool size (default 768)
    #[arg(long)]
    storage_nodes: Option<usize>,

    /// RNG seed for reproducible trials
    #[arg(long)]
    seed: Option<u64>,

    /// Number of worker threads (default: logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Route dump command, invoked as `<cmd> <lid>` (default ibroute)
    #[arg(long)]
    route_command: Option<String>,

    /// Print trial results as JSON lines
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
            files: self.files,
            compute_nodes: self.compute_nodes,
            storage_nodes: self.storage_nodes,
            iterations: self.iterations,
            seed: self.seed,
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

    let lids = cfg.lids()?;
    let pools = if args.simulate {
        Some(cfg.node_pools()?)
    } else {
        None
    };
    let patterns = cfg.route_patterns()?;
    let dispatcher = cfg.dispatcher(!args.no_progress)?;

    let topology = collect_topology(lids, &cfg.route_query(), &patterns, &dispatcher);

    let Some(pools) = pools else {
        for lid in lids {
            if let Some(sw) = topology.get(*lid) {
                print!("SW {lid}: {sw}");
            }
        }
        return Ok(());
    };

    let mut sim = Simulation::new(
        &topology,
        SimOpts {
            files: cfg.files(),
            pools,
            seed: cfg.seed,
        },
    )?;
    for _ in 0..cfg.iterations() {
        let trial = sim.run_trial()?;
        if args.json {
            println!("{}", serde_json::to_string(&trial)?);
        } else {
            print!("{}", trial.render(&sim.opts().pools));
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
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
