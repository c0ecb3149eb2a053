use clap::Parser;
use ibgrove_rs::config::ConfigError;
use ibgrove_rs::parse::cluster_lids;
use ibgrove_rs::query::ExternalCommand;
use std::error::Error;

#[derive(Debug, Parser)]
#[command(
    name = "cluster-lids",
    about = "List the lids of all fabric nodes whose description starts with a cluster name"
)]
struct Args {
    /// Node description prefix to match
    #[arg(short = 'c', long)]
    cluster: Option<String>,

    /// Node record query command (default: saquery NR)
    #[arg(long, default_value = "saquery")]
    command: String,

    /// Arguments passed to the node record query command
    #[arg(long = "command-arg", default_values_t = vec!["NR".to_string()])]
    command_args: Vec<String>,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cluster = args
        .cluster
        .filter(|c| !c.is_empty())
        .ok_or(ConfigError::Missing("cluster"))?;

    let query = ExternalCommand::new(args.command).with_args(args.command_args);
    let Some(text) = query.run(&[]) else {
        return Err(format!("failed to run {}", query.program()).into());
    };

    for lid in cluster_lids(&text, &cluster) {
        println!("{lid}");
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
