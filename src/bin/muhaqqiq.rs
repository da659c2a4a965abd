// ─────────────────────────────────────────────────────────────────────────────
//  Muhaqqiq — Transaction Flow Investigator
//  Part of the Al-Hafiz Project, the Guardian Layer of BismillahDAO.
//
//  Muhaqqiq (محقق): "The Investigator" — follows funds across the Kaspa network
//  and surfaces layering, smurfing, cycling and burst patterns.
//
//  Findings are confidence-scored hypotheses, never verdicts.
//
//  In the name of Allah, the Most Gracious, the Most Merciful.
// ─────────────────────────────────────────────────────────────────────────────

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use muhaqqiq::config::load_config;
use muhaqqiq::engine::AnalysisRequest;
use muhaqqiq::engine::Muhaqqiq;
use muhaqqiq::error::Context;
use muhaqqiq::error::Result;
use muhaqqiq::pipeline::SnapshotDataSource;
use muhaqqiq::tracing::setup_tracing;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "muhaqqiq")]
#[command(about = "Money-flow graph analysis for Kaspa addresses", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(short = 'c', long, global = true, default_value = "Config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and analyse the transaction graph around an address
    Analyze {
        /// Start address
        #[arg(short = 'a', long)]
        address: String,

        /// Hops from the start address to expand
        #[arg(short = 'd', long)]
        depth: Option<usize>,

        /// Ignore transfers below this amount (KAS)
        #[arg(long)]
        min_amount: Option<f64>,

        /// Maximum number of addresses to expand
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Skip exchange identification
        #[arg(long, default_value_t = false)]
        no_exchanges: bool,

        /// Replay a snapshot file instead of querying the API
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Write the JSON export here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Look up balance and transaction count of an address
    Address {
        address: String,
    },
}

fn emit<T: Serialize>(
    value: &T,
    output: Option<&PathBuf>,
) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let _tracing_guard = setup_tracing(&config.logging, "muhaqqiq")?;

    match cli.command {
        Commands::Analyze {
            address,
            depth,
            min_amount,
            max_nodes,
            no_exchanges,
            snapshot,
            output,
        } => {
            let engine = match snapshot {
                Some(path) => Muhaqqiq::new(config, Arc::new(SnapshotDataSource::load(&path)?)),
                None => Muhaqqiq::from_config(config)?,
            };

            let mut request = AnalysisRequest::new(address, &engine.config);
            if let Some(depth) = depth {
                request.depth = depth;
            }
            if min_amount.is_some() {
                request.min_amount = min_amount;
            }
            if let Some(max_nodes) = max_nodes {
                request.max_nodes = max_nodes;
            }
            request.include_exchanges = !no_exchanges;

            let export = engine.analyze(&request).await?;
            emit(&export, output.as_ref())
        },
        Commands::Address { address } => {
            let engine = Muhaqqiq::from_config(config)?;
            let summary = engine.address_info(&address).await?;
            emit(&summary, None)
        },
    }
}
