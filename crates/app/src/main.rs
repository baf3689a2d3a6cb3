use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use graph_layout::{Arrangement, ArrangerConfig, GraphArranger};
use graphedit_common::{load_document, save_document, ser::to_ron_string, GraphDocument};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Arrange the selected nodes of a graph document
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Graph document to arrange
    input: PathBuf,

    /// Where to write the arranged document, stdout if not given
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Arranger configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arrange every node, not only the selected ones
    #[arg(long)]
    select_all: bool,
}

fn load_config(path: &Path) -> Result<ArrangerConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Can't read {path:?}"))?;
    ron::from_str(&text).with_context(|| format!("Can't parse arranger config {path:?}"))
}

fn arrange(document: &GraphDocument, config: ArrangerConfig, select_all: bool) -> Result<GraphDocument> {
    let mut graph = document.to_graph()?;
    if select_all {
        graph.select_all();
    }

    let arranger = GraphArranger::with_host(config, graph);
    match arranger.arrange_nodes()? {
        Arrangement::Done(stats) => info!(
            "Arranged {} nodes in {} components",
            stats.nodes, stats.chunks
        ),
        Arrangement::Skipped => warn!("Arrangement already running, nothing done"),
    }

    let graph = arranger
        .into_host()
        .ok_or_else(|| anyhow!("Graph went missing while arranging"))?;
    Ok(GraphDocument::from_graph(&graph))
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ArrangerConfig::default(),
    };

    let document = load_document(&args.input)?;
    let arranged = arrange(&document, config, args.select_all)?;

    match &args.output {
        Some(path) => save_document(&arranged, path)?,
        None => println!("{}", to_ron_string(&arranged)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    run(args)
}
