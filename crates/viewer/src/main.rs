use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use graphview::{
    CancellationToken, CharWidthMeasure, FitOptions, Inventory, InventoryConfig, InventoryEvent,
    RenderScene,
};
use inventory_layout::{Size, Viewport};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod preview;
mod xml;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Svg,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Expand a decision inventory and print what would be drawn",
    long_about = None
)]
struct Args {
    /// XML file holding the decision graph
    #[arg(short, long)]
    input: PathBuf,

    /// JSON file with inventory settings; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expand this node after loading. Repeat to walk down a branch
    #[arg(short, long)]
    expand: Vec<String>,

    #[arg(long)]
    expand_all: bool,

    #[arg(long)]
    collapse_all: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output file; standard output when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Viewport size used to resolve the final fit
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    viewport: Option<Viewport>,
    events: &'a [InventoryEvent],
    scene: &'a RenderScene,
}

fn load_config(path: Option<&Path>) -> Result<InventoryConfig> {
    let Some(path) = path else {
        return Ok(InventoryConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let graph = xml::parse_graph(&source)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let mut inventory = Inventory::new(graph, config)?;

    for id in &args.expand {
        inventory
            .set_expanded(id, true)
            .with_context(|| format!("expanding {id}"))?;
    }

    let token = CancellationToken::new();
    if args.expand_all {
        let outcome = inventory.expand_all(&token);
        if outcome.aborted {
            tracing::warn!(passes = outcome.passes, "expand all stopped early");
        }
    }
    if args.collapse_all {
        inventory.collapse_all(&token);
    }

    let events = inventory.take_events();
    for event in &events {
        tracing::debug!(?event, "transition");
    }

    let container = Size::new(args.width, args.height);
    let viewport = match inventory.take_view_requests().last() {
        Some(request) => inventory.resolve_view(request, container),
        None => inventory.fit_to_view(&FitOptions::all(container)),
    };
    let scene = inventory.render_scene(&CharWidthMeasure::default());
    tracing::info!(
        nodes = scene.nodes.len(),
        edges = scene.edges.len(),
        "scene ready"
    );

    match args.format {
        Format::Json => {
            let report = Report {
                viewport,
                events: &events,
                scene: &scene,
            };
            let json = serde_json::to_string_pretty(&report)?;
            match &args.output {
                Some(path) => std::fs::write(path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => writeln!(std::io::stdout(), "{json}")?,
            }
        }
        Format::Svg => {
            let document = preview::render_svg(&scene);
            match &args.output {
                Some(path) => svg::save(path, &document)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => writeln!(std::io::stdout(), "{document}")?,
            }
        }
    }

    Ok(())
}
