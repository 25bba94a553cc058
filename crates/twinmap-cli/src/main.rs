use anyhow::{Context, Result};
use clap::Parser;
use twinmap_client::ApiClient;
use twinmap_core::{RelationKind, ThingKind};
use twinmap_engine::{EngineConfig, GraphEngine, Viewport};
use twinmap_graph::{GraphFilter, SimulationPhase};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the twin backend
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Only show relationships of this kind (e.g. "owns", "contains")
    #[arg(short, long)]
    relation: Option<RelationKind>,

    /// Only show things of this kind (e.g. "person", "machine", "object")
    #[arg(short, long)]
    thing: Option<ThingKind>,

    /// Layout area as WIDTHxHEIGHT
    #[arg(long, default_value = "800x600")]
    size: String,

    /// Maximum number of simulation ticks before printing the layout
    #[arg(long, default_value_t = 500)]
    ticks: u32,
}

fn parse_size(size: &str) -> Result<Viewport> {
    let (w, h) = size
        .split_once('x')
        .context("size must be WIDTHxHEIGHT, e.g. 800x600")?;
    Ok(Viewport::new(
        w.trim().parse().context("invalid width")?,
        h.trim().parse().context("invalid height")?,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let viewport = parse_size(&args.size)?;

    // 1. Fetch and reconcile
    let client = ApiClient::new(&args.url)?;
    let mut engine = GraphEngine::new(client, EngineConfig::default());
    engine
        .initialize(viewport)
        .await
        .with_context(|| format!("failed to load graph from {}", args.url))?;

    println!(
        "Loaded {} things, {} relationships from {}",
        engine.model().node_count(),
        engine.model().edge_count(),
        args.url
    );
    for dropped in engine.dropped_edges() {
        eprintln!(
            "Skipped relationship {:?} ({} -> {}): endpoint not found",
            dropped.name, dropped.source, dropped.target
        );
    }

    // 2. Filter
    let filter = GraphFilter {
        relation_kind: args.relation,
        thing_kind: args.thing,
    };
    if !filter.is_empty() {
        engine.apply_filter(filter);
        println!(
            "Filter leaves {} things, {} relationships visible",
            engine.visible().node_count(),
            engine.visible().edge_count()
        );
    }

    // 3. Run the layout until it settles or the tick budget runs out
    let dt = 1.0 / 60.0;
    let mut ticks = 0;
    while ticks < args.ticks && engine.phase() != SimulationPhase::Idle {
        engine.tick(dt);
        ticks += 1;
    }
    println!("Layout settled after {ticks} ticks");

    // 4. Print positions for every visible thing
    let model = engine.model();
    let styles = engine.styles();
    for &idx in &engine.visible().nodes {
        let node = &model.graph[idx];
        println!(
            "  {:<24} {:<8} ({:>7.1}, {:>7.1})  {}",
            node.name,
            node.kind.as_str(),
            node.position.x,
            node.position.y,
            styles.node_color(node.kind).to_hex()
        );
    }
    for &idx in &engine.visible().edges {
        let edge = &model.graph[idx];
        let style = styles.edge_style(edge.kind);
        println!(
            "  {} -[{}]-> {}  {}{}",
            model.graph[edge.source_idx].name,
            edge.kind.as_str(),
            model.graph[edge.target_idx].name,
            style.color.to_hex(),
            if style.dashed { " (dashed)" } else { "" }
        );
    }

    Ok(())
}
