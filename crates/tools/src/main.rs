use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use globe::{Globe, GlobeConfig, Projection};
use layers::{LayerCatalog, LayerSummary};
use scene::{HeadlessSurface, PointerEvent, RenderSurface, Touch};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "globe", about = "Drive a headless globe from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in layer types.
    Catalog,
    /// List the projection identifiers.
    Projections,
    /// Mount a globe from a JSON config and print its state.
    Mount {
        config: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
    /// Mount a globe, arm a drop and click (or tap) at a canvas point.
    Drop {
        config: PathBuf,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        /// Deliver the point as a touch end instead of a click.
        #[arg(long)]
        touch: bool,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Catalog => cmd_catalog(),
        Command::Projections => cmd_projections(),
        Command::Mount {
            config,
            width,
            height,
        } => cmd_mount(&config, width, height),
        Command::Drop {
            config,
            x,
            y,
            touch,
            width,
            height,
        } => cmd_drop(&config, x, y, touch, width, height),
    }
}

fn cmd_catalog() -> Result<()> {
    for (index, kind) in LayerCatalog::standard().kinds().iter().enumerate() {
        println!(
            "{index:>2}  {:<22} {:<28} {}",
            kind.key(),
            kind.display_name(),
            kind.default_category().label()
        );
    }
    Ok(())
}

fn cmd_projections() -> Result<()> {
    for (index, projection) in Projection::ALL.iter().enumerate() {
        println!("{index}  {projection}");
    }
    Ok(())
}

fn mount(path: &Path, width: f64, height: f64) -> Result<Globe<HeadlessSurface>> {
    let config = GlobeConfig::from_path(path)?;
    let globe = Globe::mount(config, |canvas| HeadlessSurface::new(canvas, width, height))
        .with_context(|| format!("mounting globe from {}", path.display()))?;
    Ok(globe)
}

fn cmd_mount(path: &Path, width: f64, height: f64) -> Result<()> {
    let globe = mount(path, width, height)?;
    let camera = globe.surface().camera();
    let frame = globe.surface().draw_frame();
    let layers: Vec<LayerSummary> = globe
        .registry()
        .layers()
        .iter()
        .map(LayerSummary::from)
        .collect();

    let report = json!({
        "canvasId": globe.canvas_id(),
        "projection": globe.projection().name(),
        "camera": {
            "latitude": camera.latitude,
            "longitude": camera.longitude,
            "range": camera.range,
        },
        "layers": layers,
        "drawn": frame.drawn,
        "credits": frame.credits.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_drop(path: &Path, x: f64, y: f64, touch: bool, width: f64, height: f64) -> Result<()> {
    let mut globe = mount(path, width, height)?;

    let dropped = Rc::new(Cell::new(None));
    let sink = Rc::clone(&dropped);
    globe.arm_click_drop(move |position| sink.set(Some(position)));

    let event = if touch {
        PointerEvent::touch_end(vec![Touch::new(x, y)])
    } else {
        PointerEvent::click(x, y)
    };
    if !globe.surface_mut().push_event(event) {
        bail!("surface is not listening for pointer events");
    }
    let passed = globe.pump_events();
    info!(passed = passed.len(), armed = globe.is_drop_armed(), "events pumped");

    match dropped.get() {
        Some(position) => println!("{}", serde_json::to_string_pretty(&position)?),
        None => bail!("no terrain at ({x}, {y})"),
    }
    Ok(())
}
