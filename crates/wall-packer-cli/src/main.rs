use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use wall_packer_core::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "wall-packer",
    about = "Pack a wall polygon with standard blocks and custom pieces",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, global = true, help_heading = "Logging")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the packer and write the placement JSON
    Pack(PackArgs),
    /// Run the packer and print metrics plus the category schedule
    Inspect(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Request JSON file (wall, apertures, catalog, options)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file (stdout when omitted)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Pretty-print the output JSON
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    pretty: bool,

    /// Override the algorithm: bidirectional|small
    #[arg(long, help_heading = "Packing")]
    algorithm: Option<String>,
    /// Override the starting direction: left|right|alternate
    #[arg(long, help_heading = "Packing")]
    direction: Option<String>,
    /// Override the ground offset in mm (small variant)
    #[arg(long, help_heading = "Packing")]
    ground_offset: Option<u32>,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_request(args: &PackArgs) -> anyhow::Result<PackRequest> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading request {}", args.input.display()))?;
    let mut req: PackRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing request {}", args.input.display()))?;

    if let Some(algorithm) = &args.algorithm {
        req.algorithm = algorithm
            .parse()
            .map_err(|()| anyhow::anyhow!("unknown algorithm: {algorithm}"))?;
    }
    if let Some(direction) = &args.direction {
        req.starting_direction = direction
            .parse()
            .map_err(|()| anyhow::anyhow!("unknown direction: {direction}"))?;
    }
    if let Some(offset) = args.ground_offset {
        req.ground_offset_mm = offset;
    }
    Ok(req)
}

fn write_output(args: &PackArgs, json: String) -> anyhow::Result<()> {
    match &args.out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("placement written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_pack(args: &PackArgs) -> anyhow::Result<()> {
    let req = load_request(args)?;
    let placement = pack_wall(&req).context("packing failed")?;
    info!("{}", placement.metrics.summary());
    if placement.coverage_overflow {
        info!("warning: coverage overflow, wall not fully tiled");
    }
    let json = if args.pretty {
        serde_json::to_string_pretty(&placement)?
    } else {
        serde_json::to_string(&placement)?
    };
    write_output(args, json)
}

fn cmd_inspect(args: &PackArgs) -> anyhow::Result<()> {
    let req = load_request(args)?;
    let placement = pack_wall(&req).context("packing failed")?;

    println!("{}", placement.metrics.summary());
    let (minx, miny, maxx, maxy) = placement.wall_bounds;
    println!(
        "Wall: {:.0}x{:.0} mm ({:.2} m2)",
        maxx - minx,
        maxy - miny,
        placement.wall_area_mm2 / 1_000_000.0
    );
    println!("Categories:");
    for row in placement.category_summary() {
        let kind = match row.kind {
            CategoryKind::Standard => "standard",
            CategoryKind::Custom => "custom",
        };
        println!(
            "  {:<3} {:<8} x{:<4} {:.0}x{:.0} mm",
            row.category, kind, row.count, row.width_mm, row.height_mm
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match &cli.command {
        Commands::Pack(args) => cmd_pack(args),
        Commands::Inspect(args) => cmd_inspect(args),
    }
}
