//! Builds the icosahedral lamp parts and writes them as STL (or OpenSCAD) files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use icolamp::config::{self, Config};
use icolamp::export::{write_part, ExportFormat};
use icolamp::geometry::{
    dihedral_tilt_deg, edge_length_from_radius, face_circumradius_from_radius, inset_circumradius,
};
use icolamp::power::StadiumProfile;
use icolamp::{BuildPlan, Part, NUM_LEDS};

#[derive(Parser)]
#[command(name = "icolamp")]
#[command(about = "Parametric generator for the icosahedral lamp parts", long_about = None)]
struct Cli {
    /// Parameter file (default: $ICOLAMP_CONFIG, then lamp.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a single part
    Build {
        /// lens, lid, base, base_cap, quadrant5 or quadrant3
        part: Part,
        #[command(flatten)]
        output: OutputArgs,
        /// Also place lenses on the quadrant jig
        #[arg(long)]
        with_lenses: bool,
    },
    /// Build every part one lamp needs and print the quantities
    Plan {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the dimensions derived from the configuration
    Info,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output directory
    #[arg(short, long, default_value = "models")]
    out: PathBuf,
    /// stl, stl-ascii or scad
    #[arg(short, long, default_value = "stl")]
    format: ExportFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref()).context("failed to load lamp configuration")?;

    match cli.command {
        Some(Commands::Build {
            part,
            output,
            with_lenses,
        }) => {
            let cfg = Config {
                quadrant_lenses: cfg.quadrant_lenses || with_lenses,
                ..cfg
            };
            build_part(&cfg, part, &output.out, output.format)?;
        }
        Some(Commands::Plan { output }) => build_plan(&cfg, &output.out, output.format)?,
        Some(Commands::Info) => show_info(&cfg)?,
        None => build_plan(&cfg, Path::new("models"), ExportFormat::default())?,
    }

    Ok(())
}

fn build_part(cfg: &Config, part: Part, out: &Path, format: ExportFormat) -> Result<PathBuf> {
    let solid = part.build(cfg).with_context(|| format!("failed to build {part}"))?;
    let path = write_part(&solid, out, part.name(), format)
        .with_context(|| format!("failed to export {part} to {}", out.display()))?;
    println!("Exported: {}", path.display());
    Ok(path)
}

fn build_plan(cfg: &Config, out: &Path, format: ExportFormat) -> Result<()> {
    let plan = BuildPlan::lamp();
    println!("Building lamp parts...\n");

    for (part, _) in plan.entries() {
        build_part(cfg, *part, out, format)?;
    }

    println!("\nPrint list:");
    for (part, quantity) in plan.entries() {
        println!("  {quantity:>3} x {part}");
    }
    println!("  {:>3} parts total", plan.total());
    Ok(())
}

fn show_info(cfg: &Config) -> Result<()> {
    let outer = cfg.outer_depth();
    let circ = face_circumradius_from_radius(outer);
    let cavity_circ = face_circumradius_from_radius(cfg.cavity_depth);

    println!("outer depth            {outer:.3} mm");
    println!("cavity depth           {:.3} mm", cfg.cavity_depth);
    println!("face edge              {:.3} mm", edge_length_from_radius(outer));
    println!("face circumradius      {circ:.3} mm");
    println!("cavity circumradius    {cavity_circ:.3} mm");
    println!("wall inset radius      {:.3} mm", inset_circumradius(circ, cfg.wall_width));
    println!("dihedral tilt          {:.3} deg", dihedral_tilt_deg(outer));
    println!("power outer diameter   {:.3} mm", cfg.power_outer_diameter());
    let jack = StadiumProfile::new(cfg.power_horiz_diameter, cfg.power_vert_diameter)
        .context("invalid power jack opening")?;
    println!("jack opening area      {:.3} mm^2", jack.area());
    println!("LEDs                   {NUM_LEDS}");
    Ok(())
}
