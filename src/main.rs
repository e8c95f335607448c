use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use pmt_layout::assembly::{ChannelInfo, PmtMap, channel_info};
use pmt_layout::export::{self, ExportFormat};
use pmt_layout::geometry::{ArrayId, GeometryConfig, Position};
use pmt_layout::reconstruct::{self, LightParams};

#[derive(Parser)]
#[command(name = "pmt_layout")]
#[command(version, about = "PMT positions of the top and bottom detector arrays")]
struct Cli {
    /// Geometry overrides as JSON (omitted fields keep nominal values)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every channel
    List,

    /// Show one channel
    Locate {
        #[arg(allow_hyphen_values = true)]
        channel: i64,
    },

    /// Write the channel map as CSV or JSON
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draw the layout as a PNG
    #[cfg(feature = "render")]
    Render {
        #[arg(short, long, default_value = "pmt_layout.png")]
        output: PathBuf,

        /// Panel size in pixels
        #[arg(long, default_value = "600")]
        size: u32,
    },

    /// Reconstruct a synthetic point source from its hit pattern
    Reconstruct {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        #[arg(long, default_value = "0.5")]
        noise: f64,

        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn print_row(info: &ChannelInfo) {
    println!(
        "{:>4}  {:<6} {:>4} {:>3} {:>3}  {:>9.3} {:>9.3}",
        info.channel,
        info.array.name(),
        info.generation,
        info.group,
        info.within,
        info.position.x,
        info.position.y,
    );
}

fn print_header() {
    println!(
        "{:>4}  {:<6} {:>4} {:>3} {:>3}  {:>9} {:>9}",
        "ch", "array", "gen", "grp", "idx", "x [cm]", "y [cm]"
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GeometryConfig::from_file(path)
            .with_context(|| format!("loading geometry from {}", path.display()))?,
        None => GeometryConfig::default(),
    };
    log::info!("geometry: {config:?}");

    match cli.command {
        Commands::List => {
            let map = PmtMap::build(config)?;
            print_header();
            for info in map.channels() {
                print_row(info);
            }
        }
        Commands::Locate { channel } => {
            let info = channel_info(channel, &config)?;
            print_header();
            print_row(&info);
        }
        Commands::Export { format, output } => {
            let map = PmtMap::build(config)?;
            let format = ExportFormat::from(format);
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    export::write(&map, format, BufWriter::new(file))?;
                    log::info!("wrote {} export to {}", format.name(), path.display());
                }
                None => export::write(&map, format, io::stdout().lock())?,
            }
        }
        #[cfg(feature = "render")]
        Commands::Render { output, size } => {
            let map = PmtMap::build(config)?;
            let img = pmt_layout::render::render_layout(&map, size)?;
            pmt_layout::render::save_png(&img, &output)?;
            println!("Layout written to {}", output.display());
        }
        Commands::Reconstruct { x, y, noise, seed } => {
            let map = PmtMap::build(config)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            };
            let source = Position::new(x, y);
            let params = LightParams {
                noise_sigma: noise,
                ..Default::default()
            };
            let areas = reconstruct::synthetic_areas(&map, source, &params, &mut rng)?;
            match reconstruct::centroid(&map, &areas, ArrayId::Top, 1.0)? {
                Some(rec) => {
                    let offset = rec.position().distance(&source);
                    println!(
                        "source ({x:.3}, {y:.3})  reconstructed ({:.3}, {:.3})  offset {offset:.3} cm  [{} channels]",
                        rec.x, rec.y, rec.contributing
                    );
                    if let Some(ch) = map.nearest(ArrayId::Top, rec.position()) {
                        println!("nearest top channel: {ch}");
                    }
                }
                None => println!("no channel above threshold"),
            }
        }
    }
    Ok(())
}
