use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use cavern_generator::ascii::{export_ascii, render_ascii_map};
use cavern_generator::export::{export_grid_png, export_layer_fields};
use cavern_generator::generator::{
    classify_layers, generate_layers, generate_random, GenerationMode, GenerationRequest, GridStats,
};
use cavern_generator::surface::mine;
use cavern_generator::{CompositePolicy, GenError, NoiseParams, RegionConfig, Regions};

#[derive(Parser, Debug)]
#[command(name = "cavern_generator")]
#[command(about = "Generate procedural tile maps of dirt, ore and caves")]
struct Args {
    /// Width of the map in tiles
    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    /// Height of the map in tiles
    #[arg(short = 'H', long, default_value = "64")]
    height: usize,

    /// Random seed, negative values allowed (uses random seed if not specified)
    #[arg(short, long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Generation strategy
    #[arg(short, long, value_enum, default_value_t = GenerationMode::Noise)]
    mode: GenerationMode,

    /// Noise feature size in tiles
    #[arg(long, default_value = "20.0")]
    scale: f32,

    /// Number of noise octaves
    #[arg(long, default_value = "4")]
    octaves: u32,

    /// Amplitude decay per octave (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    persistence: f32,

    /// Frequency growth per octave (>= 1.0)
    #[arg(long, default_value = "2.0")]
    lacunarity: f32,

    /// Horizontal noise offset
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    offset_x: f32,

    /// Vertical noise offset
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    offset_y: f32,

    /// Cave samples at or above this become void
    #[arg(long, default_value = "0.6")]
    cave_threshold: f32,

    /// Ore-gate samples at or above this use the ore table
    #[arg(long, default_value = "0.8")]
    ore_threshold: f32,

    /// Cave noise scale relative to --scale
    #[arg(long, default_value = "2.0")]
    cave_scale: f32,

    /// Region tables JSON (embedded defaults if not specified)
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Remove the tile at X,Y after generation (repeatable)
    #[arg(long, value_parser = parse_point)]
    mine: Vec<(usize, usize)>,

    /// Export the map as PNG
    #[arg(long)]
    export_png: Option<PathBuf>,

    /// Pixels per tile in the PNG export
    #[arg(long, default_value = "4")]
    png_cell_size: u32,

    /// Export the map and statistics as text
    #[arg(long)]
    export_ascii: Option<PathBuf>,

    /// Export each noise layer as PNG into this directory (noise mode only)
    #[arg(long)]
    export_layers: Option<PathBuf>,

    /// Print the map to stdout
    #[arg(long)]
    print: bool,
}

fn parse_point(s: &str) -> Result<(usize, usize), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok((x, y))
}

impl Args {
    fn request(&self, seed: u64) -> GenerationRequest {
        GenerationRequest {
            width: self.width,
            height: self.height,
            mode: self.mode,
            seed,
            noise: NoiseParams {
                seed,
                scale: self.scale,
                octaves: self.octaves,
                persistence: self.persistence,
                lacunarity: self.lacunarity,
                offset: (self.offset_x, self.offset_y),
            },
            policy: CompositePolicy {
                cave_threshold: self.cave_threshold,
                ore_threshold: self.ore_threshold,
                cave_scale_multiplier: self.cave_scale,
            },
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GenError> {
    // Negative seeds keep their bit pattern.
    let seed = args.seed.map(|s| s as u64).unwrap_or_else(rand::random);
    let raw = args.request(seed);
    let request = raw.sanitized();
    if request != raw {
        warn!("Some parameters were out of range and have been clamped");
    }

    info!("Generating map with seed: {}", seed);
    info!("Map size: {}x{} ({} mode)", request.width, request.height, request.mode);

    let config = match &args.regions {
        Some(path) => {
            info!("Loading region tables from {}", path.display());
            RegionConfig::load(path)?
        }
        None => RegionConfig::defaults(),
    };
    let regions = Regions::from_config(&config)?;

    let mut grid = match request.mode {
        GenerationMode::Random => generate_random(&request, &regions),
        GenerationMode::Noise => {
            info!("Generating noise layers...");
            let fields = generate_layers(&request);
            if let Some(dir) = &args.export_layers {
                export_layer_fields(&fields, dir)?;
                info!("Exported noise layers to: {}", dir.display());
            }
            info!("Classifying tiles...");
            classify_layers(&fields, &regions, &request.policy)
        }
    };
    if args.export_layers.is_some() && request.mode == GenerationMode::Random {
        warn!("--export-layers has no effect in random mode");
    }

    for &(x, y) in &args.mine {
        match mine(&mut grid, x, y) {
            Some(id) => info!("Mined {} at ({}, {})", regions.palette.name(id), x, y),
            None => info!("Nothing to mine at ({}, {})", x, y),
        }
    }

    let stats = GridStats::collect(&grid);
    info!(
        "{} tiles, {} void ({:.1}%), {} tile types",
        stats.total,
        stats.void,
        100.0 * stats.void_fraction(),
        stats.counts.len()
    );
    for (&id, &count) in &stats.counts {
        info!(
            "  {:12} {:>7} ({:.1}%)",
            regions.palette.name(id),
            count,
            100.0 * stats.fraction(id)
        );
    }

    if let Some(path) = &args.export_png {
        export_grid_png(&grid, &regions.palette, path, args.png_cell_size)?;
        info!("Exported map to: {}", path.display());
    }

    if let Some(path) = &args.export_ascii {
        export_ascii(&grid, &regions.palette, &request, path)?;
        info!("Exported ASCII map to: {}", path.display());
    }

    if args.print {
        print!("{}", render_ascii_map(&grid, &regions.palette));
    }

    Ok(())
}
