//! ASCII rendering and export of generated grids.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::{GenError, Result};
use crate::generator::{GenerationRequest, GenerationMode, Grid, GridStats};
use crate::regions::TilePalette;
use crate::surface::{present, AsciiSurface};

/// Render a grid as text, top row first.
pub fn render_ascii_map(grid: &Grid, palette: &TilePalette) -> String {
    let mut surface = AsciiSurface::new(palette);
    present(grid, &mut surface);
    surface.render()
}

/// Legend of every tile that occurs in `stats`, plus void.
pub fn tile_legend(palette: &TilePalette, stats: &GridStats) -> String {
    let mut out = String::from("Legend:\n");
    for &id in stats.counts.keys() {
        if let Some(style) = palette.style(id) {
            out.push_str(&format!("  {}  {}\n", style.glyph, style.name));
        }
    }
    out.push_str(&format!("  {:?} (void)\n", palette.glyph(None)));
    out
}

/// Export a grid, its legend and tile distribution to a text file.
pub fn export_ascii(
    grid: &Grid,
    palette: &TilePalette,
    request: &GenerationRequest,
    path: &Path,
) -> Result<()> {
    let file = File::create(path).map_err(|e| GenError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, grid, palette, request)
        .and_then(|_| out.flush())
        .map_err(|e| GenError::io(path, e))
}

fn write_report(
    out: &mut impl Write,
    grid: &Grid,
    palette: &TilePalette,
    request: &GenerationRequest,
) -> io::Result<()> {
    let stats = GridStats::collect(grid);

    writeln!(out, "=== CAVERN GENERATOR MAP ===")?;
    writeln!(out, "Seed: {}", request.seed)?;
    writeln!(out, "Size: {}x{}", grid.width, grid.height)?;
    writeln!(out, "Mode: {}", request.mode)?;
    if request.mode == GenerationMode::Noise {
        let noise = &request.noise;
        writeln!(
            out,
            "Noise: scale {:.2}, {} octaves, persistence {:.2}, lacunarity {:.2}, offset ({:.1}, {:.1})",
            noise.scale,
            noise.octaves,
            noise.persistence,
            noise.lacunarity,
            noise.offset.0,
            noise.offset.1
        )?;
        writeln!(
            out,
            "Thresholds: cave {:.2}, ore {:.2}, cave scale x{:.1}",
            request.policy.cave_threshold,
            request.policy.ore_threshold,
            request.policy.cave_scale_multiplier
        )?;
    }
    writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    writeln!(out, "=== MAP ===")?;
    write!(out, "{}", render_ascii_map(grid, palette))?;
    writeln!(out)?;
    write!(out, "{}", tile_legend(palette, &stats))?;
    writeln!(out)?;

    writeln!(out, "=== STATISTICS ===")?;
    writeln!(out, "Total tiles: {}", stats.total)?;
    writeln!(out, "Void: {} ({:.1}%)", stats.void, 100.0 * stats.void_fraction())?;
    writeln!(out, "Tile Distribution:")?;
    let mut sorted: Vec<_> = stats.counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));
    for (&id, &count) in sorted {
        writeln!(
            out,
            "  {:12} {} {:>7} ({:>5.1}%)",
            palette.name(id),
            palette.glyph(Some(id)),
            count,
            100.0 * stats.fraction(id)
        )?;
    }
    Ok(())
}
