use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::{GenError, Result};
use crate::generator::{Grid, LayerFields};
use crate::noise_field::NoiseField;
use crate::regions::TilePalette;
use crate::seeds::Layer;
use crate::surface::{image_size, present, ImageSurface};

/// Render a grid with its palette colours, `cell_size` pixels per cell.
pub fn render_grid(grid: &Grid, palette: &TilePalette, cell_size: u32) -> Result<RgbImage> {
    let cell_size = cell_size.max(1);
    if image_size(grid.width, grid.height, cell_size).is_none() {
        return Err(GenError::ImageTooLarge {
            width: grid.width,
            height: grid.height,
            cell_size,
        });
    }
    let mut surface = ImageSurface::new(palette, cell_size);
    present(grid, &mut surface);
    Ok(surface.into_image())
}

/// Export a grid as a PNG (or any format `image` infers from the extension).
pub fn export_grid_png(
    grid: &Grid,
    palette: &TilePalette,
    path: &Path,
    cell_size: u32,
) -> Result<()> {
    render_grid(grid, palette, cell_size)?.save(path)?;
    Ok(())
}

/// Export a noise field using the spectral colormap, y pointing up like the grid.
pub fn export_noise_field(field: &NoiseField, path: &Path) -> Result<()> {
    let (width, height) = (field.width(), field.height());
    let (w, h) = image_size(width, height, 1).ok_or(GenError::ImageTooLarge {
        width,
        height,
        cell_size: 1,
    })?;
    let mut img: RgbImage = ImageBuffer::new(w, h);

    for (x, y, &val) in field.as_tilemap().iter() {
        let color = spectral_colormap(val.clamp(0.0, 1.0));
        img.put_pixel(x as u32, (height - 1 - y) as u32, Rgb(color));
    }

    img.save(path)?;
    Ok(())
}

/// Export every layer as `<dir>/<layer>.png`.
pub fn export_layer_fields(fields: &LayerFields, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;
    for &layer in Layer::all() {
        let path = dir.join(format!("{}.png", layer.name()));
        export_noise_field(fields.get(layer), &path)?;
    }
    Ok(())
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],  // Dark blue/purple (low)
        [0.20, 0.53, 0.74],  // Blue
        [0.40, 0.76, 0.65],  // Teal
        [0.67, 0.87, 0.64],  // Light green
        [0.90, 0.96, 0.60],  // Yellow-green
        [1.00, 1.00, 0.75],  // Light yellow / white
        [1.00, 0.88, 0.55],  // Yellow
        [0.99, 0.68, 0.38],  // Light orange
        [0.96, 0.43, 0.26],  // Orange
        [0.84, 0.24, 0.31],  // Red
        [0.62, 0.00, 0.26],  // Dark red (high)
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}
