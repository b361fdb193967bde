//! Tile surfaces: where a finished grid is written for display.
//!
//! The generator never talks to a renderer directly. A surface hands out a
//! writer sized for the grid, and [`present`] pushes every cell through it
//! once. Surfaces are free to flip axes or offset coordinates.

use image::{Rgb, RgbImage};

use crate::generator::{Cell, Grid};
use crate::regions::{TileId, TilePalette};

/// Receives cells of a grid.
pub trait TileWriter {
    fn set_tile(&mut self, x: usize, y: usize, cell: Cell);

    /// Remove the tile at `(x, y)`.
    fn erase(&mut self, x: usize, y: usize) {
        self.set_tile(x, y, None);
    }
}

impl<W: TileWriter + ?Sized> TileWriter for &mut W {
    fn set_tile(&mut self, x: usize, y: usize, cell: Cell) {
        (**self).set_tile(x, y, cell);
    }
}

/// Something a grid can be presented on.
pub trait TileSurface {
    /// Prepare for a `width` x `height` grid and return its writer.
    fn accept(&mut self, width: usize, height: usize) -> Box<dyn TileWriter + '_>;
}

/// Write every cell of `grid` to `surface`.
pub fn present<S: TileSurface + ?Sized>(grid: &Grid, surface: &mut S) {
    let mut writer = surface.accept(grid.width, grid.height);
    for (x, y, &cell) in grid.iter() {
        writer.set_tile(x, y, cell);
    }
}

/// Remove the tile at `(x, y)`, returning what was there. Out-of-bounds
/// coordinates are ignored.
pub fn mine(grid: &mut Grid, x: usize, y: usize) -> Option<TileId> {
    if !grid.contains(x, y) {
        return None;
    }
    grid.get_mut(x, y).take()
}

impl TileWriter for Grid {
    fn set_tile(&mut self, x: usize, y: usize, cell: Cell) {
        if self.contains(x, y) {
            self.set(x, y, cell);
        }
    }
}

/// An in-memory grid is itself a surface: it is resized and overwritten.
impl TileSurface for Grid {
    fn accept(&mut self, width: usize, height: usize) -> Box<dyn TileWriter + '_> {
        if self.width != width || self.height != height {
            *self = Grid::new(width, height);
        }
        Box::new(self)
    }
}

/// Text surface with y pointing up: grid row 0 is the last line.
pub struct AsciiSurface<'p> {
    palette: &'p TilePalette,
    lines: Vec<Vec<char>>,
}

impl<'p> AsciiSurface<'p> {
    pub fn new(palette: &'p TilePalette) -> Self {
        Self {
            palette,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|line| line.iter().collect())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

struct AsciiWriter<'s, 'p> {
    surface: &'s mut AsciiSurface<'p>,
}

impl TileWriter for AsciiWriter<'_, '_> {
    fn set_tile(&mut self, x: usize, y: usize, cell: Cell) {
        let height = self.surface.lines.len();
        if y >= height {
            return;
        }
        let glyph = self.surface.palette.glyph(cell);
        if let Some(slot) = self.surface.lines[height - 1 - y].get_mut(x) {
            *slot = glyph;
        }
    }
}

impl TileSurface for AsciiSurface<'_> {
    fn accept(&mut self, width: usize, height: usize) -> Box<dyn TileWriter + '_> {
        let blank = self.palette.glyph(None);
        self.lines = vec![vec![blank; width]; height];
        Box::new(AsciiWriter { surface: self })
    }
}

/// Pixel dimensions of a `width` x `height` grid drawn at `cell_size`
/// pixels per tile, or `None` if either side overflows `u32`.
pub fn image_size(width: usize, height: usize, cell_size: u32) -> Option<(u32, u32)> {
    let w = u32::try_from(width).ok()?.checked_mul(cell_size)?;
    let h = u32::try_from(height).ok()?.checked_mul(cell_size)?;
    Some((w, h))
}

/// Image surface: each cell becomes a `cell_size` square, y pointing up.
/// A grid too large for [`image_size`] leaves an empty image.
pub struct ImageSurface<'p> {
    palette: &'p TilePalette,
    cell_size: u32,
    image: RgbImage,
}

impl<'p> ImageSurface<'p> {
    pub fn new(palette: &'p TilePalette, cell_size: u32) -> Self {
        Self {
            palette,
            cell_size: cell_size.max(1),
            image: RgbImage::new(0, 0),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

struct ImageWriter<'s, 'p> {
    surface: &'s mut ImageSurface<'p>,
    rows: usize,
}

impl TileWriter for ImageWriter<'_, '_> {
    fn set_tile(&mut self, x: usize, y: usize, cell: Cell) {
        if y >= self.rows {
            return;
        }
        let size = self.surface.cell_size;
        let Some((px, py)) = image_size(x, self.rows - 1 - y, size) else {
            return;
        };
        let (width, height) = self.surface.image.dimensions();
        if px >= width || py >= height {
            return;
        }
        let color = Rgb(self.surface.palette.color(cell));
        for dy in 0..size.min(height - py) {
            for dx in 0..size.min(width - px) {
                self.surface.image.put_pixel(px + dx, py + dy, color);
            }
        }
    }
}

impl TileSurface for ImageSurface<'_> {
    fn accept(&mut self, width: usize, height: usize) -> Box<dyn TileWriter + '_> {
        let background = Rgb(self.palette.color(None));
        let (w, h) = image_size(width, height, self.cell_size).unwrap_or((0, 0));
        self.image = RgbImage::from_pixel(w, h, background);
        Box::new(ImageWriter { surface: self, rows: height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::{RegionConfig, Regions, TerrainType};

    fn palette() -> (TilePalette, TileId, TileId) {
        let config = RegionConfig {
            regions: vec![
                TerrainType {
                    glyph: Some('#'),
                    color: [10, 20, 30],
                    ..TerrainType::new("Stone", 0.5)
                },
                TerrainType {
                    glyph: Some('g'),
                    color: [200, 180, 0],
                    ..TerrainType::new("Gold", 1.0)
                },
            ],
            ..RegionConfig::defaults()
        };
        let regions = Regions::from_config(&config).unwrap();
        let stone = regions.palette.lookup("Stone").unwrap();
        let gold = regions.palette.lookup("Gold").unwrap();
        (regions.palette, stone, gold)
    }

    fn sample_grid(stone: TileId, gold: TileId) -> Grid {
        // y = 0 row: Stone, Gold ; y = 1 row: void, Stone
        Grid::from_vec(2, 2, vec![Some(stone), Some(gold), None, Some(stone)]).unwrap()
    }

    #[test]
    fn test_present_to_grid_copies_every_cell() {
        let (_, stone, gold) = palette();
        let grid = sample_grid(stone, gold);
        let mut copy = Grid::new(5, 5);
        present(&grid, &mut copy);
        assert_eq!(copy, grid);
    }

    #[test]
    fn test_ascii_surface_flips_y() {
        let (palette, stone, gold) = palette();
        let grid = sample_grid(stone, gold);
        let mut surface = AsciiSurface::new(&palette);
        present(&grid, &mut surface);
        assert_eq!(surface.render(), " #\n#g\n");
    }

    #[test]
    fn test_image_surface_scales_and_flips() {
        let (palette, stone, gold) = palette();
        let grid = sample_grid(stone, gold);
        let mut surface = ImageSurface::new(&palette, 3);
        present(&grid, &mut surface);
        let img = surface.into_image();
        assert_eq!(img.dimensions(), (6, 6));
        // Bottom-right block is grid (1, 0) = Gold.
        assert_eq!(img.get_pixel(5, 5).0, [200, 180, 0]);
        // Top-left block is grid (0, 1) = void.
        assert_eq!(img.get_pixel(0, 0).0, palette.color(None));
        assert_eq!(img.get_pixel(4, 1).0, [10, 20, 30]);
    }

    #[test]
    fn test_image_size_rejects_overflow() {
        assert_eq!(image_size(4, 3, 2), Some((8, 6)));
        assert_eq!(image_size(70_000, 1, 70_000), None);
        assert_eq!(image_size(1, 70_000, 70_000), None);
    }

    #[test]
    fn test_oversized_image_surface_stays_empty() {
        let (palette, stone, _) = palette();
        let mut surface = ImageSurface::new(&palette, u32::MAX);
        {
            let mut writer = surface.accept(2, 1);
            writer.set_tile(1, 0, Some(stone));
        }
        assert_eq!(surface.image().dimensions(), (0, 0));
    }

    #[test]
    fn test_mine_removes_and_reports() {
        let (_, stone, gold) = palette();
        let mut grid = sample_grid(stone, gold);
        assert_eq!(mine(&mut grid, 1, 0), Some(gold));
        assert_eq!(*grid.get(1, 0), None);
        assert_eq!(mine(&mut grid, 1, 0), None, "Mining void yields nothing");
        assert_eq!(mine(&mut grid, 9, 9), None, "Out of bounds is ignored");
    }

    #[test]
    fn test_writer_erase_clears_cell() {
        let (_, stone, gold) = palette();
        let mut grid = sample_grid(stone, gold);
        {
            let mut writer = grid.accept(2, 2);
            writer.erase(0, 0);
        }
        assert_eq!(*grid.get(0, 0), None);
        assert_eq!(*grid.get(1, 0), Some(gold), "accept keeps a same-sized grid");
    }
}
