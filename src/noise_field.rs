//! Seeded multi-octave noise fields normalized to [0, 1].
//!
//! The base coherent noise is a fixed-permutation Perlin function. All seed
//! dependence comes from per-octave sampling offsets drawn from a
//! `ChaCha8Rng` owned by the sampler, so two fields with different seeds
//! look at unrelated regions of the same noise plane.

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tilemap::Tilemap;

/// Smallest usable scale; anything at or below zero is raised to this.
pub const MIN_SCALE: f32 = 0.0001;

/// Value written to every cell of a field with no variation.
pub const FLAT_FIELD_VALUE: f32 = 0.5;

/// Octave offsets are drawn from `[-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE)`.
const OCTAVE_OFFSET_RANGE: f64 = 100_000.0;

/// Permutation seed of the shared base noise. Not the world seed.
const BASE_NOISE_SEED: u32 = 0;

/// Shape of a fractal noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    pub seed: u64,
    /// Feature size in cells (larger = smoother)
    pub scale: f32,
    /// Number of summed octaves (>= 1)
    pub octaves: u32,
    /// Amplitude multiplier per octave, usually in [0, 1]
    pub persistence: f32,
    /// Frequency multiplier per octave (>= 1)
    pub lacunarity: f32,
    /// Translation applied to every sample, in noise space
    pub offset: (f32, f32),
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 20.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: (0.0, 0.0),
        }
    }
}

impl NoiseParams {
    /// Copy with the degenerate values corrected: non-positive scale becomes
    /// [`MIN_SCALE`], octaves and lacunarity are raised to at least 1.
    pub fn clamped(&self) -> Self {
        let scale = if self.scale > 0.0 { self.scale } else { MIN_SCALE };
        Self {
            seed: self.seed,
            scale,
            octaves: self.octaves.max(1),
            persistence: self.persistence,
            lacunarity: self.lacunarity.max(1.0),
            offset: self.offset,
        }
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    pub fn with_scale(&self, scale: f32) -> Self {
        Self {
            scale,
            ..self.clone()
        }
    }
}

/// Raw (un-normalized) fractal noise sampler for one parameter set.
pub struct FractalNoise {
    base: Perlin,
    params: NoiseParams,
    octave_offsets: Vec<(f64, f64)>,
}

impl FractalNoise {
    pub fn new(params: &NoiseParams) -> Self {
        let params = params.clamped();
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let octave_offsets = octave_offsets(&mut rng, &params);
        Self {
            base: Perlin::new(BASE_NOISE_SEED),
            params,
            octave_offsets,
        }
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    pub fn octave_offsets(&self) -> &[(f64, f64)] {
        &self.octave_offsets
    }

    /// Sample at a position relative to the grid centre, in cells.
    pub fn sample(&self, dx: f64, dy: f64) -> f64 {
        let scale = self.params.scale as f64;
        let persistence = self.params.persistence as f64;
        let lacunarity = self.params.lacunarity as f64;

        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for &(ox, oy) in &self.octave_offsets {
            let sx = dx / scale * frequency + ox;
            let sy = dy / scale * frequency + oy;
            total += amplitude * self.base.get([sx, sy]);

            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total
    }

    /// Sample cell `(x, y)` of a `width` x `height` grid. Coordinates are
    /// anchored at the grid centre so resizing keeps content in place.
    pub fn sample_cell(&self, x: usize, y: usize, width: usize, height: usize) -> f64 {
        let dx = x as f64 - width as f64 / 2.0;
        let dy = y as f64 - height as f64 / 2.0;
        self.sample(dx, dy)
    }
}

/// Per-octave offsets, user offset included.
fn octave_offsets(rng: &mut ChaCha8Rng, params: &NoiseParams) -> Vec<(f64, f64)> {
    let (offset_x, offset_y) = (params.offset.0 as f64, params.offset.1 as f64);
    (0..params.octaves)
        .map(|_| {
            let ox = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
            let oy = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
            (ox + offset_x, oy + offset_y)
        })
        .collect()
}

/// An immutable noise field with every value in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    values: Tilemap<f32>,
    raw_min: f64,
    raw_max: f64,
}

impl NoiseField {
    /// Generate a normalized field. Zero dimensions are treated as 1.
    ///
    /// The field is rescaled so its lowest cell is exactly 0 and its
    /// highest exactly 1. A field with no variation is filled with
    /// [`FLAT_FIELD_VALUE`].
    pub fn generate(width: usize, height: usize, params: &NoiseParams) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let sampler = FractalNoise::new(params);

        let mut raw = Vec::with_capacity(width * height);
        let mut raw_min = f64::MAX;
        let mut raw_max = f64::MIN;
        for y in 0..height {
            for x in 0..width {
                let v = sampler.sample_cell(x, y, width, height);
                raw_min = raw_min.min(v);
                raw_max = raw_max.max(v);
                raw.push(v);
            }
        }

        let range = raw_max - raw_min;
        let data = raw
            .into_iter()
            .map(|v| {
                if range > 0.0 {
                    ((v - raw_min) / range) as f32
                } else {
                    FLAT_FIELD_VALUE
                }
            })
            .collect();

        let values = Tilemap::from_vec(width, height, data)
            .unwrap_or_else(|| Tilemap::new_with(width, height, FLAT_FIELD_VALUE));

        Self { values, raw_min, raw_max }
    }

    /// Normalized value at `(x, y)`. Panics outside the field.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        *self.values.get(x, y)
    }

    pub fn width(&self) -> usize {
        self.values.width
    }

    pub fn height(&self) -> usize {
        self.values.height
    }

    pub fn as_tilemap(&self) -> &Tilemap<f32> {
        &self.values
    }

    /// Raw value range before normalization.
    pub fn raw_range(&self) -> (f64, f64) {
        (self.raw_min, self.raw_max)
    }

    /// Whether the field had no variation and was filled with the midpoint.
    pub fn is_flat(&self) -> bool {
        self.raw_max - self.raw_min <= 0.0
    }
}
