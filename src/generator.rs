//! Grid generation: request sanitizing, the four noise layers, and the two
//! top-level strategies (uniform random and layered noise).

use std::collections::BTreeMap;
use std::time::Instant;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::{classify_single, CompositePolicy, LayerSamples, LayeredClassifier};
use crate::noise_field::{NoiseField, NoiseParams, MIN_SCALE};
use crate::regions::{Regions, TileId};
use crate::seeds::{Layer, LayerSeeds};
use crate::tilemap::Tilemap;

/// A classified cell. `None` is void (no tile, e.g. open cave).
pub type Cell = Option<TileId>;

/// The generated map.
pub type Grid = Tilemap<Cell>;

/// Top-level generation strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum GenerationMode {
    /// Every cell is an independent uniform draw against the base table.
    Random,
    /// Four layered noise fields composed by the classifier.
    #[default]
    Noise,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Noise => write!(f, "noise"),
        }
    }
}

/// Everything needed to generate one grid, apart from the region tables.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub width: usize,
    pub height: usize,
    pub mode: GenerationMode,
    pub seed: u64,
    /// Noise shape shared by all layers. Its `seed` is replaced per layer.
    pub noise: NoiseParams,
    pub policy: CompositePolicy,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            mode: GenerationMode::Noise,
            seed: 0,
            noise: NoiseParams::default(),
            policy: CompositePolicy::default(),
        }
    }
}

impl GenerationRequest {
    /// Copy with every field brought into its valid range: dimensions,
    /// octaves and lacunarity at least 1, a positive scale, thresholds in
    /// [0, 1], and finite floats (non-finite values revert to their defaults).
    pub fn sanitized(&self) -> Self {
        let noise_defaults = NoiseParams::default();
        let policy_defaults = CompositePolicy::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };

        let scale = finite_or(self.noise.scale, noise_defaults.scale);
        let noise = NoiseParams {
            seed: self.seed,
            scale: if scale > 0.0 { scale } else { MIN_SCALE },
            octaves: self.noise.octaves.max(1),
            persistence: finite_or(self.noise.persistence, noise_defaults.persistence),
            lacunarity: finite_or(self.noise.lacunarity, noise_defaults.lacunarity).max(1.0),
            offset: (finite_or(self.noise.offset.0, 0.0), finite_or(self.noise.offset.1, 0.0)),
        };

        let multiplier = finite_or(
            self.policy.cave_scale_multiplier,
            policy_defaults.cave_scale_multiplier,
        );
        let policy = CompositePolicy {
            cave_threshold: finite_or(self.policy.cave_threshold, policy_defaults.cave_threshold)
                .clamp(0.0, 1.0),
            ore_threshold: finite_or(self.policy.ore_threshold, policy_defaults.ore_threshold)
                .clamp(0.0, 1.0),
            cave_scale_multiplier: if multiplier > 0.0 {
                multiplier
            } else {
                policy_defaults.cave_scale_multiplier
            },
        };

        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            mode: self.mode,
            seed: self.seed,
            noise,
            policy,
        }
    }

    /// Noise parameters for one layer: its derived seed, and the cave
    /// layer's larger scale.
    pub fn layer_params(&self, layer: Layer) -> NoiseParams {
        let seeds = LayerSeeds::from_base(self.seed);
        let params = self.noise.with_seed(seeds.for_layer(layer));
        match layer {
            Layer::Cave => {
                let scale = params.scale * self.policy.cave_scale_multiplier;
                params.with_scale(scale)
            }
            _ => params,
        }
    }
}

/// The four noise fields of one noise-mode generation.
#[derive(Clone, Debug)]
pub struct LayerFields {
    pub dirt: NoiseField,
    pub ore_gate: NoiseField,
    pub ore_type: NoiseField,
    pub cave: NoiseField,
}

impl LayerFields {
    pub fn width(&self) -> usize {
        self.dirt.width()
    }

    pub fn height(&self) -> usize {
        self.dirt.height()
    }

    pub fn get(&self, layer: Layer) -> &NoiseField {
        match layer {
            Layer::Dirt => &self.dirt,
            Layer::OreGate => &self.ore_gate,
            Layer::OreType => &self.ore_type,
            Layer::Cave => &self.cave,
        }
    }

    /// All four samples at `(x, y)`. Panics outside the grid.
    pub fn samples_at(&self, x: usize, y: usize) -> LayerSamples {
        LayerSamples {
            ore_gate: self.ore_gate.get(x, y),
            dirt: self.dirt.get(x, y),
            ore_type: self.ore_type.get(x, y),
            cave: self.cave.get(x, y),
        }
    }
}

/// Generate the four layer fields in parallel. Expects a sanitized request.
pub fn generate_layers(request: &GenerationRequest) -> LayerFields {
    let (width, height) = (request.width, request.height);
    let field = |layer: Layer| {
        let start = Instant::now();
        let params = request.layer_params(layer);
        let field = NoiseField::generate(width, height, &params);
        debug!(
            "{} layer: seed {}, scale {:.3}, {:.1?}",
            layer.name(),
            params.seed,
            params.scale,
            start.elapsed()
        );
        field
    };

    let ((dirt, ore_gate), (ore_type, cave)) = rayon::join(
        || rayon::join(|| field(Layer::Dirt), || field(Layer::OreGate)),
        || rayon::join(|| field(Layer::OreType), || field(Layer::Cave)),
    );

    LayerFields { dirt, ore_gate, ore_type, cave }
}

/// Composite pass over completed layer fields, parallel by row.
pub fn classify_layers(fields: &LayerFields, regions: &Regions, policy: &CompositePolicy) -> Grid {
    let (width, height) = (fields.width(), fields.height());
    let classifier = LayeredClassifier::new(policy, &regions.ore, &regions.dirt);

    let mut cells: Vec<Cell> = vec![None; width * height];
    cells
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = classifier.classify(fields.samples_at(x, y));
            }
        });

    Tilemap::from_vec(width, height, cells).unwrap_or_else(|| Tilemap::new(width, height))
}

/// Uniform mode: one independent draw in [0, 1) per cell against the base
/// table, from an RNG seeded with the request seed.
pub fn generate_random(request: &GenerationRequest, regions: &Regions) -> Grid {
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let mut grid = Grid::new(request.width, request.height);
    for (_, _, cell) in grid.iter_mut() {
        let draw: f32 = rng.gen();
        *cell = Some(classify_single(draw, &regions.base));
    }
    grid
}

/// Sanitize the request and generate a grid with the selected strategy.
pub fn generate_grid(request: &GenerationRequest, regions: &Regions) -> Grid {
    let request = request.sanitized();
    let start = Instant::now();
    let grid = match request.mode {
        GenerationMode::Random => generate_random(&request, regions),
        GenerationMode::Noise => {
            let fields = generate_layers(&request);
            classify_layers(&fields, regions, &request.policy)
        }
    };
    debug!(
        "generated {}x{} {} grid in {:.1?}",
        request.width,
        request.height,
        request.mode,
        start.elapsed()
    );
    grid
}

/// Tile distribution of a grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridStats {
    pub total: usize,
    pub void: usize,
    pub counts: BTreeMap<TileId, usize>,
}

impl GridStats {
    pub fn collect(grid: &Grid) -> Self {
        let mut stats = Self {
            total: grid.len(),
            ..Self::default()
        };
        for cell in grid.as_slice() {
            match cell {
                Some(id) => *stats.counts.entry(*id).or_insert(0) += 1,
                None => stats.void += 1,
            }
        }
        stats
    }

    pub fn count(&self, id: TileId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn fraction(&self, id: TileId) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(id) as f64 / self.total as f64
    }

    pub fn void_fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.void as f64 / self.total as f64
    }
}
