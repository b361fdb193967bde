//! Seed management for the layered noise fields.
//!
//! Every layer gets its own seed, derived from the base seed by a fixed
//! multiplier so a map can be reproduced from one number.

/// The four noise layers combined by the composite classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Base dirt composition.
    Dirt,
    /// Ore presence gate.
    OreGate,
    /// Ore type selector.
    OreType,
    /// Cave openings.
    Cave,
}

impl Layer {
    pub fn all() -> &'static [Layer] {
        &[Layer::Dirt, Layer::OreGate, Layer::OreType, Layer::Cave]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Dirt => "dirt",
            Layer::OreGate => "ore",
            Layer::OreType => "ore_type",
            Layer::Cave => "cave",
        }
    }

    /// Multiplier applied to the base seed for this layer.
    fn seed_multiplier(&self) -> u64 {
        match self {
            Layer::Dirt => 1,
            Layer::OreGate => 2,
            Layer::OreType => 3,
            Layer::Cave => 4,
        }
    }
}

/// Per-layer seeds derived from a base seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSeeds {
    /// Base seed (used for display and the uniform mode)
    pub base: u64,
    pub dirt: u64,
    pub ore_gate: u64,
    pub ore_type: u64,
    pub cave: u64,
}

impl LayerSeeds {
    /// Derive all layer seeds from `base`: `base`, `2*base`, `3*base`,
    /// `4*base` (wrapping). A base seed of 0 gives every layer seed 0.
    pub fn from_base(base: u64) -> Self {
        Self {
            base,
            dirt: derive_seed(base, Layer::Dirt),
            ore_gate: derive_seed(base, Layer::OreGate),
            ore_type: derive_seed(base, Layer::OreType),
            cave: derive_seed(base, Layer::Cave),
        }
    }

    pub fn for_layer(&self, layer: Layer) -> u64 {
        match layer {
            Layer::Dirt => self.dirt,
            Layer::OreGate => self.ore_gate,
            Layer::OreType => self.ore_type,
            Layer::Cave => self.cave,
        }
    }
}

fn derive_seed(base: u64, layer: Layer) -> u64 {
    base.wrapping_mul(layer.seed_multiplier())
}

impl std::fmt::Display for LayerSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LayerSeeds {{ base: {}, dirt: {}, ore: {}, ore_type: {}, cave: {} }}",
            self.base, self.dirt, self.ore_gate, self.ore_type, self.cave,
        )
    }
}
