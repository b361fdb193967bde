//! Procedural cavern map generator library
//!
//! Layered noise fields classified into a 2D tile grid of dirt, ore and
//! cave openings. Re-exports modules for use by the binary and tools.

pub mod ascii;
pub mod classifier;
pub mod error;
pub mod export;
pub mod generator;
pub mod noise_field;
pub mod regions;
pub mod seeds;
pub mod surface;
pub mod thresholds;
pub mod tilemap;

pub use classifier::{CompositePolicy, LayerSamples, LayeredClassifier};
pub use error::GenError;
pub use generator::{generate_grid, Cell, GenerationMode, GenerationRequest, Grid, GridStats};
pub use noise_field::{NoiseField, NoiseParams};
pub use regions::{RegionConfig, Regions, TileId, TilePalette};
pub use thresholds::{ThresholdEntry, ThresholdTable};
