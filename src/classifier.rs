//! Layered threshold classification.
//!
//! Priority per cell: caves carve through everything, then ore veins where
//! the ore gate opens, then the base dirt composition.

use serde::{Deserialize, Serialize};

use crate::thresholds::ThresholdTable;

/// Thresholds and scale ratio that compose the layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositePolicy {
    /// Cave samples at or above this become void.
    pub cave_threshold: f32,
    /// Ore-gate samples at or above this consult the ore table.
    pub ore_threshold: f32,
    /// Cave noise is sampled at `scale * cave_scale_multiplier`.
    pub cave_scale_multiplier: f32,
}

impl Default for CompositePolicy {
    fn default() -> Self {
        Self {
            cave_threshold: 0.6,
            ore_threshold: 0.8,
            cave_scale_multiplier: 2.0,
        }
    }
}

/// The four co-located noise samples of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerSamples {
    pub ore_gate: f32,
    pub dirt: f32,
    pub ore_type: f32,
    pub cave: f32,
}

/// Single-layer path: step `value` through `table`.
pub fn classify_single<T: Copy>(value: f32, table: &ThresholdTable<T>) -> T {
    *table.classify(value)
}

/// Combines the ore and dirt tables under a [`CompositePolicy`].
pub struct LayeredClassifier<'a, T> {
    policy: &'a CompositePolicy,
    ore: &'a ThresholdTable<T>,
    dirt: &'a ThresholdTable<T>,
}

impl<'a, T: Copy> LayeredClassifier<'a, T> {
    pub fn new(
        policy: &'a CompositePolicy,
        ore: &'a ThresholdTable<T>,
        dirt: &'a ThresholdTable<T>,
    ) -> Self {
        Self { policy, ore, dirt }
    }

    /// Classify one cell. `None` is open cave space.
    ///
    /// An ore sample that no ore bound covers does not use the ore table's
    /// fallback; the cell is classified by the dirt table instead.
    pub fn classify(&self, samples: LayerSamples) -> Option<T> {
        if samples.cave >= self.policy.cave_threshold {
            return None;
        }
        if samples.ore_gate >= self.policy.ore_threshold {
            if let Some(&ore) = self.ore.find(samples.ore_type) {
                return Some(ore);
            }
        }
        Some(*self.dirt.classify(samples.dirt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::ThresholdEntry;

    fn ore_table() -> ThresholdTable<&'static str> {
        ThresholdTable::new(
            "ore",
            vec![ThresholdEntry::new(0.5, "Iron"), ThresholdEntry::new(1.0, "Gold")],
        )
        .unwrap()
    }

    fn dirt_table() -> ThresholdTable<&'static str> {
        ThresholdTable::new(
            "dirt",
            vec![ThresholdEntry::new(0.4, "Dirt"), ThresholdEntry::new(1.0, "Stone")],
        )
        .unwrap()
    }

    fn samples(ore_gate: f32, dirt: f32, ore_type: f32, cave: f32) -> LayerSamples {
        LayerSamples { ore_gate, dirt, ore_type, cave }
    }

    #[test]
    fn test_cave_dominates() {
        let policy = CompositePolicy::default();
        let (ore, dirt) = (ore_table(), dirt_table());
        let classifier = LayeredClassifier::new(&policy, &ore, &dirt);
        assert_eq!(classifier.classify(samples(0.95, 0.1, 0.1, 0.7)), None);
        assert_eq!(
            classifier.classify(samples(0.0, 0.9, 0.0, 0.6)),
            None,
            "threshold is inclusive"
        );
    }

    #[test]
    fn test_ore_gate_selects_ore_table() {
        let policy = CompositePolicy::default();
        let (ore, dirt) = (ore_table(), dirt_table());
        let classifier = LayeredClassifier::new(&policy, &ore, &dirt);
        assert_eq!(classifier.classify(samples(0.9, 0.1, 0.05, 0.2)), Some("Iron"));
        assert_eq!(classifier.classify(samples(0.8, 0.1, 0.7, 0.2)), Some("Gold"));
    }

    #[test]
    fn test_closed_gate_ignores_ore() {
        let policy = CompositePolicy::default();
        let (ore, dirt) = (ore_table(), dirt_table());
        let classifier = LayeredClassifier::new(&policy, &ore, &dirt);
        assert_eq!(classifier.classify(samples(0.3, 0.1, 0.05, 0.2)), Some("Dirt"));
        assert_eq!(classifier.classify(samples(0.3, 0.9, 0.05, 0.2)), Some("Stone"));
    }

    #[test]
    fn test_uncovered_ore_falls_through_to_dirt() {
        let policy = CompositePolicy::default();
        let ore = ThresholdTable::new("ore", vec![ThresholdEntry::new(0.3, "Iron")]).unwrap();
        let dirt = dirt_table();
        let classifier = LayeredClassifier::new(&policy, &ore, &dirt);
        assert_eq!(classifier.classify(samples(0.9, 0.1, 0.8, 0.0)), Some("Dirt"));
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = CompositePolicy {
            cave_threshold: 0.9,
            ore_threshold: 0.2,
            ..CompositePolicy::default()
        };
        let (ore, dirt) = (ore_table(), dirt_table());
        let classifier = LayeredClassifier::new(&policy, &ore, &dirt);
        assert_eq!(classifier.classify(samples(0.3, 0.1, 0.9, 0.7)), Some("Gold"));
        assert_eq!(classifier.classify(samples(0.3, 0.1, 0.9, 0.95)), None);
    }

    #[test]
    fn test_classify_single() {
        let dirt = dirt_table();
        assert_eq!(classify_single(0.0, &dirt), "Dirt");
        assert_eq!(classify_single(1.0, &dirt), "Stone");
    }
}
