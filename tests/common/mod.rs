// Shared fixtures for integration tests

#![allow(dead_code)]

use clm_seed_finder::{LevelId, Position, PositionProvider, ProviderError, Seed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Collectibles per level, matching the 10 cogs + 5 bilbies of a real layout.
pub const COLLECTIBLES_PER_LEVEL: usize = 15;

/// Deterministic stand-in for the placement model: positions come from a
/// `StdRng` keyed on `(seed, level)`.
pub struct SyntheticProvider {
    pub per_level: usize,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            per_level: COLLECTIBLES_PER_LEVEL,
        }
    }
}

impl PositionProvider for SyntheticProvider {
    fn positions(&self, seed: Seed, level: LevelId) -> Result<Vec<Position>, ProviderError> {
        let key = ((seed as u64) << 8) ^ level as u64;
        let mut rng = StdRng::seed_from_u64(key);
        Ok((0..self.per_level)
            .map(|_| {
                Position::new(
                    rng.gen_range(-2000.0..2000.0),
                    rng.gen_range(0.0..400.0),
                    rng.gen_range(-2000.0..2000.0),
                )
            })
            .collect())
    }
}

/// Render a provider's layouts as a layout table for the CLI.
pub fn layout_table_text<P: PositionProvider>(
    provider: &P,
    seeds: std::ops::Range<Seed>,
    levels: &[LevelId],
) -> String {
    let mut text = String::from("seed,level,x,y,z\n");
    for seed in seeds {
        for &level in levels {
            for p in provider.positions(seed, level).unwrap() {
                text.push_str(&format!("{},{},{},{},{}\n", seed, level, p.x, p.y, p.z));
            }
        }
    }
    text
}

/// Parse the `Seed,Closest,Furthest,Average` rows of a sweep.
pub fn parse_rows(csv: &str) -> Vec<(Seed, f32, f32, f32)> {
    csv.lines()
        .skip(1)
        .map(|line| {
            let f: Vec<&str> = line.split(',').collect();
            (
                f[0].parse().unwrap(),
                f[1].parse().unwrap(),
                f[2].parse().unwrap(),
                f[3].parse().unwrap(),
            )
        })
        .collect()
}
