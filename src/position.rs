// Collectible positions and the provider seam
//
// The placement model that turns a seed into coordinates lives outside this
// crate. Everything here only consumes `PositionProvider`.

use crate::levels::LevelId;
use thiserror::Error;

/// RNG seed fed to the placement model.
pub type Seed = i32;

/// A collectible's location in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in single precision.
    #[inline]
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no layout for seed {seed} on level {level}")]
    MissingLayout { seed: Seed, level: LevelId },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Deterministic source of collectible layouts.
///
/// Implementations must return the same positions for the same
/// `(seed, level)` pair. `Sync` is required because sweeps evaluate
/// batches of seeds on the rayon pool.
pub trait PositionProvider: Sync {
    fn positions(&self, seed: Seed, level: LevelId) -> Result<Vec<Position>, ProviderError>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn positions(&self, seed: Seed, level: LevelId) -> Result<Vec<Position>, ProviderError> {
        (**self).positions(seed, level)
    }
}
