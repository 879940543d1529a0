// Layout table position provider
//
// Reads precomputed collectible layouts from a text file, one collectible
// per line:
//
// ```text
// seed,level,x,y,z
// 0,4,-1204.5,310.0,877.25
// ```
//
// Blank lines and `#` comments are skipped. A first data line that does not
// start with an integer is taken as a header. `.gz` files are decompressed on the
// fly.

use crate::levels::LevelId;
use crate::position::{Position, PositionProvider, ProviderError, Seed};
use crate::utils::xzopen;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct LayoutTable {
    layouts: HashMap<(Seed, LevelId), Vec<Position>>,
}

impl LayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let reader = xzopen(path)?;
        let table = Self::from_reader(reader)?;
        log::debug!(
            "Loaded {} layouts ({} positions) from {}",
            table.len(),
            table.num_positions(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ProviderError> {
        let mut table = Self::new();
        let mut header_checked = false;

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
            if !header_checked {
                header_checked = true;
                if fields[0].parse::<i64>().is_err() {
                    continue; // header
                }
            }
            if fields.len() != 5 {
                return Err(ProviderError::Malformed {
                    line: line_no,
                    reason: format!("expected 5 fields (seed,level,x,y,z), found {}", fields.len()),
                });
            }

            let seed: Seed = parse_field(fields[0], "seed", line_no)?;
            let level: LevelId = parse_field(fields[1], "level", line_no)?;
            let x = parse_coordinate(fields[2], "x", line_no)?;
            let y = parse_coordinate(fields[3], "y", line_no)?;
            let z = parse_coordinate(fields[4], "z", line_no)?;

            table.insert(seed, level, Position::new(x, y, z));
        }

        Ok(table)
    }

    /// Append one collectible to the `(seed, level)` layout.
    pub fn insert(&mut self, seed: Seed, level: LevelId, position: Position) {
        self.layouts.entry((seed, level)).or_default().push(position);
    }

    /// Number of distinct `(seed, level)` layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn num_positions(&self) -> usize {
        self.layouts.values().map(Vec::len).sum()
    }
}

fn parse_field<T: std::str::FromStr>(
    field: &str,
    name: &str,
    line: usize,
) -> Result<T, ProviderError> {
    field.parse::<T>().map_err(|_| ProviderError::Malformed {
        line,
        reason: format!("invalid {}: '{}'", name, field),
    })
}

/// Coordinates must be finite; `f32::from_str` also accepts `NaN` and `inf`.
fn parse_coordinate(field: &str, name: &str, line: usize) -> Result<f32, ProviderError> {
    let value: f32 = parse_field(field, name, line)?;
    if !value.is_finite() {
        return Err(ProviderError::Malformed {
            line,
            reason: format!("non-finite {}: '{}'", name, field),
        });
    }
    Ok(value)
}

impl PositionProvider for LayoutTable {
    fn positions(&self, seed: Seed, level: LevelId) -> Result<Vec<Position>, ProviderError> {
        self.layouts
            .get(&(seed, level))
            .cloned()
            .ok_or(ProviderError::MissingLayout { seed, level })
    }
}
