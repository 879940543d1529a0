// Level catalog
//
// Labels for the levels a sweep visits. Built once in `main` and passed by
// reference; nothing here feeds into metric computation.

use crate::error::SearchError;

pub type LevelId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    pub code: String,
}

/// Ordered set of main stages plus their display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Build a catalog from `(id, name, code)` entries. Entry order is the
    /// main-stage sweep order.
    pub fn new<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LevelId, N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let levels = entries
            .into_iter()
            .map(|(id, name, code)| Level {
                id,
                name: name.into(),
                code: code.into(),
            })
            .collect();
        Self { levels }
    }

    pub fn main_stages(&self) -> impl ExactSizeIterator<Item = LevelId> + '_ {
        self.levels.iter().map(|l| l.id)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn get(&self, id: LevelId) -> Result<&Level, SearchError> {
        self.levels
            .iter()
            .find(|l| l.id == id)
            .ok_or(SearchError::UnknownLevel(id))
    }

    pub fn name(&self, id: LevelId) -> Result<&str, SearchError> {
        self.get(id).map(|l| l.name.as_str())
    }

    pub fn code(&self, id: LevelId) -> Result<&str, SearchError> {
        self.get(id).map(|l| l.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::new([
            (4, "Two Up", "A1"),
            (5, "Walk in the Park", "A2"),
            (6, "Ship Rex", "A3"),
            (8, "Bridge on the River Ty", "B1"),
            (9, "Snow Worries", "B2"),
            (10, "Outback Safari", "B3"),
            (12, "Lyre, Lyre Pants on Fire", "C1"),
            (13, "Beyond the Black Stump", "C2"),
            (14, "Rex Marks the Spot", "C3"),
        ])
    }
}
