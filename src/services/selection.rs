//! Year multiselect filter.

use std::collections::BTreeSet;

/// Which calendar years a view is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearSelection {
    #[default]
    All,
    Only(BTreeSet<i32>),
}

impl YearSelection {
    /// Parse a `years` query value.
    ///
    /// `None` selects every year; `Some("")` is the empty selection;
    /// otherwise a comma-separated list of years.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let Some(raw) = raw else {
            return Ok(YearSelection::All);
        };

        let mut years = BTreeSet::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let year = part
                .parse::<i32>()
                .map_err(|_| format!("Invalid year: '{}'", part))?;
            years.insert(year);
        }
        Ok(YearSelection::Only(years))
    }

    pub fn contains(&self, year: i32) -> bool {
        match self {
            YearSelection::All => true,
            YearSelection::Only(years) => years.contains(&year),
        }
    }

    /// Years from `available` that pass this selection.
    pub fn resolve(&self, available: &[i32]) -> Vec<i32> {
        available
            .iter()
            .copied()
            .filter(|y| self.contains(*y))
            .collect()
    }
}
