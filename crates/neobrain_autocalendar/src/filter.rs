// --- File: crates/neobrain_autocalendar/src/filter.rs ---
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedRow;

/// Tri-state filter on code presence.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeFilter {
    #[default]
    All,
    HasCode,
    NoCode,
}

/// A single row predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Inclusive on both ends; a missing bound is open.
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Code(CodeFilter),
    /// Case-insensitive substring of title or description, whitespace included; empty matches all.
    Text(String),
}

impl Predicate {
    pub fn matches(&self, row: &NormalizedRow) -> bool {
        match self {
            Predicate::DateRange { from, to } => {
                from.map_or(true, |from| row.date >= from) && to.map_or(true, |to| row.date <= to)
            }
            Predicate::Code(CodeFilter::All) => true,
            Predicate::Code(CodeFilter::HasCode) => !row.code.is_empty(),
            Predicate::Code(CodeFilter::NoCode) => row.code.is_empty(),
            Predicate::Text(text) => {
                let needle = text.to_lowercase();
                needle.is_empty()
                    || row.title_raw.to_lowercase().contains(&needle)
                    || row.description.to_lowercase().contains(&needle)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub code: CodeFilter,
    pub text: Option<String>,
}

impl RowFilter {
    pub fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::DateRange {
                from: self.from,
                to: self.to,
            },
            Predicate::Code(self.code),
            Predicate::Text(self.text.clone().unwrap_or_default()),
        ]
    }

    pub fn matches(&self, row: &NormalizedRow) -> bool {
        self.predicates().iter().all(|p| p.matches(row))
    }

    pub fn apply(&self, rows: &[NormalizedRow]) -> Vec<NormalizedRow> {
        let predicates = self.predicates();
        rows.iter()
            .filter(|row| predicates.iter().all(|p| p.matches(row)))
            .cloned()
            .collect()
    }
}
