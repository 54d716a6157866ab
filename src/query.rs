//! Filtered views over the note collection.
use std::{fmt, str::FromStr};

use log::trace;

use crate::{Category, DiaryError, Note, Result};

/// Category filter for listings; `All` matches every note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

/// Notes whose text contains `search_term` (ignoring case) and whose category
/// passes `filter`, in collection order. An empty term matches everything.
pub fn filter_notes<'a>(
    notes: &'a [Note],
    search_term: &str,
    filter: &CategoryFilter,
) -> Vec<&'a Note> {
    let needle = search_term.to_lowercase();
    let matched: Vec<&Note> = notes
        .iter()
        .filter(|note| filter.matches(note.category) && note.folded_text().contains(&needle))
        .collect();

    trace!(
        "Filter '{}' / {} matched {} of {} notes",
        search_term,
        filter,
        matched.len(),
        notes.len()
    );
    matched
}
