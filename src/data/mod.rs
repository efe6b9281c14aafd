//! Built-in creature and item catalogs, with name/id resolution. Lookups are
//! tolerant of case, spaces, and underscores; definitions are constructed
//! fresh on each call so callers can mutate their copies freely.

pub mod creature;
pub mod item;

use std::error::Error;
use std::fmt;

pub use creature::{bestiary, resolve_creature, CreatureDefinition};
pub use item::{armory, resolve_item, ItemDefinition, ItemKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    CreatureNotFound(String),
    ItemNotFound(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::CreatureNotFound(query) => write!(f, "creature '{query}' not found"),
            LookupError::ItemNotFound(query) => write!(f, "item '{query}' not found"),
        }
    }
}

impl Error for LookupError {}

/// Normalize a string for lookup: lowercase, collapse spaces/underscores.
pub(crate) fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
