//! Dance store - named move sequences taught over chat.
//!
//! Names are case-sensitive. Moves keep the order they were appended in.

use robopi_common::{DanceError, Move};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct DanceStore {
    dances: BTreeMap<String, Vec<Move>>,
}

impl DanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dance. Existing dances are never overwritten.
    pub fn define(&mut self, name: &str) -> Result<(), DanceError> {
        if self.dances.contains_key(name) {
            return Err(DanceError::AlreadyExists(name.to_string()));
        }
        self.dances.insert(name.to_string(), Vec::new());
        Ok(())
    }

    pub fn append(&mut self, name: &str, mv: Move) -> Result<(), DanceError> {
        self.dances
            .get_mut(name)
            .map(|moves| moves.push(mv))
            .ok_or_else(|| DanceError::NoSuchDance(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&[Move]> {
        self.dances.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dances.contains_key(name)
    }

    /// Remove a dance. Returns whether anything was removed; absent names are fine.
    pub fn forget(&mut self, name: &str) -> bool {
        self.dances.remove(name).is_some()
    }

    /// Dance names in lexicographic order
    pub fn list_names(&self) -> Vec<&str> {
        self.dances.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.dances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dances.is_empty()
    }
}
