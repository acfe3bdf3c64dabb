//! Diacritic-equivalence table used when grading keystrokes.
//!
//! Each entry maps a lowercase character that can appear in an answer to a
//! single substitute the learner may type instead, e.g. `è -> e` so that a
//! plain keyboard can complete "caffè".

use crate::error::DiacriticError;
use std::collections::{HashMap, HashSet};

/// Built-in Italian table.
pub const ITALIAN_DIACRITICS: &str = include_str!("../data/diacritics.json");

#[derive(Debug, Clone, Default)]
pub struct DiacriticTable {
    substitutes: HashMap<char, char>,
    alphabet: HashSet<char>,
}

impl DiacriticTable {
    /// Create an empty table. Only ASCII letters count as letters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(answer character, accepted substitute)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        let mut table = Self::new();
        for (key, value) in pairs {
            table.substitutes.insert(key, value);
            table.alphabet.insert(key);
            table.alphabet.insert(value);
        }
        table
    }

    /// Parse a JSON object of single-character strings.
    pub fn from_json(content: &str) -> Result<Self, DiacriticError> {
        let raw: HashMap<String, String> = serde_json::from_str(content)?;
        let pairs = raw
            .into_iter()
            .map(|(key, value)| match (single_char(&key), single_char(&value)) {
                (Some(k), Some(v)) => Ok((k, v)),
                _ => Err(DiacriticError::NotSingleChar { key, value }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_pairs(pairs))
    }

    /// The built-in Italian table.
    pub fn italian() -> Result<Self, DiacriticError> {
        Self::from_json(ITALIAN_DIACRITICS)
    }

    /// Substitute accepted for `c`, if any.
    pub fn substitute(&self, c: char) -> Option<char> {
        self.substitutes.get(&c).copied()
    }

    pub fn len(&self) -> usize {
        self.substitutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutes.is_empty()
    }

    /// Whether `c` is graded as a letter: ASCII letters plus every
    /// character mentioned by the table. Anything else is auto-filled.
    pub fn is_letter(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || self.alphabet.contains(&c)
    }

    /// Whether typing `typed` where `expected` stands counts as a match.
    pub fn accepts(&self, expected: char, typed: char) -> bool {
        if expected.to_lowercase().eq(typed.to_lowercase()) {
            return true;
        }
        match (single_lowercase(expected), single_lowercase(typed)) {
            (Some(expected), Some(typed)) => self.substitute(expected) == Some(typed),
            _ => false,
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn single_lowercase(c: char) -> Option<char> {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => Some(l),
        _ => None,
    }
}
