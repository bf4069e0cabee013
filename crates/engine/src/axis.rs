//! Row index and column header labels.
//!
//! An axis is either a positional range, a flat list of labels, or a
//! multi-level index where every entry is a tuple with exactly `nlevels`
//! components.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    /// Positional labels `0..n`, unnamed.
    Range(usize),
    /// One label per entry, with an optional axis name.
    Flat { labels: Vec<Value>, name: Option<String> },
    /// Label tuples with a fixed level count.
    Multi(MultiIndex),
}

impl Default for Axis {
    fn default() -> Self {
        Axis::Range(0)
    }
}

impl Axis {
    pub fn range(len: usize) -> Self {
        Axis::Range(len)
    }

    pub fn flat<L: Into<Value>>(labels: Vec<L>) -> Self {
        Axis::Flat { labels: labels.into_iter().map(Into::into).collect(), name: None }
    }

    pub fn named<L: Into<Value>>(labels: Vec<L>, name: &str) -> Self {
        Axis::Flat {
            labels: labels.into_iter().map(Into::into).collect(),
            name: Some(name.to_string()),
        }
    }

    /// Multi-level axis from label tuples. `names` fixes the level count.
    pub fn multi(tuples: Vec<Vec<Value>>, names: Vec<Option<String>>) -> Result<Self, TableError> {
        Ok(Axis::Multi(MultiIndex::from_tuples(tuples, names)?))
    }

    pub fn len(&self) -> usize {
        match self {
            Axis::Range(n) => *n,
            Axis::Flat { labels, .. } => labels.len(),
            Axis::Multi(mi) => mi.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Axis::Multi(_))
    }

    /// Number of label components per entry.
    pub fn nlevels(&self) -> usize {
        match self {
            Axis::Multi(mi) => mi.nlevels(),
            _ => 1,
        }
    }

    /// Level names, one per level.
    pub fn names(&self) -> Vec<Option<String>> {
        match self {
            Axis::Range(_) => vec![None],
            Axis::Flat { name, .. } => vec![name.clone()],
            Axis::Multi(mi) => mi.names().to_vec(),
        }
    }

    /// True if at least one level carries a non-empty name.
    pub fn has_names(&self) -> bool {
        self.names().iter().any(|n| n.as_deref().is_some_and(|s| !s.is_empty()))
    }

    pub fn with_names(self, names: Vec<Option<String>>) -> Result<Self, TableError> {
        match self {
            Axis::Multi(mut mi) => {
                if names.len() != mi.nlevels() {
                    return Err(TableError::NameCountMismatch { levels: mi.nlevels(), names: names.len() });
                }
                mi.names = names;
                Ok(Axis::Multi(mi))
            }
            other => {
                if names.len() != 1 {
                    return Err(TableError::NameCountMismatch { levels: 1, names: names.len() });
                }
                let labels = (0..other.len()).map(|i| other.component(i, 0)).collect();
                Ok(Axis::Flat { labels, name: names.into_iter().next().flatten() })
            }
        }
    }

    /// Component `level` of entry `i`.
    pub fn component(&self, i: usize, level: usize) -> Value {
        match self {
            Axis::Range(_) => Value::Int(i as i64),
            Axis::Flat { labels, .. } => labels[i].clone(),
            Axis::Multi(mi) => mi.component(i, level).clone(),
        }
    }

    /// Entry `i` as a tuple (a single component for flat axes).
    pub fn tuple(&self, i: usize) -> Vec<Value> {
        (0..self.nlevels()).map(|level| self.component(i, level)).collect()
    }

    /// First entry whose label equals `label` (flat axes only).
    pub fn position(&self, label: &Value) -> Option<usize> {
        match self {
            Axis::Range(n) => match label {
                Value::Int(i) if *i >= 0 && (*i as usize) < *n => Some(*i as usize),
                _ => None,
            },
            Axis::Flat { labels, .. } => labels.iter().position(|l| l == label),
            Axis::Multi(_) => None,
        }
    }

    /// Entries at `positions`, in that order.
    ///
    /// A multi-level axis keeps its full level metadata, including values no
    /// surviving entry uses; call [`Axis::rebuild`] to drop them.
    pub fn take(&self, positions: &[usize]) -> Axis {
        match self {
            Axis::Range(_) => {
                if positions.iter().enumerate().all(|(i, &p)| i == p) {
                    Axis::Range(positions.len())
                } else {
                    Axis::Flat {
                        labels: positions.iter().map(|&p| Value::Int(p as i64)).collect(),
                        name: None,
                    }
                }
            }
            Axis::Flat { labels, name } => Axis::Flat {
                labels: positions.iter().map(|&p| labels[p].clone()).collect(),
                name: name.clone(),
            },
            Axis::Multi(mi) => Axis::Multi(mi.take(positions)),
        }
    }

    /// Rebuild level metadata strictly from the entries present.
    pub fn rebuild(&self) -> Axis {
        match self {
            Axis::Multi(mi) => Axis::Multi(mi.rebuild()),
            other => other.clone(),
        }
    }

    /// Same entries in the same order, ignoring names and representation.
    pub fn same_labels(&self, other: &Axis) -> bool {
        self.len() == other.len()
            && self.nlevels() == other.nlevels()
            && (0..self.len()).all(|i| self.tuple(i) == other.tuple(i))
    }
}

/// Multi-level labels stored as per-level unique values plus per-entry codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiIndex {
    levels: Vec<Vec<Value>>,
    /// `codes[level][entry]` indexes into `levels[level]`.
    codes: Vec<Vec<usize>>,
    names: Vec<Option<String>>,
}

impl MultiIndex {
    /// Build from tuples. Level values are kept in first-appearance order.
    pub fn from_tuples(tuples: Vec<Vec<Value>>, names: Vec<Option<String>>) -> Result<Self, TableError> {
        let nlevels = names.len();
        if nlevels == 0 {
            return Err(TableError::NoLevels);
        }

        let mut levels: Vec<Vec<Value>> = vec![Vec::new(); nlevels];
        let mut codes: Vec<Vec<usize>> = vec![Vec::with_capacity(tuples.len()); nlevels];
        let mut lookup: Vec<FxHashMap<_, usize>> = vec![FxHashMap::default(); nlevels];

        for (position, tuple) in tuples.into_iter().enumerate() {
            if tuple.len() != nlevels {
                return Err(TableError::LevelCountMismatch { position, expected: nlevels, found: tuple.len() });
            }
            for (level, value) in tuple.into_iter().enumerate() {
                let code = *lookup[level].entry(value.key()).or_insert_with(|| {
                    levels[level].push(value);
                    levels[level].len() - 1
                });
                codes[level].push(code);
            }
        }

        Ok(Self { levels, codes, names })
    }

    pub fn len(&self) -> usize {
        self.codes.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nlevels(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    /// Distinct values per level.
    pub fn levels(&self) -> &[Vec<Value>] {
        &self.levels
    }

    pub fn component(&self, i: usize, level: usize) -> &Value {
        &self.levels[level][self.codes[level][i]]
    }

    pub fn tuple(&self, i: usize) -> Vec<Value> {
        (0..self.nlevels()).map(|level| self.component(i, level).clone()).collect()
    }

    pub fn tuples(&self) -> Vec<Vec<Value>> {
        (0..self.len()).map(|i| self.tuple(i)).collect()
    }

    /// Entries at `positions`. Level values stay as they were, even if no
    /// remaining entry refers to them.
    pub fn take(&self, positions: &[usize]) -> MultiIndex {
        MultiIndex {
            levels: self.levels.clone(),
            codes: self
                .codes
                .iter()
                .map(|level_codes| positions.iter().map(|&p| level_codes[p]).collect())
                .collect(),
            names: self.names.clone(),
        }
    }

    /// Fresh index holding only level values used by the current entries.
    pub fn rebuild(&self) -> MultiIndex {
        // Tuples always have nlevels components here.
        match MultiIndex::from_tuples(self.tuples(), self.names.clone()) {
            Ok(mi) => mi,
            Err(_) => self.clone(),
        }
    }
}
