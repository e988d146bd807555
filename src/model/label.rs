use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Label identifier that has been resolved against a [`LabelCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LabelId(String);

impl LabelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LabelDef {
    pub id: &'static str,
    pub name: &'static str,
}

const BUILTIN_LABELS: &[LabelDef] = &[
    LabelDef {
        id: "Binhthuong",
        name: "Normal",
    },
    LabelDef {
        id: "COPD",
        name: "Chronic obstructive pulmonary disease",
    },
    LabelDef {
        id: "Covid",
        name: "COVID-19",
    },
    LabelDef {
        id: "Hen",
        name: "Asthma",
    },
    LabelDef {
        id: "Lao",
        name: "Tuberculosis",
    },
    LabelDef {
        id: "Phuphoi",
        name: "Pulmonary edema",
    },
    LabelDef {
        id: "Suyhohap",
        name: "Respiratory failure",
    },
    LabelDef {
        id: "Trandich",
        name: "Pleural effusion",
    },
    LabelDef {
        id: "Trankhi",
        name: "Pneumothorax",
    },
    LabelDef {
        id: "Uphoi",
        name: "Lung tumor",
    },
    LabelDef {
        id: "Viemphoi",
        name: "Pneumonia",
    },
    LabelDef {
        id: "Xepphoi",
        name: "Atelectasis",
    },
];

pub fn builtin_labels() -> &'static [LabelDef] {
    BUILTIN_LABELS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The closed set of diagnoses the classifiers may emit.
///
/// Classifiers that report class indices instead of names are accepted: a
/// purely numeric label with no literal match resolves to the entry at that
/// position in catalog order.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    entries: Vec<LabelEntry>,
    index: BTreeMap<String, usize>,
}

impl LabelCatalog {
    pub fn builtin() -> Self {
        let entries = builtin_labels()
            .iter()
            .map(|def| LabelEntry {
                id: def.id.to_string(),
                name: def.name.to_string(),
            })
            .collect::<Vec<_>>();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn from_entries(entries: Vec<LabelEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut cleaned = Vec::with_capacity(entries.len());
        let mut index = BTreeMap::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let id = entry.id.trim().to_string();
            if id.is_empty() {
                return Err(CatalogError::EmptyId(i));
            }
            if index.insert(id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
            let name = if entry.name.trim().is_empty() {
                id.clone()
            } else {
                entry.name.trim().to_string()
            };
            cleaned.push(LabelEntry { id, name });
        }
        Ok(Self {
            entries: cleaned,
            index,
        })
    }

    pub fn resolve(&self, raw: &str) -> Option<LabelId> {
        let key = raw.trim();
        if key.is_empty() {
            return None;
        }
        if let Some(&i) = self.index.get(key) {
            return Some(LabelId(self.entries[i].id.clone()));
        }
        if key.chars().all(|c| c.is_ascii_digit()) {
            let position = key.parse::<usize>().ok()?;
            return self
                .entries
                .get(position)
                .map(|entry| LabelId(entry.id.clone()));
        }
        None
    }

    /// Falls back to the id itself for labels outside the catalog.
    pub fn display_name<'a>(&'a self, label: &'a LabelId) -> &'a str {
        self.index
            .get(label.as_str())
            .map(|&i| self.entries[i].name.as_str())
            .unwrap_or(label.as_str())
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/label.rs"]
mod tests;
