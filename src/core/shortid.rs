//! Short ID system for easier entity selection
//!
//! Full ids are 30+ characters; nobody types them. Listing commands assign
//! each entity a stable `PREFIX@N` alias (`DEAL@1`, `TASK@7`) persisted in
//! `.plat/shortids.json`, and every command that takes an id also accepts
//! the alias, a bare `@N` or `N`, or a unique fragment of the full id.

use std::collections::HashMap;
use std::fs;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;

/// Index file location relative to the project root
const INDEX_FILE: &str = ".plat/shortids.json";

/// Persistent mapping between `PREFIX@N` aliases and full entity ids
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    /// "DEAL@1" -> "DEAL-01J8G..."
    entries: HashMap<String, String>,
    /// Next alias number per prefix
    next_ids: HashMap<String, u32>,
    /// Full id -> "DEAL@1" (rebuilt on load, not persisted)
    #[serde(skip)]
    reverse: HashMap<String, String>,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from a project, or start empty if absent/corrupt
    pub fn load(project: &Project) -> Self {
        let path = project.root().join(INDEX_FILE);
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(mut index) = serde_json::from_str::<ShortIdIndex>(&content) {
                index.reverse = index
                    .entries
                    .iter()
                    .map(|(alias, id)| (id.clone(), alias.clone()))
                    .collect();
                return index;
            }
        }
        Self::new()
    }

    pub fn save(&self, project: &Project) -> std::io::Result<()> {
        let path = project.root().join(INDEX_FILE);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// Record an id, returning its alias; already-known ids keep theirs
    pub fn record(&mut self, entity_id: &EntityId) -> String {
        let id_str = entity_id.to_string();
        if let Some(alias) = self.reverse.get(&id_str) {
            return alias.clone();
        }
        let prefix = entity_id.prefix().as_str();
        let next = self.next_ids.entry(prefix.to_string()).or_insert(1);
        let alias = format!("{}@{}", prefix, next);
        *next += 1;
        self.entries.insert(alias.clone(), id_str.clone());
        self.reverse.insert(id_str, alias.clone());
        alias
    }

    /// Record every id in creation order
    pub fn record_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a EntityId>) {
        for id in ids {
            self.record(id);
        }
    }

    /// The alias for a full id, if one was assigned
    pub fn alias_of(&self, entity_id: &str) -> Option<&str> {
        self.reverse.get(entity_id).map(|s| s.as_str())
    }

    /// Resolve a reference of any accepted form to a full id string
    ///
    /// `DEAL@3` hits the index directly; `@3` / `3` resolve when exactly one
    /// prefix has that number; anything else passes through for fragment
    /// matching against filenames.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        if let Some((prefix, num)) = reference.split_once('@') {
            if !prefix.is_empty() {
                let key = format!("{}@{}", prefix.to_ascii_uppercase(), num);
                return self.entries.get(&key).cloned();
            }
            return self.resolve_bare_number(num);
        }
        if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) {
            return self.resolve_bare_number(reference);
        }
        Some(reference.to_string())
    }

    /// Resolve with a known entity type, so `@3` means `PREFIX@3`
    pub fn resolve_for(&self, prefix: EntityPrefix, reference: &str) -> Option<String> {
        let num = match reference.split_once('@') {
            Some((p, num)) if p.is_empty() => num,
            Some((p, num)) => {
                let key = format!("{}@{}", p.to_ascii_uppercase(), num);
                return self.entries.get(&key).cloned();
            }
            None if !reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit()) => {
                reference
            }
            None => return Some(reference.to_string()),
        };
        self.entries
            .get(&format!("{}@{}", prefix.as_str(), num))
            .cloned()
    }

    fn resolve_bare_number(&self, num: &str) -> Option<String> {
        let mut matches = self
            .entries
            .iter()
            .filter(|(alias, _)| alias.ends_with(&format!("@{}", num)))
            .map(|(_, id)| id.clone());
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None, // ambiguous across entity types
            None => Some(first),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a CLI reference against the project index, passing unknowns through
pub fn parse_entity_reference(reference: &str, project: &Project, prefix: EntityPrefix) -> String {
    let index = ShortIdIndex::load(project);
    index
        .resolve_for(prefix, reference)
        .unwrap_or_else(|| reference.to_string())
}
