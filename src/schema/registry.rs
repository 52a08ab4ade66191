//! Schema registry - embedded JSON schemas

use rust_embed::Embed;
use std::collections::HashMap;

use crate::core::EntityPrefix;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Parsed JSON schemas for each entity type
///
/// Schemas ship inside the binary. An entity type without a usable schema
/// simply goes unvalidated rather than failing the whole run.
pub struct SchemaRegistry {
    schemas: HashMap<EntityPrefix, serde_json::Value>,
}

impl SchemaRegistry {
    /// Load and parse all embedded schemas
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        for prefix in EntityPrefix::all() {
            let filename = format!("{}.schema.json", prefix.as_str().to_lowercase());
            let Some(file) = EmbeddedSchemas::get(&filename) else {
                continue;
            };
            if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&file.data) {
                schemas.insert(*prefix, value);
            }
        }

        Self { schemas }
    }

    /// Get the parsed schema for an entity type
    pub fn get(&self, prefix: EntityPrefix) -> Option<&serde_json::Value> {
        self.schemas.get(&prefix)
    }

    /// Check if a schema exists for the given prefix
    pub fn has_schema(&self, prefix: EntityPrefix) -> bool {
        self.schemas.contains_key(&prefix)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
