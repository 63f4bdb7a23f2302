//! Processor configuration loaded from TOML.
//!
//! Each `[[origins]]` entry registers an event source whose id and body live
//! at fixed JSON pointers:
//!
//! ```toml
//! [[origins]]
//! tag = "aws:kinesis"
//! id_pointer = "/eventID"
//! body_pointer = "/kinesis/data"
//! decode_body = false
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{BodyExtractors, IdExtractors, body_at, id_at, json_body_at};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    #[serde(default)]
    pub origins: Vec<OriginRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRule {
    pub tag: String,
    pub id_pointer: String,
    pub body_pointer: String,

    /// Parse string bodies holding JSON text before handing them over.
    #[serde(default)]
    pub decode_body: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse processor config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("origin rule #{index} has an empty tag")]
    EmptyTag { index: usize },

    #[error("origin \"{0}\" is configured more than once")]
    DuplicateTag(String),

    #[error("origin \"{tag}\" has an invalid JSON pointer \"{pointer}\" (must be empty or start with '/')")]
    InvalidPointer { tag: String, pointer: String },
}

impl ProcessorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, rule) in self.origins.iter().enumerate() {
            if rule.tag.trim().is_empty() {
                return Err(ConfigError::EmptyTag { index });
            }
            if !seen.insert(rule.tag.as_str()) {
                return Err(ConfigError::DuplicateTag(rule.tag.clone()));
            }
            for pointer in [&rule.id_pointer, &rule.body_pointer] {
                if !is_json_pointer(pointer) {
                    return Err(ConfigError::InvalidPointer {
                        tag: rule.tag.clone(),
                        pointer: pointer.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Register every rule, replacing existing extractors for the same tag.
    pub fn register(&self, ids: &mut IdExtractors, bodies: &mut BodyExtractors) {
        for rule in &self.origins {
            ids.register(rule.tag.as_str(), id_at(rule.id_pointer.as_str()));
            if rule.decode_body {
                bodies.register(rule.tag.as_str(), json_body_at(rule.body_pointer.as_str()));
            } else {
                bodies.register(rule.tag.as_str(), body_at(rule.body_pointer.as_str()));
            }
        }
    }
}

fn is_json_pointer(pointer: &str) -> bool {
    pointer.is_empty() || pointer.starts_with('/')
}
