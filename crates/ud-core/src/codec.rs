//! Snapshot codec: nodes + relationship records ↔ JSON / MessagePack.
//!
//! A snapshot carries no visual handles. Replaying it through the editor
//! registry rebuilds every connector from scratch.

use crate::error::CodecError;
use crate::model::{NodeRecord, RelationshipRecord};
use serde::{Deserialize, Serialize};

/// Everything needed to reconstruct a class diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
}

impl DiagramSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// MessagePack with named fields, so records stay readable by other tools.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
