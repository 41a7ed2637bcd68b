//! Connector data model.
//!
//! A `ConnectorModel` is one relationship instance: its kind, the names of
//! its two endpoint nodes, its display text, and handles to the visual
//! primitives drawing it. `RelationshipRecord` is the same information with
//! the visual handles stripped: the only shape persistence and code
//! generation ever see.

use crate::id::{ConnectorId, NodeId, PrimitiveId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Relationship kinds ──────────────────────────────────────────────────

/// The relationship kinds a connector can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    Association,
    Aggregation,
    Composition,
    Inheritance,
}

/// Marker drawn at the `end` anchor of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Plain line, no marker.
    None,
    /// Diamond touching the "whole" node. `filled` distinguishes composition.
    Diamond { filled: bool },
    /// Hollow triangle pointing at the parent node.
    Triangle,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 4] = [
        RelationshipKind::Association,
        RelationshipKind::Aggregation,
        RelationshipKind::Composition,
        RelationshipKind::Inheritance,
    ];

    /// Name used when the caller supplies no display name.
    pub fn default_name(self) -> &'static str {
        match self {
            RelationshipKind::Association => "Association",
            RelationshipKind::Aggregation => "Aggregation",
            RelationshipKind::Composition => "Composition",
            RelationshipKind::Inheritance => "Inheritance",
        }
    }

    pub fn marker(self) -> MarkerStyle {
        match self {
            RelationshipKind::Association => MarkerStyle::None,
            RelationshipKind::Aggregation => MarkerStyle::Diamond { filled: false },
            RelationshipKind::Composition => MarkerStyle::Diamond { filled: true },
            RelationshipKind::Inheritance => MarkerStyle::Triangle,
        }
    }

    /// Whether this kind carries multiplicities at its ends.
    pub fn has_multiplicities(self) -> bool {
        !matches!(self, RelationshipKind::Inheritance)
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

// ─── Labels ──────────────────────────────────────────────────────────────

/// One of the three text labels attached to every connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelSlot {
    Name,
    StartMultiplicity,
    EndMultiplicity,
}

/// Default multiplicity when none is supplied.
pub const DEFAULT_MULTIPLICITY: &str = "1";

/// Replace an empty or absent value with `default`.
pub fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

// ─── Connector model ─────────────────────────────────────────────────────

/// Handles to the primitives drawing one connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorHandles {
    pub line: PrimitiveId,
    /// Diamond or arrowhead polygon, absent for plain associations.
    pub marker: Option<PrimitiveId>,
    pub name_label: PrimitiveId,
    pub start_label: PrimitiveId,
    pub end_label: PrimitiveId,
}

impl ConnectorHandles {
    pub fn label(&self, slot: LabelSlot) -> PrimitiveId {
        match slot {
            LabelSlot::Name => self.name_label,
            LabelSlot::StartMultiplicity => self.start_label,
            LabelSlot::EndMultiplicity => self.end_label,
        }
    }

    /// Every primitive in drawing order.
    pub fn all(&self) -> impl Iterator<Item = PrimitiveId> + '_ {
        std::iter::once(self.line)
            .chain(self.marker)
            .chain([self.name_label, self.start_label, self.end_label])
    }
}

/// In-memory representation of one relationship instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorModel {
    id: ConnectorId,
    kind: RelationshipKind,
    start: NodeId,
    end: NodeId,
    display_name: String,
    start_multiplicity: String,
    end_multiplicity: String,
    handles: ConnectorHandles,
}

impl ConnectorModel {
    /// Assemble a model from already-normalized text.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ConnectorId,
        kind: RelationshipKind,
        start: NodeId,
        end: NodeId,
        display_name: String,
        start_multiplicity: String,
        end_multiplicity: String,
        handles: ConnectorHandles,
    ) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            display_name,
            start_multiplicity,
            end_multiplicity,
            handles,
        }
    }

    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn start_multiplicity(&self) -> &str {
        &self.start_multiplicity
    }

    pub fn end_multiplicity(&self) -> &str {
        &self.end_multiplicity
    }

    pub fn handles(&self) -> &ConnectorHandles {
        &self.handles
    }

    /// Current text of a label slot.
    pub fn label_text(&self, slot: LabelSlot) -> &str {
        match slot {
            LabelSlot::Name => &self.display_name,
            LabelSlot::StartMultiplicity => &self.start_multiplicity,
            LabelSlot::EndMultiplicity => &self.end_multiplicity,
        }
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub fn set_start_multiplicity(&mut self, m: impl Into<String>) {
        self.start_multiplicity = m.into();
    }

    pub fn set_end_multiplicity(&mut self, m: impl Into<String>) {
        self.end_multiplicity = m.into();
    }

    /// Store `text` verbatim in the field behind `slot`.
    pub fn set_label_text(&mut self, slot: LabelSlot, text: impl Into<String>) {
        match slot {
            LabelSlot::Name => self.set_display_name(text),
            LabelSlot::StartMultiplicity => self.set_start_multiplicity(text),
            LabelSlot::EndMultiplicity => self.set_end_multiplicity(text),
        }
    }

    /// Follow a node rename. Returns true if either endpoint changed.
    pub fn rename_endpoint(&mut self, old: NodeId, new: NodeId) -> bool {
        let mut changed = false;
        if self.start == old {
            self.start = new;
            changed = true;
        }
        if self.end == old {
            self.end = new;
            changed = true;
        }
        changed
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    /// Strip visual handles, keeping only what persistence needs.
    pub fn to_record(&self) -> RelationshipRecord {
        RelationshipRecord {
            kind: self.kind,
            start: self.start,
            end: self.end,
            name: self.display_name.clone(),
            start_multiplicity: self.start_multiplicity.clone(),
            end_multiplicity: self.end_multiplicity.clone(),
        }
    }
}

// ─── Records ─────────────────────────────────────────────────────────────

/// Persistence-ready relationship: no visual handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub kind: RelationshipKind,
    pub start: NodeId,
    pub end: NodeId,
    pub name: String,
    #[serde(default)]
    pub start_multiplicity: String,
    #[serde(default)]
    pub end_multiplicity: String,
}

/// Persistence-ready diagram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
