//! Relationship builders.
//!
//! A builder resolves both endpoint nodes, asks the geometry kernel for the
//! connector layout, creates the line, marker and label primitives, and
//! subscribes the new connector to both nodes. It returns the
//! `ConnectorModel` without registering it anywhere: the caller inserts it
//! into the registry exactly once.
//!
//! Resolution happens before anything is drawn, so a failed build leaves
//! the render target untouched.

use crate::node::{MovableNode, NodeStore};
use ud_core::label::{multiplicity_label_position, name_label_position};
use ud_core::model::{DEFAULT_MULTIPLICITY, or_default};
use ud_core::{
    BuildError, ConnectorHandles, ConnectorId, ConnectorModel, EngineConfig, Endpoint, NodeId,
    RelationshipKind, RelationshipRecord, RenderTarget, layout_connector,
};

/// Caller-supplied label text. Empty or absent values get defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Labels<'a> {
    pub name: Option<&'a str>,
    pub start_multiplicity: Option<&'a str>,
    pub end_multiplicity: Option<&'a str>,
}

impl<'a> Labels<'a> {
    pub fn new(
        name: Option<&'a str>,
        start_multiplicity: Option<&'a str>,
        end_multiplicity: Option<&'a str>,
    ) -> Self {
        Self {
            name,
            start_multiplicity,
            end_multiplicity,
        }
    }

    /// Only a name; multiplicities fall back to their defaults.
    pub fn named(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    /// Apply creation-time defaults for `kind`.
    ///
    /// Inheritance carries no multiplicities; its multiplicity labels stay empty.
    pub fn normalize(&self, kind: RelationshipKind) -> (String, String, String) {
        let name = or_default(self.name, kind.default_name());
        if kind.has_multiplicities() {
            (
                name,
                or_default(self.start_multiplicity, DEFAULT_MULTIPLICITY),
                or_default(self.end_multiplicity, DEFAULT_MULTIPLICITY),
            )
        } else {
            (name, String::new(), String::new())
        }
    }
}

/// Builds connectors between nodes of `S`, drawing onto `R`.
pub struct Builder<'a, S: NodeStore, R: RenderTarget + ?Sized> {
    nodes: &'a mut S,
    target: &'a mut R,
    config: &'a EngineConfig,
}

impl<'a, S: NodeStore, R: RenderTarget + ?Sized> Builder<'a, S, R> {
    pub fn new(nodes: &'a mut S, target: &'a mut R, config: &'a EngineConfig) -> Self {
        Self {
            nodes,
            target,
            config,
        }
    }

    /// Build a connector of any kind.
    ///
    /// # Errors
    /// `BuildError::UnresolvedEndpoint` if either node does not exist. No
    /// primitive has been created in that case.
    pub fn build(
        &mut self,
        kind: RelationshipKind,
        start: NodeId,
        end: NodeId,
        labels: Labels<'_>,
    ) -> Result<ConnectorModel, BuildError> {
        let (name, start_mult, end_mult) = labels.normalize(kind);
        self.draw(kind, start, end, name, start_mult, end_mult)
    }

    /// Rebuild a persisted relationship. The record's text is taken
    /// verbatim: defaults were applied when it was first created.
    ///
    /// # Errors
    /// As for [`build`](Self::build).
    pub fn rebuild(&mut self, record: &RelationshipRecord) -> Result<ConnectorModel, BuildError> {
        self.draw(
            record.kind,
            record.start,
            record.end,
            record.name.clone(),
            record.start_multiplicity.clone(),
            record.end_multiplicity.clone(),
        )
    }

    fn draw(
        &mut self,
        kind: RelationshipKind,
        start: NodeId,
        end: NodeId,
        name: String,
        start_mult: String,
        end_mult: String,
    ) -> Result<ConnectorModel, BuildError> {
        let start_bounds = self.nodes.resolve(start, Endpoint::Start)?.bounds();
        let end_bounds = self.nodes.resolve(end, Endpoint::End)?.bounds();

        let geometry = layout_connector(kind, start_bounds, end_bounds, self.config);
        let line = self.target.add_line(geometry.line);
        let marker = geometry
            .marker
            .as_ref()
            .map(|m| self.target.add_polygon(&m.points, m.filled));
        let name_label = self
            .target
            .add_text(name_label_position(geometry.line, self.config), &name);
        let start_label = self.target.add_text(
            multiplicity_label_position(geometry.line, true, self.config),
            &start_mult,
        );
        let end_label = self.target.add_text(
            multiplicity_label_position(geometry.line, false, self.config),
            &end_mult,
        );

        let id = ConnectorId::next();
        for node in [start, end] {
            if let Some(n) = self.nodes.get_mut(node) {
                n.subscribe(id);
            }
        }

        log::debug!("built {id}: {kind} {start} -> {end} \"{name}\" [{start_mult}, {end_mult}]");

        Ok(ConnectorModel::new(
            id,
            kind,
            start,
            end,
            name,
            start_mult,
            end_mult,
            ConnectorHandles {
                line,
                marker,
                name_label,
                start_label,
                end_label,
            },
        ))
    }

    pub fn build_association(
        &mut self,
        start: NodeId,
        end: NodeId,
        labels: Labels<'_>,
    ) -> Result<ConnectorModel, BuildError> {
        self.build(RelationshipKind::Association, start, end, labels)
    }

    /// `end` is the "whole"; the open diamond touches it.
    pub fn build_aggregation(
        &mut self,
        start: NodeId,
        end: NodeId,
        labels: Labels<'_>,
    ) -> Result<ConnectorModel, BuildError> {
        self.build(RelationshipKind::Aggregation, start, end, labels)
    }

    /// Like aggregation, with a filled diamond.
    pub fn build_composition(
        &mut self,
        start: NodeId,
        end: NodeId,
        labels: Labels<'_>,
    ) -> Result<ConnectorModel, BuildError> {
        self.build(RelationshipKind::Composition, start, end, labels)
    }

    /// `start` is the child, `end` the parent the arrowhead points at.
    pub fn build_inheritance(
        &mut self,
        start: NodeId,
        end: NodeId,
        name: Option<&str>,
    ) -> Result<ConnectorModel, BuildError> {
        let labels = Labels {
            name,
            ..Labels::default()
        };
        self.build(RelationshipKind::Inheritance, start, end, labels)
    }
}
