//! Diagram registry: the authoritative store of nodes and connectors.
//!
//! Nodes live in a stable graph whose edges are connectors (start → end),
//! indexed by name for O(1) resolution. Every mutation of node geometry
//! goes through the registry, which turns it into a `NodeEvent` and runs a
//! resync pass for each subscribed connector before returning.

use crate::builder::{Builder, Labels};
use crate::node::{DiagramNode, MovableNode, NodeEvent, NodeStore};
use crate::resync::ResyncController;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use std::collections::{BTreeMap, HashMap};
use ud_core::{
    ConnectorId, ConnectorModel, DiagramSnapshot, EngineConfig, LabelSlot, NodeId, NodeRecord,
    Point, Rect, RegistryError, RelationshipKind, RelationshipRecord, RenderTarget, Size, Surface,
};

// ─── Node table ──────────────────────────────────────────────────────────

/// Nodes plus the name index. Kept apart from the surface so a builder can
/// borrow both mutably at once.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    graph: StableDiGraph<DiagramNode, ConnectorId>,
    id_index: HashMap<NodeId, NodeIndex>,
}

impl NodeTable {
    pub fn index_of(&self, name: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DiagramNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }
}

impl NodeStore for NodeTable {
    type Node = DiagramNode;

    fn get(&self, name: NodeId) -> Option<&DiagramNode> {
        self.index_of(name).map(|idx| &self.graph[idx])
    }

    fn get_mut(&mut self, name: NodeId) -> Option<&mut DiagramNode> {
        self.index_of(name).map(|idx| &mut self.graph[idx])
    }
}

// ─── Registry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Connector {
    model: ConnectorModel,
    controller: ResyncController,
    edge: EdgeIndex,
}

/// Outcome of replaying relationship records.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Connectors rebuilt, in record order.
    pub restored: Vec<ConnectorId>,
    /// Records that could not be rebuilt: `(record index, reason)`.
    pub skipped: Vec<(usize, RegistryError)>,
}

/// Owns nodes, connectors, and the surface they are drawn on.
#[derive(Debug)]
pub struct DiagramRegistry<R: RenderTarget = Surface> {
    nodes: NodeTable,
    connectors: BTreeMap<ConnectorId, Connector>,
    surface: R,
    config: EngineConfig,
}

impl DiagramRegistry<Surface> {
    /// An empty registry drawing onto a fresh in-memory surface.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_surface(Surface::new(), config)
    }

    /// Rebuild a registry from a snapshot: nodes first, then relationships.
    ///
    /// # Errors
    /// `RegistryError::DuplicateNode` if the snapshot names a node twice.
    /// Unresolvable relationships are skipped and listed in the report.
    pub fn from_snapshot(
        snapshot: &DiagramSnapshot,
        config: EngineConfig,
    ) -> Result<(Self, ReplayReport), RegistryError> {
        let mut registry = Self::new(config);
        for node in &snapshot.nodes {
            registry.add_node(
                node.name,
                Rect::from_origin_size((node.x, node.y), (node.width, node.height)),
            )?;
        }
        let report = registry.restore(&snapshot.relationships);
        Ok((registry, report))
    }
}

impl<R: RenderTarget> DiagramRegistry<R> {
    pub fn with_surface(surface: R, config: EngineConfig) -> Self {
        Self {
            nodes: NodeTable::default(),
            connectors: BTreeMap::new(),
            surface,
            config,
        }
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Add a node.
    ///
    /// # Errors
    /// `RegistryError::DuplicateNode` if the name is taken.
    pub fn add_node(&mut self, name: NodeId, bounds: Rect) -> Result<NodeIndex, RegistryError> {
        if self.nodes.id_index.contains_key(&name) {
            return Err(RegistryError::DuplicateNode(name));
        }
        let idx = self.nodes.graph.add_node(DiagramNode::new(name, bounds));
        self.nodes.id_index.insert(name, idx);
        Ok(idx)
    }

    /// Look up a node by name.
    pub fn resolve_node(&self, name: NodeId) -> Result<&DiagramNode, RegistryError> {
        self.nodes.get(name).ok_or(RegistryError::UnknownNode(name))
    }

    /// Move a node's top-left corner and resync its connectors.
    /// Returns the number of completed resync passes.
    pub fn move_node(&mut self, name: NodeId, origin: Point) -> Result<usize, RegistryError> {
        let node = self
            .nodes
            .get_mut(name)
            .ok_or(RegistryError::UnknownNode(name))?;
        let old = node.set_origin(origin);
        Ok(self.notify(NodeEvent::Moved {
            node: name,
            old,
            new: origin,
        }))
    }

    /// Translate a node by `(dx, dy)`. Drag handlers call this once per frame.
    pub fn drag_node(&mut self, name: NodeId, dx: f64, dy: f64) -> Result<usize, RegistryError> {
        let origin = self.resolve_node(name)?.origin();
        self.move_node(name, Point::new(origin.x + dx, origin.y + dy))
    }

    /// Resize a node (e.g. after editing its attributes) and resync.
    pub fn resize_node(&mut self, name: NodeId, size: Size) -> Result<usize, RegistryError> {
        let node = self
            .nodes
            .get_mut(name)
            .ok_or(RegistryError::UnknownNode(name))?;
        let old = node.set_size(size);
        Ok(self.notify(NodeEvent::Resized {
            node: name,
            old,
            new: size,
        }))
    }

    /// Rename a node; every connector touching it follows the new name.
    ///
    /// # Errors
    /// `UnknownNode` if `old` does not exist, `DuplicateNode` if `new` is taken.
    pub fn rename_node(&mut self, old: NodeId, new: NodeId) -> Result<(), RegistryError> {
        if old == new {
            return self.resolve_node(old).map(|_| ());
        }
        if self.nodes.id_index.contains_key(&new) {
            return Err(RegistryError::DuplicateNode(new));
        }
        let idx = self
            .nodes
            .id_index
            .remove(&old)
            .ok_or(RegistryError::UnknownNode(old))?;
        self.nodes.graph[idx].rename(new);
        self.nodes.id_index.insert(new, idx);
        self.notify(NodeEvent::Renamed { old, new });
        Ok(())
    }

    /// Remove a node and every connector touching it.
    /// Returns the records of the removed connectors.
    pub fn remove_node(&mut self, name: NodeId) -> Result<Vec<RelationshipRecord>, RegistryError> {
        let subscribers: Vec<ConnectorId> = self.resolve_node(name)?.subscribers().to_vec();
        let mut removed = Vec::with_capacity(subscribers.len());
        for id in subscribers {
            removed.push(self.remove_connector(id)?);
        }
        if let Some(idx) = self.nodes.id_index.remove(&name) {
            self.nodes.graph.remove_node(idx);
        }
        log::debug!("removed node {name} with {} connector(s)", removed.len());
        Ok(removed)
    }

    // ─── Connectors ──────────────────────────────────────────────────────

    /// Build and register a connector between two named nodes.
    ///
    /// # Errors
    /// `RegistryError::Build` if an endpoint does not exist; nothing is drawn.
    pub fn connect(
        &mut self,
        kind: RelationshipKind,
        start: NodeId,
        end: NodeId,
        labels: Labels<'_>,
    ) -> Result<ConnectorId, RegistryError> {
        let model = Builder::new(&mut self.nodes, &mut self.surface, &self.config)
            .build(kind, start, end, labels)?;
        self.register_connector(model)
    }

    /// Insert a freshly built connector. Each connector is accepted once.
    ///
    /// Both endpoints are subscribed here, so a model built against another
    /// `NodeStore` still follows its nodes. Its handles must address this
    /// registry's surface; a pass ignores handles the surface does not know.
    ///
    /// # Errors
    /// `DuplicateConnector` for a second registration of the same id,
    /// `UnknownNode` if an endpoint has disappeared since the build. In both
    /// cases the rejected connector's primitives and subscriptions are
    /// discarded.
    pub fn register_connector(&mut self, model: ConnectorModel) -> Result<ConnectorId, RegistryError> {
        let id = model.id();
        if self.connectors.contains_key(&id) {
            // The registered twin shares these handles; leave them alone.
            return Err(RegistryError::DuplicateConnector(id));
        }
        let (Some(from), Some(to)) = (
            self.nodes.index_of(model.start()),
            self.nodes.index_of(model.end()),
        ) else {
            let missing = if self.nodes.index_of(model.start()).is_none() {
                model.start()
            } else {
                model.end()
            };
            self.discard(&model);
            return Err(RegistryError::UnknownNode(missing));
        };
        self.nodes.graph[from].subscribe(id);
        self.nodes.graph[to].subscribe(id);
        let edge = self.nodes.graph.add_edge(from, to, id);
        self.connectors.insert(
            id,
            Connector {
                model,
                controller: ResyncController::new(),
                edge,
            },
        );
        Ok(id)
    }

    /// Remove a connector, its primitives, and its subscriptions.
    pub fn remove_connector(&mut self, id: ConnectorId) -> Result<RelationshipRecord, RegistryError> {
        let connector = self
            .connectors
            .remove(&id)
            .ok_or(RegistryError::UnknownConnector(id))?;
        self.nodes.graph.remove_edge(connector.edge);
        self.discard(&connector.model);
        log::debug!("removed {id}");
        Ok(connector.model.to_record())
    }

    fn discard(&mut self, model: &ConnectorModel) {
        for primitive in model.handles().all() {
            self.surface.remove(primitive);
        }
        for name in [model.start(), model.end()] {
            if let Some(node) = self.nodes.get_mut(name) {
                node.unsubscribe(model.id());
            }
        }
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&ConnectorModel> {
        self.connectors.get(&id).map(|c| &c.model)
    }

    /// Mutable access for metadata edits. Text changes reach the surface on
    /// the next [`resync`](Self::resync) or endpoint move.
    pub fn connector_mut(&mut self, id: ConnectorId) -> Option<&mut ConnectorModel> {
        self.connectors.get_mut(&id).map(|c| &mut c.model)
    }

    pub fn controller(&self, id: ConnectorId) -> Option<&ResyncController> {
        self.connectors.get(&id).map(|c| &c.controller)
    }

    /// All connectors in creation order.
    pub fn connectors(&self) -> impl Iterator<Item = &ConnectorModel> {
        self.connectors.values().map(|c| &c.model)
    }

    /// Connectors with `name` at either end, outgoing first.
    pub fn connectors_of(&self, name: NodeId) -> Vec<ConnectorId> {
        let Some(idx) = self.nodes.index_of(name) else {
            return Vec::new();
        };
        let mut ids: Vec<ConnectorId> = self
            .nodes
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| *e.weight())
            .collect();
        for e in self.nodes.graph.edges_directed(idx, Direction::Incoming) {
            if !ids.contains(e.weight()) {
                ids.push(*e.weight());
            }
        }
        ids
    }

    /// Replace the text of one label. The record and the text primitive
    /// change together.
    pub fn activate_label(
        &mut self,
        id: ConnectorId,
        slot: LabelSlot,
        text: &str,
    ) -> Result<(), RegistryError> {
        let connector = self
            .connectors
            .get_mut(&id)
            .ok_or(RegistryError::UnknownConnector(id))?;
        connector.model.set_label_text(slot, text);
        self.surface
            .set_text(connector.model.handles().label(slot), text);
        Ok(())
    }

    // ─── Synchronization ─────────────────────────────────────────────────

    /// Deliver a node event to every subscribed connector.
    /// Returns the number of completed resync passes.
    pub fn notify(&mut self, event: NodeEvent) -> usize {
        if let NodeEvent::Renamed { old, new } = event {
            let subscribers = self
                .nodes
                .get(new)
                .map(|n| n.subscribers().to_vec())
                .unwrap_or_default();
            for id in subscribers {
                if let Some(c) = self.connectors.get_mut(&id) {
                    c.model.rename_endpoint(old, new);
                }
            }
            log::debug!("renamed node {old} -> {new}");
            return 0;
        }
        if !event.affects_geometry() {
            return 0;
        }
        let subscribers = match self.nodes.get(event.node()) {
            Some(node) => node.subscribers().to_vec(),
            None => return 0,
        };
        subscribers
            .into_iter()
            .filter(|id| self.resync(*id))
            .count()
    }

    /// Run one resync pass for a connector. Returns false if the connector
    /// or one of its nodes is gone, in which case the pass is abandoned.
    pub fn resync(&mut self, id: ConnectorId) -> bool {
        let Some(connector) = self.connectors.get_mut(&id) else {
            return false;
        };
        let start = self.nodes.get(connector.model.start()).map(|n| n.bounds());
        let end = self.nodes.get(connector.model.end()).map(|n| n.bounds());
        let (Some(start), Some(end)) = (start, end) else {
            log::warn!("{id}: endpoint missing, pass abandoned");
            return false;
        };
        connector
            .controller
            .on_node_changed(&connector.model, start, end, &mut self.surface, &self.config)
    }

    /// Resync every connector, e.g. after a config change.
    pub fn resync_all(&mut self) -> usize {
        let ids: Vec<ConnectorId> = self.connectors.keys().copied().collect();
        ids.into_iter().filter(|id| self.resync(*id)).count()
    }

    // ─── Records ─────────────────────────────────────────────────────────

    /// Relationship records in creation order.
    pub fn records(&self) -> Vec<RelationshipRecord> {
        self.connectors().map(ConnectorModel::to_record).collect()
    }

    /// Rebuild connectors from records, keeping their text verbatim.
    /// Records whose endpoints cannot be resolved are logged and skipped;
    /// the rest are restored.
    pub fn restore(&mut self, records: &[RelationshipRecord]) -> ReplayReport {
        let mut report = ReplayReport::default();
        for (i, record) in records.iter().enumerate() {
            let built = Builder::new(&mut self.nodes, &mut self.surface, &self.config).rebuild(record);
            let rebuilt = built
                .map_err(RegistryError::from)
                .and_then(|model| self.register_connector(model));
            match rebuilt {
                Ok(id) => report.restored.push(id),
                Err(err) => {
                    log::warn!("skipping relationship record {i}: {err}");
                    report.skipped.push((i, err));
                }
            }
        }
        report
    }

    /// Node and relationship records for persistence.
    pub fn snapshot(&self) -> DiagramSnapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeRecord {
                name: n.id(),
                x: n.origin().x,
                y: n.origin().y,
                width: n.size().width,
                height: n.size().height,
            })
            .collect();
        DiagramSnapshot {
            nodes,
            relationships: self.records(),
        }
    }
}
