//! Movable diagram nodes and their change notifications.
//!
//! A node keeps an explicit list of the connectors subscribed to its
//! position/size changes. Connectors are removed from the list when they
//! are destroyed, so a node never holds on to a dead connector.

use smallvec::SmallVec;
use ud_core::{BuildError, ConnectorId, Endpoint, NodeId, Point, Rect, Size};

/// What the geometry engine needs from a node: where it is, how big it is,
/// and who to tell when that changes.
pub trait MovableNode {
    fn id(&self) -> NodeId;
    fn origin(&self) -> Point;
    fn size(&self) -> Size;

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Add a connector to the subscription list. Subscribing twice is a no-op.
    fn subscribe(&mut self, connector: ConnectorId);

    /// Remove a connector. Returns false if it was not subscribed.
    fn unsubscribe(&mut self, connector: ConnectorId) -> bool;

    /// Subscribed connectors, in subscription order.
    fn subscribers(&self) -> &[ConnectorId];
}

/// A class/interface box on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    name: NodeId,
    origin: Point,
    size: Size,
    subscribers: SmallVec<[ConnectorId; 4]>,
}

impl DiagramNode {
    pub fn new(name: NodeId, bounds: Rect) -> Self {
        Self {
            name,
            origin: bounds.origin(),
            size: bounds.size(),
            subscribers: SmallVec::new(),
        }
    }

    pub(crate) fn set_origin(&mut self, origin: Point) -> Point {
        std::mem::replace(&mut self.origin, origin)
    }

    pub(crate) fn set_size(&mut self, size: Size) -> Size {
        std::mem::replace(&mut self.size, size)
    }

    pub(crate) fn rename(&mut self, name: NodeId) -> NodeId {
        std::mem::replace(&mut self.name, name)
    }
}

impl MovableNode for DiagramNode {
    fn id(&self) -> NodeId {
        self.name
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn size(&self) -> Size {
        self.size
    }

    fn subscribe(&mut self, connector: ConnectorId) {
        if !self.subscribers.contains(&connector) {
            self.subscribers.push(connector);
        }
    }

    fn unsubscribe(&mut self, connector: ConnectorId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|c| *c != connector);
        self.subscribers.len() != before
    }

    fn subscribers(&self) -> &[ConnectorId] {
        &self.subscribers
    }
}

/// A change notification emitted by node editing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    Moved { node: NodeId, old: Point, new: Point },
    Resized { node: NodeId, old: Size, new: Size },
    Renamed { old: NodeId, new: NodeId },
}

impl NodeEvent {
    /// The node the event is about, under its current name.
    pub fn node(&self) -> NodeId {
        match self {
            NodeEvent::Moved { node, .. } | NodeEvent::Resized { node, .. } => *node,
            NodeEvent::Renamed { new, .. } => *new,
        }
    }

    /// Whether connectors touching the node need a geometry pass.
    pub fn affects_geometry(&self) -> bool {
        match self {
            NodeEvent::Moved { old, new, .. } => old != new,
            NodeEvent::Resized { old, new, .. } => old != new,
            NodeEvent::Renamed { .. } => false,
        }
    }
}

/// Name → node lookup used by the builders.
pub trait NodeStore {
    type Node: MovableNode;

    fn get(&self, name: NodeId) -> Option<&Self::Node>;
    fn get_mut(&mut self, name: NodeId) -> Option<&mut Self::Node>;

    /// Resolve an endpoint by name, reporting which end failed.
    fn resolve(&self, name: NodeId, endpoint: Endpoint) -> Result<&Self::Node, BuildError> {
        self.get(name)
            .ok_or(BuildError::UnresolvedEndpoint { endpoint, name })
    }
}
