//! Per-kind connector geometry.
//!
//! Given the current rectangles of both endpoint nodes, computes the line
//! and the optional end marker for a relationship kind. Builders and the
//! resync pass both go through [`layout_connector`], so a freshly built
//! connector and a resynced one are always identical.

use crate::config::EngineConfig;
use crate::geometry::{
    arrowhead, boundary_anchor, closest_boundary_point, closest_vertex, diamond_at, diamond_tip,
};
use crate::model::{MarkerStyle, RelationshipKind};
use crate::scene::Vertices;
use kurbo::{Line, Point, Rect};
use smallvec::SmallVec;

/// Marker polygon at the `end` side of a connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub points: Vertices,
    pub filled: bool,
    /// The vertex touching the end node's outline.
    pub tip: Point,
}

/// Full geometry of one connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorGeometry {
    pub line: Line,
    pub marker: Option<Marker>,
}

type Strategy = fn(Rect, Rect, &EngineConfig) -> ConnectorGeometry;

fn strategy(marker: MarkerStyle) -> Strategy {
    match marker {
        MarkerStyle::None => plain,
        MarkerStyle::Diamond { filled: false } => open_diamond,
        MarkerStyle::Diamond { filled: true } => filled_diamond,
        MarkerStyle::Triangle => triangle,
    }
}

/// Compute the geometry of a `kind` connector between `start` and `end`.
pub fn layout_connector(
    kind: RelationshipKind,
    start: Rect,
    end: Rect,
    config: &EngineConfig,
) -> ConnectorGeometry {
    strategy(kind.marker())(start, end, config)
}

/// Both anchors: on `start` facing `end`'s center and vice versa.
fn anchors(start: Rect, end: Rect) -> (Point, Point) {
    (
        closest_boundary_point(start, end.center()),
        closest_boundary_point(end, start.center()),
    )
}

fn plain(start: Rect, end: Rect, _config: &EngineConfig) -> ConnectorGeometry {
    let (p1, p2) = anchors(start, end);
    ConnectorGeometry {
        line: Line::new(p1, p2),
        marker: None,
    }
}

fn open_diamond(start: Rect, end: Rect, config: &EngineConfig) -> ConnectorGeometry {
    diamond(start, end, false, config)
}

fn filled_diamond(start: Rect, end: Rect, config: &EngineConfig) -> ConnectorGeometry {
    diamond(start, end, true, config)
}

fn diamond(start: Rect, end: Rect, filled: bool, config: &EngineConfig) -> ConnectorGeometry {
    let p1 = closest_boundary_point(start, end.center());
    let anchor = boundary_anchor(end, start.center());
    let shape = diamond_at(anchor, config.diamond_width, config.diamond_height);
    // The line stops at the diamond's silhouette instead of piercing it.
    let p2 = closest_vertex(&shape, p1);
    ConnectorGeometry {
        line: Line::new(p1, p2),
        marker: Some(Marker {
            points: SmallVec::from_slice(&shape),
            filled,
            tip: diamond_tip(&shape, anchor.side),
        }),
    }
}

fn triangle(start: Rect, end: Rect, config: &EngineConfig) -> ConnectorGeometry {
    let (p1, p2) = anchors(start, end);
    let head = arrowhead(p1, p2, config.arrow_size, config.arrow_spread);
    let base = head[1].midpoint(head[2]);
    ConnectorGeometry {
        line: Line::new(p1, base),
        marker: Some(Marker {
            points: SmallVec::from_slice(&head),
            filled: false,
            tip: head[0],
        }),
    }
}
