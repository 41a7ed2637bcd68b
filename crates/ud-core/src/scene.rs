//! Render target abstraction and the retained in-memory surface.
//!
//! The engine never talks to a GUI toolkit. It issues add/update/remove
//! commands for three primitive kinds through `RenderTarget`; a backend
//! (canvas, SVG writer, GPU scene) implements the trait. `Surface` is the
//! retained implementation the editor uses by default and tests inspect.

use crate::id::PrimitiveId;
use kurbo::{Line, Point};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Vertex list of a marker polygon (diamond = 4, arrowhead = 3).
pub type Vertices = SmallVec<[Point; 4]>;

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Polygon { points: Vertices, filled: bool },
    Text { position: Point, content: String },
}

/// Sink for drawing commands.
///
/// Updates addressed to an unknown or mismatched handle are ignored; the
/// engine owns its handles, so this only happens after an external removal.
pub trait RenderTarget {
    fn add_line(&mut self, line: Line) -> PrimitiveId;
    fn add_polygon(&mut self, points: &[Point], filled: bool) -> PrimitiveId;
    fn add_text(&mut self, position: Point, content: &str) -> PrimitiveId;

    fn update_line(&mut self, id: PrimitiveId, line: Line);
    fn update_polygon(&mut self, id: PrimitiveId, points: &[Point]);
    fn move_text(&mut self, id: PrimitiveId, position: Point);
    fn set_text(&mut self, id: PrimitiveId, content: &str);

    /// Remove a primitive. Returns false if it was not present.
    fn remove(&mut self, id: PrimitiveId) -> bool;
}

// ─── Retained surface ────────────────────────────────────────────────────

/// In-memory retained drawing surface.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    primitives: BTreeMap<PrimitiveId, Primitive>,
    next_id: u64,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, primitive: Primitive) -> PrimitiveId {
        self.next_id += 1;
        let id = PrimitiveId(self.next_id);
        self.primitives.insert(id, primitive);
        id
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id)
    }

    pub fn line(&self, id: PrimitiveId) -> Option<Line> {
        match self.primitives.get(&id)? {
            Primitive::Line(line) => Some(*line),
            _ => None,
        }
    }

    pub fn polygon(&self, id: PrimitiveId) -> Option<(&[Point], bool)> {
        match self.primitives.get(&id)? {
            Primitive::Polygon { points, filled } => Some((points.as_slice(), *filled)),
            _ => None,
        }
    }

    pub fn text(&self, id: PrimitiveId) -> Option<(Point, &str)> {
        match self.primitives.get(&id)? {
            Primitive::Text { position, content } => Some((*position, content.as_str())),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// All primitives in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.primitives.iter().map(|(id, p)| (*id, p))
    }
}

impl RenderTarget for Surface {
    fn add_line(&mut self, line: Line) -> PrimitiveId {
        self.insert(Primitive::Line(line))
    }

    fn add_polygon(&mut self, points: &[Point], filled: bool) -> PrimitiveId {
        self.insert(Primitive::Polygon {
            points: SmallVec::from_slice(points),
            filled,
        })
    }

    fn add_text(&mut self, position: Point, content: &str) -> PrimitiveId {
        self.insert(Primitive::Text {
            position,
            content: content.to_string(),
        })
    }

    fn update_line(&mut self, id: PrimitiveId, line: Line) {
        if let Some(Primitive::Line(l)) = self.primitives.get_mut(&id) {
            *l = line;
        }
    }

    fn update_polygon(&mut self, id: PrimitiveId, new_points: &[Point]) {
        if let Some(Primitive::Polygon { points, .. }) = self.primitives.get_mut(&id) {
            points.clear();
            points.extend_from_slice(new_points);
        }
    }

    fn move_text(&mut self, id: PrimitiveId, new_position: Point) {
        if let Some(Primitive::Text { position, .. }) = self.primitives.get_mut(&id) {
            *position = new_position;
        }
    }

    fn set_text(&mut self, id: PrimitiveId, new_content: &str) {
        if let Some(Primitive::Text { content, .. }) = self.primitives.get_mut(&id) {
            new_content.clone_into(content);
        }
    }

    fn remove(&mut self, id: PrimitiveId) -> bool {
        self.primitives.remove(&id).is_some()
    }
}
