//! Geometry kernel: boundary anchors, nearest vertices, and marker shapes.
//!
//! Every function here is pure and total. Degenerate inputs (coincident
//! centers, zero-size rectangles, zero-length lines) produce a deterministic
//! point instead of NaN or a panic, because the caller's only requirement
//! is that the drawing stays valid.

use kurbo::{Point, Rect, Vec2};

/// The side of a rectangle an anchor point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Unit vector pointing away from the rectangle (screen coordinates, y down).
    pub fn outward_normal(self) -> Vec2 {
        match self {
            Side::Left => Vec2::new(-1.0, 0.0),
            Side::Right => Vec2::new(1.0, 0.0),
            Side::Top => Vec2::new(0.0, -1.0),
            Side::Bottom => Vec2::new(0.0, 1.0),
        }
    }
}

/// A point on a rectangle's outline together with the side it lies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point,
    pub side: Side,
}

/// Point where the ray from `node`'s center towards `towards` leaves the
/// rectangle outline.
pub fn closest_boundary_point(node: Rect, towards: Point) -> Point {
    boundary_anchor(node, towards).point
}

/// Like [`closest_boundary_point`], also reporting which side was hit.
///
/// A target coincident with the center resolves to the middle of the right
/// edge. A zero-size rectangle resolves to its origin.
pub fn boundary_anchor(node: Rect, towards: Point) -> Anchor {
    let node = node.abs();
    let center = node.center();
    let mut dx = towards.x - center.x;
    let mut dy = towards.y - center.y;
    if !(dx.is_finite() && dy.is_finite()) {
        dx = 0.0;
        dy = 0.0;
    }
    let half_w = node.width() / 2.0;
    let half_h = node.height() / 2.0;

    if dy.abs() * half_w > dx.abs() * half_h {
        // Steeper than the diagonal: the ray exits through top or bottom.
        // dy != 0 here since the left-hand side is positive.
        let (h, side) = if dy < 0.0 {
            (-half_h, Side::Top)
        } else {
            (half_h, Side::Bottom)
        };
        let sx = h * dx / dy;
        Anchor {
            point: Point::new(center.x + sx, center.y + h),
            side,
        }
    } else {
        let (w, side) = if dx < 0.0 {
            (-half_w, Side::Left)
        } else {
            (half_w, Side::Right)
        };
        let sy = if dx == 0.0 { 0.0 } else { w * dy / dx };
        Anchor {
            point: Point::new(center.x + w, center.y + sy),
            side,
        }
    }
}

/// The vertex of `polygon` nearest to `towards`.
///
/// On exact ties the first vertex in iteration order wins. An empty polygon
/// yields `towards` itself.
pub fn closest_vertex(polygon: &[Point], towards: Point) -> Point {
    let mut best: Option<(Point, f64)> = None;
    for &vertex in polygon {
        let d = vertex.distance(towards);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((vertex, d)),
        }
    }
    best.map(|(p, _)| p).unwrap_or(towards)
}

/// The fixed axis-aligned diamond, placed so the vertex facing the anchored
/// rectangle sits exactly on `anchor.point` and the shape lies outside it.
///
/// Vertices are ordered right, bottom, left, top.
pub fn diamond_at(anchor: Anchor, width: f64, height: f64) -> [Point; 4] {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let reach = match anchor.side {
        Side::Left | Side::Right => half_w,
        Side::Top | Side::Bottom => half_h,
    };
    let c = anchor.point + anchor.side.outward_normal() * reach;
    [
        Point::new(c.x + half_w, c.y),
        Point::new(c.x, c.y + half_h),
        Point::new(c.x - half_w, c.y),
        Point::new(c.x, c.y - half_h),
    ]
}

/// The vertex of a diamond from [`diamond_at`] that touches the anchor.
pub fn diamond_tip(diamond: &[Point; 4], side: Side) -> Point {
    match side {
        Side::Right => diamond[2],
        Side::Bottom => diamond[3],
        Side::Left => diamond[0],
        Side::Top => diamond[1],
    }
}

/// Triangular arrowhead with its tip at `tip`, pointing along `from → tip`.
///
/// Returns `[tip, wing_a, wing_b]`. A zero-length direction points along +x.
pub fn arrowhead(from: Point, tip: Point, size: f64, spread: f64) -> [Point; 3] {
    let dir = tip - from;
    let angle = if dir.hypot() > f64::EPSILON {
        dir.y.atan2(dir.x)
    } else {
        0.0
    };
    let wing = |a: f64| Point::new(tip.x - size * a.cos(), tip.y - size * a.sin());
    [tip, wing(angle - spread), wing(angle + spread)]
}

/// Distance from `p` to the closest point of `rect`'s outline.
pub fn distance_to_outline(rect: Rect, p: Point) -> f64 {
    let rect = rect.abs();
    let inside = p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1;
    if inside {
        (p.x - rect.x0)
            .min(rect.x1 - p.x)
            .min(p.y - rect.y0)
            .min(rect.y1 - p.y)
    } else {
        let cx = p.x.clamp(rect.x0, rect.x1);
        let cy = p.y.clamp(rect.y0, rect.y1);
        p.distance(Point::new(cx, cy))
    }
}
