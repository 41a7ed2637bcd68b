//! Label binder: places connector labels relative to the connector line.
//!
//! Positions depend only on the line's current endpoints and the config,
//! so rebinding after an unchanged line is a no-op.

use crate::config::EngineConfig;
use crate::id::PrimitiveId;
use crate::scene::RenderTarget;
use kurbo::{Line, Point, Vec2};

/// Unit direction of `line`; +x for a zero-length line.
fn direction(line: Line) -> Vec2 {
    let d = line.p1 - line.p0;
    let len = d.hypot();
    if len > f64::EPSILON {
        d / len
    } else {
        Vec2::new(1.0, 0.0)
    }
}

/// Where the relationship name goes: above the line midpoint.
pub fn name_label_position(line: Line, config: &EngineConfig) -> Point {
    let mid = line.p0.midpoint(line.p1);
    Point::new(mid.x, mid.y - config.name_label_margin)
}

/// Where a multiplicity goes: just inside the chosen endpoint, lifted off
/// the line along its left normal.
///
/// On short lines the inset is capped at a third of the length so the two
/// multiplicities keep their order and do not overlap.
pub fn multiplicity_label_position(line: Line, at_start: bool, config: &EngineConfig) -> Point {
    let dir = direction(line);
    let normal = Vec2::new(dir.y, -dir.x);
    let len = (line.p1 - line.p0).hypot();
    let inset = config.multiplicity_inset.min(len / 3.0);
    let lift = normal * config.multiplicity_margin;
    if at_start {
        line.p0 + dir * inset + lift
    } else {
        line.p1 - dir * inset + lift
    }
}

/// Move `label` to the name position for `line`.
pub fn bind_name_label<R: RenderTarget + ?Sized>(
    target: &mut R,
    label: PrimitiveId,
    line: Line,
    config: &EngineConfig,
) {
    target.move_text(label, name_label_position(line, config));
}

/// Move `label` to the start or end multiplicity position for `line`.
pub fn bind_multiplicity_label<R: RenderTarget + ?Sized>(
    target: &mut R,
    label: PrimitiveId,
    line: Line,
    at_start: bool,
    config: &EngineConfig,
) {
    target.move_text(label, multiplicity_label_position(line, at_start, config));
}
