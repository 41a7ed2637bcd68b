//! Integration tests: node edits → resync passes → surface geometry.
//!
//! Drives the registry the way a drag handler would and checks that every
//! connector primitive matches a fresh layout after each frame.

use pretty_assertions::assert_eq;
use ud_core::geometry::distance_to_outline;
use ud_core::label::{multiplicity_label_position, name_label_position};
use ud_core::{
    EngineConfig, LabelSlot, Line, NodeId, Point, Rect, RelationshipKind, Size, closest_boundary_point,
    layout_connector,
};
use ud_editor::{DiagramRegistry, Labels, MovableNode, SyncState};

const EPS: f64 = 1e-6;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_boxes() -> DiagramRegistry {
    init_logging();
    let mut r = DiagramRegistry::new(EngineConfig::default());
    r.add_node(
        NodeId::intern("A"),
        Rect::from_origin_size((0.0, 0.0), (100.0, 60.0)),
    )
    .unwrap();
    r.add_node(
        NodeId::intern("B"),
        Rect::from_origin_size((300.0, 0.0), (100.0, 60.0)),
    )
    .unwrap();
    r
}

fn bounds(r: &DiagramRegistry, name: &str) -> Rect {
    r.resolve_node(NodeId::intern(name)).unwrap().bounds()
}

fn close(a: Point, b: Point) -> bool {
    a.distance(b) < EPS
}

// ─── Scenario ───────────────────────────────────────────────────────────

#[test]
fn association_follows_moved_node() {
    let mut r = two_boxes();
    let a = NodeId::intern("A");
    let b = NodeId::intern("B");
    let id = r
        .connect(RelationshipKind::Association, a, b, Labels::named("uses"))
        .unwrap();
    let line_id = r.connector(id).unwrap().handles().line;

    let line = r.surface().line(line_id).unwrap();
    assert!((line.p0.x - 100.0).abs() < EPS);
    assert!((line.p1.x - 300.0).abs() < EPS);
    assert!((line.p0.y - 30.0).abs() < EPS);
    assert!((line.p1.y - 30.0).abs() < EPS);

    assert_eq!(r.move_node(b, Point::new(300.0, 200.0)).unwrap(), 1);

    let line = r.surface().line(line_id).unwrap();
    let start = bounds(&r, "A");
    let end = bounds(&r, "B");
    assert!(close(line.p0, closest_boundary_point(start, end.center())));
    assert!(close(line.p1, closest_boundary_point(end, start.center())));
    assert!(close(line.p0, Point::new(95.0, 60.0)));
    assert!(close(line.p1, Point::new(305.0, 200.0)));
    assert_eq!(r.controller(id).unwrap().state(), SyncState::Idle);
}

// ─── Convergence ────────────────────────────────────────────────────────

#[test]
fn repeated_moves_do_not_drift() {
    let mut r = two_boxes();
    let config = *r.config();
    let a = NodeId::intern("A");
    let b = NodeId::intern("B");
    let ids: Vec<_> = RelationshipKind::ALL
        .iter()
        .map(|kind| r.connect(*kind, a, b, Labels::default()).unwrap())
        .collect();

    let frames = [
        ("A", 13.0, -7.5),
        ("B", -40.0, 90.0),
        ("A", 250.0, 300.0),
        ("B", -600.0, 0.25),
        ("A", -1.0, -1.0),
        ("B", 0.0, -333.0),
        ("A", 77.7, 12.3),
    ];
    for (name, dx, dy) in frames {
        assert_eq!(r.drag_node(NodeId::intern(name), dx, dy).unwrap(), ids.len());

        let start = bounds(&r, "A");
        let end = bounds(&r, "B");
        for id in &ids {
            let model = r.connector(*id).unwrap();
            let fresh = layout_connector(model.kind(), start, end, &config);
            let handles = model.handles();
            assert_eq!(r.surface().line(handles.line), Some(fresh.line));
            if let (Some(marker), Some(expected)) = (handles.marker, fresh.marker.as_ref()) {
                let (points, _) = r.surface().polygon(marker).unwrap();
                assert_eq!(points, expected.points.as_slice());
            }
            let (name_pos, _) = r.surface().text(handles.name_label).unwrap();
            assert_eq!(name_pos, name_label_position(fresh.line, &config));
            let (start_pos, _) = r.surface().text(handles.start_label).unwrap();
            assert_eq!(start_pos, multiplicity_label_position(fresh.line, true, &config));
            let (end_pos, _) = r.surface().text(handles.end_label).unwrap();
            assert_eq!(end_pos, multiplicity_label_position(fresh.line, false, &config));
        }
    }
    for id in &ids {
        assert_eq!(r.controller(*id).unwrap().passes(), frames.len() as u64);
    }
}

#[test]
fn resize_triggers_resync() {
    let mut r = two_boxes();
    let a = NodeId::intern("A");
    let b = NodeId::intern("B");
    let id = r
        .connect(RelationshipKind::Association, a, b, Labels::default())
        .unwrap();

    assert_eq!(r.resize_node(a, Size::new(200.0, 60.0)).unwrap(), 1);
    let line = r
        .surface()
        .line(r.connector(id).unwrap().handles().line)
        .unwrap();
    assert!((line.p0.x - 200.0).abs() < EPS, "got {:?}", line.p0);
}

// ─── Diamond attachment ─────────────────────────────────────────────────

#[test]
fn diamond_tip_stays_on_whole_node() {
    let mut r = two_boxes();
    let part = NodeId::intern("A");
    let whole = NodeId::intern("B");
    let agg = r
        .connect(RelationshipKind::Aggregation, part, whole, Labels::default())
        .unwrap();
    let comp = r
        .connect(RelationshipKind::Composition, part, whole, Labels::default())
        .unwrap();

    let positions = [
        (part, Point::new(500.0, 400.0)),
        (whole, Point::new(-200.0, 50.0)),
        (part, Point::new(-150.0, -300.0)),
        (whole, Point::new(-160.0, 100.0)),
        (part, Point::new(0.0, 0.0)),
    ];
    for (node, origin) in positions {
        r.move_node(node, origin).unwrap();
        let whole_bounds = bounds(&r, "B");
        for id in [agg, comp] {
            let marker = r.connector(id).unwrap().handles().marker.unwrap();
            let (points, _) = r.surface().polygon(marker).unwrap();
            let on_outline = points
                .iter()
                .filter(|p| distance_to_outline(whole_bounds, **p) < EPS)
                .count();
            assert!(on_outline >= 1, "no diamond vertex touches {whole_bounds:?}");

            // The line ends on a diamond vertex, never inside the whole node.
            let line = r
                .surface()
                .line(r.connector(id).unwrap().handles().line)
                .unwrap();
            assert!(points.iter().any(|p| close(*p, line.p1)));
        }
    }
}

// ─── Editing ────────────────────────────────────────────────────────────

#[test]
fn rename_keeps_relationship_addressable() {
    let mut r = two_boxes();
    let id = r
        .connect(
            RelationshipKind::Association,
            NodeId::intern("A"),
            NodeId::intern("B"),
            Labels::new(Some("owns"), Some("1"), Some("0..*")),
        )
        .unwrap();

    r.rename_node(NodeId::intern("B"), NodeId::intern("Wallet"))
        .unwrap();

    let records = r.records();
    let record = &records[0];
    assert_eq!(record.end, NodeId::intern("Wallet"));
    assert_eq!(record.start, NodeId::intern("A"));
    assert!(r.resolve_node(NodeId::intern("B")).is_err());

    // Still live under the new name.
    assert_eq!(
        r.drag_node(NodeId::intern("Wallet"), 0.0, 50.0).unwrap(),
        1
    );
    assert_eq!(r.controller(id).unwrap().passes(), 1);
}

#[test]
fn label_activation_survives_moves() {
    let mut r = two_boxes();
    let id = r
        .connect(
            RelationshipKind::Aggregation,
            NodeId::intern("A"),
            NodeId::intern("B"),
            Labels::default(),
        )
        .unwrap();
    r.activate_label(id, LabelSlot::Name, "contains").unwrap();
    r.drag_node(NodeId::intern("A"), 10.0, 10.0).unwrap();

    let model = r.connector(id).unwrap();
    assert_eq!(model.display_name(), "contains");
    let (_, text) = r.surface().text(model.handles().name_label).unwrap();
    assert_eq!(text, "contains");
}

// ─── Removal ────────────────────────────────────────────────────────────

#[test]
fn removing_node_cleans_up_connectors() {
    let mut r = two_boxes();
    r.add_node(
        NodeId::intern("C"),
        Rect::from_origin_size((0.0, 300.0), (80.0, 40.0)),
    )
    .unwrap();
    let a = NodeId::intern("A");
    let b = NodeId::intern("B");
    let c = NodeId::intern("C");
    r.connect(RelationshipKind::Association, a, b, Labels::default())
        .unwrap();
    r.connect(RelationshipKind::Composition, b, c, Labels::default())
        .unwrap();
    let keep = r
        .connect(RelationshipKind::Inheritance, c, a, Labels::default())
        .unwrap();

    let removed = r.remove_node(b).unwrap();
    assert_eq!(removed.len(), 2);

    // A and C only remember the surviving connector.
    assert_eq!(r.resolve_node(a).unwrap().subscribers(), &[keep]);
    assert_eq!(r.resolve_node(c).unwrap().subscribers(), &[keep]);
    assert_eq!(r.records().len(), 1);

    // Line + arrowhead + three labels.
    assert_eq!(r.surface().len(), 5);
    assert_eq!(r.drag_node(a, 5.0, 5.0).unwrap(), 1);
}

#[test]
fn remove_connector_releases_primitives() {
    let mut r = two_boxes();
    let id = r
        .connect(
            RelationshipKind::Composition,
            NodeId::intern("A"),
            NodeId::intern("B"),
            Labels::default(),
        )
        .unwrap();
    assert_eq!(r.surface().len(), 5);

    let record = r.remove_connector(id).unwrap();
    assert_eq!(record.kind, RelationshipKind::Composition);
    assert!(r.surface().is_empty());
    assert!(r.connector(id).is_none());
    assert_eq!(r.drag_node(NodeId::intern("A"), 1.0, 1.0).unwrap(), 0);
    assert!(r.remove_connector(id).is_err());
}

#[test]
fn self_association_moves_once_per_frame() {
    let mut r = two_boxes();
    let a = NodeId::intern("A");
    let id = r
        .connect(RelationshipKind::Association, a, a, Labels::named("next"))
        .unwrap();
    assert_eq!(r.drag_node(a, 20.0, 0.0).unwrap(), 1);
    let line = r
        .surface()
        .line(r.connector(id).unwrap().handles().line)
        .unwrap();
    // Coincident centers anchor on the right edge midpoint.
    assert_eq!(line, Line::new((120.0, 30.0), (120.0, 30.0)));
}
