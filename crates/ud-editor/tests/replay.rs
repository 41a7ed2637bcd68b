//! Integration tests: relationship records → replay → identical connectors.
//!
//! Records are the only thing persistence sees, so rebuilding from them must
//! reproduce the same relationships with their text exactly as stored.

use pretty_assertions::assert_eq;
use ud_core::{
    DiagramSnapshot, EngineConfig, LabelSlot, NodeId, NodeRecord, Rect, RegistryError, RelationshipKind,
    RelationshipRecord, layout_connector,
};
use ud_editor::{DiagramRegistry, Labels, MovableNode};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn library() -> DiagramRegistry {
    init_logging();
    let mut r = DiagramRegistry::new(EngineConfig::default());
    for (name, x, y) in [("Library", 0.0, 0.0), ("Book", 300.0, 40.0), ("Ebook", 300.0, 300.0)] {
        r.add_node(
            NodeId::intern(name),
            Rect::from_origin_size((x, y), (120.0, 70.0)),
        )
        .unwrap();
    }
    r
}

fn record(kind: RelationshipKind, start: &str, end: &str, texts: [&str; 3]) -> RelationshipRecord {
    RelationshipRecord {
        kind,
        start: NodeId::intern(start),
        end: NodeId::intern(end),
        name: texts[0].into(),
        start_multiplicity: texts[1].into(),
        end_multiplicity: texts[2].into(),
    }
}

// ─── Records ────────────────────────────────────────────────────────────

#[test]
fn record_rebuilds_equal_record() {
    let mut r = library();
    let id = r
        .connect(
            RelationshipKind::Association,
            NodeId::intern("Library"),
            NodeId::intern("Book"),
            Labels::new(Some("owns"), Some("1"), Some("0..*")),
        )
        .unwrap();
    let original = r.remove_connector(id).unwrap();
    assert_eq!(
        original,
        record(RelationshipKind::Association, "Library", "Book", ["owns", "1", "0..*"])
    );

    let report = r.restore(std::slice::from_ref(&original));
    assert!(report.skipped.is_empty());
    assert_eq!(r.records(), vec![original]);
}

#[test]
fn replay_keeps_text_verbatim() {
    let mut r = library();
    let records = [
        record(RelationshipKind::Composition, "Book", "Library", ["", "", "*"]),
        record(RelationshipKind::Inheritance, "Ebook", "Book", ["", "", ""]),
    ];
    let report = r.restore(&records);
    assert_eq!(report.restored.len(), 2);
    assert_eq!(r.records(), records.to_vec());
}

#[test]
fn gesture_defaults_are_not_reapplied() {
    let mut r = library();
    let id = r
        .connect(
            RelationshipKind::Composition,
            NodeId::intern("Book"),
            NodeId::intern("Library"),
            Labels::new(None, None, Some("*")),
        )
        .unwrap();
    assert_eq!(
        r.records(),
        vec![record(RelationshipKind::Composition, "Book", "Library", ["Composition", "1", "*"])]
    );

    r.activate_label(id, LabelSlot::StartMultiplicity, "").unwrap();
    r.activate_label(id, LabelSlot::Name, "").unwrap();
    let (rebuilt, report) =
        DiagramRegistry::from_snapshot(&r.snapshot(), EngineConfig::default()).unwrap();

    assert!(report.skipped.is_empty());
    assert_eq!(
        rebuilt.records(),
        vec![record(RelationshipKind::Composition, "Book", "Library", ["", "", "*"])]
    );
    let model = rebuilt.connector(report.restored[0]).unwrap();
    assert_eq!(rebuilt.surface().text(model.handles().start_label).unwrap().1, "");
}

#[test]
fn unresolvable_record_is_skipped() {
    let mut r = library();
    let report = r.restore(&[
        record(RelationshipKind::Aggregation, "Book", "Archive", ["in", "1", "1"]),
        record(RelationshipKind::Association, "Library", "Book", ["lends", "1", "0..*"]),
    ]);

    assert_eq!(report.restored.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    let (index, err) = &report.skipped[0];
    assert_eq!(*index, 0);
    assert!(matches!(err, RegistryError::Build(_)), "got {err}");
    assert!(err.to_string().contains("Archive"));

    // Only the restored connector's primitives are on the surface.
    assert_eq!(r.surface().len(), 4);
    assert_eq!(r.records().len(), 1);
}

// ─── Snapshots ──────────────────────────────────────────────────────────

fn populated() -> DiagramRegistry {
    let mut r = library();
    let library = NodeId::intern("Library");
    let book = NodeId::intern("Book");
    let ebook = NodeId::intern("Ebook");
    r.connect(RelationshipKind::Aggregation, book, library, Labels::named("shelved in"))
        .unwrap();
    r.connect(RelationshipKind::Inheritance, ebook, book, Labels::default())
        .unwrap();
    r.connect(
        RelationshipKind::Association,
        library,
        ebook,
        Labels::new(None, Some("1"), Some("0..*")),
    )
    .unwrap();
    r.drag_node(ebook, -40.0, 25.0).unwrap();
    r
}

fn assert_same_diagram(a: &DiagramRegistry, b: &DiagramRegistry) {
    assert_eq!(a.records(), b.records());
    assert_eq!(a.nodes().len(), b.nodes().len());
    for node in a.nodes().iter() {
        let other = b.resolve_node(node.id()).unwrap();
        assert_eq!(node.bounds(), other.bounds());
    }
    // Rebuilt connectors are drawn exactly where the originals are.
    for (ours, theirs) in a.connectors().zip(b.connectors()) {
        let start = a.resolve_node(ours.start()).unwrap().bounds();
        let end = a.resolve_node(ours.end()).unwrap().bounds();
        let expected = layout_connector(ours.kind(), start, end, a.config()).line;
        assert_eq!(a.surface().line(ours.handles().line), Some(expected));
        assert_eq!(b.surface().line(theirs.handles().line), Some(expected));
    }
}

#[test]
fn snapshot_survives_json() {
    let original = populated();
    let json = original.snapshot().to_json().unwrap();
    let decoded = DiagramSnapshot::from_json(&json).unwrap();

    let (rebuilt, report) = DiagramRegistry::from_snapshot(&decoded, EngineConfig::default()).unwrap();
    assert_eq!(report.restored.len(), 3);
    assert!(report.skipped.is_empty());
    assert_same_diagram(&original, &rebuilt);
}

#[test]
fn snapshot_survives_msgpack() {
    let original = populated();
    let bytes = original.snapshot().to_msgpack().unwrap();
    let decoded = DiagramSnapshot::from_msgpack(&bytes).unwrap();

    let (rebuilt, _) = DiagramRegistry::from_snapshot(&decoded, EngineConfig::default()).unwrap();
    assert_same_diagram(&original, &rebuilt);
}

#[test]
fn snapshot_with_duplicate_node_is_rejected() {
    let node = NodeRecord {
        name: NodeId::intern("Twin"),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
    };
    let snapshot = DiagramSnapshot {
        nodes: vec![node.clone(), node],
        relationships: Vec::new(),
    };
    let err = DiagramRegistry::from_snapshot(&snapshot, EngineConfig::default()).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateNode(NodeId::intern("Twin")));
}
