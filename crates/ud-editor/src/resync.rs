//! Resync controller: keeps one connector's primitives glued to its nodes.
//!
//! Each connector owns a controller with two states. A position or size
//! change on either endpoint moves it from `Idle` to `Recomputing`; the
//! pass then recomputes both anchors, repositions the line and marker, and
//! rebinds all three labels before returning to `Idle`. Passes run to
//! completion synchronously, so two moves always yield two whole passes.

use ud_core::label::{bind_multiplicity_label, bind_name_label};
use ud_core::{ConnectorModel, EngineConfig, LabelSlot, Rect, RenderTarget, layout_connector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Recomputing,
}

/// Per-connector synchronization state machine.
#[derive(Debug, Clone, Default)]
pub struct ResyncController {
    state: SyncState,
    passes: u64,
}

impl ResyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one synchronization pass for `model` against the current node
    /// rectangles.
    ///
    /// Passes cannot nest through the registry, which holds the surface
    /// mutably for the whole pass. A controller found mid-pass anyway
    /// (e.g. left there by a panicking target) drops the notification and
    /// returns false.
    pub fn on_node_changed<R: RenderTarget + ?Sized>(
        &mut self,
        model: &ConnectorModel,
        start: Rect,
        end: Rect,
        target: &mut R,
        config: &EngineConfig,
    ) -> bool {
        if self.state == SyncState::Recomputing {
            log::warn!("{}: notification during a pass, dropped", model.id());
            return false;
        }
        self.state = SyncState::Recomputing;

        // (a) anchors
        let geometry = layout_connector(model.kind(), start, end, config);

        // (b) line and marker
        let handles = model.handles();
        target.update_line(handles.line, geometry.line);
        if let (Some(id), Some(marker)) = (handles.marker, geometry.marker.as_ref()) {
            target.update_polygon(id, &marker.points);
        }

        // (c) labels, position and text
        bind_name_label(target, handles.name_label, geometry.line, config);
        bind_multiplicity_label(target, handles.start_label, geometry.line, true, config);
        bind_multiplicity_label(target, handles.end_label, geometry.line, false, config);
        for slot in [
            LabelSlot::Name,
            LabelSlot::StartMultiplicity,
            LabelSlot::EndMultiplicity,
        ] {
            target.set_text(handles.label(slot), model.label_text(slot));
        }

        self.state = SyncState::Idle;
        self.passes += 1;
        log::trace!(
            "{} pass {}: line {:?} -> {:?}",
            model.id(),
            self.passes,
            geometry.line.p0,
            geometry.line.p1
        );
        true
    }
}
