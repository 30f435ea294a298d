// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The user-facing command surface and the service facade behind it.
//!
//! Each [`Command`] variant maps one-to-one onto a controller method; a host
//! UI (buttons, key bindings, a test harness) only needs to translate its
//! input events into commands and hand them to
//! [`SessionService::dispatch`].

use crate::error::SessionError;
use crate::registry::PaperRegistry;
use crate::reload::ReloadPipeline;
use crate::session::{RunStateObserver, SessionController};
use crate::timeline::TimelineController;
use std::path::Path;
use std::sync::Arc;
use volta_core::{CircuitEngine, Description, InspectionSink};

/// A user-initiated session command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Transition the engine to running.
    Start,
    /// Transition the engine to stopped.
    Stop,
    /// Serialize, tear down and reconstruct the session, carrying layout
    /// coordinates across iff `include_layout`.
    Reload {
        /// Whether the serialized description keeps layout coordinates.
        include_layout: bool,
    },
    /// Set the shared "fixed" display policy on all papers.
    ToggleFixed {
        /// The new value of the shared flag.
        fixed: bool,
    },
    /// Double the timeline zoom factor.
    ZoomIn,
    /// Halve the timeline zoom factor.
    ZoomOut,
    /// Page the timeline a quarter of the visible span into the past.
    PageLeft,
    /// Page the timeline a quarter of the visible span into the future.
    PageRight,
    /// Re-engage timeline live-follow.
    GoLive,
}

/// Facade owning the session controller, the timeline controller and the
/// reload pipeline, wired together so the timeline always points at the
/// live session's monitor view.
pub struct SessionService {
    controller: SessionController,
    timeline: TimelineController,
}

impl SessionService {
    /// Creates a service for `engine` with a fresh inspection sink.
    #[must_use]
    pub fn new(engine: Arc<dyn CircuitEngine>) -> Self {
        Self::with_sink(engine, InspectionSink::new())
    }

    /// Creates a service recording inspected cells into `sink`.
    #[must_use]
    pub fn with_sink(engine: Arc<dyn CircuitEngine>, sink: InspectionSink) -> Self {
        Self {
            controller: SessionController::with_sink(engine, sink),
            timeline: TimelineController::new(),
        }
    }

    /// Loads a session from `description` and attaches the timeline to the
    /// new monitor view. See [`SessionController::load`].
    ///
    /// # Errors
    ///
    /// Propagates [`SessionController::load`] errors.
    pub fn load(&mut self, description: &Description) -> Result<(), SessionError> {
        self.controller.load(description)?;
        self.reattach_timeline();
        Ok(())
    }

    /// Reads the startup description document at `path` and loads it.
    ///
    /// # Errors
    ///
    /// I/O and parse failures surface as engine errors; see
    /// [`Description::from_path`].
    pub fn load_from_path(&mut self, path: &Path) -> Result<(), SessionError> {
        let description = Description::from_path(path)?;
        self.load(&description)
    }

    /// Runs the reload pipeline and re-attaches the timeline to the
    /// replacement session's monitor view. Returns the description the
    /// session was carried across on.
    ///
    /// # Errors
    ///
    /// Propagates [`ReloadPipeline::reload`] errors; on failure no session
    /// is installed and the timeline stays detached.
    pub fn reload(&mut self, include_layout: bool) -> Result<Description, SessionError> {
        self.timeline.detach();
        let description = ReloadPipeline::reload(&mut self.controller, include_layout)?;
        self.reattach_timeline();
        Ok(description)
    }

    /// Dispatches a user command to the responsible controller.
    ///
    /// Pending engine notifications are drained first, so the command acts
    /// on the up-to-date paper set; an explicit [`pump`](Self::pump) is only
    /// needed between engine activity and direct controller access.
    ///
    /// Timeline commands on a torn-down session degrade to no-ops (the
    /// controller holds only a weak view handle); lifecycle commands report
    /// invalid state through their error.
    ///
    /// # Errors
    ///
    /// Whatever the underlying controller method raises.
    pub fn dispatch(&mut self, command: Command) -> Result<(), SessionError> {
        log::trace!("Dispatching {command:?}.");
        self.pump();
        match command {
            Command::Start => {
                self.controller.start()?;
            }
            Command::Stop => {
                self.controller.stop()?;
            }
            Command::Reload { include_layout } => {
                self.reload(include_layout)?;
            }
            Command::ToggleFixed { fixed } => self.controller.set_fixed(fixed),
            Command::ZoomIn => {
                self.timeline.zoom_in();
            }
            Command::ZoomOut => {
                self.timeline.zoom_out();
            }
            Command::PageLeft => {
                self.timeline.page_left();
            }
            Command::PageRight => {
                self.timeline.page_right();
            }
            Command::GoLive => {
                self.timeline.go_live();
            }
        }
        Ok(())
    }

    /// Drains pending engine notifications. See
    /// [`SessionController::pump_events`].
    pub fn pump(&mut self) -> usize {
        self.controller.pump_events()
    }

    /// Tears the session down and detaches the timeline.
    pub fn teardown(&mut self) {
        self.timeline.detach();
        self.controller.teardown();
    }

    /// Registers the observer notified on run-state transitions.
    pub fn set_run_state_observer(&mut self, observer: Arc<dyn RunStateObserver>) {
        self.controller.set_run_state_observer(observer);
    }

    /// Returns `true` while a session is live and running.
    #[must_use]
    pub fn running(&self) -> bool {
        self.controller.running()
    }

    /// The session controller.
    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// The session controller, mutably.
    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    /// The paper registry of the session controller.
    #[must_use]
    pub fn registry(&self) -> &PaperRegistry {
        self.controller.registry()
    }

    /// The timeline controller.
    #[must_use]
    pub fn timeline(&self) -> &TimelineController {
        &self.timeline
    }

    fn reattach_timeline(&mut self) {
        if let Some(view) = self.controller.monitor_view() {
            self.timeline.attach(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_core::MonitorView;
    use volta_testkit::{demo_description, ScriptedEngine};

    fn service() -> (SessionService, Arc<ScriptedEngine>) {
        let engine = Arc::new(ScriptedEngine::new());
        let service = SessionService::new(engine.clone());
        (service, engine)
    }

    #[test]
    fn commands_map_onto_controller_methods() {
        let (mut service, engine) = service();
        service.load(&demo_description()).unwrap();
        let view = engine.monitor_view().unwrap();
        let original_zoom = view.pixels_per_tick();

        service.dispatch(Command::Stop).unwrap();
        assert!(!service.running());
        service.dispatch(Command::Start).unwrap();
        assert!(service.running());

        service.dispatch(Command::ZoomIn).unwrap();
        assert_eq!(view.pixels_per_tick(), original_zoom * 2.0);
        service.dispatch(Command::ZoomOut).unwrap();
        assert_eq!(view.pixels_per_tick(), original_zoom);

        service.dispatch(Command::ToggleFixed { fixed: true }).unwrap();
        assert!(service.registry().fixed());
    }

    #[test]
    fn timeline_commands_are_noops_after_teardown() {
        let (mut service, _engine) = service();
        service.load(&demo_description()).unwrap();
        service.teardown();

        // No session: timeline commands degrade quietly...
        service.dispatch(Command::ZoomIn).unwrap();
        service.dispatch(Command::PageLeft).unwrap();
        // ...lifecycle commands report the invalid state.
        assert!(matches!(
            service.dispatch(Command::Start),
            Err(SessionError::NoSession)
        ));
    }

    #[test]
    fn dispatch_drains_pending_notifications_first() {
        let (mut service, engine) = service();
        service.load(&demo_description()).unwrap();

        // Announce a paper but do not pump explicitly.
        let circuit = engine.circuit().unwrap();
        let paper = circuit.open_subcircuit("regfile");

        service.dispatch(Command::ToggleFixed { fixed: true }).unwrap();
        assert_eq!(service.registry().len(), 3);
        assert!(paper.fixed());
    }

    #[test]
    fn reload_reattaches_the_timeline() {
        let (mut service, engine) = service();
        service.load(&demo_description()).unwrap();
        service.dispatch(Command::Reload { include_layout: true }).unwrap();

        // Zoom must land on the replacement session's view.
        let view = engine.monitor_view().unwrap();
        let original_zoom = view.pixels_per_tick();
        service.dispatch(Command::ZoomIn).unwrap();
        assert_eq!(view.pixels_per_tick(), original_zoom * 2.0);
    }

    #[test]
    fn load_from_path_reads_the_startup_document() {
        use std::io::Write;
        let (mut service, _engine) = service();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", demo_description()).unwrap();

        service.load_from_path(file.path()).unwrap();
        assert!(service.running());
    }
}
