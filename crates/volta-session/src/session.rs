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

//! Ownership and run/stop lifecycle of the single active session.

use crate::error::SessionError;
use crate::registry::PaperRegistry;
use std::sync::{Arc, Weak};
use volta_core::{
    Circuit, CircuitEngine, CircuitEvent, Description, InspectionSink, IoPanelView, Monitor,
    MonitorView, Paper,
};

/// Notified with the new `running` state on every effective run-state
/// transition, so dependent UI affordances can enable/disable themselves.
/// This is the only externally observable side effect of a transition.
pub trait RunStateObserver: Send + Sync {
    /// Called after the circuit's run loop started or stopped.
    fn running_changed(&self, running: bool);
}

/// The bundle of engine components making up one live session.
///
/// Created as a unit by [`SessionController::load`] and disposed as a unit;
/// no component is ever reused across sessions.
struct Session {
    circuit: Box<dyn Circuit>,
    /// Kept alive for the session's lifetime; the engine binds signal
    /// recording to it.
    _monitor: Box<dyn Monitor>,
    monitor_view: Arc<dyn MonitorView>,
    io_panel: Box<dyn IoPanelView>,
    primary_paper: Arc<dyn Paper>,
    events: flume::Receiver<CircuitEvent>,
}

/// Owns the single active session and its run/stop state machine.
///
/// Exactly one session is live at a time. Creating a replacement requires a
/// full [`teardown`](SessionController::teardown) first; `load` on a live
/// session is rejected rather than silently replacing it.
///
/// The controller mediates every engine notification: call
/// [`pump_events`](SessionController::pump_events) (or go through
/// [`SessionService`](crate::command::SessionService), which pumps for you)
/// to forward paper creation/removal to the [`PaperRegistry`] and run-state
/// changes to the registered [`RunStateObserver`].
pub struct SessionController {
    engine: Arc<dyn CircuitEngine>,
    registry: PaperRegistry,
    observer: Option<Arc<dyn RunStateObserver>>,
    session: Option<Session>,
}

impl SessionController {
    /// Creates a controller for `engine` with a fresh inspection sink.
    #[must_use]
    pub fn new(engine: Arc<dyn CircuitEngine>) -> Self {
        Self::with_sink(engine, InspectionSink::new())
    }

    /// Creates a controller recording inspected cells into `sink`.
    #[must_use]
    pub fn with_sink(engine: Arc<dyn CircuitEngine>, sink: InspectionSink) -> Self {
        Self {
            engine,
            registry: PaperRegistry::new(sink),
            observer: None,
            session: None,
        }
    }

    /// Registers the observer notified on every run-state transition.
    pub fn set_run_state_observer(&mut self, observer: Arc<dyn RunStateObserver>) {
        self.observer = Some(observer);
    }

    /// Constructs and installs a new session from `description`.
    ///
    /// Builds, in order: the circuit, its monitor, the monitor view, the
    /// I/O panel and the primary paper; registers the primary paper (and any
    /// other paper the engine announces during display) with the current
    /// shared fixed policy; and finally auto-starts the circuit.
    ///
    /// A construction failure propagates the engine's error, disposes
    /// whatever views were already built, and leaves no session installed;
    /// in particular, no event subscription survives a failed load.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionActive`] if a session is live, or the engine's
    /// error if any component fails to build.
    pub fn load(&mut self, description: &Description) -> Result<(), SessionError> {
        if self.session.is_some() {
            return Err(SessionError::SessionActive);
        }
        log::info!("Loading circuit session.");

        let circuit = self.engine.build_circuit(description)?;
        let monitor = self.engine.build_monitor(circuit.as_ref())?;
        let monitor_view = self.engine.build_monitor_view(monitor.as_ref())?;
        let io_panel = match self.engine.build_io_panel(circuit.as_ref()) {
            Ok(panel) => panel,
            Err(e) => {
                monitor_view.shutdown();
                return Err(e.into());
            }
        };

        let events = circuit.events();
        let primary_paper = match circuit.display() {
            Ok(paper) => paper,
            Err(e) => {
                monitor_view.shutdown();
                io_panel.shutdown();
                return Err(e.into());
            }
        };

        self.session = Some(Session {
            circuit,
            _monitor: monitor,
            monitor_view,
            io_panel,
            primary_paper,
            events,
        });

        // The primary paper (plus any sub-circuit papers announced during
        // display) arrives on the event stream. Register everything, then
        // re-assert the shared policy across the lot.
        self.pump_events();
        self.registry.apply_policy();

        // Auto-start is the final step of a load.
        if let Some(session) = &self.session {
            session.circuit.start();
        }
        self.pump_events();
        Ok(())
    }

    /// Transitions the engine to running.
    ///
    /// Returns `Ok(true)` on an effective transition. Calling `start` while
    /// already running is a true no-op returning `Ok(false)`: the engine
    /// call is not re-invoked and no observer notification is produced.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] if no session is live.
    pub fn start(&mut self) -> Result<bool, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        if session.circuit.running() {
            log::debug!("start() with the circuit already running; nothing to do.");
            return Ok(false);
        }
        session.circuit.start();
        self.pump_events();
        Ok(true)
    }

    /// Transitions the engine to stopped.
    ///
    /// Returns `Ok(true)` on an effective transition; `stop` while already
    /// stopped is a true no-op returning `Ok(false)`, mirroring
    /// [`start`](SessionController::start).
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] if no session is live.
    pub fn stop(&mut self) -> Result<bool, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        if !session.circuit.running() {
            log::debug!("stop() with the circuit already stopped; nothing to do.");
            return Ok(false);
        }
        session.circuit.stop();
        self.pump_events();
        Ok(true)
    }

    /// Returns `true` while a session is live and its circuit is running.
    #[must_use]
    pub fn running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.circuit.running())
    }

    /// Returns `true` while a session is installed.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Drains pending engine notifications, handling each to completion in
    /// emission order on the caller's execution context.
    ///
    /// Paper creation/removal is forwarded to the registry; run-state
    /// changes are forwarded to the observer. Returns the number of events
    /// handled.
    pub fn pump_events(&mut self) -> usize {
        let Some(session) = &self.session else {
            return 0;
        };
        let mut handled = 0;
        while let Ok(event) = session.events.try_recv() {
            Self::dispatch(event, &mut self.registry, self.observer.as_deref());
            handled += 1;
        }
        handled
    }

    fn dispatch(
        event: CircuitEvent,
        registry: &mut PaperRegistry,
        observer: Option<&dyn RunStateObserver>,
    ) {
        match event {
            CircuitEvent::PaperAdded(paper) => registry.on_paper_added(&paper),
            CircuitEvent::PaperRemoved(id) => registry.on_paper_removed(id),
            CircuitEvent::RunningChanged(running) => {
                log::debug!("Circuit running state changed: {running}.");
                if let Some(observer) = observer {
                    observer.running_changed(running);
                }
            }
        }
    }

    /// Disposes the live session: shuts down the monitor view, then the I/O
    /// panel, then stops the circuit if it is running, and releases every
    /// component. Pending notifications (including the final stop) are
    /// delivered before anything is released.
    ///
    /// A teardown with no live session is a silent no-op; disposal is
    /// idempotent.
    pub fn teardown(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        log::info!("Tearing down circuit session.");
        session.monitor_view.shutdown();
        session.io_panel.shutdown();
        if session.circuit.running() {
            session.circuit.stop();
        }
        while let Ok(event) = session.events.try_recv() {
            Self::dispatch(event, &mut self.registry, self.observer.as_deref());
        }
        self.registry.clear();
    }

    /// Tears the session down with a serialization step in the middle:
    /// views are shut down, the circuit is stopped, and the circuit is then
    /// serialized (with layout iff `include_layout`) before being discarded.
    ///
    /// This is the first half of the reload cycle; see
    /// [`ReloadPipeline`](crate::reload::ReloadPipeline). Even if
    /// serialization fails, the session is fully discarded.
    pub(crate) fn dismantle(&mut self, include_layout: bool) -> Result<Description, SessionError> {
        let session = self.session.take().ok_or(SessionError::NoSession)?;
        session.monitor_view.shutdown();
        session.io_panel.shutdown();
        if session.circuit.running() {
            session.circuit.stop();
        }
        while let Ok(event) = session.events.try_recv() {
            Self::dispatch(event, &mut self.registry, self.observer.as_deref());
        }
        let description = session.circuit.serialize(include_layout);
        self.registry.clear();
        drop(session);
        Ok(description?)
    }

    /// Serializes the live circuit without disturbing the session.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] if no session is live, or the engine's
    /// serialization error.
    pub fn serialize(&self, include_layout: bool) -> Result<Description, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoSession)?;
        Ok(session.circuit.serialize(include_layout)?)
    }

    /// Updates the shared fixed policy on the paper registry.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.registry.set_fixed(fixed);
    }

    /// The paper registry tracking this controller's live papers.
    #[must_use]
    pub fn registry(&self) -> &PaperRegistry {
        &self.registry
    }

    /// A weak handle to the live session's monitor view, for the timeline
    /// controller. `None` when no session is live.
    #[must_use]
    pub fn monitor_view(&self) -> Option<Weak<dyn MonitorView>> {
        self.session
            .as_ref()
            .map(|s| Arc::downgrade(&s.monitor_view))
    }

    /// The live session's primary paper. `None` when no session is live.
    #[must_use]
    pub fn primary_paper(&self) -> Option<Arc<dyn Paper>> {
        self.session.as_ref().map(|s| Arc::clone(&s.primary_paper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use volta_testkit::{demo_description, ScriptedEngine};

    /// Records every run-state notification in order.
    #[derive(Default)]
    struct RecordingObserver {
        transitions: Mutex<Vec<bool>>,
    }

    impl RecordingObserver {
        fn transitions(&self) -> Vec<bool> {
            self.transitions.lock().unwrap().clone()
        }
    }

    impl RunStateObserver for RecordingObserver {
        fn running_changed(&self, running: bool) {
            self.transitions.lock().unwrap().push(running);
        }
    }

    fn controller() -> (SessionController, Arc<ScriptedEngine>) {
        let engine = Arc::new(ScriptedEngine::new());
        let controller = SessionController::new(engine.clone());
        (controller, engine)
    }

    #[test]
    fn load_auto_starts_the_circuit() {
        let (mut controller, _engine) = controller();
        controller.load(&demo_description()).unwrap();
        assert!(controller.running());
    }

    #[test]
    fn load_while_active_is_rejected() {
        let (mut controller, _engine) = controller();
        let description = demo_description();
        controller.load(&description).unwrap();

        let result = controller.load(&description);
        assert!(matches!(result, Err(SessionError::SessionActive)));
        // The live session is untouched.
        assert!(controller.running());
    }

    #[test]
    fn run_state_strictly_alternates_with_noops() {
        let (mut controller, engine) = controller();
        let observer = Arc::new(RecordingObserver::default());
        controller.set_run_state_observer(observer.clone());
        controller.load(&demo_description()).unwrap();

        // Auto-started by load.
        assert!(controller.running());
        assert!(!controller.start().unwrap());

        assert!(controller.stop().unwrap());
        assert!(!controller.stop().unwrap());
        assert!(!controller.running());

        assert!(controller.start().unwrap());
        assert!(controller.running());

        // One notification per effective transition, none for no-ops.
        assert_eq!(observer.transitions(), vec![true, false, true]);

        // The engine was never re-invoked on a no-op.
        let log = engine.log();
        let starts = log
            .entries()
            .iter()
            .filter(|e| *e == "circuit.start")
            .count();
        assert_eq!(starts, 2);
    }

    #[test]
    fn start_without_session_is_an_error() {
        let (mut controller, _engine) = controller();
        assert!(matches!(controller.start(), Err(SessionError::NoSession)));
        assert!(matches!(controller.stop(), Err(SessionError::NoSession)));
        assert!(!controller.running());
    }

    #[test]
    fn teardown_disposes_views_before_stopping_the_circuit() {
        let (mut controller, engine) = controller();
        controller.load(&demo_description()).unwrap();
        engine.log().clear();

        controller.teardown();

        assert_eq!(
            engine.log().entries(),
            vec![
                "monitor_view.shutdown".to_string(),
                "io_panel.shutdown".to_string(),
                "circuit.stop".to_string(),
            ]
        );
        assert!(!controller.has_session());
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn teardown_without_session_is_a_noop() {
        let (mut controller, _engine) = controller();
        controller.teardown();
        assert!(!controller.has_session());
    }

    #[test]
    fn teardown_notifies_the_final_stop() {
        let (mut controller, _engine) = controller();
        let observer = Arc::new(RecordingObserver::default());
        controller.set_run_state_observer(observer.clone());
        controller.load(&demo_description()).unwrap();

        controller.teardown();
        assert_eq!(observer.transitions(), vec![true, false]);
    }

    #[test]
    fn failed_load_leaves_no_session_and_no_observers() {
        let (mut controller, engine) = controller();
        engine.fail_io_panel(true);

        let result = controller.load(&demo_description());
        assert!(matches!(result, Err(SessionError::Engine(_))));
        assert!(!controller.has_session());
        assert!(!controller.running());
        assert!(controller.registry().is_empty());

        // The already-built monitor view was disposed on the way out.
        assert!(engine.monitor_view().unwrap().was_shutdown());

        // A later load succeeds once the engine cooperates.
        engine.fail_io_panel(false);
        controller.load(&demo_description()).unwrap();
        assert!(controller.running());
    }

    #[test]
    fn malformed_description_propagates_unmodified() {
        let (mut controller, _engine) = controller();
        let description = Description::new(serde_json::json!("not an object"));
        let result = controller.load(&description);
        assert!(matches!(
            result,
            Err(SessionError::Engine(
                volta_core::EngineError::MalformedDescription { .. }
            ))
        ));
        assert!(!controller.has_session());
    }

    #[test]
    fn papers_announced_at_load_are_registered_with_the_policy() {
        let (mut controller, engine) = controller();
        controller.set_fixed(true);
        controller.load(&demo_description()).unwrap();

        // demo description: primary paper plus one sub-circuit paper.
        assert_eq!(controller.registry().len(), 2);
        for paper in engine.circuit().unwrap().papers() {
            assert!(paper.fixed());
        }
    }

    #[test]
    fn dynamic_paper_removal_releases_the_entry() {
        let (mut controller, engine) = controller();
        controller.load(&demo_description()).unwrap();
        assert_eq!(controller.registry().len(), 2);

        let circuit = engine.circuit().unwrap();
        let removed = circuit.papers()[1].id();
        circuit.close_paper(removed);
        controller.pump_events();

        assert_eq!(controller.registry().len(), 1);
        assert!(!controller.registry().contains(removed));
    }
}
