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

//! The scripted engine, circuit and monitor.

use crate::actions::ActionLog;
use crate::views::{ScriptedIoPanel, ScriptedMonitorView, ScriptedPaper};
use serde_json::{json, Value};
use std::any::Any;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use volta_core::{
    Circuit, CircuitEngine, CircuitEvent, Description, EngineError, EventBus, IoPanelView,
    Monitor, MonitorView, Paper, PaperId,
};

/// The layout placeholder the scripted engine emits when asked to serialize
/// coordinates it was never given: placement is left to the renderer.
fn default_layout() -> Value {
    json!({ "auto": true })
}

/// A scripted circuit: run state, a recorded-time clock, papers, and an
/// event bus. No gate is ever evaluated.
pub struct ScriptedCircuit {
    topology: Value,
    layout: Option<Value>,
    subcircuits: Vec<String>,
    running: AtomicBool,
    recorded_time: Arc<Mutex<f64>>,
    papers: Mutex<Vec<Arc<ScriptedPaper>>>,
    bus: EventBus<CircuitEvent>,
    log: ActionLog,
}

impl ScriptedCircuit {
    fn from_description(description: &Description, log: ActionLog) -> Result<Self, EngineError> {
        let Some(object) = description.as_value().as_object() else {
            return Err(EngineError::MalformedDescription {
                details: "expected a JSON object".to_string(),
            });
        };
        let mut topology = object.clone();
        let layout = topology.remove("layout");
        let subcircuits = topology
            .get("subcircuits")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            topology: Value::Object(topology),
            layout,
            subcircuits,
            running: AtomicBool::new(false),
            recorded_time: Arc::new(Mutex::new(0.0)),
            papers: Mutex::new(Vec::new()),
            bus: EventBus::new(),
            log,
        })
    }

    /// Returns `true` while the scripted run loop is "running".
    #[must_use]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the currently live papers, in creation order.
    #[must_use]
    pub fn papers(&self) -> Vec<Arc<ScriptedPaper>> {
        self.papers.lock().unwrap().clone()
    }

    /// Creates a sub-circuit paper dynamically and announces it.
    pub fn open_subcircuit(&self, name: &str) -> Arc<ScriptedPaper> {
        let paper = ScriptedPaper::new(name, self.log.clone());
        self.papers.lock().unwrap().push(Arc::clone(&paper));
        self.bus
            .publish(CircuitEvent::PaperAdded(Arc::clone(&paper) as Arc<dyn Paper>));
        paper
    }

    /// Destroys the paper with the given id and announces the removal.
    ///
    /// The removal notification is raised even for an unknown id, to model
    /// notifications arriving for papers already logically gone. Returns
    /// whether the paper was actually live.
    pub fn close_paper(&self, id: PaperId) -> bool {
        let mut papers = self.papers.lock().unwrap();
        let before = papers.len();
        papers.retain(|p| p.id() != id);
        let was_live = papers.len() != before;
        drop(papers);
        log::debug!("Closing paper {id} (was live: {was_live}).");
        self.bus.publish(CircuitEvent::PaperRemoved(id));
        was_live
    }

    /// Advances the recorded-time clock by `ticks`, as if the run loop had
    /// recorded more signal history.
    pub fn advance_time(&self, ticks: f64) {
        *self.recorded_time.lock().unwrap() += ticks;
    }

    /// The current recorded-time clock value.
    #[must_use]
    pub fn recorded_time(&self) -> f64 {
        *self.recorded_time.lock().unwrap()
    }

    pub(crate) fn clock(&self) -> Arc<Mutex<f64>> {
        Arc::clone(&self.recorded_time)
    }

    fn start_impl(&self) {
        self.log.record("circuit.start");
        if !self.running.swap(true, Ordering::SeqCst) {
            log::debug!("Scripted run loop started.");
            self.bus.publish(CircuitEvent::RunningChanged(true));
        }
    }

    fn stop_impl(&self) {
        self.log.record("circuit.stop");
        if self.running.swap(false, Ordering::SeqCst) {
            log::debug!("Scripted run loop stopped.");
            self.bus.publish(CircuitEvent::RunningChanged(false));
        }
    }

    fn serialize_impl(&self, include_layout: bool) -> Description {
        let mut document = self.topology.clone();
        if include_layout {
            let layout = self.layout.clone().unwrap_or_else(default_layout);
            if let Some(object) = document.as_object_mut() {
                object.insert("layout".to_string(), layout);
            }
        }
        Description::new(document)
    }

    fn display_impl(&self) -> Arc<ScriptedPaper> {
        let primary = ScriptedPaper::new("paper", self.log.clone());
        self.papers.lock().unwrap().push(Arc::clone(&primary));
        self.bus
            .publish(CircuitEvent::PaperAdded(Arc::clone(&primary) as Arc<dyn Paper>));
        for name in &self.subcircuits {
            self.open_subcircuit(name);
        }
        primary
    }
}

/// A cloneable handle to a [`ScriptedCircuit`].
///
/// The engine hands one copy to the session controller (as
/// `Box<dyn Circuit>`) and keeps another so tests can drive the circuit
/// from outside: open/close papers, advance the clock, check run state.
#[derive(Clone)]
pub struct ScriptedCircuitHandle(Arc<ScriptedCircuit>);

impl Deref for ScriptedCircuitHandle {
    type Target = ScriptedCircuit;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Circuit for ScriptedCircuitHandle {
    fn start(&self) {
        self.0.start_impl();
    }

    fn stop(&self) {
        self.0.stop_impl();
    }

    fn running(&self) -> bool {
        self.0.running()
    }

    fn serialize(&self, include_layout: bool) -> Result<Description, EngineError> {
        Ok(self.0.serialize_impl(include_layout))
    }

    fn events(&self) -> flume::Receiver<CircuitEvent> {
        self.0.bus.subscribe()
    }

    fn display(&self) -> Result<Arc<dyn Paper>, EngineError> {
        Ok(self.0.display_impl())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A scripted signal-trace recorder: it only shares the circuit's clock.
pub struct ScriptedMonitor {
    recorded_time: Arc<Mutex<f64>>,
}

impl Monitor for ScriptedMonitor {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A scripted implementation of the engine contract.
///
/// The engine keeps handles to the components it builds so tests can
/// inspect them after handing the session layer its boxed copies, and
/// supports injecting construction failures.
#[derive(Default)]
pub struct ScriptedEngine {
    log: ActionLog,
    circuit: Mutex<Option<ScriptedCircuitHandle>>,
    monitor_view: Mutex<Option<Arc<ScriptedMonitorView>>>,
    io_panel: Mutex<Option<Arc<ScriptedIoPanel>>>,
    fail_monitor_view: AtomicBool,
    fail_io_panel: AtomicBool,
}

impl ScriptedEngine {
    /// Creates an engine with an empty action log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared action log all built components report into.
    #[must_use]
    pub fn log(&self) -> ActionLog {
        self.log.clone()
    }

    /// A handle to the most recently built circuit.
    #[must_use]
    pub fn circuit(&self) -> Option<ScriptedCircuitHandle> {
        self.circuit.lock().unwrap().clone()
    }

    /// The most recently built monitor view.
    #[must_use]
    pub fn monitor_view(&self) -> Option<Arc<ScriptedMonitorView>> {
        self.monitor_view.lock().unwrap().clone()
    }

    /// The most recently built I/O panel.
    #[must_use]
    pub fn io_panel(&self) -> Option<Arc<ScriptedIoPanel>> {
        self.io_panel.lock().unwrap().clone()
    }

    /// Makes the next (and every subsequent) monitor-view build fail.
    pub fn fail_monitor_view(&self, fail: bool) {
        self.fail_monitor_view.store(fail, Ordering::SeqCst);
    }

    /// Makes the next (and every subsequent) I/O-panel build fail.
    pub fn fail_io_panel(&self, fail: bool) {
        self.fail_io_panel.store(fail, Ordering::SeqCst);
    }
}

impl CircuitEngine for ScriptedEngine {
    fn build_circuit(&self, description: &Description) -> Result<Box<dyn Circuit>, EngineError> {
        let circuit = ScriptedCircuit::from_description(description, self.log.clone())?;
        log::debug!(
            "Built scripted circuit ({} sub-circuit(s)).",
            circuit.subcircuits.len()
        );
        let handle = ScriptedCircuitHandle(Arc::new(circuit));
        *self.circuit.lock().unwrap() = Some(handle.clone());
        Ok(Box::new(handle))
    }

    fn build_monitor(&self, circuit: &dyn Circuit) -> Result<Box<dyn Monitor>, EngineError> {
        let Some(handle) = circuit.as_any().downcast_ref::<ScriptedCircuitHandle>() else {
            return Err(EngineError::ConstructionFailed {
                component: "monitor".to_string(),
                details: "foreign circuit type".to_string(),
            });
        };
        Ok(Box::new(ScriptedMonitor {
            recorded_time: handle.clock(),
        }))
    }

    fn build_monitor_view(
        &self,
        monitor: &dyn Monitor,
    ) -> Result<Arc<dyn MonitorView>, EngineError> {
        if self.fail_monitor_view.load(Ordering::SeqCst) {
            return Err(EngineError::ConstructionFailed {
                component: "monitor view".to_string(),
                details: "injected failure".to_string(),
            });
        }
        let Some(monitor) = monitor.as_any().downcast_ref::<ScriptedMonitor>() else {
            return Err(EngineError::ConstructionFailed {
                component: "monitor view".to_string(),
                details: "foreign monitor type".to_string(),
            });
        };
        let view = ScriptedMonitorView::new(Arc::clone(&monitor.recorded_time), self.log.clone());
        *self.monitor_view.lock().unwrap() = Some(Arc::clone(&view));
        Ok(view)
    }

    fn build_io_panel(&self, _circuit: &dyn Circuit) -> Result<Box<dyn IoPanelView>, EngineError> {
        if self.fail_io_panel.load(Ordering::SeqCst) {
            return Err(EngineError::ConstructionFailed {
                component: "io panel".to_string(),
                details: "injected failure".to_string(),
            });
        }
        let panel = ScriptedIoPanel::new(self.log.clone());
        *self.io_panel.lock().unwrap() = Some(Arc::clone(&panel));
        Ok(panel.boxed())
    }
}
