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

//! Scripted view components: papers, the monitor view and the I/O panel.

use crate::actions::ActionLog;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use volta_core::{DoubleClickObserver, IoPanelView, MonitorView, Paper, PaperId};

/// Zoom factor a fresh monitor view starts out with.
pub const DEFAULT_PIXELS_PER_TICK: f64 = 4.0;

/// Rendered pixel width of every scripted monitor view.
pub const DEFAULT_WIDTH: f64 = 800.0;

/// A scripted schematic paper: records its fixed flag and forwards
/// double-clicks to the installed observer.
pub struct ScriptedPaper {
    id: PaperId,
    label: String,
    fixed: AtomicBool,
    observer: Mutex<Option<DoubleClickObserver>>,
    log: ActionLog,
}

impl ScriptedPaper {
    /// Creates a paper labelled `label`, reporting actions into `log`.
    pub fn new(label: impl Into<String>, log: ActionLog) -> Arc<Self> {
        Arc::new(Self {
            id: PaperId::new(),
            label: label.into(),
            fixed: AtomicBool::new(false),
            observer: Mutex::new(None),
            log,
        })
    }

    /// The human-readable label this paper was created with.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The current fixed flag.
    #[must_use]
    pub fn fixed(&self) -> bool {
        self.fixed.load(Ordering::SeqCst)
    }

    /// Simulates a double-click on an element with the given backing model.
    pub fn double_click(&self, model: serde_json::Value) {
        self.log.record("paper.double_click");
        let observer = self.observer.lock().unwrap().clone();
        if let Some(observer) = observer {
            observer(model);
        }
    }
}

impl Paper for ScriptedPaper {
    fn id(&self) -> PaperId {
        self.id
    }

    fn set_fixed(&self, fixed: bool) {
        self.fixed.store(fixed, Ordering::SeqCst);
    }

    fn on_element_double_click(&self, observer: DoubleClickObserver) {
        *self.observer.lock().unwrap() = Some(observer);
    }
}

/// A scripted timeline view over the circuit's recorded-time clock.
///
/// While `live`, `start` reports the most recent recorded time (the strip's
/// right edge chases the clock). Leaving live mode pins `start` at the time
/// the view was showing when live-follow disengaged.
pub struct ScriptedMonitorView {
    pixels_per_tick: Mutex<f64>,
    live: AtomicBool,
    start: Mutex<f64>,
    width: f64,
    recorded_time: Arc<Mutex<f64>>,
    shutdown: AtomicBool,
    log: ActionLog,
}

impl ScriptedMonitorView {
    pub(crate) fn new(recorded_time: Arc<Mutex<f64>>, log: ActionLog) -> Arc<Self> {
        Arc::new(Self {
            pixels_per_tick: Mutex::new(DEFAULT_PIXELS_PER_TICK),
            live: AtomicBool::new(true),
            start: Mutex::new(0.0),
            width: DEFAULT_WIDTH,
            recorded_time,
            shutdown: AtomicBool::new(false),
            log,
        })
    }

    /// Creates a view with its own clock and log, for tests that need a
    /// monitor view without a whole engine behind it.
    #[must_use]
    pub fn standalone() -> Arc<Self> {
        Self::new(Arc::new(Mutex::new(0.0)), ActionLog::new())
    }

    /// Returns `true` once `shutdown` has been called.
    #[must_use]
    pub fn was_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl MonitorView for ScriptedMonitorView {
    fn pixels_per_tick(&self) -> f64 {
        *self.pixels_per_tick.lock().unwrap()
    }

    fn set_pixels_per_tick(&self, value: f64) {
        *self.pixels_per_tick.lock().unwrap() = value;
    }

    fn live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn set_live(&self, live: bool) {
        let was_live = self.live.swap(live, Ordering::SeqCst);
        if was_live && !live {
            // Pin the view where live-follow left it.
            *self.start.lock().unwrap() = *self.recorded_time.lock().unwrap();
        }
    }

    fn start(&self) -> f64 {
        if self.live() {
            *self.recorded_time.lock().unwrap()
        } else {
            *self.start.lock().unwrap()
        }
    }

    fn set_start(&self, start: f64) {
        *self.start.lock().unwrap() = start;
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn shutdown(&self) {
        self.log.record("monitor_view.shutdown");
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

/// A scripted input/output panel; only its disposal is observable.
pub struct ScriptedIoPanel {
    shutdown: AtomicBool,
    log: ActionLog,
}

impl ScriptedIoPanel {
    pub(crate) fn new(log: ActionLog) -> Arc<Self> {
        Arc::new(Self {
            shutdown: AtomicBool::new(false),
            log,
        })
    }

    /// Returns `true` once `shutdown` has been called.
    #[must_use]
    pub fn was_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub(crate) fn boxed(self: &Arc<Self>) -> Box<dyn IoPanelView> {
        Box::new(PanelHandle(Arc::clone(self)))
    }
}

struct PanelHandle(Arc<ScriptedIoPanel>);

impl IoPanelView for PanelHandle {
    fn shutdown(&self) {
        self.0.log.record("io_panel.shutdown");
        self.0.shutdown.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paper_reports_its_fixed_flag() {
        let paper = ScriptedPaper::new("main", ActionLog::new());
        assert!(!paper.fixed());
        paper.set_fixed(true);
        assert!(paper.fixed());
    }

    #[test]
    fn double_click_without_observer_is_quiet() {
        let paper = ScriptedPaper::new("main", ActionLog::new());
        paper.double_click(json!({ "type": "And" }));
    }

    #[test]
    fn double_click_reaches_the_latest_observer() {
        let paper = ScriptedPaper::new("main", ActionLog::new());
        let seen: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();

        let sink = Arc::clone(&seen);
        paper.on_element_double_click(Arc::new(move |model| {
            sink.lock().unwrap().push(model);
        }));
        paper.double_click(json!(1));

        assert_eq!(seen.lock().unwrap().clone(), vec![json!(1)]);
    }

    #[test]
    fn live_view_tracks_the_clock() {
        let clock = Arc::new(Mutex::new(0.0));
        let view = ScriptedMonitorView::new(Arc::clone(&clock), ActionLog::new());
        assert!(view.live());

        *clock.lock().unwrap() = 500.0;
        assert_eq!(view.start(), 500.0);
    }

    #[test]
    fn leaving_live_mode_pins_the_view() {
        let clock = Arc::new(Mutex::new(300.0));
        let view = ScriptedMonitorView::new(Arc::clone(&clock), ActionLog::new());

        view.set_live(false);
        *clock.lock().unwrap() = 900.0;
        assert_eq!(view.start(), 300.0);

        // Re-pinning only happens on a live -> manual transition.
        view.set_start(100.0);
        view.set_live(false);
        assert_eq!(view.start(), 100.0);
    }

    #[test]
    fn disposal_is_recorded() {
        let log = ActionLog::new();
        let view = ScriptedMonitorView::new(Arc::new(Mutex::new(0.0)), log.clone());
        let panel = ScriptedIoPanel::new(log.clone());

        view.shutdown();
        panel.boxed().shutdown();

        assert!(view.was_shutdown());
        assert!(panel.was_shutdown());
        assert_eq!(
            log.entries(),
            vec!["monitor_view.shutdown", "io_panel.shutdown"]
        );
    }
}
