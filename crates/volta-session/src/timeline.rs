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

//! Zoom and scroll control over the recorded-signal timeline.

use std::sync::{Arc, Weak};
use volta_core::MonitorView;

/// The paging step, as a fraction of the currently visible time span.
///
/// A quarter-width step leaves three quarters of the prior view visible
/// after each page, keeping consecutive pages visually continuous.
const PAGE_STEP_DIVISOR: f64 = 4.0;

/// Controls the zoom level and scroll/live-follow state of the monitor's
/// timeline view.
///
/// The controller holds only a weak handle to the session's monitor view.
/// Once the session is torn down every operation degrades to a no-op (and
/// reports it by returning `false`); a stale handle is never a fault.
#[derive(Default)]
pub struct TimelineController {
    view: Option<Weak<dyn MonitorView>>,
}

impl TimelineController {
    /// Creates a controller with no view attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the controller to a session's monitor view.
    pub fn attach(&mut self, view: Weak<dyn MonitorView>) {
        self.view = Some(view);
    }

    /// Detaches the controller; subsequent operations are no-ops.
    pub fn detach(&mut self) {
        self.view = None;
    }

    fn view(&self) -> Option<Arc<dyn MonitorView>> {
        self.view.as_ref()?.upgrade()
    }

    /// Doubles the zoom factor. Never touches `live` or `start`.
    pub fn zoom_in(&self) -> bool {
        self.rescale(2.0)
    }

    /// Halves the zoom factor. Never touches `live` or `start`.
    ///
    /// Repeated zoom operations compose multiplicatively; no clamp is
    /// imposed here (the rendering side may clamp).
    pub fn zoom_out(&self) -> bool {
        self.rescale(0.5)
    }

    /// Pages one quarter of the visible time span into the past.
    ///
    /// Paging always disengages live-follow, even if it was already off.
    pub fn page_left(&self) -> bool {
        self.page(-1.0)
    }

    /// Pages one quarter of the visible time span into the future.
    ///
    /// Paging always disengages live-follow, even if it was already off.
    pub fn page_right(&self) -> bool {
        self.page(1.0)
    }

    /// Re-engages live-follow: the view tracks the most recent recorded
    /// time, and this layer stops writing `start` until the next page.
    pub fn go_live(&self) -> bool {
        let Some(view) = self.view() else {
            return false;
        };
        view.set_live(true);
        true
    }

    fn rescale(&self, factor: f64) -> bool {
        let Some(view) = self.view() else {
            return false;
        };
        view.set_pixels_per_tick(view.pixels_per_tick() * factor);
        true
    }

    fn page(&self, direction: f64) -> bool {
        let Some(view) = self.view() else {
            return false;
        };
        view.set_live(false);
        let visible_span = view.width() / view.pixels_per_tick();
        view.set_start(view.start() + direction * visible_span / PAGE_STEP_DIVISOR);
        true
    }
}
