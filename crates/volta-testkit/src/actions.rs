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

//! Shared ordered record of engine-side actions.

use std::sync::{Arc, Mutex};

/// An append-only, clone-shared list of action labels.
///
/// Every scripted component of an engine writes its externally visible
/// actions here (`circuit.start`, `monitor_view.shutdown`, ...), in call
/// order, so tests can assert lifecycle sequencing across components.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ActionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action label.
    pub fn record(&self, action: &str) {
        self.entries.lock().unwrap().push(action.to_string());
    }

    /// Returns a snapshot of all recorded actions, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Discards all recorded actions.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_across_clones() {
        let log = ActionLog::new();
        let clone = log.clone();
        log.record("first");
        clone.record("second");
        assert_eq!(log.entries(), vec!["first", "second"]);

        log.clear();
        assert!(clone.entries().is_empty());
    }
}
