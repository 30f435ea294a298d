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

//! The engine's serialized circuit document.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// An opaque, structured circuit document understood by the engine's
/// deserializer.
///
/// The session layer never interprets the document beyond JSON
/// well-formedness: it is produced by [`Circuit::serialize`] and consumed by
/// [`CircuitEngine::build_circuit`], and compared for equality when
/// validating serialization round-trips.
///
/// [`Circuit::serialize`]: crate::engine::Circuit::serialize
/// [`CircuitEngine::build_circuit`]: crate::engine::CircuitEngine::build_circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(serde_json::Value);

impl Description {
    /// Wraps an already-parsed JSON value.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Reads and parses the description document at `path`.
    ///
    /// This is the initial-load path: a host fetches the well-known startup
    /// document and hands it to the session controller.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::DescriptionIo {
            path: path.display().to_string(),
            source_error: e.to_string(),
        })?;
        text.parse()
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the description, returning the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl FromStr for Description {
    type Err = EngineError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value =
            serde_json::from_str(text).map_err(|e| EngineError::MalformedDescription {
                details: e.to_string(),
            })?;
        Ok(Self(value))
    }
}

impl fmt::Display for Description {
    /// Renders the document as JSON; the alternate flag (`{:#}`)
    /// pretty-prints it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn parses_well_formed_json() {
        let description: Description = r#"{"devices": {}, "connectors": []}"#.parse().unwrap();
        assert_eq!(description.as_value()["connectors"], json!([]));
    }

    #[test]
    fn rejects_malformed_json() {
        let result: Result<Description, _> = "{not json".parse();
        assert!(matches!(
            result,
            Err(EngineError::MalformedDescription { .. })
        ));
    }

    #[test]
    fn equality_is_structural() {
        let a: Description = r#"{"devices": {"g1": "and"}}"#.parse().unwrap();
        let b = Description::new(json!({ "devices": { "g1": "and" } }));
        assert_eq!(a, b);
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"devices": {{}}}}"#).unwrap();

        let description = Description::from_path(file.path()).unwrap();
        assert_eq!(description.as_value()["devices"], json!({}));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = Description::from_path(Path::new("/nonexistent/circuit.json"));
        assert!(matches!(result, Err(EngineError::DescriptionIo { .. })));
    }
}
