//! References to maps inside a project's spatial database.

use serde::{Deserialize, Serialize};

/// A raster, vector or space-time dataset name qualified by its mapset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapRef {
    pub name: String,
    pub mapset: String,
}

impl MapRef {
    pub fn new(name: impl Into<String>, mapset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapset: mapset.into(),
        }
    }

    /// Fully qualified form understood by the processing modules.
    pub fn qualified(&self) -> String {
        format!("{}@{}", self.name, self.mapset)
    }

    /// Split a qualified name like "landuse96_28m@PERMANENT".
    pub fn parse(s: &str) -> (&str, Option<&str>) {
        match s.split_once('@') {
            Some((name, mapset)) => (name, Some(mapset)),
            None => (s, None),
        }
    }
}

impl std::fmt::Display for MapRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.mapset)
    }
}
