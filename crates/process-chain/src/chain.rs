//! Ordered chains of geoprocessing stages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::stage::Stage;

/// Wire format version understood by the processing engine.
pub const CHAIN_VERSION: &str = "1";

/// An ordered list of stages forming one linear pipeline.
///
/// Stage order is significant: later stages reference map and file names
/// produced by earlier ones. On the wire a chain is
/// `{"list": [<stages>], "version": "1"}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage, builder style.
    ///
    /// Stage ids must stay unique within the chain.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: Stage) {
        debug_assert!(
            !self.stages.iter().any(|s| s.id == stage.id),
            "duplicate stage id '{}'",
            stage.id
        );
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn first(&self) -> Option<&Stage> {
        self.stages.first()
    }

    pub fn last(&self) -> Option<&Stage> {
        self.stages.last()
    }

    /// Find a stage by its id.
    pub fn get(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// All stage ids in execution order.
    pub fn stage_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id.as_str()).collect()
    }
}

#[derive(Serialize)]
struct ChainWire<'a> {
    list: &'a [Stage],
    version: &'static str,
}

impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ChainWire {
            list: &self.stages,
            version: CHAIN_VERSION,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct ChainWireOwned {
    list: Vec<Stage>,
}

impl<'de> Deserialize<'de> for Chain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ChainWireOwned::deserialize(deserializer)?;
        Ok(Chain { stages: wire.list })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chain() -> Chain {
        Chain::new()
            .stage(
                Stage::new("v_import_1", "v.import")
                    .input("input", "/tmp/polygon.geojson")
                    .output("output", "polygon")
                    .superquiet(),
            )
            .stage(
                Stage::new("g_region_2", "g.region")
                    .input("vector", "polygon")
                    .input("align", "landuse96_28m@PERMANENT")
                    .flags("p")
                    .superquiet(),
            )
    }

    #[test]
    fn test_chain_preserves_stage_order() {
        let chain = sample_chain();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.stage_ids(), vec!["v_import_1", "g_region_2"]);
        assert_eq!(chain.first().unwrap().module, "v.import");
        assert_eq!(chain.last().unwrap().module, "g.region");
    }

    #[test]
    fn test_chain_lookup_by_id() {
        let chain = sample_chain();
        let region = chain.get("g_region_2").unwrap();
        assert_eq!(region.input_value("vector"), Some("polygon"));
        assert!(chain.get("missing").is_none());
    }

    #[test]
    fn test_chain_wire_serialization() {
        let chain = Chain::new().stage(
            Stage::new("r_mask_3", "r.mask")
                .input("vector", "polygon")
                .superquiet(),
        );

        let value = serde_json::to_value(&chain).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "list": [{
                    "id": "r_mask_3",
                    "module": "r.mask",
                    "inputs": [{"param": "vector", "value": "polygon"}],
                    "superquiet": true,
                }],
                "version": "1",
            })
        );
    }

    #[test]
    fn test_chain_round_trip() {
        let chain = sample_chain();
        let json = serde_json::to_string(&chain).unwrap();
        let parsed: Chain = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, chain);
    }

    #[test]
    #[should_panic(expected = "duplicate stage id")]
    fn test_duplicate_stage_id_panics_in_debug() {
        let _ = Chain::new()
            .stage(Stage::new("g_region_2", "g.region"))
            .stage(Stage::new("g_region_2", "g.region"));
    }
}
