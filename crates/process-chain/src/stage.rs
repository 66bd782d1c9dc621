//! Stage descriptors for external geoprocessing module invocations.
//!
//! A stage names one module call together with its inputs, outputs and
//! flags. Use the builder methods to construct one:
//!
//! ```rust
//! use process_chain::Stage;
//!
//! let stage = Stage::new("r_stats_4", "r.stats")
//!     .input("input", "landuse96_28m@PERMANENT")
//!     .input("separator", "|")
//!     .output("output", "/tmp/stats_result")
//!     .flags("acpl")
//!     .superquiet();
//!
//! assert_eq!(stage.input_value("separator"), Some("|"));
//! ```

use serde::{Deserialize, Serialize};

/// A named module parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub param: String,
    pub value: String,
}

impl Parameter {
    pub fn new(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            value: value.into(),
        }
    }
}

/// Structured capture of a module's standard output.
///
/// Declared on stages whose result is printed rather than written to a
/// file; the engine splits the captured text per `format`/`delimiter` and
/// stores it under `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdoutCapture {
    pub id: String,
    pub format: String,
    pub delimiter: String,
}

/// A single external tool invocation inside a process chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Identifier unique within the chain.
    pub id: String,

    /// Module name, e.g. "g.region" or "t.rast.sample".
    pub module: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Parameter>,

    /// Single-letter module flags, concatenated (e.g. "acpl").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,

    /// Suppress all module console output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub superquiet: bool,

    /// Allow the module to replace an existing output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub overwrite: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<StdoutCapture>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Stage {
    pub fn new(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            module: module.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            flags: None,
            superquiet: false,
            overwrite: false,
            stdout: None,
        }
    }

    /// Add a named input parameter.
    pub fn input(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.push(Parameter::new(param, value));
        self
    }

    /// Add a named output parameter (a created map name or a file path).
    pub fn output(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.push(Parameter::new(param, value));
        self
    }

    /// Set the module flag string.
    pub fn flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    /// Run the module with all console output suppressed.
    pub fn superquiet(mut self) -> Self {
        self.superquiet = true;
        self
    }

    /// Let the module overwrite existing outputs.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Capture the module's standard output as a structured result.
    pub fn capture_stdout(
        mut self,
        id: impl Into<String>,
        format: impl Into<String>,
        delimiter: impl Into<String>,
    ) -> Self {
        self.stdout = Some(StdoutCapture {
            id: id.into(),
            format: format.into(),
            delimiter: delimiter.into(),
        });
        self
    }

    /// Look up an input parameter value by name.
    pub fn input_value(&self, param: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|p| p.param == param)
            .map(|p| p.value.as_str())
    }

    /// Look up an output parameter value by name.
    pub fn output_value(&self, param: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|p| p.param == param)
            .map(|p| p.value.as_str())
    }
}
