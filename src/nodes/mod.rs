//! Node contract and the host integration layer.
//!
//! Every node is a self-contained unit implementing [`Node`]: it declares a
//! [`NodeSchema`] (input slots, output slots, category) and executes against a
//! bag of [`Inputs`]. Nodes share no state and never call each other; wiring
//! and execution order belong to the host's graph executor.
//!
//! ## Runtime validation
//!
//! Values reach nodes untyped (see [`Value`]). [`NodeSchema::prepare`] is the
//! single place that checks them: it fills defaults, rejects missing required
//! inputs, checks slot types (the `Any` slot matches everything), int ranges
//! and combo choices. [`registry::execute`] always runs it before a node.

mod check_zeros;
mod image_save;
pub mod registry;
mod split_string;
mod string_to_combo;
mod switch_string;

pub use check_zeros::CheckTensorAllZeros;
pub use image_save::{ImageSave, SaveOptions, json_prompt};
pub use split_string::{SPLIT_STRING_HELP, SplitString};
pub use string_to_combo::StringToCombo;
pub use switch_string::SwitchBooleanString;

use crate::value::{ImageBatch, Mask, SlotType, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Category shared by most Pixit nodes.
pub const PIXIT_CATEGORY: &str = "Pixit Custom Nodes";

#[derive(Error, Debug, PartialEq)]
pub enum NodeError {
    #[error("missing required input `{0}`")]
    MissingInput(String),
    #[error("input `{name}` expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: SlotType,
        actual: SlotType,
    },
    #[error("input `{name}` = {value} is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("input `{name}` = {value:?} is not one of {choices:?}")]
    InvalidChoice {
        name: String,
        value: String,
        choices: Vec<String>,
    },
    #[error("invalid input `{name}`: {reason}")]
    InvalidInput { name: String, reason: String },
    #[error("unknown node `{0}`")]
    UnknownNode(String),
}

/// A registered unit of computation.
pub trait Node: Send + Sync {
    /// Declared inputs, outputs and placement.
    fn schema(&self) -> NodeSchema;

    /// Run the node. Returns one value per declared output, or an empty
    /// vector when the node has no result to report.
    fn execute(&self, inputs: &Inputs) -> Result<Vec<Value>, NodeError>;
}

/// Declaration of one input slot.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub name: &'static str,
    pub slot: SlotType,
    pub default: Option<Value>,
    pub multiline: bool,
    /// `(min, max, step)` for `INT` slots.
    pub range: Option<(i64, i64, i64)>,
    /// Allowed values for `COMBO` slots; the first is the default.
    pub choices: Vec<&'static str>,
}

impl InputSpec {
    pub fn new(name: &'static str, slot: SlotType) -> Self {
        Self {
            name,
            slot,
            default: None,
            multiline: false,
            range: None,
            choices: Vec::new(),
        }
    }

    pub fn string(name: &'static str, default: &str) -> Self {
        Self::new(name, SlotType::String).with_default(Value::from(default))
    }

    pub fn int(name: &'static str, default: i64, min: i64, max: i64) -> Self {
        Self {
            range: Some((min, max, 1)),
            ..Self::new(name, SlotType::Int).with_default(Value::Int(default))
        }
    }

    pub fn combo(name: &'static str, choices: &[&'static str]) -> Self {
        Self {
            choices: choices.to_vec(),
            default: choices.first().map(|c| Value::from(*c)),
            ..Self::new(name, SlotType::Combo)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    fn check(&self, value: &Value) -> Result<(), NodeError> {
        if !value.fits(self.slot) {
            return Err(NodeError::TypeMismatch {
                name: self.name.to_string(),
                expected: self.slot,
                actual: value.slot_type(),
            });
        }
        if let (Some((min, max, _)), Some(v)) = (self.range, value.as_int()) {
            if v < min || v > max {
                return Err(NodeError::OutOfRange {
                    name: self.name.to_string(),
                    value: v,
                    min,
                    max,
                });
            }
        }
        if let (false, Some(s)) = (self.choices.is_empty(), value.as_str()) {
            if !self.choices.iter().any(|c| *c == s) {
                return Err(NodeError::InvalidChoice {
                    name: self.name.to_string(),
                    value: s.to_string(),
                    choices: self.choices.iter().map(|c| c.to_string()).collect(),
                });
            }
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        let mut opts = serde_json::Map::new();
        if let Some(default) = self.default.as_ref().and_then(default_json) {
            opts.insert("default".into(), default);
        }
        if self.multiline {
            opts.insert("multiline".into(), true.into());
        }
        if let Some((min, max, step)) = self.range {
            opts.insert("min".into(), min.into());
            opts.insert("max".into(), max.into());
            opts.insert("step".into(), step.into());
        }
        let head = if self.choices.is_empty() {
            serde_json::Value::from(self.slot.name())
        } else {
            serde_json::Value::from(self.choices.clone())
        };
        if opts.is_empty() {
            serde_json::json!([head])
        } else {
            serde_json::json!([head, opts])
        }
    }
}

fn default_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::Boolean(b) => Some((*b).into()),
        Value::Int(i) => Some((*i).into()),
        Value::String(s) => Some(s.as_str().into()),
        _ => None,
    }
}

/// Declaration of one output slot.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    pub slot: SlotType,
    pub name: Option<&'static str>,
}

impl OutputSpec {
    pub fn new(slot: SlotType) -> Self {
        Self { slot, name: None }
    }

    pub fn named(slot: SlotType, name: &'static str) -> Self {
        Self {
            slot,
            name: Some(name),
        }
    }
}

/// Everything the host needs to place a node and wire its slots.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    pub required: Vec<InputSpec>,
    pub optional: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
    /// `None` leaves placement to the host's default category.
    pub category: Option<&'static str>,
    /// Output nodes are executed for their side effects.
    pub output_node: bool,
}

impl NodeSchema {
    /// Validate raw host values and fill in defaults.
    ///
    /// Inputs the schema does not declare are passed through untouched.
    pub fn prepare(&self, mut inputs: Inputs) -> Result<Inputs, NodeError> {
        for spec in &self.required {
            match inputs.values.get(spec.name) {
                Some(value) => spec.check(value)?,
                None => match &spec.default {
                    Some(default) => inputs.insert(spec.name, default.clone()),
                    None => return Err(NodeError::MissingInput(spec.name.to_string())),
                },
            }
        }
        for spec in &self.optional {
            match inputs.values.get(spec.name) {
                Some(value) => spec.check(value)?,
                None => {
                    if let Some(default) = &spec.default {
                        inputs.insert(spec.name, default.clone());
                    }
                }
            }
        }
        Ok(inputs)
    }

    /// Host-style declaration: `INPUT_TYPES`, `RETURN_TYPES`, `RETURN_NAMES`,
    /// `CATEGORY` and `OUTPUT_NODE` as one JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let section = |specs: &[InputSpec]| {
            specs
                .iter()
                .map(|s| (s.name.to_string(), s.to_json()))
                .collect::<serde_json::Map<_, _>>()
        };
        let mut input_types = serde_json::Map::new();
        input_types.insert("required".into(), section(&self.required).into());
        if !self.optional.is_empty() {
            input_types.insert("optional".into(), section(&self.optional).into());
        }
        let mut out = serde_json::json!({
            "input_types": input_types,
            "return_types": self.outputs.iter().map(|o| o.slot.name()).collect::<Vec<_>>(),
            "output_node": self.output_node,
        });
        if self.outputs.iter().any(|o| o.name.is_some()) {
            out["return_names"] = self
                .outputs
                .iter()
                .map(|o| o.name.unwrap_or(""))
                .collect::<Vec<_>>()
                .into();
        }
        if let Some(category) = self.category {
            out["category"] = category.into();
        }
        out
    }
}

/// Input values keyed by slot name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: BTreeMap<String, Value>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&Value, NodeError> {
        self.get(name)
            .ok_or_else(|| NodeError::MissingInput(name.to_string()))
    }

    fn mismatch(name: &str, expected: SlotType, actual: &Value) -> NodeError {
        NodeError::TypeMismatch {
            name: name.to_string(),
            expected,
            actual: actual.slot_type(),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str, NodeError> {
        let value = self.require(name)?;
        value
            .as_str()
            .ok_or_else(|| Self::mismatch(name, SlotType::String, value))
    }

    /// String input that falls back to `default` when absent.
    pub fn get_str_or<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str, NodeError> {
        match self.get(name) {
            Some(_) => self.get_str(name),
            None => Ok(default),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, NodeError> {
        let value = self.require(name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, SlotType::Boolean, value))
    }

    pub fn get_int(&self, name: &str) -> Result<i64, NodeError> {
        let value = self.require(name)?;
        value
            .as_int()
            .ok_or_else(|| Self::mismatch(name, SlotType::Int, value))
    }

    pub fn get_mask(&self, name: &str) -> Result<&Mask, NodeError> {
        match self.require(name)? {
            Value::Mask(m) => Ok(m),
            other => Err(Self::mismatch(name, SlotType::Mask, other)),
        }
    }

    pub fn get_images(&self, name: &str) -> Result<&ImageBatch, NodeError> {
        match self.require(name)? {
            Value::Images(i) => Ok(i),
            other => Err(Self::mismatch(name, SlotType::Image, other)),
        }
    }
}

impl From<Vec<(&str, Value)>> for Inputs {
    fn from(pairs: Vec<(&str, Value)>) -> Self {
        let mut inputs = Inputs::new();
        for (name, value) in pairs {
            inputs.insert(name, value);
        }
        inputs
    }
}
