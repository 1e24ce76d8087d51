//! Values and slot types crossing the node boundary.
//!
//! The host wires node outputs to node inputs and hands each node a bag of
//! [`Value`]s. Nodes never see host types directly; everything arrives as one
//! of these tagged variants and is checked at runtime against the node's
//! declared [`SlotType`]s.

use ndarray::{Array4, ArrayD};
use serde::Serialize;
use std::fmt;

/// Mask tensor of any rank.
pub type Mask = ArrayD<f32>;

/// Image batch laid out as `(batch, height, width, channel)`, samples in `[0, 1]`.
pub type ImageBatch = Array4<f32>;

/// Declared type of an input or output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotType {
    Mask,
    Boolean,
    Int,
    String,
    Combo,
    Image,
    /// Polymorphic slot: connects to anything.
    #[serde(rename = "*")]
    Any,
}

impl SlotType {
    /// Whether a value of type `other` may be connected to this slot.
    pub fn accepts(self, other: SlotType) -> bool {
        self == other || self == SlotType::Any || other == SlotType::Any
    }

    /// Host-facing type name.
    pub fn name(self) -> &'static str {
        match self {
            SlotType::Mask => "MASK",
            SlotType::Boolean => "BOOLEAN",
            SlotType::Int => "INT",
            SlotType::String => "STRING",
            SlotType::Combo => "COMBO",
            SlotType::Image => "IMAGE",
            SlotType::Any => "*",
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value flowing into or out of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int(i64),
    String(String),
    Strings(Vec<String>),
    Mask(Mask),
    Images(ImageBatch),
}

impl Value {
    /// The slot type this value satisfies.
    ///
    /// Combo selections travel as plain strings, so a `String` value is also
    /// accepted by `Combo` slots (see [`Value::fits`]).
    pub fn slot_type(&self) -> SlotType {
        match self {
            Value::Boolean(_) => SlotType::Boolean,
            Value::Int(_) => SlotType::Int,
            Value::String(_) | Value::Strings(_) => SlotType::String,
            Value::Mask(_) => SlotType::Mask,
            Value::Images(_) => SlotType::Image,
        }
    }

    /// Whether this value can be fed to a slot declared as `slot`.
    pub fn fits(&self, slot: SlotType) -> bool {
        match (self, slot) {
            (Value::String(_), SlotType::Combo) => true,
            _ => slot.accepts(self.slot_type()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_accepts_everything_both_ways() {
        for t in [SlotType::Mask, SlotType::Int, SlotType::String, SlotType::Image] {
            assert!(SlotType::Any.accepts(t));
            assert!(t.accepts(SlotType::Any));
        }
    }

    #[test]
    fn distinct_concrete_types_do_not_connect() {
        assert!(!SlotType::String.accepts(SlotType::Int));
        assert!(!SlotType::Mask.accepts(SlotType::Image));
    }

    #[test]
    fn string_values_fit_combo_slots() {
        assert!(Value::from("png").fits(SlotType::Combo));
        assert!(!Value::Int(1).fits(SlotType::Combo));
    }

    #[test]
    fn string_list_reports_string_type() {
        assert_eq!(
            Value::Strings(vec!["a".into()]).slot_type(),
            SlotType::String
        );
    }

    #[test]
    fn slot_type_serializes_as_host_name() {
        assert_eq!(serde_json::to_string(&SlotType::Any).unwrap(), "\"*\"");
        assert_eq!(serde_json::to_string(&SlotType::Mask).unwrap(), "\"MASK\"");
    }
}
