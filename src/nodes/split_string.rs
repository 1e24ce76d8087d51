//! Split a string into up to four parts.

use super::{InputSpec, Inputs, Node, NodeError, NodeSchema, OutputSpec, PIXIT_CATEGORY};
use crate::value::{SlotType, Value};

/// Help link emitted on the `show_help` output.
pub const SPLIT_STRING_HELP: &str =
    "https://github.com/Suzie1/ComfyUI_Comfyroll_CustomNodes/wiki/Other-Nodes#cr-split-string";

/// Splits text on a delimiter into four `Any`-typed outputs.
#[derive(Debug, Default)]
pub struct SplitString;

impl SplitString {
    /// First four trimmed parts, padded with empty strings.
    ///
    /// Parts past the fourth are dropped, not folded into the last output.
    pub fn split(&self, text: &str, delimiter: &str) -> Result<[String; 4], NodeError> {
        if delimiter.is_empty() {
            return Err(NodeError::InvalidInput {
                name: "delimiter".into(),
                reason: "empty separator".into(),
            });
        }
        let mut parts = text.split(delimiter).map(|p| p.trim().to_string());
        Ok(std::array::from_fn(|_| parts.next().unwrap_or_default()))
    }
}

impl Node for SplitString {
    fn schema(&self) -> NodeSchema {
        NodeSchema {
            required: vec![InputSpec::string("text", "text")],
            optional: vec![InputSpec::string("delimiter", ",")],
            outputs: vec![
                OutputSpec::named(SlotType::Any, "string_1"),
                OutputSpec::named(SlotType::Any, "string_2"),
                OutputSpec::named(SlotType::Any, "string_3"),
                OutputSpec::named(SlotType::Any, "string_4"),
                OutputSpec::named(SlotType::String, "show_help"),
            ],
            category: Some(PIXIT_CATEGORY),
            output_node: false,
        }
    }

    fn execute(&self, inputs: &Inputs) -> Result<Vec<Value>, NodeError> {
        let text = inputs.get_str("text")?;
        let delimiter = inputs.get_str_or("delimiter", ",")?;
        let mut out: Vec<Value> = self
            .split(text, delimiter)?
            .into_iter()
            .map(Value::String)
            .collect();
        out.push(Value::from(SPLIT_STRING_HELP));
        Ok(out)
    }
}
