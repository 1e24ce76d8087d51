//! Delimited string → combo selection.

use super::{InputSpec, Inputs, Node, NodeError, NodeSchema, OutputSpec, PIXIT_CATEGORY};
use crate::value::{SlotType, Value};

/// Picks the first entry of a comma-separated option list.
#[derive(Debug, Default)]
pub struct StringToCombo;

impl StringToCombo {
    pub fn string_to_combo(&self, input_string: &str) -> String {
        input_string
            .split(',')
            .map(str::trim)
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

impl Node for StringToCombo {
    fn schema(&self) -> NodeSchema {
        NodeSchema {
            required: vec![InputSpec::string("input_string", "Option1, Option2, Option3")],
            optional: Vec::new(),
            outputs: vec![OutputSpec::new(SlotType::Combo)],
            category: Some(PIXIT_CATEGORY),
            output_node: false,
        }
    }

    fn execute(&self, inputs: &Inputs) -> Result<Vec<Value>, NodeError> {
        let input = inputs.get_str("input_string")?;
        Ok(vec![Value::String(self.string_to_combo(input))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_trimmed_option() {
        assert_eq!(
            StringToCombo.string_to_combo("  Option1 , Option2, Option3"),
            "Option1"
        );
    }

    #[test]
    fn no_delimiter_returns_whole_trimmed_input() {
        assert_eq!(StringToCombo.string_to_combo(" solo "), "solo");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(StringToCombo.string_to_combo(""), "");
    }

    #[test]
    fn leading_comma_returns_empty_first_option() {
        assert_eq!(StringToCombo.string_to_combo(",b"), "");
    }

    #[test]
    fn default_input_selects_option1() {
        let schema = StringToCombo.schema();
        let inputs = schema.prepare(Inputs::new()).unwrap();
        assert_eq!(
            StringToCombo.execute(&inputs).unwrap(),
            vec![Value::from("Option1")]
        );
    }
}
