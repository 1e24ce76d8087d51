//! Boolean string selector.

use super::{InputSpec, Inputs, Node, NodeError, NodeSchema, OutputSpec};
use crate::value::{SlotType, Value};

/// Selects one of two strings from a boolean.
#[derive(Debug, Default)]
pub struct SwitchBooleanString;

impl SwitchBooleanString {
    pub fn select_string<'a>(
        &self,
        boolean_condition: bool,
        string_if_true: &'a str,
        string_if_false: &'a str,
    ) -> &'a str {
        if boolean_condition {
            string_if_true
        } else {
            string_if_false
        }
    }
}

impl Node for SwitchBooleanString {
    fn schema(&self) -> NodeSchema {
        NodeSchema {
            required: vec![
                InputSpec::new("boolean_condition", SlotType::Boolean)
                    .with_default(Value::Boolean(true)),
                InputSpec::string("string_if_true", "").multiline(),
                InputSpec::string("string_if_false", "").multiline(),
            ],
            optional: Vec::new(),
            outputs: vec![OutputSpec::named(SlotType::String, "selected_string")],
            category: Some("Logic"),
            output_node: false,
        }
    }

    fn execute(&self, inputs: &Inputs) -> Result<Vec<Value>, NodeError> {
        let selected = self.select_string(
            inputs.get_bool("boolean_condition")?,
            inputs.get_str("string_if_true")?,
            inputs.get_str("string_if_false")?,
        );
        Ok(vec![Value::from(selected)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_by_condition() {
        assert_eq!(SwitchBooleanString.select_string(true, "yes", "no"), "yes");
        assert_eq!(SwitchBooleanString.select_string(false, "yes", "no"), "no");
    }

    #[test]
    fn condition_defaults_to_true() {
        let inputs = SwitchBooleanString
            .schema()
            .prepare(Inputs::new().with("string_if_true", "on").with("string_if_false", "off"))
            .unwrap();
        assert_eq!(
            SwitchBooleanString.execute(&inputs).unwrap(),
            vec![Value::from("on")]
        );
    }

    #[test]
    fn non_boolean_condition_is_rejected() {
        let inputs = Inputs::new()
            .with("boolean_condition", "true")
            .with("string_if_true", "a")
            .with("string_if_false", "b");
        assert!(matches!(
            SwitchBooleanString.execute(&inputs),
            Err(NodeError::TypeMismatch { .. })
        ));
    }
}
