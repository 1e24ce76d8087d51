//! Mask emptiness test.

use super::{InputSpec, Inputs, Node, NodeError, NodeSchema, OutputSpec, PIXIT_CATEGORY};
use crate::value::{Mask, SlotType, Value};
use tracing::debug;

/// Reports whether every element of a mask is zero.
#[derive(Debug, Default)]
pub struct CheckTensorAllZeros;

impl CheckTensorAllZeros {
    /// `-0.0` counts as zero, NaN does not. An empty mask is all zeros.
    pub fn check_zeros(&self, mask: &Mask) -> bool {
        debug!(shape = ?mask.shape(), "checking mask for all zeros");
        mask.iter().all(|&v| v == 0.0)
    }
}

impl Node for CheckTensorAllZeros {
    fn schema(&self) -> NodeSchema {
        NodeSchema {
            required: vec![InputSpec::new("mask", SlotType::Mask)],
            optional: Vec::new(),
            outputs: vec![OutputSpec::new(SlotType::Boolean)],
            category: Some(PIXIT_CATEGORY),
            output_node: false,
        }
    }

    fn execute(&self, inputs: &Inputs) -> Result<Vec<Value>, NodeError> {
        let mask = inputs.get_mask("mask")?;
        Ok(vec![Value::Boolean(self.check_zeros(mask))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn zero_mask_is_all_zeros() {
        let mask = ArrayD::<f32>::zeros(IxDyn(&[1, 4, 4]));
        assert!(CheckTensorAllZeros.check_zeros(&mask));
    }

    #[test]
    fn single_nonzero_element_fails() {
        let mut mask = ArrayD::<f32>::zeros(IxDyn(&[1, 4, 4]));
        mask[&[0, 3, 2][..]] = 0.01;
        assert!(!CheckTensorAllZeros.check_zeros(&mask));
    }

    #[test]
    fn negative_zero_counts_as_zero() {
        let mask = ArrayD::from_elem(IxDyn(&[2]), -0.0f32);
        assert!(CheckTensorAllZeros.check_zeros(&mask));
    }

    #[test]
    fn nan_is_not_zero() {
        let mask = ArrayD::from_elem(IxDyn(&[1]), f32::NAN);
        assert!(!CheckTensorAllZeros.check_zeros(&mask));
    }

    #[test]
    fn empty_mask_is_all_zeros() {
        let mask = ArrayD::<f32>::zeros(IxDyn(&[0, 8]));
        assert!(CheckTensorAllZeros.check_zeros(&mask));
    }

    #[test]
    fn execute_returns_boolean() {
        let inputs = Inputs::new().with(
            "mask",
            Value::Mask(ArrayD::from_elem(IxDyn(&[2, 2]), 1.0)),
        );
        assert_eq!(
            CheckTensorAllZeros.execute(&inputs).unwrap(),
            vec![Value::Boolean(false)]
        );
    }
}
