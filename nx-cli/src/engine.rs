//! Native ONNX execution through tract

use recognizer::{InferenceEngine, InputTensor};
use std::path::Path;
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

pub struct TractEngine;

impl InferenceEngine for TractEngine {
    type Session = Plan;
    type Error = TractError;

    fn load(&self, model_path: &Path) -> TractResult<Plan> {
        // Pin the dynamic batch axis to 1 so the graph can be optimized
        tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(0, f32::fact(InputTensor::SHAPE).into())?
            .into_optimized()?
            .into_runnable()
    }

    fn run(&self, session: &Plan, input: &InputTensor) -> TractResult<Vec<f32>> {
        let tensor = Tensor::from_shape(&InputTensor::SHAPE, input.as_slice())?;
        let outputs = session.run(tvec!(tensor.into()))?;
        let scores = outputs[0].to_array_view::<f32>()?.iter().copied().collect();
        Ok(scores)
    }
}
