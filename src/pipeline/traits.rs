use crate::error::CrackError;

/// One step of the classification pipeline.
///
/// Stages are stateless with respect to a run: everything a stage needs
/// arrives in `input`, and the output is a new value owned by the caller.
pub trait PipelineStage: Send + Sync {
    type Input;
    type Output;

    /// Execute this stage of the pipeline
    fn execute(&self, input: Self::Input) -> Result<Self::Output, CrackError>;

    /// Get the name of this stage for logging/debugging
    fn stage_name(&self) -> &str;
}

/// Stage object as stored by the pipeline.
pub type BoxedStage = Box<
    dyn PipelineStage<Input = crate::pipeline::StageData, Output = crate::pipeline::StageData>,
>;
