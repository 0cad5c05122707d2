use crate::logging::{get_correlation_id, new_correlation_id, PipelineSpan};
use crate::pipeline::{BoxedStage, PipelineOutcome, PipelineStage, StageData, StageTime};
use crate::Result;
use anyhow::Context;
use std::time::Instant;
use tracing::{debug, error, info};

/// Builder for creating image processing pipelines
pub struct PipelineBuilder {
    stages: Vec<BoxedStage>,
    name: String,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            stages: Vec::new(),
            name: name.into(),
        }
    }

    /// Add a stage to the pipeline
    pub fn add_stage<S>(mut self, stage: S) -> Self
    where
        S: PipelineStage<Input = StageData, Output = StageData> + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
            name: self.name,
        }
    }
}

/// Executable pipeline: runs its stages in insertion order, each consuming
/// the previous stage's output.
pub struct Pipeline {
    stages: Vec<BoxedStage>,
    name: String,
}

impl Pipeline {
    /// Execute the pipeline with the given input
    pub fn execute(&self, input: StageData) -> Result<PipelineOutcome> {
        let correlation_id = get_correlation_id().unwrap_or_else(new_correlation_id);

        info!(
            pipeline = %self.name,
            total_stages = self.stages.len(),
            correlation_id = %correlation_id,
            "Starting pipeline execution"
        );

        let mut stage_timings = Vec::with_capacity(self.stages.len());
        let mut current = input;

        for (idx, stage) in self.stages.iter().enumerate() {
            let stage_name = stage.stage_name().to_string();

            let pipeline_span = PipelineSpan::new(&stage_name, Some(correlation_id));
            let _span_guard = pipeline_span.enter();
            pipeline_span.record_input(current.kind(), current.dimensions());

            debug!(
                stage = %stage_name,
                stage_index = idx,
                input_type = %current.describe(),
                "Executing pipeline stage"
            );

            let start = Instant::now();
            match stage.execute(current) {
                Ok(output) => {
                    let duration = start.elapsed().as_secs_f64() * 1000.0;
                    let output_description = output.describe();
                    pipeline_span.record_completion(&output_description, true);

                    info!(
                        stage = %stage_name,
                        duration_ms = duration,
                        output_type = %output_description,
                        "Pipeline stage completed successfully"
                    );

                    stage_timings.push(StageTime {
                        stage_name,
                        duration_ms: duration,
                    });
                    current = output;
                }
                Err(e) => {
                    let duration = start.elapsed().as_secs_f64() * 1000.0;
                    pipeline_span.record_completion("error", false);

                    error!(
                        stage = %stage_name,
                        duration_ms = duration,
                        error = %e,
                        "Pipeline stage failed"
                    );

                    return Err(e).with_context(|| {
                        format!("pipeline '{}' failed in stage {stage_name}", self.name)
                    });
                }
            }
        }

        let total_duration: f64 = stage_timings.iter().map(|t| t.duration_ms).sum();
        info!(
            pipeline = %self.name,
            total_duration_ms = total_duration,
            stages_executed = stage_timings.len(),
            correlation_id = %correlation_id,
            "Pipeline execution completed successfully"
        );

        Ok(PipelineOutcome {
            output: current,
            stage_timings,
        })
    }

    /// Get number of stages
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.stage_name()).collect()
    }
}
