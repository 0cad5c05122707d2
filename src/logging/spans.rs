//! Structured spans for pipeline stages
//!
//! Every stage runs inside a `pipeline_stage` span carrying the stage name and
//! the run's correlation id, so file logs can be grouped per image.

use std::time::Instant;
use tracing::{field, span, Level, Span};
use uuid::Uuid;

pub struct PipelineSpan {
    span: Span,
    start_time: Instant,
    stage_name: String,
}

impl PipelineSpan {
    /// Create a new pipeline stage span
    pub fn new(stage_name: &str, correlation_id: Option<Uuid>) -> Self {
        let span = span!(
            Level::INFO,
            "pipeline_stage",
            stage = stage_name,
            correlation_id = field::Empty,
            input_type = field::Empty,
            input_width = field::Empty,
            input_height = field::Empty,
            output_type = field::Empty,
            success = field::Empty,
            execution_time_ms = field::Empty,
        );
        if let Some(corr_id) = correlation_id {
            span.record("correlation_id", field::display(corr_id));
        }

        Self {
            span,
            start_time: Instant::now(),
            stage_name: stage_name.to_string(),
        }
    }

    /// Record stage input metadata
    pub fn record_input(&self, input_type: &str, input_size: Option<(usize, usize)>) {
        self.span.record("input_type", input_type);
        if let Some((width, height)) = input_size {
            self.span.record("input_width", width as u64);
            self.span.record("input_height", height as u64);
        }
        tracing::debug!(
            parent: &self.span,
            input_type = input_type,
            input_width = input_size.map(|(w, _)| w as u64),
            input_height = input_size.map(|(_, h)| h as u64),
            "Pipeline stage input recorded"
        );
    }

    /// Record stage completion
    pub fn record_completion(&self, output_type: &str, success: bool) {
        let elapsed_ms = self.elapsed_ms();
        self.span.record("output_type", output_type);
        self.span.record("success", success);
        self.span.record("execution_time_ms", elapsed_ms);

        if success {
            tracing::info!(
                parent: &self.span,
                output_type = output_type,
                execution_time_ms = elapsed_ms,
                "Pipeline stage completed"
            );
        } else {
            tracing::warn!(
                parent: &self.span,
                stage = %self.stage_name,
                execution_time_ms = elapsed_ms,
                "Pipeline stage failed"
            );
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }

    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Enter the span
    pub fn enter(&self) -> span::Entered<'_> {
        self.span.enter()
    }
}
