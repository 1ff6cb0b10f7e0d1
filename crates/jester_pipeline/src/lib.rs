//! The degrade-don't-abort pipeline behind every Jester run.
//!
//! A run walks five stages strictly in order, each feeding the next:
//!
//! ```text
//! ResolveTopic → GenerateText → GenerateImage → UploadImage → Publish → Done
//!                                                                ↘ Aborted
//! ```
//!
//! The first four stages absorb any failure and resolve to a fallback (a
//! default topic, a template joke, no image). Publish is the only stage whose
//! failure aborts the run. See [`DegradingPipeline`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pipeline;
mod prompts;
mod stage;
mod stages;

pub use config::{ImageFallbackPolicy, PipelineConfig};
pub use pipeline::{DegradingPipeline, DegradingPipelineBuilder, PipelineState};
pub use prompts::render_prompt;
pub use stage::{Stage, StagePolicy, StageResolution, run_stage};
pub use stages::{
    GenerateImageStage, GenerateTextStage, PublishStage, ResolveTopicStage, UploadImageStage,
};
