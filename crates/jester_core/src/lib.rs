//! Core data types for the Jester pipeline.
//!
//! Every value a run produces lives here: the resolved [`Topic`], the
//! [`GeneratedText`] and [`GeneratedImage`] wrapped in [`FallbackValue`],
//! the [`HostedImageUrl`], the composed [`PublishPayload`] and the final
//! [`ResultReport`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fallback;
mod image;
mod payload;
mod report;
mod text;
mod topic;

pub use fallback::{FallbackValue, ValueSource};
pub use image::{GeneratedImage, HostedImageUrl};
pub use payload::PublishPayload;
pub use report::{ImageSource, PublishConfirmation, ResultReport, RunOutcome};
pub use text::{GeneratedText, extract_generated_text, fallback_text, truncate_chars};
pub use topic::Topic;
