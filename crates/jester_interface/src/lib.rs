//! Collaborator traits consumed by the Jester pipeline.
//!
//! The pipeline never talks to a network API directly. Each external system
//! sits behind one of these narrow traits so it can be swapped or mocked:
//!
//! - [`TrendSource`]: where topics come from
//! - [`GenerationProvider`]: text and image generation
//! - [`ImageHost`]: turns image bytes into a public URL
//! - [`Publisher`]: posts the final payload
//! - [`RequestSigner`]: authorization headers for the publisher

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{
    GenerationProvider, ImageHost, Publisher, RequestSigner, SignableRequest, TrendSource,
};
