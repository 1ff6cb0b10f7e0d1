//! Concrete collaborators for the Jester pipeline.
//!
//! Each type here implements one of the `jester_interface` traits over HTTP:
//!
//! - [`Trends24Source`] scrapes trending hashtags
//! - [`HuggingFaceProvider`] generates joke text and meme images
//! - [`ImgurHost`] hosts generated images
//! - [`TwitterPublisher`] posts the result, authorized by a [`RequestSigner`]
//!
//! Response parsing is kept in free functions so it can be tested without a
//! network.
//!
//! [`RequestSigner`]: jester_interface::RequestSigner

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod http;
mod huggingface;
mod imgur;
mod trends;
mod twitter;

pub use http::{HttpClient, build_client};
pub use huggingface::{
    DEFAULT_HF_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, HuggingFaceProvider,
};
pub use imgur::{DEFAULT_IMGUR_URL, ImgurHost, parse_imgur_response};
pub use trends::{DEFAULT_TRENDS_URL, Trends24Source, parse_trending_hashtags};
pub use twitter::{
    BearerSigner, DEFAULT_TWEETS_URL, OAuth1Credentials, OAuth1Signer, TwitterPublisher,
    parse_tweet_response,
};
