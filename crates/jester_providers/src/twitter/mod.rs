//! Twitter publishing with pluggable request authorization.

mod publisher;
mod signer;

pub use publisher::{DEFAULT_TWEETS_URL, TwitterPublisher, parse_tweet_response};
pub use signer::{BearerSigner, OAuth1Credentials, OAuth1Signer};
