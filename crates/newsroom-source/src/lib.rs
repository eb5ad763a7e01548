//! Feed polling for the newsroom broadcast.
//!
//! This crate sits on the collaborator side of the engine boundary: it
//! fetches the upstream feed on its own cadence and hands the newest item
//! into the engine's serialized poll channel. Polling never blocks frame
//! production.

mod error;
mod feed;
mod poller;

pub use error::SourceError;
pub use feed::{FeedSource, JsonFeedSource, ScriptedSource};
pub use poller::Poller;
