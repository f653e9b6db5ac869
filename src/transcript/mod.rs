pub mod client;
pub mod models;

pub use client::TranscriptClient;
pub use models::{Snippet, Transcript, TranscriptLine};
