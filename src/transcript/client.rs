use anyhow::{bail, Context, Result};
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::models::{Snippet, Transcript};

/// Request body for the transcript service.
#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    url: &'a str,
    from_lang: &'a str,
    to_lang: &'a str,
}

/// Response body: `translated_snippets[i]` is the expected answer for
/// `snippets[i]`.
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    video_id: String,
    snippets: Vec<Snippet>,
    translated_snippets: Vec<String>,
}

/// Thin client for the transcription/translation backend.
///
/// The backend owns URL-to-video-id resolution and language handling;
/// language codes pass through unvalidated. Nothing is retried here, and a
/// failed fetch leaves no session state behind.
pub struct TranscriptClient {
    http: Client,
    base_url: String,
}

impl TranscriptClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the timed transcript and its translations for a video URL.
    pub async fn fetch(&self, url: &str, from_lang: &str, to_lang: &str) -> Result<Transcript> {
        let endpoint = format!("{}/api/transcript", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&endpoint)
            .json(&TranscriptRequest {
                url,
                from_lang,
                to_lang,
            })
            .send()
            .await
            .context("failed to reach the transcript backend")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("transcript backend returned {status}: {body}");
        }

        let payload: TranscriptResponse = response
            .json()
            .await
            .context("failed to decode the transcript response")?;

        info!(
            "fetched {} lines for video {}",
            payload.snippets.len(),
            payload.video_id
        );

        Transcript::from_parallel(
            payload.video_id,
            payload.snippets,
            payload.translated_snippets,
        )
    }
}
