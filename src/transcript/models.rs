use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Raw transcript entry as the backend delivers it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// One timed transcript line with its expected translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    pub source_text: String,
    pub translated_text: String,
    /// Offset of the spoken line from the start of playback, in seconds.
    pub start: f64,
    /// Spoken length of the line, in seconds.
    pub duration: f64,
}

/// Ordered, immutable line sequence for one loaded video. Index is line
/// number; insertion order is playback order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    video_id: String,
    lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn new(video_id: impl Into<String>, lines: Vec<TranscriptLine>) -> Self {
        Self {
            video_id: video_id.into(),
            lines,
        }
    }

    /// Zip the backend's parallel snippet/translation sequences, where
    /// `translations[i]` is the expected answer for `snippets[i]`.
    pub fn from_parallel(
        video_id: impl Into<String>,
        snippets: Vec<Snippet>,
        translations: Vec<String>,
    ) -> Result<Self> {
        if snippets.len() != translations.len() {
            bail!(
                "transcript has {} snippets but {} translations",
                snippets.len(),
                translations.len()
            );
        }

        let lines = snippets
            .into_iter()
            .zip(translations)
            .map(|(snippet, translated_text)| TranscriptLine {
                source_text: snippet.text,
                translated_text,
                start: snippet.start,
                duration: snippet.duration,
            })
            .collect();

        Ok(Self::new(video_id, lines))
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&TranscriptLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(text: &str, start: f64, duration: f64) -> Snippet {
        Snippet {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn zips_parallel_sequences_in_order() {
        let transcript = Transcript::from_parallel(
            "abc123",
            vec![snippet("hola", 0.0, 2.0), snippet("adiós", 2.0, 1.5)],
            vec!["hello".to_string(), "goodbye".to_string()],
        )
        .unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.line(0).unwrap().source_text, "hola");
        assert_eq!(transcript.line(0).unwrap().translated_text, "hello");
        assert_eq!(transcript.line(1).unwrap().translated_text, "goodbye");
        assert_eq!(transcript.video_id(), "abc123");
    }

    #[test]
    fn rejects_mismatched_sequence_lengths() {
        let result = Transcript::from_parallel(
            "abc123",
            vec![snippet("hola", 0.0, 2.0)],
            vec!["hello".to_string(), "extra".to_string()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_transcript_is_valid() {
        let transcript = Transcript::from_parallel("abc123", Vec::new(), Vec::new()).unwrap();
        assert!(transcript.is_empty());
        assert!(transcript.line(0).is_none());
    }
}
