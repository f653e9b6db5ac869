use log::warn;
use serde::Serialize;

use crate::transcript::TranscriptLine;

/// Authoritative pause point for one transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBoundary {
    pub line_index: usize,
    /// Playback timestamp, in seconds, at which the line counts as finished.
    pub effective_end: f64,
}

/// Convert raw line timings into one pause boundary per line.
///
/// When a line's naive end (`start + duration`) runs past the next line's
/// start, the boundary is pulled back to `next.start - lead_in_secs` so
/// playback pauses just before the next line's speech begins. Otherwise the
/// naive end is used, clamped to the total playback length so the final
/// boundary stays reachable.
pub fn resolve_boundaries(
    lines: &[TranscriptLine],
    total_duration: f64,
    lead_in_secs: f64,
) -> Vec<ResolvedBoundary> {
    let mut boundaries = Vec::with_capacity(lines.len());

    for (line_index, line) in lines.iter().enumerate() {
        let naive_end = line.start + line.duration;
        let effective_end = match lines.get(line_index + 1) {
            Some(next) if naive_end > next.start => next.start - lead_in_secs,
            _ => naive_end.min(total_duration),
        };

        if effective_end <= line.start {
            // Anomalous source timing; the line stays reachable and becomes
            // eligible for pause as soon as playback enters it.
            warn!(
                "line {line_index} has a degenerate boundary: effective end {effective_end:.3}s \
                 is not past its start {:.3}s",
                line.start
            );
        }

        boundaries.push(ResolvedBoundary {
            line_index,
            effective_end,
        });
    }

    boundaries
}
