use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use dictado::{
    AdvanceOutcome, AdvancePolicy, PlaybackClock, SessionConfig, SessionController,
    SimulatedClock, SubmitOutcome, SyncEvent, Transcript, TranscriptClient, TranscriptLine,
};

/// Practice translating a video line by line in the terminal.
///
/// Playback runs on a simulated clock; with a backend configured the
/// transcript comes from the transcript service, otherwise a built-in demo
/// transcript is used.
#[derive(Parser, Debug)]
#[command(name = "dictado", version, about)]
struct Args {
    /// Video URL to practice with (requires --backend).
    #[arg(long, requires = "backend")]
    url: Option<String>,

    /// Base URL of the transcript backend.
    #[arg(long)]
    backend: Option<String>,

    /// Language of the video's speech.
    #[arg(long, default_value = "en")]
    from_lang: String,

    /// Language to translate into.
    #[arg(long, default_value = "es")]
    to_lang: String,

    /// Resume as soon as an answer matches instead of waiting for Enter.
    #[arg(long)]
    advance_on_match: bool,
}

fn demo_transcript() -> Transcript {
    let lines = vec![
        TranscriptLine {
            source_text: "hola, ¿cómo estás?".to_string(),
            translated_text: "hello, how are you?".to_string(),
            start: 0.0,
            duration: 2.5,
        },
        TranscriptLine {
            source_text: "muy bien, gracias".to_string(),
            translated_text: "very well, thank you".to_string(),
            start: 3.0,
            duration: 2.0,
        },
        TranscriptLine {
            source_text: "hasta luego".to_string(),
            translated_text: "see you later".to_string(),
            start: 5.5,
            duration: 1.5,
        },
    ];
    Transcript::new("demo", lines)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let transcript = match (&args.backend, &args.url) {
        (Some(backend), Some(url)) => {
            TranscriptClient::new(backend.clone())
                .fetch(url, &args.from_lang, &args.to_lang)
                .await?
        }
        _ => demo_transcript(),
    };

    if transcript.is_empty() {
        println!("The transcript has no usable lines.");
        return Ok(());
    }

    let total_duration = transcript
        .lines()
        .last()
        .map(|line| line.start + line.duration)
        .unwrap_or(0.0)
        + 1.0;

    let config = SessionConfig {
        advance_policy: if args.advance_on_match {
            AdvancePolicy::AdvanceOnMatch
        } else {
            AdvancePolicy::ConfirmThenAdvance
        },
        ..SessionConfig::default()
    };

    let clock = Arc::new(SimulatedClock::new(total_duration));
    clock.resume().context("failed to start playback")?;

    let clock: Arc<dyn PlaybackClock> = clock;
    let (mut controller, mut events) = SessionController::start(transcript, clock, config)?;

    let line_count = controller.transcript().len();
    println!("Listening... translate each line when playback pauses.");

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    while let Some(event) = events.recv().await {
        match event {
            SyncEvent::LineReached { line_index } => {
                if practice_line(&mut controller, &mut input, line_index, line_count).await? {
                    println!("You finished the video!");
                    break;
                }
            }
            SyncEvent::SequenceComplete => {
                println!("You finished the video!");
                break;
            }
            SyncEvent::ClockLost => bail!("the playback clock went away"),
        }
    }

    controller.shutdown().await
}

/// Run the answer loop for one paused line. Returns `true` once the last
/// line has been committed.
async fn practice_line(
    controller: &mut SessionController,
    input: &mut Lines<BufReader<Stdin>>,
    line_index: usize,
    line_count: usize,
) -> Result<bool> {
    let Some(line) = controller.current_line().await else {
        return Ok(true);
    };

    println!();
    println!("Line {} of {}", line_index + 1, line_count);
    println!("  {}", line.source_text);
    println!("Type the translation:");

    loop {
        let Some(draft) = input.next_line().await.context("failed to read input")? else {
            // Stdin closed; treat it as the end of the session.
            return Ok(true);
        };

        match controller.submit_answer(&draft).await? {
            SubmitOutcome::Accepted { similarity } => {
                println!(
                    "Correct ({:.0}% match). Press Enter to continue.",
                    similarity * 100.0
                );
                let _ = input.next_line().await.context("failed to read input")?;
                break;
            }
            SubmitOutcome::AcceptedAndAdvanced { advance, .. } => {
                return Ok(advance == AdvanceOutcome::Completed);
            }
            SubmitOutcome::Rejected { similarity } => {
                println!("Not quite ({:.0}% match). Try again.", similarity * 100.0);
            }
            SubmitOutcome::NotAwaiting => return Ok(false),
        }
    }

    Ok(controller.advance().await? == AdvanceOutcome::Completed)
}
