//! Replay command implementation.

use super::output::{format_frames, format_summaries, format_text};
use super::{CliError, ReplayFormat};
use std::path::Path;
use wondev::replay::Recording;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded, or if `verify` is
/// set and the replay diverges.
pub(crate) fn execute(
    recording_path: &Path,
    format: ReplayFormat,
    frame: Option<u32>,
    verify: bool,
) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    let result = if verify {
        recording.verify()?
    } else {
        recording.replay()?.0
    };

    let frames = match frame {
        Some(last) => {
            let end = result
                .frames
                .iter()
                .position(|f| f.number > last)
                .unwrap_or(result.frames.len());
            &result.frames[..end]
        }
        None => &result.frames[..],
    };

    match format {
        ReplayFormat::Text => {
            print!("{}", format_summaries(frames));
            if frame.is_none() {
                println!();
                let names: Vec<String> = (0..result.scores.len())
                    .map(|i| format!("recorded player {i}"))
                    .collect();
                print!("{}", format_text(&result, recording.settings, &names));
            }
        }
        ReplayFormat::Frames => print!("{}", format_frames(frames)),
    }

    if verify {
        println!("Replay matches the recorded outcome.");
    }

    Ok(())
}
