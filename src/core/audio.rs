// Sound playback collaborator.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

/// Formats the player recognizes, by file extension.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "aiff", "aif"];

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("unsupported audio format: {0:?}")]
    UnsupportedFormat(String),
    #[error("failed to open sound file: {0}")]
    Io(#[from] std::io::Error),
    #[error("no audio output available: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to decode sound file: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Sound playback, best-effort: implementations log failures and never
/// propagate them to the caller.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, path: &Path, volume: f32);
}

/// Plays a file through the default output device. Playback blocks until the
/// clip finishes, so this is meant to run on the dispatch worker, never on a
/// signal-producing thread.
pub struct RodioPlayer;

impl RodioPlayer {
    fn try_play(path: &Path, volume: f32) -> Result<(), PlaybackError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(PlaybackError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let stream = rodio::OutputStreamBuilder::open_default_stream()?;
        let sink = rodio::Sink::connect_new(stream.mixer());
        let source = rodio::Decoder::new(BufReader::new(file))?;

        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&self, path: &Path, volume: f32) {
        if let Err(e) = Self::try_play(path, volume) {
            log::warn!("sound playback failed for {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unsupported_extension_is_rejected_before_device_access() {
        let err = RodioPlayer::try_play(&PathBuf::from("alert.txt"), 1.0).unwrap_err();
        assert!(matches!(err, PlaybackError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn missing_extension_is_rejected() {
        let err = RodioPlayer::try_play(&PathBuf::from("alert"), 1.0).unwrap_err();
        assert!(matches!(err, PlaybackError::UnsupportedFormat(ext) if ext.is_empty()));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        // A missing .WAV file must fail on open, not on the format gate.
        let err = RodioPlayer::try_play(&PathBuf::from("/nonexistent/alert.WAV"), 1.0).unwrap_err();
        assert!(matches!(err, PlaybackError::Io(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RodioPlayer::try_play(&PathBuf::from("/nonexistent/alert.wav"), 1.0).unwrap_err();
        assert!(matches!(err, PlaybackError::Io(_)));
    }

    #[test]
    fn play_swallows_errors() {
        // The trait surface must never panic or propagate.
        RodioPlayer.play(&PathBuf::from("alert.txt"), 1.0);
        RodioPlayer.play(&PathBuf::from("/nonexistent/alert.wav"), 2.0);
    }
}
