//! # Audio Backends
//!
//! Concrete [`AudioBackend`]s behind the sound notifier.
//!
//! - [`CommandPlayer`]: hands the file to an external player (`afplay`,
//!   `paplay`, `mpv`...). Fire and forget: the child is reaped on a helper
//!   thread so the UI never blocks on playback.
//! - [`TerminalBell`]: rings BEL, ignores the file.
//! - [`Silent`]: does nothing.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::core::config::{SoundBackendKind, SoundSettings};
use crate::core::sound::{AudioBackend, AudioHandle, CueSources, PlaybackError, SoundNotifier};

/// Spawns `program` with `args`, substituting `{file}` and `{volume}`.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn expand_args(&self, handle: &AudioHandle, volume: f32) -> Vec<String> {
        let file = handle.path.display().to_string();
        let volume = format!("{volume:.2}");
        self.args
            .iter()
            .map(|a| a.replace("{file}", &file).replace("{volume}", &volume))
            .collect()
    }
}

impl AudioBackend for CommandPlayer {
    fn load(&self, path: &Path) -> Result<AudioHandle, PlaybackError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(AudioHandle {
                path: path.to_path_buf(),
            }),
            Ok(_) => Err(PlaybackError::Load {
                path: path.to_path_buf(),
                reason: "not a regular file".into(),
            }),
            Err(e) => Err(PlaybackError::Load {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    fn play(&self, handle: &AudioHandle, volume: f32) -> Result<(), PlaybackError> {
        let args = self.expand_args(handle, volume);
        debug!("Playing {} via {} {:?}", handle.path.display(), self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PlaybackError::Play(format!("{}: {}", self.program, e)))?;

        std::thread::spawn(move || match child.wait() {
            Ok(status) if !status.success() => warn!("Audio player exited with {}", status),
            Ok(_) => {}
            Err(e) => warn!("Failed to wait for audio player: {}", e),
        });
        Ok(())
    }
}

/// Rings the terminal bell for every cue.
pub struct TerminalBell;

impl AudioBackend for TerminalBell {
    fn load(&self, path: &Path) -> Result<AudioHandle, PlaybackError> {
        Ok(AudioHandle {
            path: path.to_path_buf(),
        })
    }

    fn play(&self, _handle: &AudioHandle, _volume: f32) -> Result<(), PlaybackError> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| PlaybackError::Play(e.to_string()))
    }
}

pub struct Silent;

impl AudioBackend for Silent {
    fn load(&self, path: &Path) -> Result<AudioHandle, PlaybackError> {
        Ok(AudioHandle {
            path: path.to_path_buf(),
        })
    }

    fn play(&self, _handle: &AudioHandle, _volume: f32) -> Result<(), PlaybackError> {
        Ok(())
    }
}

pub fn build_backend(settings: &SoundSettings) -> Box<dyn AudioBackend> {
    match settings.backend {
        SoundBackendKind::Command => Box::new(CommandPlayer::new(
            settings.player.clone(),
            settings.args.clone(),
        )),
        SoundBackendKind::Bell => Box::new(TerminalBell),
        SoundBackendKind::Off => Box::new(Silent),
    }
}

/// The notifier every session in this process shares.
pub fn build_notifier(settings: &SoundSettings) -> SoundNotifier {
    let enabled = settings.enabled && settings.backend != SoundBackendKind::Off;
    SoundNotifier::new(
        build_backend(settings),
        CueSources {
            send: settings.send_cue.clone(),
            receive: settings.receive_cue.clone(),
        },
        settings.volume,
        enabled,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings(backend: SoundBackendKind) -> SoundSettings {
        SoundSettings {
            enabled: true,
            backend,
            player: "true".into(),
            args: vec!["{file}".into()],
            volume: 0.3,
            send_cue: PathBuf::from("/nonexistent/sent.mp3"),
            receive_cue: PathBuf::from("/nonexistent/received.mp3"),
        }
    }

    #[test]
    fn test_expand_args_substitutes_placeholders() {
        let player = CommandPlayer::new("afplay", vec!["-v".into(), "{volume}".into(), "{file}".into()]);
        let handle = AudioHandle {
            path: PathBuf::from("/tmp/ding.mp3"),
        };
        assert_eq!(player.expand_args(&handle, 0.3), vec!["-v", "0.30", "/tmp/ding.mp3"]);
    }

    #[test]
    fn test_command_player_load_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sent.mp3");
        std::fs::write(&file, b"ID3").unwrap();

        let player = CommandPlayer::new("true", vec![]);
        assert!(player.load(&file).is_ok());
        assert!(matches!(player.load(dir.path()), Err(PlaybackError::Load { .. })));
        assert!(matches!(
            player.load(&dir.path().join("missing.mp3")),
            Err(PlaybackError::Load { .. })
        ));
    }

    #[test]
    fn test_missing_program_is_play_error() {
        let player = CommandPlayer::new("definitely-not-a-player-binary", vec!["{file}".into()]);
        let handle = AudioHandle {
            path: PathBuf::from("x.mp3"),
        };
        assert!(matches!(player.play(&handle, 0.3), Err(PlaybackError::Play(_))));
    }

    #[test]
    fn test_missing_assets_disable_command_notifier() {
        let notifier = build_notifier(&settings(SoundBackendKind::Command));
        assert!(notifier.is_enabled());
        notifier.preload();
        assert!(!notifier.is_enabled());
    }

    #[test]
    fn test_off_backend_starts_disabled() {
        let notifier = build_notifier(&settings(SoundBackendKind::Off));
        assert!(!notifier.is_enabled());
    }

    #[test]
    fn test_silent_backend_never_fails() {
        let handle = Silent.load(Path::new("whatever")).unwrap();
        assert!(Silent.play(&handle, 1.0).is_ok());
    }
}
