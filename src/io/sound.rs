//! Audio cue played when a prayer time is reached.
//!
//! Playback is delegated to an external player (`pw-play`, then `paplay`) run
//! from a detached thread; the main loop never waits for it.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

const DEFAULT_SOUND_FILE: &str = "/usr/share/sounds/freedesktop/stereo/complete.oga";
const PLAYERS: [&str; 2] = ["pw-play", "paplay"];

#[cfg_attr(test, mockall::automock)]
pub trait SoundPlayer: Send {
    fn play(&self, file: &Path);
}

/// The configured file if it exists, else the freedesktop "complete" sound.
pub fn resolve_sound_file(sound_file: Option<&Path>) -> PathBuf {
    match sound_file {
        Some(path) if path.exists() => path.to_path_buf(),
        _ => PathBuf::from(DEFAULT_SOUND_FILE),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CommandSoundPlayer;

impl SoundPlayer for CommandSoundPlayer {
    fn play(&self, file: &Path) {
        let file = file.to_path_buf();
        thread::spawn(move || {
            for player in PLAYERS {
                match Command::new(player)
                    .arg(&file)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                {
                    Ok(status) if status.success() => return,
                    _ => continue,
                }
            }
            log_pipe!();
            log_warning!("Could not play sound: neither pw-play nor paplay succeeded");
        });
    }
}
