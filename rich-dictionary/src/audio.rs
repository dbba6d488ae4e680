use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tokio::sync::mpsc;

pub const AUDIO_ERROR_MESSAGE: &str = "Unable to play audio pronunciation.";

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no audio item {0}")]
    NoSuchItem(usize),
    #[error("no entry is displayed")]
    NothingDisplayed,
    #[error("failed to start audio player '{player}': {source}")]
    Spawn {
        player: String,
        #[source]
        source: std::io::Error,
    },
    #[error("audio player '{player}' failed on {url}: {status}")]
    Exited {
        player: String,
        url: String,
        status: ExitStatus,
    },
    #[error("lost track of audio player '{player}': {source}")]
    Wait {
        player: String,
        #[source]
        source: std::io::Error,
    },
}

/// Plays a pronunciation. Fire and forget: returns once playback was started.
pub trait AudioPlayer {
    fn play(&self, url: &str) -> Result<(), AudioError>;
}

/// Hands the url to an external player process and leaves it running.
///
/// Failures after the process started (bad url, undecodable audio) arrive on the
/// receiver returned by [`CommandPlayer::new`].
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    failures: mpsc::UnboundedSender<AudioError>,
}

impl CommandPlayer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
    ) -> (Self, mpsc::UnboundedReceiver<AudioError>) {
        let (failures, failures_rx) = mpsc::unbounded_channel();
        let player = Self {
            program: program.into(),
            args,
            failures,
        };
        (player, failures_rx)
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, url: &str) -> Result<(), AudioError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Spawn {
                player: self.program.clone(),
                source,
            })?;
        tracing::debug!(pid = ?child.id(), %url, "audio player started");
        let player = self.program.clone();
        let url = url.to_owned();
        let failures = self.failures.clone();
        tokio::spawn(async move {
            let failure = match child.wait().await {
                Ok(status) if status.success() => return,
                Ok(status) => AudioError::Exited { player, url, status },
                Err(source) => AudioError::Wait { player, source },
            };
            // the receiver is gone only while shutting down
            let _ = failures.send(failure);
        });
        Ok(())
    }
}
