//! Alarm playback through an external player command (paplay, afplay, ...).
//!
//! `play` returns as soon as the player process is spawned; the process is
//! reaped in the background.

use crate::adapters::http::AssetCache;
use crate::domain::DomainError;
use crate::ports::SoundPlayer;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

enum Clip {
    Local(PathBuf),
    Remote(AssetCache),
}

pub struct CommandSoundPlayer {
    program: String,
    args: Vec<String>,
    clip: Clip,
}

impl CommandSoundPlayer {
    /// `command` is split on whitespace; the clip path is appended as the last argument.
    pub fn new(command: &str, clip: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let (program, args) = split_command(command)?;
        Ok(Self {
            program,
            args,
            clip: Clip::Local(clip.into()),
        })
    }

    /// Play a clip fetched from the server on first use.
    pub fn remote(command: &str, cache: AssetCache) -> Result<Self, DomainError> {
        let (program, args) = split_command(command)?;
        Ok(Self {
            program,
            args,
            clip: Clip::Remote(cache),
        })
    }

    async fn clip_path(&self) -> Result<PathBuf, DomainError> {
        match &self.clip {
            Clip::Local(path) => Ok(path.clone()),
            Clip::Remote(cache) => cache
                .local_path()
                .await
                .map_err(|e| DomainError::Sound(e.to_string())),
        }
    }
}

fn split_command(command: &str) -> Result<(String, Vec<String>), DomainError> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| DomainError::Config("player command is empty".into()))?;
    Ok((program, parts.collect()))
}

#[async_trait::async_trait]
impl SoundPlayer for CommandSoundPlayer {
    async fn play(&self) -> Result<(), DomainError> {
        let clip = self.clip_path().await?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DomainError::Sound(format!("spawn {}: {}", self.program, e)))?;

        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    debug!(program = %program, %status, "player exited with failure")
                }
                Ok(_) => {}
                Err(e) => debug!(program = %program, error = %e, "player wait failed"),
            }
        });
        Ok(())
    }
}
