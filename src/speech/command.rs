use parking_lot::Mutex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::{PlaybackEvent, PlaybackId, PlaybackSink, PlaybackSlot, SpeechEngine, Utterance};
use crate::errors::FitError;

const CANDIDATES: &[&str] = &["espeak-ng", "espeak"];
/// espeak's words-per-minute at rate 1.0.
const BASE_WPM: f32 = 175.0;

struct Active {
    id: PlaybackId,
    kill: oneshot::Sender<()>,
    events: PlaybackSink,
}

/// Speaks through an espeak-compatible program (`-v <voice> -s <wpm> --stdin`).
/// Cancelling kills the child process.
pub struct CommandSpeech {
    program: PathBuf,
    slot: Arc<PlaybackSlot>,
    active: Arc<Mutex<Option<Active>>>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            slot: Arc::new(PlaybackSlot::default()),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolves `command` (or the first known TTS program) on PATH.
    pub fn detect(command: Option<&str>) -> Option<Self> {
        let found = match command {
            Some(cmd) => which::which(cmd).ok(),
            None => CANDIDATES.iter().find_map(|c| which::which(c).ok()),
        };
        if found.is_none() {
            debug!(?command, "no speech program found");
        }
        found.map(Self::new)
    }

    pub fn args_for(utterance: &Utterance) -> Vec<String> {
        vec![
            "-v".into(),
            voice_for(&utterance.lang),
            "-s".into(),
            words_per_minute(utterance.rate).to_string(),
            "--stdin".into(),
        ]
    }
}

/// "hi-IN" -> "hi"
fn voice_for(lang: &str) -> String {
    lang.split(|c: char| c == '-' || c == '_').next().unwrap_or(lang).to_ascii_lowercase()
}

fn words_per_minute(rate: f32) -> u32 {
    (BASE_WPM * rate.max(0.1)).round() as u32
}

impl SpeechEngine for CommandSpeech {
    fn speak(&self, utterance: Utterance, events: PlaybackSink) -> Result<PlaybackId, FitError> {
        self.cancel();
        let id = self.slot.begin();

        let mut child = Command::new(&self.program)
            .args(Self::args_for(&utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                self.slot.finish(id);
                FitError::Speech(format!("failed to spawn {}: {e}", self.program.display()))
            })?;

        let (kill_tx, mut kill_rx) = oneshot::channel();
        *self.active.lock() = Some(Active { id, kill: kill_tx, events: events.clone() });
        let _ = events.send(PlaybackEvent::Started(id));

        let slot = Arc::clone(&self.slot);
        let active = Arc::clone(&self.active);
        let mut stdin = child.stdin.take();
        tokio::spawn(async move {
            if let Some(mut pipe) = stdin.take() {
                if let Err(e) = pipe.write_all(utterance.text.as_bytes()).await {
                    warn!(error = %e, "could not feed text to speech program");
                }
            }

            let outcome = tokio::select! {
                status = child.wait() => Some(status),
                _ = &mut kill_rx => {
                    let _ = child.kill().await;
                    None
                }
            };

            {
                let mut guard = active.lock();
                if guard.as_ref().is_some_and(|a| a.id == id) {
                    guard.take();
                }
            }

            let Some(status) = outcome else {
                debug!(?id, "playback cancelled");
                return;
            };
            if !slot.finish(id) {
                return;
            }
            let event = match status {
                Ok(s) if s.success() => PlaybackEvent::Ended(id),
                Ok(s) => PlaybackEvent::Errored(id, format!("speech program exited with {s}")),
                Err(e) => PlaybackEvent::Errored(id, e.to_string()),
            };
            let _ = events.send(event);
        });

        Ok(id)
    }

    fn cancel(&self) {
        if let Some(active) = self.active.lock().take() {
            self.slot.finish(active.id);
            let _ = active.kill.send(());
            let _ = active.events.send(PlaybackEvent::Interrupted(active.id));
        }
        self.slot.take();
    }

    fn is_speaking(&self) -> bool {
        self.slot.is_active()
    }

    fn current(&self) -> Option<PlaybackId> {
        self.slot.current()
    }
}
