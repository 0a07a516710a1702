use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::errors::FitError;

pub mod command;
pub mod transcript;

pub use command::CommandSpeech;
pub use transcript::TranscriptSpeech;

/// Identifies one `speak` call. Events of superseded playbacks are ignored by
/// their listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP-47 tag, e.g. "hi-IN".
    pub lang: String,
    /// 1.0 is normal speed.
    pub rate: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started(PlaybackId),
    Ended(PlaybackId),
    Errored(PlaybackId, String),
    /// The playback was cancelled, by its owner or by a newer `speak`.
    Interrupted(PlaybackId),
}

impl PlaybackEvent {
    pub fn id(&self) -> PlaybackId {
        match self {
            PlaybackEvent::Started(id)
            | PlaybackEvent::Ended(id)
            | PlaybackEvent::Errored(id, _)
            | PlaybackEvent::Interrupted(id) => *id,
        }
    }
}

pub type PlaybackSink = UnboundedSender<PlaybackEvent>;

/// Narrow interface over the process-wide speech facility. Only one playback
/// is active at a time: `speak` cancels whatever is playing first.
pub trait SpeechEngine: Send + Sync {
    fn speak(&self, utterance: Utterance, events: PlaybackSink) -> Result<PlaybackId, FitError>;

    /// Stops the active playback. Safe to call when nothing is playing.
    fn cancel(&self);

    fn is_speaking(&self) -> bool;

    /// Id of the playback in progress, if any.
    fn current(&self) -> Option<PlaybackId>;
}

pub type SharedSpeech = Arc<dyn SpeechEngine>;

/// Hands out playback ids and remembers which one is current.
#[derive(Debug, Default)]
pub(crate) struct PlaybackSlot {
    next: AtomicU64,
    current: Mutex<Option<PlaybackId>>,
}

impl PlaybackSlot {
    pub(crate) fn begin(&self) -> PlaybackId {
        let id = PlaybackId(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        *self.current.lock() = Some(id);
        id
    }

    /// Clears the slot if `id` is still current; returns whether it was.
    pub(crate) fn finish(&self, id: PlaybackId) -> bool {
        let mut cur = self.current.lock();
        if *cur == Some(id) {
            *cur = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn take(&self) -> Option<PlaybackId> {
        self.current.lock().take()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    pub(crate) fn current(&self) -> Option<PlaybackId> {
        *self.current.lock()
    }
}

/// Picks the command engine when a TTS program is available, otherwise the
/// transcript engine.
pub fn default_engine(command: Option<&str>) -> SharedSpeech {
    match CommandSpeech::detect(command) {
        Some(engine) => Arc::new(engine),
        None => Arc::new(TranscriptSpeech::stdout()),
    }
}
