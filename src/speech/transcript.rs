use colored::Colorize;
use parking_lot::Mutex;
use std::io::{self, Write};

use super::{PlaybackEvent, PlaybackId, PlaybackSink, PlaybackSlot, SpeechEngine, Utterance};
use crate::errors::FitError;

/// Fallback for hosts without a TTS program: writes the utterance to a
/// terminal and reports it finished straight away.
pub struct TranscriptSpeech {
    out: Mutex<Box<dyn Write + Send>>,
    slot: PlaybackSlot,
}

impl TranscriptSpeech {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out), slot: PlaybackSlot::default() }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl SpeechEngine for TranscriptSpeech {
    fn speak(&self, utterance: Utterance, events: PlaybackSink) -> Result<PlaybackId, FitError> {
        self.cancel();
        let id = self.slot.begin();
        let _ = events.send(PlaybackEvent::Started(id));

        let written = {
            let mut out = self.out.lock();
            writeln!(
                out,
                "{} {}\n{}\n",
                "[speech]".cyan().bold(),
                format!("({}, {:.1}x)", utterance.lang, utterance.rate).dimmed(),
                utterance.text
            )
            .and_then(|_| out.flush())
        };

        self.slot.finish(id);
        match written {
            Ok(()) => {
                let _ = events.send(PlaybackEvent::Ended(id));
                Ok(id)
            }
            Err(e) => {
                let _ = events.send(PlaybackEvent::Errored(id, e.to_string()));
                Err(FitError::Speech(e.to_string()))
            }
        }
    }

    fn cancel(&self) {
        self.slot.take();
    }

    fn is_speaking(&self) -> bool {
        self.slot.is_active()
    }

    fn current(&self) -> Option<PlaybackId> {
        self.slot.current()
    }
}
