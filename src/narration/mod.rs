use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::FitError;
use crate::model::{DayPlan, FitnessPlan};
use crate::service::PlanService;
use crate::speech::{PlaybackEvent, PlaybackId, PlaybackSink, SharedSpeech, Utterance};

/// Blocking notice shown when a day cannot be translated.
pub const NARRATION_FAILURE_NOTICE: &str =
    "Sorry, there was an error with the text-to-speech feature. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    Translating,
    Speaking,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSettings {
    /// Language name handed to the translator.
    pub language: String,
    /// Tag handed to the speech engine.
    pub lang_tag: String,
    pub rate: f32,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self { language: "Hindi".into(), lang_tag: "hi-IN".into(), rate: 0.9 }
    }
}

impl From<&Config> for NarrationSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            language: cfg.narration_language.clone(),
            lang_tag: cfg.speech_lang.clone(),
            rate: cfg.speech_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Started(PlaybackId),
    Stopped,
}

/// English text read for one day: label, focus, then one sentence per exercise.
pub fn narration_script(day: &DayPlan) -> String {
    let mut out = format!("{}, Focus: {}.", day.day, day.focus);
    for ex in &day.exercises {
        out.push_str(&format!(
            " {}: {} sets, {}, with {} rest.",
            ex.name, ex.sets, ex.reps_or_duration, ex.rest
        ));
    }
    out
}

/// Holds `Translating` for the duration of a translation; resets to `Idle`
/// however the scope exits, including when the future is dropped.
struct TranslatingGuard<'a>(&'a mut NarrationState);

impl<'a> TranslatingGuard<'a> {
    fn enter(state: &'a mut NarrationState) -> Self {
        *state = NarrationState::Translating;
        Self(state)
    }
}

impl Drop for TranslatingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = NarrationState::Idle;
    }
}

/// One day of the plan plus its narration state. Dropping a card stops its
/// playback.
pub struct DayCard {
    day: DayPlan,
    state: NarrationState,
    translated: Option<String>,
    playback: Option<PlaybackId>,
    speech: SharedSpeech,
    settings: NarrationSettings,
    events_tx: PlaybackSink,
    events_rx: UnboundedReceiver<PlaybackEvent>,
}

impl DayCard {
    pub fn new(day: DayPlan, speech: SharedSpeech, settings: NarrationSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            day,
            state: NarrationState::Idle,
            translated: None,
            playback: None,
            speech,
            settings,
            events_tx,
            events_rx,
        }
    }

    pub fn day(&self) -> &DayPlan {
        &self.day
    }

    pub fn state(&self) -> NarrationState {
        self.state
    }

    pub fn translated(&self) -> Option<&str> {
        self.translated.as_deref()
    }

    /// Toggle: stops playback while speaking, otherwise translates (once) and
    /// speaks.
    pub async fn activate(&mut self, service: &PlanService) -> Result<Activation, FitError> {
        self.pump_events();
        if self.state == NarrationState::Speaking {
            self.stop();
            return Ok(Activation::Stopped);
        }

        let text = match self.translated.clone() {
            Some(cached) => {
                debug!(day = %self.day.day, "replaying cached translation");
                cached
            }
            None => {
                let script = narration_script(&self.day);
                let result = {
                    let _guard = TranslatingGuard::enter(&mut self.state);
                    service.translate(&script, &self.settings.language).await
                };
                let translated = result.inspect_err(|e| {
                    warn!(day = %self.day.day, error = %e, "failed to translate day");
                })?;
                if translated.is_empty() {
                    warn!(day = %self.day.day, "translation came back empty");
                    return Err(FitError::translation());
                }
                self.translated = Some(translated.clone());
                translated
            }
        };

        let utterance = Utterance {
            text,
            lang: self.settings.lang_tag.clone(),
            rate: self.settings.rate,
        };
        let id = self.speech.speak(utterance, self.events_tx.clone())?;
        self.playback = Some(id);
        self.state = NarrationState::Speaking;
        info!(day = %self.day.day, ?id, "narration started");
        Ok(Activation::Started(id))
    }

    /// Cancels this card's playback, if it is still the one playing.
    pub fn stop(&mut self) {
        if let Some(id) = self.playback.take() {
            if self.speech.current() == Some(id) {
                self.speech.cancel();
            }
        }
        self.state = NarrationState::Idle;
    }

    /// Applies pending playback events without waiting.
    pub fn pump_events(&mut self) {
        while let Ok(ev) = self.events_rx.try_recv() {
            self.apply(ev);
        }
    }

    /// Waits until the current playback ends, errors or is interrupted.
    pub async fn wait_idle(&mut self) {
        self.pump_events();
        while self.state == NarrationState::Speaking {
            match self.events_rx.recv().await {
                Some(ev) => self.apply(ev),
                None => break,
            }
        }
    }

    fn apply(&mut self, ev: PlaybackEvent) {
        if self.playback != Some(ev.id()) {
            return;
        }
        match ev {
            PlaybackEvent::Started(_) => {}
            PlaybackEvent::Ended(_) | PlaybackEvent::Interrupted(_) => {
                self.playback = None;
                self.state = NarrationState::Idle;
            }
            PlaybackEvent::Errored(id, msg) => {
                warn!(day = %self.day.day, ?id, error = %msg, "speech playback failed");
                self.playback = None;
                self.state = NarrationState::Idle;
            }
        }
    }
}

impl Drop for DayCard {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The rendered plan: one card per day, in week order, plus the disclaimer.
pub struct PlanView {
    pub cards: Vec<DayCard>,
    pub disclaimer: String,
}

impl PlanView {
    pub fn new(plan: FitnessPlan, speech: &SharedSpeech, settings: &NarrationSettings) -> Self {
        let cards = plan
            .weekly_plan
            .into_iter()
            .map(|day| DayCard::new(day, speech.clone(), settings.clone()))
            .collect();
        Self { cards, disclaimer: plan.disclaimer }
    }

    /// 1-based lookup, as days are numbered on screen.
    pub fn card_mut(&mut self, number: usize) -> Option<&mut DayCard> {
        number.checked_sub(1).and_then(|i| self.cards.get_mut(i))
    }
}
