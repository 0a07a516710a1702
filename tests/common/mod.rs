#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;

use fitplan_gen::config::Config;
use fitplan_gen::errors::FitError;
use fitplan_gen::provider::{Provider, ProviderError};
use fitplan_gen::service::PlanService;
use fitplan_gen::speech::{PlaybackEvent, PlaybackId, PlaybackSink, SpeechEngine, Utterance};
use fitplan_gen::wire::{GenerateRequest, GenerateResponse};

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<String, ProviderError>>,
    requests: Vec<GenerateRequest>,
}

/// Provider that answers from a fixed queue and records every request.
pub struct ScriptedProvider(Arc<Mutex<Script>>);

#[derive(Clone)]
pub struct ScriptHandle(Arc<Mutex<Script>>);

impl ScriptHandle {
    pub fn calls(&self) -> usize {
        self.0.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.0.lock().requests.clone()
    }

    pub fn push(&self, reply: Result<String, ProviderError>) {
        self.0.lock().replies.push_back(reply);
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let mut script = self.0.lock();
        script.requests.push(req.clone());
        let reply = script.replies.pop_front().unwrap_or(Err(ProviderError::Empty));
        reply.map(|text| GenerateResponse { text })
    }
}

pub fn scripted_service(replies: Vec<Result<String, ProviderError>>) -> (PlanService, ScriptHandle) {
    let script = Arc::new(Mutex::new(Script { replies: replies.into(), requests: vec![] }));
    let service = PlanService::new(Box::new(ScriptedProvider(script.clone())), &Config::default());
    (service, ScriptHandle(script))
}

pub fn rate_limited() -> ProviderError {
    ProviderError::Api { status: 429, message: Some("rate limit exceeded".into()) }
}

const DAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

pub fn plan_json(days: usize) -> serde_json::Value {
    let weekly: Vec<_> = DAYS
        .iter()
        .take(days)
        .map(|d| {
            json!({
                "day": d,
                "focus": "Full Body",
                "exercises": [
                    {"name": "Barbell Squat", "sets": "3-4", "reps_or_duration": "8-12 reps", "rest": "90 seconds"},
                    {"name": "Plank", "sets": "3", "reps_or_duration": "45 seconds", "rest": "30 seconds"}
                ]
            })
        })
        .collect();
    json!({
        "weekly_plan": weekly,
        "disclaimer": "Consult a healthcare professional before starting any new exercise program."
    })
}

#[derive(Default)]
struct Playback {
    next: u64,
    active: Option<(PlaybackId, PlaybackSink)>,
    spoken: Vec<Utterance>,
    cancels: usize,
}

/// Speech engine that never finishes on its own; tests end playback with
/// `finish`.
#[derive(Clone, Default)]
pub struct RecordingSpeech(Arc<Mutex<Playback>>);

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<Utterance> {
        self.0.lock().spoken.clone()
    }

    pub fn cancels(&self) -> usize {
        self.0.lock().cancels
    }

    /// Ends the active playback as if the audio ran out.
    pub fn finish(&self) {
        if let Some((id, sink)) = self.0.lock().active.take() {
            let _ = sink.send(PlaybackEvent::Ended(id));
        }
    }
}

impl SpeechEngine for RecordingSpeech {
    fn speak(&self, utterance: Utterance, events: PlaybackSink) -> Result<PlaybackId, FitError> {
        self.cancel();
        let mut p = self.0.lock();
        p.next += 1;
        let id = PlaybackId(p.next);
        p.spoken.push(utterance);
        let _ = events.send(PlaybackEvent::Started(id));
        p.active = Some((id, events));
        Ok(id)
    }

    fn cancel(&self) {
        let mut p = self.0.lock();
        if let Some((id, sink)) = p.active.take() {
            p.cancels += 1;
            let _ = sink.send(PlaybackEvent::Interrupted(id));
        }
    }

    fn is_speaking(&self) -> bool {
        self.0.lock().active.is_some()
    }

    fn current(&self) -> Option<PlaybackId> {
        self.0.lock().active.as_ref().map(|(id, _)| *id)
    }
}
