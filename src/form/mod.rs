use std::str::FromStr;
use tracing::{debug, warn};

use crate::errors::FitError;
use crate::model::{Choice, FitnessLevel, FitnessPlan, Gender, MainGoal, UserAttributes};
use crate::service::PlanService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Age,
    Gender,
    Height,
    Weight,
    FitnessLevel,
    MainGoal,
    DaysPerWeek,
    TimePerSession,
    Preferences,
}

/// Integer range input: values are clamped and snapped to the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl SliderRange {
    pub const DAYS_PER_WEEK: SliderRange = SliderRange { min: 1, max: 7, step: 1 };
    pub const TIME_PER_SESSION: SliderRange = SliderRange { min: 15, max: 120, step: 5 };

    pub fn normalize(self, value: i64) -> i64 {
        let clamped = value.clamp(self.min, self.max);
        let offset = clamped - self.min;
        let snapped = self.min + ((offset + self.step / 2) / self.step) * self.step;
        snapped.min(self.max)
    }
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Age,
        FormField::Gender,
        FormField::Height,
        FormField::Weight,
        FormField::FitnessLevel,
        FormField::MainGoal,
        FormField::DaysPerWeek,
        FormField::TimePerSession,
        FormField::Preferences,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Age => "Age",
            FormField::Gender => "Gender",
            FormField::Height => "Height (cm)",
            FormField::Weight => "Weight (kg)",
            FormField::FitnessLevel => "Fitness Level",
            FormField::MainGoal => "Main Goal",
            FormField::DaysPerWeek => "Workout Days per Week",
            FormField::TimePerSession => "Time per Session (minutes)",
            FormField::Preferences => "Preferences & Notes",
        }
    }

    /// Allowed values for select fields.
    pub fn options(self) -> Option<Vec<&'static str>> {
        match self {
            FormField::Gender => Some(Gender::options()),
            FormField::FitnessLevel => Some(FitnessLevel::options()),
            FormField::MainGoal => Some(MainGoal::options()),
            _ => None,
        }
    }

    pub fn slider(self) -> Option<SliderRange> {
        match self {
            FormField::DaysPerWeek => Some(SliderRange::DAYS_PER_WEEK),
            FormField::TimePerSession => Some(SliderRange::TIME_PER_SESSION),
            _ => None,
        }
    }
}

impl FromStr for FormField {
    type Err = FitError;

    /// Accepts the form's camelCase names as well as snake_case and kebab-case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Ok(match key.as_str() {
            "age" => FormField::Age,
            "gender" => FormField::Gender,
            "height" => FormField::Height,
            "weight" => FormField::Weight,
            "fitnesslevel" => FormField::FitnessLevel,
            "maingoal" => FormField::MainGoal,
            "daysperweek" => FormField::DaysPerWeek,
            "timepersession" => FormField::TimePerSession,
            "preferences" => FormField::Preferences,
            _ => return Err(FitError::Form(format!("unknown field '{s}'"))),
        })
    }
}

/// Token for one submission. Only the newest ticket's result is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    generation: u64,
    pub attributes: UserAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success,
    Failure(String),
    /// A newer submission or teardown superseded this one.
    Discarded,
}

/// Owns the form's attributes and the plan/loading/error triple the view
/// renders from.
#[derive(Debug, Default)]
pub struct FormController {
    attributes: UserAttributes,
    plan: Option<FitnessPlan>,
    is_loading: bool,
    error: Option<String>,
    generation: u64,
}

impl FormController {
    pub fn new(attributes: UserAttributes) -> Self {
        Self { attributes, ..Default::default() }
    }

    pub fn attributes(&self) -> &UserAttributes {
        &self.attributes
    }

    pub fn plan(&self) -> Option<&FitnessPlan> {
        self.plan.as_ref()
    }

    /// Hands the plan to the view, leaving the controller without one.
    pub fn take_plan(&mut self) -> Option<FitnessPlan> {
        self.plan.take()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current value of `field` as the form displays it.
    pub fn value(&self, field: FormField) -> String {
        let a = &self.attributes;
        match field {
            FormField::Age => a.age.clone(),
            FormField::Gender => a.gender.to_string(),
            FormField::Height => a.height.clone(),
            FormField::Weight => a.weight.clone(),
            FormField::FitnessLevel => a.fitness_level.to_string(),
            FormField::MainGoal => a.main_goal.to_string(),
            FormField::DaysPerWeek => a.days_per_week.to_string(),
            FormField::TimePerSession => a.time_per_session.to_string(),
            FormField::Preferences => a.preferences.clone(),
        }
    }

    /// Merges one field. Last write wins; fields are not cross-checked.
    pub fn update(&mut self, name: &str, value: &str) -> Result<(), FitError> {
        let field: FormField = name.parse()?;
        self.set(field, value)
    }

    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FitError> {
        let a = &mut self.attributes;
        match field {
            FormField::Age => a.age = numeric_text(field, value)?,
            FormField::Height => a.height = numeric_text(field, value)?,
            FormField::Weight => a.weight = numeric_text(field, value)?,
            FormField::Gender => a.gender = choice::<Gender>(field, value)?,
            FormField::FitnessLevel => a.fitness_level = choice::<FitnessLevel>(field, value)?,
            FormField::MainGoal => a.main_goal = choice::<MainGoal>(field, value)?,
            FormField::DaysPerWeek => a.days_per_week = slider(field, value)? as u8,
            FormField::TimePerSession => a.time_per_session = slider(field, value)? as u16,
            FormField::Preferences => a.preferences = value.to_string(),
        }
        debug!(field = field.label(), "form field updated");
        Ok(())
    }

    /// Snapshots the attributes, enters loading and clears the previous
    /// plan and error.
    pub fn begin_submit(&mut self) -> SubmitTicket {
        self.generation += 1;
        self.is_loading = true;
        self.error = None;
        self.plan = None;
        SubmitTicket { generation: self.generation, attributes: self.attributes.clone() }
    }

    pub fn complete(
        &mut self,
        ticket: SubmitTicket,
        result: Result<FitnessPlan, FitError>,
    ) -> SubmitOutcome {
        if ticket.generation != self.generation {
            warn!(ticket = ticket.generation, current = self.generation, "discarding stale plan result");
            return SubmitOutcome::Discarded;
        }
        self.is_loading = false;
        match result {
            Ok(plan) => {
                self.plan = Some(plan);
                SubmitOutcome::Success
            }
            Err(e) => {
                let msg = e.user_message();
                self.error = Some(msg.clone());
                SubmitOutcome::Failure(msg)
            }
        }
    }

    pub async fn submit(&mut self, service: &PlanService) -> SubmitOutcome {
        let ticket = self.begin_submit();
        let result = service.generate_plan(&ticket.attributes).await;
        self.complete(ticket, result)
    }

    /// Invalidates outstanding tickets and clears the view state.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.is_loading = false;
        self.error = None;
        self.plan = None;
    }
}

fn numeric_text(field: FormField, value: &str) -> Result<String, FitError> {
    let v = value.trim();
    match v.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(v.to_string()),
        _ => Err(FitError::Form(format!("{} must be a non-negative number, got '{value}'", field.label()))),
    }
}

fn choice<T: FromStr<Err = String>>(field: FormField, value: &str) -> Result<T, FitError> {
    value
        .parse::<T>()
        .map_err(|e| FitError::Form(format!("{}: {e}", field.label())))
}

fn slider(field: FormField, value: &str) -> Result<i64, FitError> {
    let range = field
        .slider()
        .ok_or_else(|| FitError::Form(format!("{} is not a slider", field.label())))?;
    let n: i64 = value
        .trim()
        .parse()
        .map_err(|_| FitError::Form(format!("{} must be a whole number, got '{value}'", field.label())))?;
    Ok(range.normalize(n))
}
