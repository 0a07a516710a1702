use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainGoal {
    #[serde(rename = "Lose weight")]
    LoseWeight,
    #[serde(rename = "Build muscle")]
    BuildMuscle,
    #[serde(rename = "Improve endurance")]
    ImproveEndurance,
    #[serde(rename = "General fitness")]
    GeneralFitness,
}

/// Maps an enum to the option labels the form offers.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];
    fn label(self) -> &'static str;

    fn options() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }

    /// Case-insensitive match against the labels.
    fn parse_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|c| c.label().eq_ignore_ascii_case(s))
    }
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female, Gender::Other];
    fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl Choice for FitnessLevel {
    const ALL: &'static [Self] = &[
        FitnessLevel::Beginner,
        FitnessLevel::Intermediate,
        FitnessLevel::Advanced,
    ];
    fn label(self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
        }
    }
}

impl Choice for MainGoal {
    const ALL: &'static [Self] = &[
        MainGoal::LoseWeight,
        MainGoal::BuildMuscle,
        MainGoal::ImproveEndurance,
        MainGoal::GeneralFitness,
    ];
    fn label(self) -> &'static str {
        match self {
            MainGoal::LoseWeight => "Lose weight",
            MainGoal::BuildMuscle => "Build muscle",
            MainGoal::ImproveEndurance => "Improve endurance",
            MainGoal::GeneralFitness => "General fitness",
        }
    }
}

macro_rules! choice_traits {
    ($($t:ty),*) => {$(
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $t {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$t as Choice>::parse_label(s).ok_or_else(|| {
                    format!("'{}' is not one of: {}", s, <$t as Choice>::options().join(", "))
                })
            }
        }
    )*};
}

choice_traits!(Gender, FitnessLevel, MainGoal);

/// Everything the form collects. Numeric text fields are kept as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    pub age: String,
    pub gender: Gender,
    pub height: String,
    pub weight: String,
    pub fitness_level: FitnessLevel,
    pub main_goal: MainGoal,
    pub days_per_week: u8,
    pub time_per_session: u16,
    pub preferences: String,
}

impl Default for UserAttributes {
    fn default() -> Self {
        Self {
            age: "30".into(),
            gender: Gender::Male,
            height: "180".into(),
            weight: "75".into(),
            fitness_level: FitnessLevel::Intermediate,
            main_goal: MainGoal::BuildMuscle,
            days_per_week: 4,
            time_per_session: 60,
            preferences: "I enjoy lifting weights, but have limited access to machines. I prefer compound exercises.".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: String,
    pub reps_or_duration: String,
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessPlan {
    pub weekly_plan: Vec<DayPlan>,
    pub disclaimer: String,
}
