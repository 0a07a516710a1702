use clap::Parser;

use fitplan_gen::config::Config;
use fitplan_gen::form::FormField;
use fitplan_gen::provider::ProviderKind;

#[derive(Parser, Debug)]
#[command(name = "fitplan", version, about = "Generate a weekly workout plan with an LLM and narrate it")]
pub struct Args {
    #[arg(long)]
    pub age: Option<String>,

    #[arg(long, help = "Male, Female or Other")]
    pub gender: Option<String>,

    #[arg(long, help = "Height in cm")]
    pub height: Option<String>,

    #[arg(long, help = "Weight in kg")]
    pub weight: Option<String>,

    #[arg(long, help = "Beginner, Intermediate or Advanced")]
    pub fitness_level: Option<String>,

    #[arg(long, help = "Lose weight, Build muscle, Improve endurance or General fitness")]
    pub main_goal: Option<String>,

    #[arg(long, help = "1-7")]
    pub days_per_week: Option<String>,

    #[arg(long, help = "Minutes per session, 15-120 in steps of 5")]
    pub time_per_session: Option<String>,

    #[arg(long)]
    pub preferences: Option<String>,

    /// Prompt for every field before generating.
    #[arg(long, default_value_t = false)]
    pub interactive: bool,

    /// Translate and speak a day after generation (1-based, repeatable).
    #[arg(long = "narrate", value_name = "DAY")]
    pub narrate: Vec<usize>,

    /// Stay open and toggle narration per day from the keyboard.
    #[arg(long, default_value_t = false)]
    pub listen: bool,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    /// TOML file with provider and narration settings.
    #[arg(long)]
    pub config: Option<String>,

    /// espeak-compatible TTS program.
    #[arg(long)]
    pub speech_command: Option<String>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Form fields given on the command line, in form order.
    pub fn form_overrides(&self) -> Vec<(FormField, String)> {
        let given = [
            (FormField::Age, &self.age),
            (FormField::Gender, &self.gender),
            (FormField::Height, &self.height),
            (FormField::Weight, &self.weight),
            (FormField::FitnessLevel, &self.fitness_level),
            (FormField::MainGoal, &self.main_goal),
            (FormField::DaysPerWeek, &self.days_per_week),
            (FormField::TimePerSession, &self.time_per_session),
            (FormField::Preferences, &self.preferences),
        ];
        given
            .into_iter()
            .filter_map(|(field, v)| v.clone().map(|v| (field, v)))
            .collect()
    }

    /// Flags win over the config file.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(p) = self.provider {
            if p != cfg.provider {
                cfg.model = None;
            }
            cfg.provider = p;
        }
        if let Some(m) = &self.model {
            cfg.model = Some(m.clone());
        }
        if let Some(cmd) = &self.speech_command {
            cfg.speech_command = Some(cmd.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_fields_are_overridden() {
        let args = Args::parse_from(["fitplan", "--weight", "82", "--main-goal", "Lose weight"]);
        assert_eq!(
            args.form_overrides(),
            vec![(FormField::Weight, "82".to_string()), (FormField::MainGoal, "Lose weight".to_string())]
        );
    }

    #[test]
    fn switching_provider_resets_file_model() {
        let args = Args::parse_from(["fitplan", "--provider", "openai"]);
        let mut cfg = Config { model: Some("gemini-2.5-pro".into()), ..Default::default() };
        args.apply_to(&mut cfg);
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.model(), "gpt-4.1-mini");
    }

    #[test]
    fn narrate_is_repeatable() {
        let args = Args::parse_from(["fitplan", "--narrate", "1", "--narrate", "3"]);
        assert_eq!(args.narrate, vec![1, 3]);
    }
}
