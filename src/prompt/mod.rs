use crate::model::UserAttributes;

fn preferences_or_none(prefs: &str) -> &str {
    if prefs.is_empty() {
        "None"
    } else {
        prefs
    }
}

/// Instruction for a weekly plan. Pure: same attributes, same string.
pub fn build_plan_prompt(a: &UserAttributes) -> String {
    format!(
        r#"Please create a personalized weekly fitness plan based on the following user details.
The output MUST be a JSON object that strictly follows the provided schema. Do not include any markdown formatting like ```json.

User Details:
- Age: {age}
- Gender: {gender}
- Height: {height} cm
- Weight: {weight} kg
- Fitness Level: {level}
- Main Goal: {goal}
- Workout Days Per Week: {days}
- Time per Session: {minutes} minutes
- Preferences/Notes: {prefs}

Generate a detailed plan for exactly {days} workout days, one entry in weekly_plan per day. Include appropriate warm-ups or cool-downs if relevant within the exercise list or as a general note. The exercises should be suitable for the user's fitness level and goals. Ensure the plan includes a variety of exercises targeting different muscle groups as appropriate for the user's focus. The plan should be structured logically across the week."#,
        age = a.age,
        gender = a.gender,
        height = a.height,
        weight = a.weight,
        level = a.fitness_level,
        goal = a.main_goal,
        days = a.days_per_week,
        minutes = a.time_per_session,
        prefs = preferences_or_none(&a.preferences),
    )
}

pub fn build_translation_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following English text to {target_language}. Provide ONLY the raw translated text, without any introductory phrases, explanations, or markdown formatting.\n\nEnglish Text:\n\"\"\"\n{text}\n\"\"\""
    )
}
