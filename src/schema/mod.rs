use serde_json::{json, Value};

/// Response schema sent with plan requests so the provider constrains its
/// output to a `FitnessPlan` shaped object.
pub fn fitness_plan_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "weekly_plan": {
                "type": "array",
                "description": "An array of daily workout plans for the week.",
                "items": {
                    "type": "object",
                    "properties": {
                        "day": { "type": "string", "description": "Day of the week (e.g., 'Monday')." },
                        "focus": { "type": "string", "description": "The main focus of the workout for the day (e.g., 'Chest & Triceps')." },
                        "exercises": {
                            "type": "array",
                            "description": "A list of exercises for the day.",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string", "description": "Name of the exercise." },
                                    "sets": { "type": "string", "description": "Number of sets (e.g., '3' or '3-4')." },
                                    "reps_or_duration": { "type": "string", "description": "Number of repetitions or duration of the exercise (e.g., '8-12 reps', '30 seconds')." },
                                    "rest": { "type": "string", "description": "Rest period between sets (e.g., '60-90 seconds')." }
                                },
                                "required": ["name", "sets", "reps_or_duration", "rest"]
                            }
                        }
                    },
                    "required": ["day", "focus", "exercises"]
                }
            },
            "disclaimer": {
                "type": "string",
                "description": "A standard disclaimer advising the user to consult a healthcare professional."
            }
        },
        "required": ["weekly_plan", "disclaimer"]
    })
}

/// Copy of `schema` with `additionalProperties: false` on every object, as
/// strict structured-output modes require.
pub fn strict_object_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len() + 1);
            for (k, v) in map {
                out.insert(k.clone(), strict_object_schema(v));
            }
            if map.get("type").and_then(Value::as_str) == Some("object") {
                out.insert("additionalProperties".into(), Value::Bool(false));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(strict_object_schema).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_requires_plan_and_disclaimer() {
        let s = fitness_plan_schema();
        assert_eq!(s["required"], json!(["weekly_plan", "disclaimer"]));
        let exercise = &s["properties"]["weekly_plan"]["items"]["properties"]["exercises"]["items"];
        assert_eq!(exercise["required"], json!(["name", "sets", "reps_or_duration", "rest"]));
    }

    #[test]
    fn strict_variant_closes_every_object() {
        let strict = strict_object_schema(&fitness_plan_schema());
        assert_eq!(strict["additionalProperties"], json!(false));
        let day = &strict["properties"]["weekly_plan"]["items"];
        assert_eq!(day["additionalProperties"], json!(false));
        assert_eq!(day["properties"]["exercises"]["items"]["additionalProperties"], json!(false));
        // string leaves are untouched
        assert!(day["properties"]["day"].get("additionalProperties").is_none());
    }
}
