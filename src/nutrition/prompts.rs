// ABOUTME: Prompt construction for the nutrition advisory request
// ABOUTME: Describes profile and goal and demands a bare JSON object with the target fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use super::TargetInputs;

/// System instruction sent with every advisory request
pub const SYSTEM_PROMPT: &str = "You are an expert sports nutritionist. \
     You answer with a single JSON object and nothing else.";

/// Keys the advisory answer must contain
pub const RESPONSE_FIELDS: [&str; 7] = [
    "daily_calories",
    "daily_protein_g",
    "daily_carbs_g",
    "daily_fats_g",
    "daily_fiber_g",
    "daily_water_ml",
    "notes",
];

/// Describe the user and ask for daily targets
#[must_use]
pub fn build_target_prompt(inputs: &TargetInputs) -> String {
    let mut prompt = String::from(
        "Calculate the daily nutrition targets for the following user.\n\nUser profile:\n",
    );

    let _ = writeln!(prompt, "- Age: {}", inputs.age);
    let _ = writeln!(prompt, "- Gender: {}", inputs.gender.as_str());
    let _ = writeln!(prompt, "- Height: {} cm", inputs.height_cm);
    let _ = writeln!(prompt, "- Weight: {} kg", inputs.weight_kg);
    let _ = writeln!(prompt, "- Fitness level: {}", inputs.fitness_level.as_str());

    prompt.push_str("\nFitness goal:\n");
    let _ = writeln!(prompt, "- Goal type: {}", inputs.goal_type.as_str());
    let _ = writeln!(
        prompt,
        "- Target weight: {}",
        inputs
            .target_weight_kg
            .map_or_else(|| "not specified".to_owned(), |w| format!("{w} kg"))
    );
    let _ = writeln!(prompt, "- Activity level: {}", inputs.activity_level);
    let _ = writeln!(
        prompt,
        "- Target physique: {}",
        inputs.target_physique.as_deref().unwrap_or("not specified")
    );

    prompt.push_str(
        "\nReturn ONLY valid JSON with exactly these keys: numbers for the first six \
         (calories in kcal, macros and fiber in grams, water in ml) and a short string for notes:\n",
    );
    let _ = writeln!(prompt, "{}", RESPONSE_FIELDS.join(", "));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use macro_core::models::{FitnessLevel, Gender, GoalType};

    #[test]
    fn test_prompt_lists_inputs_and_every_response_key() {
        let inputs = TargetInputs {
            age: 42,
            gender: Gender::Female,
            height_cm: 168.0,
            weight_kg: 64.5,
            fitness_level: FitnessLevel::Beginner,
            goal_type: GoalType::WeightLoss,
            activity_level: "lightly_active".to_owned(),
            target_weight_kg: None,
            target_physique: Some("lean".to_owned()),
        };
        let prompt = build_target_prompt(&inputs);

        assert!(prompt.contains("- Age: 42"));
        assert!(prompt.contains("- Weight: 64.5 kg"));
        assert!(prompt.contains("- Goal type: weight_loss"));
        assert!(prompt.contains("- Target weight: not specified"));
        assert!(prompt.contains("- Target physique: lean"));
        for key in RESPONSE_FIELDS {
            assert!(prompt.contains(key), "missing {key}");
        }
    }
}
