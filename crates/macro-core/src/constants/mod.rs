// ABOUTME: Nutrition constants shared by the advisory parser and the formula fallback
// ABOUTME: Energy densities, macro split, activity multipliers, and default fiber/water values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Grouped by domain so the advisory and formula paths agree on defaults.

/// Energy content of each macronutrient (kcal per gram)
pub mod energy {
    /// Protein: 4 kcal/g
    pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
    /// Carbohydrate: 4 kcal/g
    pub const KCAL_PER_G_CARBS: f64 = 4.0;
    /// Fat: 9 kcal/g
    pub const KCAL_PER_G_FAT: f64 = 9.0;
}

/// Mifflin-St Jeor coefficients (Mifflin et al., 1990)
pub mod bmr {
    /// Weight coefficient (kcal per kg)
    pub const WEIGHT_COEF: f64 = 10.0;
    /// Height coefficient (kcal per cm)
    pub const HEIGHT_COEF: f64 = 6.25;
    /// Age coefficient (kcal per year, subtracted)
    pub const AGE_COEF: f64 = 5.0;
    /// Constant for male profiles
    pub const MALE_CONSTANT: f64 = 5.0;
    /// Constant for every non-male profile
    pub const NON_MALE_CONSTANT: f64 = -161.0;
}

/// TDEE activity multipliers
pub mod activity {
    /// Little or no exercise
    pub const SEDENTARY: f64 = 1.2;
    /// Light exercise 1-3 days/week
    pub const LIGHTLY_ACTIVE: f64 = 1.375;
    /// Moderate exercise 3-5 days/week
    pub const MODERATELY_ACTIVE: f64 = 1.55;
    /// Hard exercise 6-7 days/week
    pub const VERY_ACTIVE: f64 = 1.725;
    /// Hard daily exercise or a physical job
    pub const EXTREMELY_ACTIVE: f64 = 1.9;
}

/// Daily target shaping
pub mod targets {
    /// Calorie delta applied for weight loss (deficit) or muscle gain (surplus)
    pub const GOAL_CALORIE_ADJUSTMENT: f64 = 500.0;
    /// Share of calories from protein in the formula split
    pub const PROTEIN_SHARE: f64 = 0.30;
    /// Share of calories from carbohydrate in the formula split
    pub const CARBS_SHARE: f64 = 0.45;
    /// Share of calories from fat in the formula split
    pub const FAT_SHARE: f64 = 0.25;
    /// Fixed daily fiber recommendation (grams)
    pub const FORMULA_FIBER_G: f64 = 30.0;
    /// Water per kilogram of body weight (ml)
    pub const WATER_ML_PER_KG: f64 = 35.0;
    /// Fiber used when an advisory answer omits it (grams)
    pub const DEFAULT_FIBER_G: f64 = 30.0;
    /// Water used when an advisory answer omits it (ml)
    pub const DEFAULT_WATER_ML: f64 = 2500.0;
    /// Notes attached to formula-based targets
    pub const FORMULA_NOTES: &str =
        "Calculated using standard metabolic formulas (AI unavailable).";
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn test_macro_split_sums_to_one() {
        let total = targets::PROTEIN_SHARE + targets::CARBS_SHARE + targets::FAT_SHARE;
        assert!((total - 1.0).abs() < f64::EPSILON);
    }
}
