use crate::core::error::ValidationError;
use crate::core::threshold::{ThresholdTable, band};
use crate::core::types::{Calculator, Category, Constraint, Evaluation, FieldSpec, Inputs, Output};

// Heuristic weights. None of these come from a clinical reference.
const DIFFICULTY_MULTIPLIERS: &[(&str, f64)] = &[("easy", 1.0), ("medium", 1.1), ("hard", 1.25)];
const SEX_MUSCLE_FACTORS: &[(&str, f64)] = &[("male", 0.55), ("female", 0.50)];
const MUSCLE_ACTIVITY_FACTORS: &[(&str, f64)] = &[
    ("sedentary", 0.95),
    ("moderate", 1.0),
    ("active", 1.05),
    ("athlete", 1.10),
];
const CARB_GRAMS_PER_KG: &[(&str, f64)] = &[
    ("sedentary", 3.0),
    ("light", 4.0),
    ("moderate", 5.0),
    ("high", 6.0),
    ("extreme", 8.0),
];
const CARB_GOAL_FACTORS: &[(&str, f64)] = &[("lose", 0.8), ("maintain", 1.0), ("gain", 1.15)];

const STREAK_TARGET_DAYS: f64 = 30.0;
const CARB_RANGE_SPREAD: f64 = 0.10;
const KCAL_PER_GRAM_CARB: f64 = 4.0;

const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];
const SEXES: &[&str] = &["male", "female"];
const MUSCLE_ACTIVITIES: &[&str] = &["sedentary", "moderate", "active", "athlete"];
const CARB_ACTIVITIES: &[&str] = &["sedentary", "light", "moderate", "high", "extreme"];
const GOALS: &[&str] = &["lose", "maintain", "gain"];

pub(crate) static HABIT_STRENGTH: ThresholdTable = ThresholdTable::new(
    "habit-strength",
    &[
        band(
            f64::NEG_INFINITY,
            "Needs Work",
            "Shrink the habit until it is easy to do every day, then grow it.",
        ),
        band(
            40.0,
            "Building Momentum",
            "Consistency is improving. Anchor the habit to an existing routine.",
        ),
        band(
            60.0,
            "Good Habit",
            "The habit is taking hold. Protect the streak on busy days.",
        ),
        band(
            80.0,
            "Excellent",
            "The habit is well established. Consider raising the difficulty.",
        ),
    ],
);

pub(crate) static MUSCLE_MALE: ThresholdTable = ThresholdTable::new(
    "muscle-male",
    &[
        band(
            f64::NEG_INFINITY,
            "Low",
            "Add progressive resistance training and adequate protein.",
        ),
        band(38.0, "Normal", "Maintain with regular strength training."),
        band(44.0, "High", "Above-average muscle mass for men."),
        band(50.0, "Very High", "Muscle mass typical of strength athletes."),
    ],
);

pub(crate) static MUSCLE_FEMALE: ThresholdTable = ThresholdTable::new(
    "muscle-female",
    &[
        band(
            f64::NEG_INFINITY,
            "Low",
            "Add progressive resistance training and adequate protein.",
        ),
        band(31.0, "Normal", "Maintain with regular strength training."),
        band(37.0, "High", "Above-average muscle mass for women."),
        band(42.0, "Very High", "Muscle mass typical of strength athletes."),
    ],
);

pub(crate) static CARB_LEVEL: ThresholdTable = ThresholdTable::new(
    "carb-level",
    &[
        band(
            f64::NEG_INFINITY,
            "Low Carb",
            "Suited to low activity or a deliberate calorie deficit.",
        ),
        band(3.0, "Moderate Carb", "Supports daily activity and light training."),
        band(5.0, "High Carb", "Fuels regular moderate to intense training."),
        band(
            7.0,
            "Very High Carb",
            "Endurance-athlete territory. Time intake around training sessions.",
        ),
    ],
);

fn lookup(table: &[(&str, f64)], field: &str, key: &str) -> Result<f64, ValidationError> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, factor)| *factor)
        .ok_or_else(|| ValidationError::invalid(field, format!("no weighting for '{key}'")))
}

fn habit_score(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let tracked = inputs.number("days_tracked")?;
    let completed = inputs.number("days_completed")?;
    let streak = inputs.number("current_streak")?;
    let difficulty = lookup(DIFFICULTY_MULTIPLIERS, "difficulty", inputs.choice("difficulty")?)?;

    if completed > tracked {
        return Err(ValidationError::invalid(
            "days_completed",
            "cannot exceed days_tracked",
        ));
    }
    if streak > completed {
        return Err(ValidationError::invalid(
            "current_streak",
            "cannot exceed days_completed",
        ));
    }

    let completion_rate = completed / tracked * 100.0;
    let streak_factor = (streak / STREAK_TARGET_DAYS).min(1.0);
    let score = ((completion_rate * 0.7 + streak_factor * 30.0) * difficulty).min(100.0);

    eval.push(Output::number("completion_rate", "Completion rate", completion_rate, 1).unit("%"));
    eval.push(Output::number("score", "Habit score", score, 0));
    eval.classify(HABIT_STRENGTH.classification(score)?);
    Ok(())
}

fn muscle_mass(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let weight = inputs.number("weight_kg")?;
    let body_fat = inputs.number("body_fat_percentage")?;
    let sex = inputs.choice("sex")?;
    let sex_factor = lookup(SEX_MUSCLE_FACTORS, "sex", sex)?;
    let activity = lookup(MUSCLE_ACTIVITY_FACTORS, "activity_level", inputs.choice("activity_level")?)?;

    let lean = weight * (1.0 - body_fat / 100.0);
    let muscle = lean * sex_factor * activity;
    let muscle_pct = muscle / weight * 100.0;

    eval.push(Output::number("lean_mass_kg", "Lean body mass", lean, 1).unit("kg"));
    eval.push(Output::number("muscle_mass_kg", "Estimated muscle mass", muscle, 1).unit("kg"));
    eval.push(Output::number("muscle_percentage", "Muscle percentage", muscle_pct, 1).unit("%"));
    let table = if sex == "female" { &MUSCLE_FEMALE } else { &MUSCLE_MALE };
    eval.classify(table.classification(muscle_pct)?);
    Ok(())
}

fn carb_intake(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let weight = inputs.number("weight_kg")?;
    let per_kg = lookup(CARB_GRAMS_PER_KG, "activity_level", inputs.choice("activity_level")?)?;
    let goal = lookup(CARB_GOAL_FACTORS, "goal", inputs.choice("goal")?)?;

    let effective_per_kg = per_kg * goal;
    let grams = weight * effective_per_kg;

    eval.push(Output::number("grams_per_day", "Carbohydrates per day", grams, 0).unit("g"));
    eval.push(Output::number("min_grams", "Lower end of range", grams * (1.0 - CARB_RANGE_SPREAD), 0).unit("g"));
    eval.push(Output::number("max_grams", "Upper end of range", grams * (1.0 + CARB_RANGE_SPREAD), 0).unit("g"));
    eval.push(Output::number("calories_from_carbs", "Calories from carbohydrates", grams * KCAL_PER_GRAM_CARB, 0).unit("kcal"));
    eval.push(Output::number("grams_per_kg", "Carbohydrates per kg", effective_per_kg, 2).unit("g/kg"));
    eval.classify(CARB_LEVEL.classification(effective_per_kg)?);
    Ok(())
}

pub(crate) static CALCULATORS: [Calculator; 3] = [
    Calculator {
        id: "habit-score",
        title: "Habit Streak Score Calculator",
        category: Category::Health,
        fields: &[
            FieldSpec::number("days_tracked", "Days tracked", Constraint::IntegerRange { min: 1, max: 366 }),
            FieldSpec::number("days_completed", "Days completed", Constraint::IntegerRange { min: 0, max: 366 }),
            FieldSpec::number_or("current_streak", "Current streak (days)", Constraint::IntegerRange { min: 0, max: 366 }, 0.0),
            FieldSpec::choice_or("difficulty", "Habit difficulty", DIFFICULTIES, "medium"),
        ],
        compute: habit_score,
    },
    Calculator {
        id: "muscle-mass",
        title: "Muscle Mass Calculator",
        category: Category::Health,
        fields: &[
            FieldSpec::number("weight_kg", "Body weight (kg)", Constraint::Range { min: 20.0, max: 400.0 }),
            FieldSpec::number("body_fat_percentage", "Body fat (%)", Constraint::Range { min: 0.0, max: 70.0 }),
            FieldSpec::choice("sex", "Sex", SEXES),
            FieldSpec::choice_or("activity_level", "Activity level", MUSCLE_ACTIVITIES, "moderate"),
        ],
        compute: muscle_mass,
    },
    Calculator {
        id: "carb-intake",
        title: "Carbohydrate Intake Calculator",
        category: Category::Health,
        fields: &[
            FieldSpec::number("weight_kg", "Body weight (kg)", Constraint::Range { min: 20.0, max: 400.0 }),
            FieldSpec::choice_or("activity_level", "Activity level", CARB_ACTIVITIES, "moderate"),
            FieldSpec::choice_or("goal", "Goal", GOALS, "maintain"),
        ],
        compute: carb_intake,
    },
];
