use crate::core::error::ValidationError;
use crate::core::types::{Calculator, Category, Constraint, Evaluation, FieldSpec, Inputs, Output};

// Absorbs float noise such as 4.24 / 0.53 = 8.000000000000002.
const CEIL_SLACK: f64 = 1e-9;

// Any positive amount needs at least one whole item.
fn ceil_count(value: f64) -> f64 {
    if value > 0.0 {
        (value - CEIL_SLACK).ceil().max(1.0)
    } else {
        0.0
    }
}

fn wallpaper_rolls(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let width = inputs.number("wall_width_m")?;
    let height = inputs.number("wall_height_m")?;
    let roll_width = inputs.number("roll_width_m")?;
    let roll_length = inputs.number("roll_length_m")?;
    let repeat = inputs.number("pattern_repeat_cm")? / 100.0;
    let waste = inputs.number("waste_percent")? / 100.0;

    let strip_length = height + repeat;
    let strips_per_roll = (roll_length / strip_length + CEIL_SLACK).floor();
    if strips_per_roll < 1.0 {
        return Err(ValidationError::invalid(
            "wall_height_m",
            "wall height plus pattern repeat is longer than one roll",
        ));
    }

    let strips_needed = ceil_count(width / roll_width);
    let rolls = ceil_count(strips_needed / strips_per_roll * (1.0 + waste));

    eval.push(Output::number("strips_needed", "Strips needed", strips_needed, 0));
    eval.push(Output::number("strips_per_roll", "Strips per roll", strips_per_roll, 0));
    eval.push(Output::number("strip_length_m", "Cut length per strip", strip_length, 2).unit("m"));
    eval.push(Output::number("rolls", "Rolls to buy", rolls, 0));
    Ok(())
}

pub(crate) static CALCULATORS: [Calculator; 1] = [Calculator {
    id: "wallpaper-rolls",
    title: "Wallpaper Roll Calculator",
    category: Category::Home,
    fields: &[
        FieldSpec::number("wall_width_m", "Total wall width (m)", Constraint::Positive),
        FieldSpec::number("wall_height_m", "Wall height (m)", Constraint::Positive),
        FieldSpec::number_or("roll_width_m", "Roll width (m)", Constraint::Positive, 0.53),
        FieldSpec::number_or("roll_length_m", "Roll length (m)", Constraint::Positive, 10.05),
        FieldSpec::number_or("pattern_repeat_cm", "Pattern repeat (cm)", Constraint::NonNegative, 0.0),
        FieldSpec::number_or("waste_percent", "Waste allowance (%)", Constraint::Range { min: 0.0, max: 50.0 }, 10.0),
    ],
    compute: wallpaper_rolls,
}];
