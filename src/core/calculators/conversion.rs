//! Unit converters. Each one is `output = input * factor + offset`.

use crate::core::error::ValidationError;
use crate::core::types::{Calculator, Category, Constraint, Evaluation, FieldSpec, Inputs, Output};

pub(crate) const PSI_PER_BAR: f64 = 14.503_773_8;
pub(crate) const BAR_PER_PSI: f64 = 0.068_947_572_9;
pub(crate) const POUNDS_PER_KILOGRAM: f64 = 2.204_622_62;
pub(crate) const KILOMETERS_PER_MILE: f64 = 1.609_344;
pub(crate) const GALLONS_PER_LITER: f64 = 0.264_172_052;

const ABSOLUTE_ZERO_C: f64 = -273.15;

struct LinearConversion {
    input: &'static str,
    output: &'static str,
    output_label: &'static str,
    unit: &'static str,
    factor: f64,
    offset: f64,
    decimals: u8,
}

impl LinearConversion {
    fn apply(&self, inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
        let value = inputs.number(self.input)?;
        let converted = value * self.factor + self.offset;
        eval.push(Output::number(self.output, self.output_label, converted, self.decimals).unit(self.unit));
        Ok(())
    }
}

static BAR_TO_PSI: LinearConversion = LinearConversion {
    input: "bar",
    output: "psi",
    output_label: "Pressure",
    unit: "psi",
    factor: PSI_PER_BAR,
    offset: 0.0,
    decimals: 4,
};

static PSI_TO_BAR: LinearConversion = LinearConversion {
    input: "psi",
    output: "bar",
    output_label: "Pressure",
    unit: "bar",
    factor: BAR_PER_PSI,
    offset: 0.0,
    decimals: 4,
};

static KILOGRAMS_TO_POUNDS: LinearConversion = LinearConversion {
    input: "kilograms",
    output: "pounds",
    output_label: "Mass",
    unit: "lb",
    factor: POUNDS_PER_KILOGRAM,
    offset: 0.0,
    decimals: 3,
};

static MILES_TO_KILOMETERS: LinearConversion = LinearConversion {
    input: "miles",
    output: "kilometers",
    output_label: "Distance",
    unit: "km",
    factor: KILOMETERS_PER_MILE,
    offset: 0.0,
    decimals: 3,
};

static LITERS_TO_GALLONS: LinearConversion = LinearConversion {
    input: "liters",
    output: "gallons",
    output_label: "Volume",
    unit: "US gal",
    factor: GALLONS_PER_LITER,
    offset: 0.0,
    decimals: 3,
};

static CELSIUS_TO_FAHRENHEIT: LinearConversion = LinearConversion {
    input: "celsius",
    output: "fahrenheit",
    output_label: "Temperature",
    unit: "°F",
    factor: 1.8,
    offset: 32.0,
    decimals: 1,
};

fn bar_to_psi(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    BAR_TO_PSI.apply(inputs, eval)
}

fn psi_to_bar(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    PSI_TO_BAR.apply(inputs, eval)
}

fn kilograms_to_pounds(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    KILOGRAMS_TO_POUNDS.apply(inputs, eval)
}

fn miles_to_kilometers(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    MILES_TO_KILOMETERS.apply(inputs, eval)
}

fn liters_to_gallons(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    LITERS_TO_GALLONS.apply(inputs, eval)
}

fn celsius_to_fahrenheit(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    CELSIUS_TO_FAHRENHEIT.apply(inputs, eval)
}

pub(crate) static CALCULATORS: [Calculator; 6] = [
    Calculator {
        id: "bar-to-psi",
        title: "Bar to PSI Converter",
        category: Category::Conversion,
        fields: &[FieldSpec::number("bar", "Pressure (bar)", Constraint::NonNegative)],
        compute: bar_to_psi,
    },
    Calculator {
        id: "psi-to-bar",
        title: "PSI to Bar Converter",
        category: Category::Conversion,
        fields: &[FieldSpec::number("psi", "Pressure (psi)", Constraint::NonNegative)],
        compute: psi_to_bar,
    },
    Calculator {
        id: "kilograms-to-pounds",
        title: "Kilograms to Pounds Converter",
        category: Category::Conversion,
        fields: &[FieldSpec::number("kilograms", "Mass (kg)", Constraint::NonNegative)],
        compute: kilograms_to_pounds,
    },
    Calculator {
        id: "miles-to-kilometers",
        title: "Miles to Kilometers Converter",
        category: Category::Conversion,
        fields: &[FieldSpec::number("miles", "Distance (mi)", Constraint::NonNegative)],
        compute: miles_to_kilometers,
    },
    Calculator {
        id: "liters-to-gallons",
        title: "Liters to Gallons Converter",
        category: Category::Conversion,
        fields: &[FieldSpec::number("liters", "Volume (L)", Constraint::NonNegative)],
        compute: liters_to_gallons,
    },
    Calculator {
        id: "celsius-to-fahrenheit",
        title: "Celsius to Fahrenheit Converter",
        category: Category::Conversion,
        fields: &[FieldSpec::number(
            "celsius",
            "Temperature (°C)",
            Constraint::Range {
                min: ABSOLUTE_ZERO_C,
                max: 1.0e6,
            },
        )],
        compute: celsius_to_fahrenheit,
    },
];

#[cfg(test)]
mod tests {
    use crate::core::{InputRecord, evaluate};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn convert(id: &str, field: &str, value: f64) -> f64 {
        let eval = evaluate(id, &InputRecord::new().with_number(field, value)).expect("valid input");
        eval.outputs[0].as_number().expect("numeric output")
    }

    #[test]
    fn one_bar_is_about_fourteen_and_a_half_psi() {
        let psi = convert("bar-to-psi", "bar", 1.0);
        assert!((psi - 14.5038).abs() <= 0.01, "got {psi}");
    }

    #[test]
    fn psi_display_is_rounded_to_four_places() {
        let eval = evaluate("bar-to-psi", &InputRecord::new().with_number("bar", 1.0)).expect("valid");
        assert_eq!(eval.outputs[0].display(), "14.5038 psi");
    }

    #[test]
    fn bar_and_psi_converters_are_inverses() {
        let back = convert("psi-to-bar", "psi", convert("bar-to-psi", "bar", 3.2));
        assert!((back - 3.2).abs() < 1e-6, "got {back}");
    }

    #[test]
    fn water_freezes_and_boils_where_expected() {
        assert_eq!(convert("celsius-to-fahrenheit", "celsius", 0.0), 32.0);
        assert_eq!(convert("celsius-to-fahrenheit", "celsius", 100.0), 212.0);
    }

    #[test]
    fn below_absolute_zero_is_rejected() {
        let record = InputRecord::new().with_number("celsius", -300.0);
        assert!(evaluate("celsius-to-fahrenheit", &record).is_err());
    }

    #[test]
    fn negative_pressure_is_rejected() {
        let record = InputRecord::new().with_number("bar", -1.0);
        assert!(evaluate("bar-to-psi", &record).is_err());
    }

    proptest! {
        #[test]
        fn prop_bar_to_psi_is_linear(bar in 0.0f64..10_000.0) {
            prop_assert_eq!(convert("bar-to-psi", "bar", 2.0 * bar), 2.0 * convert("bar-to-psi", "bar", bar));
        }

        #[test]
        fn prop_linear_converters_are_strictly_increasing(a in 0.0f64..1_000.0, delta in 0.001f64..1_000.0) {
            for (id, field) in [
                ("bar-to-psi", "bar"),
                ("psi-to-bar", "psi"),
                ("kilograms-to-pounds", "kilograms"),
                ("miles-to-kilometers", "miles"),
                ("liters-to-gallons", "liters"),
                ("celsius-to-fahrenheit", "celsius"),
            ] {
                prop_assert!(convert(id, field, a + delta) > convert(id, field, a));
            }
        }
    }
}
