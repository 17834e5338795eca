use crate::core::error::ValidationError;
use crate::core::threshold::{ThresholdTable, band};
use crate::core::types::{Calculator, Category, Constraint, Evaluation, FieldSpec, Inputs, Output};

pub(crate) const PAYBACK_NOT_REACHED: &str = "Payback period is longer than the provided cash flows.";

const NO_BREAK_EVEN: &str = "No break-even point: the price does not cover the variable cost per unit.";

pub(crate) static BOND_PRICING: ThresholdTable = ThresholdTable::new(
    "bond-pricing",
    &[
        band(
            f64::NEG_INFINITY,
            "Trading at a Discount",
            "The market yield exceeds the coupon rate, so the bond sells below face value.",
        ),
        band(
            -0.05,
            "Trading Near Par",
            "The coupon rate is in line with the market yield.",
        ),
        band(
            0.05,
            "Trading at a Premium",
            "The coupon rate exceeds the market yield, so the bond sells above face value.",
        ),
    ],
);

pub(crate) static PAYBACK_SPEED: ThresholdTable = ThresholdTable::new(
    "payback-speed",
    &[
        band(
            f64::NEG_INFINITY,
            "Quick Payback",
            "The investment returns its cost in under three years.",
        ),
        band(
            3.0,
            "Moderate Payback",
            "Typical for equipment and process investments.",
        ),
        band(
            5.0,
            "Slow Payback",
            "Check the cash flow assumptions and compare against the asset's useful life.",
        ),
        band(
            10.0,
            "Very Slow Payback",
            "Capital is tied up for a long time; consider discounted measures such as NPV.",
        ),
    ],
);

pub(crate) static NET_WORTH: ThresholdTable = ThresholdTable::new(
    "net-worth",
    &[
        band(
            f64::NEG_INFINITY,
            "Negative Net Worth",
            "Liabilities exceed assets. Prioritise paying down high-interest debt.",
        ),
        band(
            0.0,
            "Building Wealth",
            "Keep growing an emergency fund and retirement contributions.",
        ),
        band(
            100_000.0,
            "Solid Foundation",
            "Diversify investments and review insurance coverage.",
        ),
        band(
            1_000_000.0,
            "High Net Worth",
            "Consider estate planning and tax-efficient investing.",
        ),
    ],
);

pub(crate) static INTEREST_BURDEN: ThresholdTable = ThresholdTable::new(
    "interest-burden",
    &[
        band(
            f64::NEG_INFINITY,
            "Low Interest Cost",
            "Total interest is under a quarter of the amount borrowed.",
        ),
        band(
            25.0,
            "Moderate Interest Cost",
            "Extra principal payments would shorten the loan noticeably.",
        ),
        band(
            75.0,
            "High Interest Cost",
            "Interest approaches or exceeds the principal. Compare shorter terms or refinancing.",
        ),
    ],
);

pub(crate) static CONTRIBUTION_MARGIN: ThresholdTable = ThresholdTable::new(
    "contribution-margin",
    &[
        band(
            f64::NEG_INFINITY,
            "Thin Margin",
            "Each sale contributes little toward fixed costs.",
        ),
        band(
            20.0,
            "Healthy Margin",
            "Each sale makes a reasonable contribution toward fixed costs.",
        ),
        band(
            50.0,
            "Strong Margin",
            "Break-even is reached with relatively few sales.",
        ),
    ],
);

pub(crate) static DISCOUNT_SIZE: ThresholdTable = ThresholdTable::new(
    "discount-size",
    &[
        band(f64::NEG_INFINITY, "Small Discount", "A modest saving."),
        band(
            10.0,
            "Moderate Discount",
            "A typical sale price.",
        ),
        band(
            25.0,
            "Great Discount",
            "A substantial saving compared to the regular price.",
        ),
        band(
            50.0,
            "Huge Discount",
            "Half price or better. Check the item's condition and return policy.",
        ),
    ],
);

pub(crate) static FUND_COVERAGE: ThresholdTable = ThresholdTable::new(
    "fund-coverage",
    &[
        band(
            f64::NEG_INFINITY,
            "Significant Shortfall",
            "Projected savings cover less than half of the target. Increase contributions or plan for aid.",
        ),
        band(
            50.0,
            "Partial Coverage",
            "Projected savings cover a meaningful share of the target.",
        ),
        band(
            90.0,
            "Nearly Funded",
            "A small increase in contributions closes the gap.",
        ),
        band(
            100.0,
            "Fully Funded",
            "Projected savings meet or exceed the target.",
        ),
    ],
);

const FREQUENCIES: &[&str] = &["annual", "semiannual", "quarterly", "monthly"];
const FLOW_KINDS: &[&str] = &["even", "uneven"];

fn payments_per_year(frequency: &str) -> u32 {
    match frequency {
        "semiannual" => 2,
        "quarterly" => 4,
        "monthly" => 12,
        _ => 1,
    }
}

fn future_value(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let pv = inputs.number("present_value")?;
    let rate = inputs.number("annual_rate")? / 100.0;
    let n = inputs.number("periods_per_year")?;
    let years = inputs.number("years")?;

    let fv = pv * (1.0 + rate / n).powf(n * years);
    eval.push(Output::number("future_value", "Future value", fv, 2));
    eval.push(Output::number("interest_earned", "Interest earned", fv - pv, 2));
    Ok(())
}

fn bond_price(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let face = inputs.number("face_value")?;
    let coupon_rate = inputs.number("coupon_rate")? / 100.0;
    let market_rate = inputs.number("market_rate")? / 100.0;
    let years = inputs.count("years")?;
    let freq = payments_per_year(inputs.choice("frequency")?);

    let periods = (years * freq) as i32;
    let coupon = face * coupon_rate / freq as f64;
    let y = market_rate / freq as f64;
    let price = if y.abs() < 1e-12 {
        coupon * periods as f64 + face
    } else {
        let discount = (1.0 + y).powi(-periods);
        coupon * (1.0 - discount) / y + face * discount
    };
    let annual_coupon = face * coupon_rate;

    eval.push(Output::number("price", "Bond price", price, 2));
    eval.push(Output::number("annual_coupon", "Annual coupon", annual_coupon, 2));
    eval.push(Output::number("current_yield", "Current yield", annual_coupon / price * 100.0, 3).unit("%"));
    eval.classify(BOND_PRICING.classification((price / face - 1.0) * 100.0)?);
    Ok(())
}

pub(crate) fn describe_payback(years: f64) -> String {
    let mut whole = years.floor();
    // Round to the displayed precision first so 11.96 months becomes a full year.
    let mut months = ((years - whole) * 120.0).round() / 10.0;
    if months >= 12.0 {
        whole += 1.0;
        months = 0.0;
    }
    format!("{whole:.0} years and {months:.1} months")
}

/// Fractional years until cumulative inflows reach the investment.
pub(crate) fn uneven_payback_years(investment: f64, flows: &[f64]) -> Option<f64> {
    let mut cumulative = 0.0;
    for (year, &flow) in flows.iter().enumerate() {
        if cumulative + flow >= investment {
            let remaining = investment - cumulative;
            return Some(year as f64 + remaining / flow);
        }
        cumulative += flow;
    }
    None
}

fn capital_payback(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let investment = inputs.number("initial_investment")?;
    let years = match inputs.choice("flow")? {
        "uneven" => uneven_payback_years(investment, inputs.list("cash_flows")?),
        _ => {
            let flow = inputs.number("cash_flow")?;
            if flow > 0.0 { Some(investment / flow) } else { None }
        }
    };

    match years {
        Some(years) => {
            eval.push(Output::number("payback_years", "Payback period", years, 2).unit("years"));
            eval.push(Output::text("payback", "Payback period", describe_payback(years)));
            eval.classify(PAYBACK_SPEED.classification(years)?);
        }
        None => {
            eval.push(Output::null("payback_years", "Payback period"));
            eval.push(Output::text("payback", "Payback period", PAYBACK_NOT_REACHED));
        }
    }
    Ok(())
}

fn net_worth(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let assets = inputs.number("total_assets")?;
    let liabilities = inputs.number("total_liabilities")?;

    if assets == 0.0 && liabilities == 0.0 {
        eval.push(Output::null("net_worth", "Net worth"));
        return Ok(());
    }

    let net = assets - liabilities;
    eval.push(Output::number("net_worth", "Net worth", net, 2));
    if assets > 0.0 {
        eval.push(Output::number("debt_to_asset", "Debt-to-asset ratio", liabilities / assets * 100.0, 1).unit("%"));
    } else {
        eval.push(Output::null("debt_to_asset", "Debt-to-asset ratio"));
    }
    eval.classify(NET_WORTH.classification(net)?);
    Ok(())
}

pub(crate) fn monthly_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate.abs() < 1e-12 {
        return principal / months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

fn loan_amortization(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let principal = inputs.number("principal")?;
    let monthly_rate = inputs.number("annual_rate")? / 100.0 / 12.0;
    let months = inputs.count("term_years")? * 12;
    let payment = monthly_payment(principal, monthly_rate, months);

    let mut balance = principal;
    let mut total_interest = 0.0;
    let mut total_paid = 0.0;
    let mut payments = 0u32;
    let mut first_year_interest = 0.0;
    while balance > 1e-9 && payments < months {
        let interest = balance * monthly_rate;
        // The last instalment only clears what is left.
        let due = (balance + interest).min(payment);
        balance = balance + interest - due;
        total_interest += interest;
        total_paid += due;
        payments += 1;
        if payments <= 12 {
            first_year_interest += interest;
        }
    }

    eval.push(Output::number("monthly_payment", "Monthly payment", payment, 2));
    eval.push(Output::number("total_paid", "Total paid", total_paid, 2));
    eval.push(Output::number("total_interest", "Total interest", total_interest, 2));
    eval.push(Output::number("first_year_interest", "Interest in the first year", first_year_interest, 2));
    eval.push(Output::number("payments", "Number of payments", payments as f64, 0));
    eval.classify(INTEREST_BURDEN.classification(total_interest / principal * 100.0)?);
    Ok(())
}

fn break_even(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let fixed = inputs.number("fixed_costs")?;
    let price = inputs.number("price_per_unit")?;
    let variable = inputs.number("variable_cost_per_unit")?;

    let margin = price - variable;
    let margin_ratio = margin / price * 100.0;
    eval.push(Output::number("contribution_margin", "Contribution margin per unit", margin, 2));
    eval.push(Output::number("contribution_margin_ratio", "Contribution margin ratio", margin_ratio, 1).unit("%"));

    if margin <= 0.0 {
        eval.push(Output::null("break_even_units", "Break-even units"));
        eval.push(Output::null("break_even_revenue", "Break-even revenue"));
        eval.push(Output::text("message", "Break-even", NO_BREAK_EVEN));
        return Ok(());
    }

    let units = fixed / margin;
    eval.push(Output::number("break_even_units", "Break-even units", units.ceil(), 0));
    eval.push(Output::number("break_even_revenue", "Break-even revenue", units * price, 2));
    eval.classify(CONTRIBUTION_MARGIN.classification(margin_ratio)?);
    Ok(())
}

fn discount(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let original = inputs.number("original_price")?;
    let percent = inputs.number("discount_percent")?;

    let savings = original * percent / 100.0;
    eval.push(Output::number("final_price", "Final price", original - savings, 2));
    eval.push(Output::number("savings", "You save", savings, 2));
    eval.classify(DISCOUNT_SIZE.classification(percent)?);
    Ok(())
}

fn education_fund(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let mut balance = inputs.number("current_savings")?;
    let contribution = inputs.number("monthly_contribution")?;
    let monthly_rate = inputs.number("annual_return")? / 100.0 / 12.0;
    let months = inputs.count("years")? * 12;

    let mut contributed = balance;
    for _ in 0..months {
        balance = balance * (1.0 + monthly_rate) + contribution;
        contributed += contribution;
    }

    eval.push(Output::number("projected_balance", "Projected balance", balance, 2));
    eval.push(Output::number("total_contributions", "Total contributions", contributed, 2));
    eval.push(Output::number("growth", "Investment growth", balance - contributed, 2));

    if let Some(target) = inputs.optional_number("target_cost") {
        let coverage = balance / target * 100.0;
        eval.push(Output::number("coverage_percent", "Target covered", coverage, 1).unit("%"));
        eval.push(Output::number("shortfall", "Shortfall", (target - balance).max(0.0), 2));
        eval.classify(FUND_COVERAGE.classification(coverage)?);
    }
    Ok(())
}

pub(crate) static CALCULATORS: [Calculator; 8] = [
    Calculator {
        id: "future-value",
        title: "Future Value Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number("present_value", "Present value", Constraint::NonNegative),
            FieldSpec::number("annual_rate", "Annual interest rate (%)", Constraint::Range { min: 0.0, max: 1_000.0 }),
            FieldSpec::number_or("periods_per_year", "Compounding periods per year", Constraint::IntegerRange { min: 1, max: 365 }, 12.0),
            FieldSpec::number("years", "Years", Constraint::Range { min: 0.0, max: 200.0 }),
        ],
        compute: future_value,
    },
    Calculator {
        id: "bond-price",
        title: "Bond Price Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number_or("face_value", "Face value", Constraint::Positive, 1_000.0),
            FieldSpec::number("coupon_rate", "Annual coupon rate (%)", Constraint::Range { min: 0.0, max: 100.0 }),
            FieldSpec::number("market_rate", "Market yield (%)", Constraint::Range { min: 0.0, max: 100.0 }),
            FieldSpec::number("years", "Years to maturity", Constraint::IntegerRange { min: 1, max: 100 }),
            FieldSpec::choice_or("frequency", "Coupon frequency", FREQUENCIES, "semiannual"),
        ],
        compute: bond_price,
    },
    Calculator {
        id: "capital-payback",
        title: "Capital Payback Period Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number("initial_investment", "Initial investment", Constraint::Positive),
            FieldSpec::choice_or("flow", "Cash flow pattern", FLOW_KINDS, "even"),
            FieldSpec::number("cash_flow", "Annual cash flow", Constraint::NonNegative).optional(),
            FieldSpec::list("cash_flows", "Yearly cash flows", Constraint::Finite).optional(),
        ],
        compute: capital_payback,
    },
    Calculator {
        id: "net-worth",
        title: "Net Worth Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number("total_assets", "Total assets", Constraint::NonNegative),
            FieldSpec::number("total_liabilities", "Total liabilities", Constraint::NonNegative),
        ],
        compute: net_worth,
    },
    Calculator {
        id: "loan-amortization",
        title: "Loan Amortization Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number("principal", "Loan amount", Constraint::Positive),
            FieldSpec::number("annual_rate", "Annual interest rate (%)", Constraint::Range { min: 0.0, max: 100.0 }),
            FieldSpec::number("term_years", "Term (years)", Constraint::IntegerRange { min: 1, max: 50 }),
        ],
        compute: loan_amortization,
    },
    Calculator {
        id: "break-even",
        title: "Break-Even Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number("fixed_costs", "Fixed costs", Constraint::NonNegative),
            FieldSpec::number("price_per_unit", "Price per unit", Constraint::Positive),
            FieldSpec::number("variable_cost_per_unit", "Variable cost per unit", Constraint::NonNegative),
        ],
        compute: break_even,
    },
    Calculator {
        id: "discount",
        title: "Discount Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number("original_price", "Original price", Constraint::Positive),
            FieldSpec::number("discount_percent", "Discount (%)", Constraint::Range { min: 0.0, max: 100.0 }),
        ],
        compute: discount,
    },
    Calculator {
        id: "education-fund",
        title: "Education Fund Calculator",
        category: Category::Finance,
        fields: &[
            FieldSpec::number_or("current_savings", "Current savings", Constraint::NonNegative, 0.0),
            FieldSpec::number("monthly_contribution", "Monthly contribution", Constraint::NonNegative),
            FieldSpec::number("annual_return", "Expected annual return (%)", Constraint::Range { min: 0.0, max: 30.0 }),
            FieldSpec::number("years", "Years until college", Constraint::IntegerRange { min: 0, max: 40 }),
            FieldSpec::number("target_cost", "Target cost", Constraint::Positive).optional(),
        ],
        compute: education_fund,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EvalError, InputRecord, evaluate};
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn future_value_compounds_monthly() {
        let record = InputRecord::new()
            .with_number("present_value", 1_000.0)
            .with_number("annual_rate", 5.0)
            .with_number("periods_per_year", 12.0)
            .with_number("years", 10.0);
        let eval = evaluate("future-value", &record).expect("valid");
        assert_close(eval.number("future_value").expect("fv"), 1_647.01, 0.01);
        assert_close(eval.number("interest_earned").expect("interest"), 647.01, 0.01);
    }

    #[test]
    fn zero_years_leaves_principal_unchanged() {
        let record = InputRecord::new()
            .with_number("present_value", 250.0)
            .with_number("annual_rate", 7.0)
            .with_number("years", 0.0);
        let eval = evaluate("future-value", &record).expect("valid");
        assert_eq!(eval.number("future_value"), Some(250.0));
    }

    #[test]
    fn bond_at_coupon_equal_to_yield_prices_at_par() {
        let record = InputRecord::new()
            .with_number("coupon_rate", 5.0)
            .with_number("market_rate", 5.0)
            .with_number("years", 10.0);
        let eval = evaluate("bond-price", &record).expect("valid");
        assert_close(eval.number("price").expect("price"), 1_000.0, 1e-6);
        assert_eq!(eval.label("bond-pricing"), Some("Trading Near Par"));
    }

    #[test]
    fn bond_with_yield_above_coupon_trades_at_discount() {
        let record = InputRecord::new()
            .with_number("face_value", 1_000.0)
            .with_number("coupon_rate", 4.0)
            .with_number("market_rate", 6.0)
            .with_number("years", 5.0)
            .with_choice("frequency", "annual");
        let eval = evaluate("bond-price", &record).expect("valid");
        // 40 * annuity(6%, 5) + 1000 / 1.06^5
        assert_close(eval.number("price").expect("price"), 915.75, 0.01);
        assert_eq!(eval.label("bond-pricing"), Some("Trading at a Discount"));
    }

    #[test]
    fn zero_yield_bond_is_sum_of_cash_flows() {
        let record = InputRecord::new()
            .with_number("coupon_rate", 5.0)
            .with_number("market_rate", 0.0)
            .with_number("years", 2.0)
            .with_choice("frequency", "annual");
        let eval = evaluate("bond-price", &record).expect("valid");
        assert_close(eval.number("price").expect("price"), 1_100.0, 1e-9);
        assert_eq!(eval.label("bond-pricing"), Some("Trading at a Premium"));
    }

    #[test]
    fn even_payback_formats_years_and_months() {
        let record = InputRecord::new()
            .with_number("initial_investment", 500_000.0)
            .with_number("cash_flow", 100_000.0);
        let eval = evaluate("capital-payback", &record).expect("valid");
        assert_eq!(eval.text("payback"), Some("5 years and 0.0 months"));
        assert_eq!(eval.label("payback-speed"), Some("Slow Payback"));
    }

    #[test]
    fn even_payback_with_fractional_year() {
        let record = InputRecord::new()
            .with_number("initial_investment", 250_000.0)
            .with_number("cash_flow", 100_000.0);
        let eval = evaluate("capital-payback", &record).expect("valid");
        assert_eq!(eval.text("payback"), Some("2 years and 6.0 months"));
        assert_eq!(eval.label("payback-speed"), Some("Quick Payback"));
    }

    #[test]
    fn zero_even_cash_flow_falls_back_to_message() {
        let record = InputRecord::new()
            .with_number("initial_investment", 10_000.0)
            .with_number("cash_flow", 0.0);
        let eval = evaluate("capital-payback", &record).expect("valid");
        assert_eq!(eval.text("payback"), Some(PAYBACK_NOT_REACHED));
        assert_eq!(eval.number("payback_years"), None);
        assert!(eval.classifications.is_empty());
    }

    #[test]
    fn uneven_payback_interpolates_within_the_recovery_year() {
        let record = InputRecord::new()
            .with_number("initial_investment", 1_000.0)
            .with_choice("flow", "uneven")
            .with_list("cash_flows", &[300.0, 400.0, 600.0]);
        let eval = evaluate("capital-payback", &record).expect("valid");
        assert_close(eval.number("payback_years").expect("years"), 2.5, 1e-12);
        assert_eq!(eval.text("payback"), Some("2 years and 6.0 months"));
    }

    #[test]
    fn uneven_payback_never_recovered() {
        let record = InputRecord::new()
            .with_number("initial_investment", 1_000.0)
            .with_choice("flow", "uneven")
            .with_list("cash_flows", &[100.0, 200.0, 0.0, -50.0]);
        let eval = evaluate("capital-payback", &record).expect("valid");
        assert_eq!(
            eval.text("payback"),
            Some("Payback period is longer than the provided cash flows.")
        );
    }

    #[test]
    fn uneven_payback_requires_cash_flow_list() {
        let record = InputRecord::new()
            .with_number("initial_investment", 1_000.0)
            .with_choice("flow", "uneven");
        let err = evaluate("capital-payback", &record).expect_err("no flows");
        assert!(matches!(err, EvalError::Validation(ValidationError::Missing { .. })));
    }

    #[test]
    fn empty_balance_sheet_has_no_net_worth() {
        let record = InputRecord::new()
            .with_number("total_assets", 0.0)
            .with_number("total_liabilities", 0.0);
        let eval = evaluate("net-worth", &record).expect("valid");
        assert_eq!(eval.output("net_worth").map(|o| &o.value), Some(&crate::core::OutputValue::Null));
        assert!(eval.classifications.is_empty());
    }

    #[test]
    fn net_worth_classification_at_cut_points() {
        let cases = [
            (0.0, 10.0, "Negative Net Worth"),
            (10.0, 10.0, "Building Wealth"),
            (100_000.0, 0.0, "Solid Foundation"),
            (1_500_000.0, 500_000.0, "High Net Worth"),
        ];
        for (assets, liabilities, label) in cases {
            let record = InputRecord::new()
                .with_number("total_assets", assets)
                .with_number("total_liabilities", liabilities);
            let eval = evaluate("net-worth", &record).expect("valid");
            assert_eq!(eval.label("net-worth"), Some(label), "assets {assets}");
        }
    }

    #[test]
    fn liabilities_without_assets_have_no_ratio() {
        let record = InputRecord::new()
            .with_number("total_assets", 0.0)
            .with_number("total_liabilities", 5_000.0);
        let eval = evaluate("net-worth", &record).expect("valid");
        assert_eq!(eval.number("net_worth"), Some(-5_000.0));
        assert_eq!(eval.number("debt_to_asset"), None);
    }

    #[test]
    fn amortization_matches_standard_mortgage_payment() {
        let record = InputRecord::new()
            .with_number("principal", 200_000.0)
            .with_number("annual_rate", 6.0)
            .with_number("term_years", 30.0);
        let eval = evaluate("loan-amortization", &record).expect("valid");
        assert_close(eval.number("monthly_payment").expect("payment"), 1_199.10, 0.01);
        assert_eq!(eval.number("payments"), Some(360.0));
        let total_interest = eval.number("total_interest").expect("interest");
        assert_close(total_interest, 231_676.38, 1.0);
        assert_close(
            eval.number("total_paid").expect("paid"),
            200_000.0 + total_interest,
            1e-6,
        );
        assert_eq!(eval.label("interest-burden"), Some("High Interest Cost"));
    }

    #[test]
    fn zero_rate_loan_has_no_interest() {
        let record = InputRecord::new()
            .with_number("principal", 12_000.0)
            .with_number("annual_rate", 0.0)
            .with_number("term_years", 1.0);
        let eval = evaluate("loan-amortization", &record).expect("valid");
        assert_eq!(eval.number("monthly_payment"), Some(1_000.0));
        assert_eq!(eval.number("total_interest"), Some(0.0));
        assert_eq!(eval.label("interest-burden"), Some("Low Interest Cost"));
    }

    #[test]
    fn break_even_rounds_units_up() {
        let record = InputRecord::new()
            .with_number("fixed_costs", 10_000.0)
            .with_number("price_per_unit", 30.0)
            .with_number("variable_cost_per_unit", 17.0);
        let eval = evaluate("break-even", &record).expect("valid");
        assert_eq!(eval.number("break_even_units"), Some(770.0));
        assert_close(eval.number("break_even_revenue").expect("revenue"), 23_076.92, 0.01);
        assert_eq!(eval.label("contribution-margin"), Some("Healthy Margin"));
    }

    #[test]
    fn price_below_variable_cost_has_no_break_even() {
        let record = InputRecord::new()
            .with_number("fixed_costs", 10_000.0)
            .with_number("price_per_unit", 10.0)
            .with_number("variable_cost_per_unit", 12.0);
        let eval = evaluate("break-even", &record).expect("valid");
        assert_eq!(eval.number("break_even_units"), None);
        assert_eq!(eval.text("message"), Some(NO_BREAK_EVEN));
    }

    #[test]
    fn discount_labels_follow_the_percentage() {
        let cases = [
            (0.0, "Small Discount"),
            (10.0, "Moderate Discount"),
            (30.0, "Great Discount"),
            (100.0, "Huge Discount"),
        ];
        for (percent, label) in cases {
            let record = InputRecord::new()
                .with_number("original_price", 80.0)
                .with_number("discount_percent", percent);
            let eval = evaluate("discount", &record).expect("valid");
            assert_eq!(eval.label("discount-size"), Some(label));
            assert_close(eval.number("final_price").expect("price"), 80.0 * (1.0 - percent / 100.0), 1e-9);
        }
    }

    #[test]
    fn education_fund_without_growth_is_plain_saving() {
        let record = InputRecord::new()
            .with_number("current_savings", 1_000.0)
            .with_number("monthly_contribution", 100.0)
            .with_number("annual_return", 0.0)
            .with_number("years", 10.0)
            .with_number("target_cost", 26_000.0);
        let eval = evaluate("education-fund", &record).expect("valid");
        assert_close(eval.number("projected_balance").expect("balance"), 13_000.0, 1e-6);
        assert_close(eval.number("growth").expect("growth"), 0.0, 1e-6);
        assert_close(eval.number("coverage_percent").expect("coverage"), 50.0, 1e-9);
        assert_eq!(eval.label("fund-coverage"), Some("Partial Coverage"));
    }

    #[test]
    fn education_fund_without_target_skips_coverage() {
        let record = InputRecord::new()
            .with_number("monthly_contribution", 200.0)
            .with_number("annual_return", 6.0)
            .with_number("years", 18.0);
        let eval = evaluate("education-fund", &record).expect("valid");
        // Ordinary annuity: 200 * ((1 + 0.005)^216 - 1) / 0.005
        assert_close(eval.number("projected_balance").expect("balance"), 77_470.64, 0.5);
        assert!(eval.output("coverage_percent").is_none());
        assert!(eval.classifications.is_empty());
    }

    #[test]
    fn describe_payback_splits_fractional_years() {
        assert_eq!(describe_payback(3.25), "3 years and 3.0 months");
        assert_eq!(describe_payback(0.1), "0 years and 1.2 months");
    }

    #[test]
    fn months_that_round_to_a_full_year_carry_into_years() {
        assert_eq!(describe_payback(2.99999), "3 years and 0.0 months");
        let record = InputRecord::new()
            .with_number("initial_investment", 299_999.0)
            .with_number("cash_flow", 100_000.0);
        let eval = evaluate("capital-payback", &record).expect("valid");
        assert_eq!(eval.text("payback"), Some("3 years and 0.0 months"));
    }

    proptest! {
        #[test]
        fn prop_future_value_grows_with_rate(
            pv in 1.0f64..1_000_000.0,
            rate in 0.0f64..50.0,
            bump in 0.01f64..10.0,
            years in 1u32..40
        ) {
            let fv = |r: f64| {
                let record = InputRecord::new()
                    .with_number("present_value", pv)
                    .with_number("annual_rate", r)
                    .with_number("years", years as f64);
                evaluate("future-value", &record)
                    .expect("valid")
                    .number("future_value")
                    .expect("fv")
            };
            prop_assert!(fv(rate + bump) > fv(rate));
        }

        #[test]
        fn prop_uneven_payback_never_exceeds_flow_count(
            investment in 1.0f64..1_000_000.0,
            flows in proptest::collection::vec(0.0f64..500_000.0, 1..20)
        ) {
            if let Some(years) = uneven_payback_years(investment, &flows) {
                prop_assert!(years.is_finite());
                prop_assert!(years >= 0.0 && years <= flows.len() as f64);
            }
        }
    }
}
