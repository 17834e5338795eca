//! Cox-Ross-Rubinstein binomial option pricing.

use crate::core::error::ValidationError;
use crate::core::threshold::{ThresholdTable, band};
use crate::core::types::{Calculator, Category, Constraint, Evaluation, FieldSpec, Inputs, Output};

pub(crate) const MAX_STEPS: i64 = 100;

const STYLES: &[&str] = &["european", "american"];

pub(crate) static MONEYNESS: ThresholdTable = ThresholdTable::new(
    "moneyness",
    &[
        band(
            f64::NEG_INFINITY,
            "Out of the Money",
            "The stock trades below the strike: the call has only time value, the put has intrinsic value.",
        ),
        band(
            -5.0,
            "At the Money",
            "The stock trades close to the strike, where time value and sensitivity to volatility peak.",
        ),
        band(
            5.0,
            "In the Money",
            "The stock trades above the strike: the call carries intrinsic value, the put has only time value.",
        ),
    ],
);

#[derive(Debug, Clone, Copy)]
pub(crate) struct OptionContract {
    pub spot: f64,
    pub strike: f64,
    pub years: f64,
    pub rate: f64,
    pub volatility: f64,
    pub steps: u32,
    pub american: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OptionPrices {
    pub call: f64,
    pub put: f64,
}

fn call_payoff(spot: f64, strike: f64) -> f64 {
    (spot - strike).max(0.0)
}

fn put_payoff(spot: f64, strike: f64) -> f64 {
    (strike - spot).max(0.0)
}

pub(crate) fn price_binomial(contract: &OptionContract) -> Result<OptionPrices, ValidationError> {
    let steps = contract.steps.max(1);
    let dt = contract.years / steps as f64;
    let growth = (contract.rate * dt).exp();
    let discount = 1.0 / growth;
    let jump = contract.volatility * dt.sqrt();

    if jump < 1e-12 {
        return Ok(price_degenerate(contract, steps, growth, discount));
    }

    let up = jump.exp();
    let down = 1.0 / up;
    let p = (growth - down) / (up - down);
    if !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::invalid(
            "volatility",
            "too low for the interest rate at this step count; increase volatility or steps",
        ));
    }

    let node_spot = |step: u32, ups: u32| contract.spot * up.powi(ups as i32) * down.powi((step - ups) as i32);

    let mut calls: Vec<f64> = (0..=steps).map(|j| call_payoff(node_spot(steps, j), contract.strike)).collect();
    let mut puts: Vec<f64> = (0..=steps).map(|j| put_payoff(node_spot(steps, j), contract.strike)).collect();

    for step in (0..steps).rev() {
        for j in 0..=step {
            let j_idx = j as usize;
            let call = discount * (p * calls[j_idx + 1] + (1.0 - p) * calls[j_idx]);
            let put = discount * (p * puts[j_idx + 1] + (1.0 - p) * puts[j_idx]);
            if contract.american {
                let spot = node_spot(step, j);
                calls[j_idx] = call.max(call_payoff(spot, contract.strike));
                puts[j_idx] = put.max(put_payoff(spot, contract.strike));
            } else {
                calls[j_idx] = call;
                puts[j_idx] = put;
            }
        }
    }

    Ok(OptionPrices {
        call: calls[0],
        put: puts[0],
    })
}

// Zero volatility collapses the tree to the forward path S * e^{r t}.
fn price_degenerate(contract: &OptionContract, steps: u32, growth: f64, discount: f64) -> OptionPrices {
    let at_step = |i: u32| {
        let spot = contract.spot * growth.powi(i as i32);
        let df = discount.powi(i as i32);
        (df * call_payoff(spot, contract.strike), df * put_payoff(spot, contract.strike))
    };

    if !contract.american {
        let (call, put) = at_step(steps);
        return OptionPrices { call, put };
    }

    (0..=steps).map(at_step).fold(OptionPrices { call: 0.0, put: 0.0 }, |best, (call, put)| {
        OptionPrices {
            call: best.call.max(call),
            put: best.put.max(put),
        }
    })
}

fn binomial_option(inputs: &Inputs, eval: &mut Evaluation) -> Result<(), ValidationError> {
    let contract = OptionContract {
        spot: inputs.number("stock_price")?,
        strike: inputs.number("strike_price")?,
        years: inputs.number("years_to_expiry")?,
        rate: inputs.number("risk_free_rate")? / 100.0,
        volatility: inputs.number("volatility")? / 100.0,
        steps: inputs.count("steps")?,
        american: inputs.choice("style")? == "american",
    };
    let prices = price_binomial(&contract)?;

    eval.push(Output::number("call_price", "Call option price", prices.call, 4));
    eval.push(Output::number("put_price", "Put option price", prices.put, 4));
    eval.classify(MONEYNESS.classification((contract.spot / contract.strike - 1.0) * 100.0)?);
    Ok(())
}

pub(crate) static CALCULATORS: [Calculator; 1] = [Calculator {
    id: "binomial-option",
    title: "Binomial Option Pricing Calculator",
    category: Category::Finance,
    fields: &[
        FieldSpec::number("stock_price", "Current stock price", Constraint::Positive),
        FieldSpec::number("strike_price", "Strike price", Constraint::Positive),
        FieldSpec::number_or("years_to_expiry", "Time to expiry (years)", Constraint::Positive, 1.0),
        FieldSpec::number("risk_free_rate", "Risk-free rate (%)", Constraint::Range { min: 0.0, max: 100.0 }),
        FieldSpec::number("volatility", "Volatility (%)", Constraint::Range { min: 0.0, max: 500.0 }),
        FieldSpec::number_or("steps", "Number of steps", Constraint::IntegerRange { min: 1, max: MAX_STEPS }, 50.0),
        FieldSpec::choice_or("style", "Exercise style", STYLES, "european"),
    ],
    compute: binomial_option,
}];
