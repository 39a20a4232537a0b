use serde::{Deserialize, Serialize};

use super::{FinanceError, MAX_TENURE_YEARS, emi, require_non_negative, require_tenure};

/// Registration and other one-off purchase costs, as a share of price.
const PURCHASE_COSTS_SHARE: f64 = 0.07;
/// Return assumed on a down payment invested instead of spent.
const INVESTMENT_CAGR: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentVsBuyInput {
    pub price: f64,
    pub monthly_rent: f64,
    pub years: u32,
    pub appreciation_pct: f64,
    pub rent_increase_pct: f64,
    pub down_payment_pct: f64,
    pub interest_rate_pct: f64,
}

impl Default for RentVsBuyInput {
    fn default() -> Self {
        RentVsBuyInput {
            price: 5_000_000.0,
            monthly_rent: 25_000.0,
            years: 10,
            appreciation_pct: 6.0,
            rent_increase_pct: 5.0,
            down_payment_pct: 20.0,
            interest_rate_pct: 8.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentVsBuy {
    pub emi: f64,
    pub total_emi_paid: f64,
    pub future_value: f64,
    pub total_buy_cost: f64,
    pub net_buy_cost: f64,
    pub total_rent_paid: f64,
    pub investment_returns: f64,
    pub net_rent_cost: f64,
    pub buy_is_better: bool,
    pub savings: f64,
}

/// Net cost of buying (down payment, EMIs and purchase costs minus the
/// appreciated value) against renting (escalating rent minus what the down
/// payment would have earned). The loan runs for the comparison period.
pub fn rent_vs_buy(input: &RentVsBuyInput) -> Result<RentVsBuy, FinanceError> {
    let price = require_non_negative("price", input.price)?;
    let rent = require_non_negative("monthly rent", input.monthly_rent)?;
    let years = require_tenure("years", input.years, MAX_TENURE_YEARS)?;
    let down_payment_pct = require_non_negative("down payment", input.down_payment_pct)?;
    if down_payment_pct > 100.0 {
        return Err(FinanceError::InvalidInput {
            field: "down payment",
            reason: "cannot exceed 100 %",
        });
    }

    let down_payment = price * down_payment_pct / 100.0;
    let months = years * 12;
    let emi = emi(price - down_payment, input.interest_rate_pct, months)?;
    let total_emi_paid = emi * months as f64;
    let future_value = price * (1.0 + input.appreciation_pct / 100.0).powi(years as i32);
    let total_buy_cost = down_payment + total_emi_paid + price * PURCHASE_COSTS_SHARE;
    let net_buy_cost = total_buy_cost - future_value;

    let mut total_rent_paid = 0.0;
    let mut current_rent = rent;
    for _ in 0..years {
        total_rent_paid += current_rent * 12.0;
        current_rent *= 1.0 + input.rent_increase_pct / 100.0;
    }
    let investment_returns = down_payment * (1.0 + INVESTMENT_CAGR).powi(years as i32);
    let net_rent_cost = total_rent_paid - (investment_returns - down_payment);

    Ok(RentVsBuy {
        emi: emi.round(),
        total_emi_paid: total_emi_paid.round(),
        future_value: future_value.round(),
        total_buy_cost: total_buy_cost.round(),
        net_buy_cost: net_buy_cost.round(),
        total_rent_paid: total_rent_paid.round(),
        investment_returns: investment_returns.round(),
        net_rent_cost: net_rent_cost.round(),
        buy_is_better: net_buy_cost < net_rent_cost,
        savings: (net_buy_cost - net_rent_cost).abs().round(),
    })
}
