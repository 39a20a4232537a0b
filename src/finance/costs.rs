use serde::{Deserialize, Serialize};

use super::{FinanceError, require_non_negative};

/// Stamp duty is often discounted for women buyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Buyer {
    Male,
    Female,
}

/// Approximate stamp duty and registration percentages for one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateRates {
    pub key: &'static str,
    pub name: &'static str,
    pub male_pct: f64,
    pub female_pct: f64,
    pub registration_pct: f64,
}

const fn state(
    key: &'static str,
    name: &'static str,
    male_pct: f64,
    female_pct: f64,
    registration_pct: f64,
) -> StateRates {
    StateRates {
        key,
        name,
        male_pct,
        female_pct,
        registration_pct,
    }
}

pub static STATE_RATES: [StateRates; 31] = [
    state("maharashtra", "Maharashtra", 6.0, 5.0, 1.0),
    state("karnataka", "Karnataka", 5.6, 5.6, 1.0),
    state("delhi", "Delhi NCR", 6.0, 4.0, 1.0),
    state("tamilnadu", "Tamil Nadu", 7.0, 7.0, 1.0),
    state("gujarat", "Gujarat", 4.9, 4.9, 1.0),
    state("rajasthan", "Rajasthan", 6.0, 5.0, 1.0),
    state("telangana", "Telangana", 6.0, 6.0, 0.5),
    state("westbengal", "West Bengal", 7.0, 6.0, 1.0),
    state("uttarpradesh", "Uttar Pradesh", 7.0, 6.0, 1.0),
    state("haryana", "Haryana", 7.0, 5.0, 1.0),
    state("kerala", "Kerala", 8.0, 8.0, 2.0),
    state("andhrapradesh", "Andhra Pradesh", 7.5, 7.5, 1.0),
    state("madhyapradesh", "Madhya Pradesh", 7.5, 7.5, 1.0),
    state("punjab", "Punjab", 7.0, 7.0, 1.0),
    state("bihar", "Bihar", 6.0, 5.7, 2.0),
    state("odisha", "Odisha", 5.0, 4.0, 1.0),
    state("goa", "Goa", 4.0, 3.5, 1.0),
    state("assam", "Assam", 8.0, 8.0, 1.0),
    state("chhattisgarh", "Chhattisgarh", 5.0, 4.0, 1.0),
    state("jharkhand", "Jharkhand", 4.0, 4.0, 1.0),
    state("uttarakhand", "Uttarakhand", 5.0, 3.75, 2.0),
    state("himachalpradesh", "Himachal Pradesh", 6.0, 4.0, 1.0),
    state("tripura", "Tripura", 5.0, 5.0, 1.0),
    state("meghalaya", "Meghalaya", 9.9, 9.9, 1.0),
    state("manipur", "Manipur", 7.0, 7.0, 1.0),
    state("nagaland", "Nagaland", 8.25, 8.25, 1.0),
    state("arunachalpradesh", "Arunachal Pradesh", 6.0, 6.0, 1.0),
    state("mizoram", "Mizoram", 9.0, 9.0, 1.0),
    state("sikkim", "Sikkim", 5.0, 4.0, 1.0),
    state("jammukashmir", "Jammu & Kashmir", 7.0, 5.0, 1.0),
    state("chandigarh", "Chandigarh", 6.0, 6.0, 1.0),
];

pub fn state_rates(key: &str) -> Option<&'static StateRates> {
    STATE_RATES.iter().find(|rates| rates.key == key)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampDuty {
    pub stamp_duty: f64,
    pub registration: f64,
    pub total: f64,
}

pub fn stamp_duty(price: f64, state_key: &str, buyer: Buyer) -> Result<StampDuty, FinanceError> {
    let price = require_non_negative("price", price)?;
    let rates = state_rates(state_key)
        .ok_or_else(|| FinanceError::UnknownRegion(state_key.to_string()))?;

    let rate = match buyer {
        Buyer::Male => rates.male_pct,
        Buyer::Female => rates.female_pct,
    };
    let stamp_duty = price * rate / 100.0;
    let registration = price * rates.registration_pct / 100.0;
    Ok(StampDuty {
        stamp_duty,
        registration,
        total: stamp_duty + registration,
    })
}

/// Customary security deposit, in months of rent, for one city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepositNorm {
    pub key: &'static str,
    pub name: &'static str,
    pub min_months: u32,
    pub max_months: u32,
    pub typical_months: u32,
}

const fn city(
    key: &'static str,
    name: &'static str,
    min_months: u32,
    max_months: u32,
    typical_months: u32,
) -> DepositNorm {
    DepositNorm {
        key,
        name,
        min_months,
        max_months,
        typical_months,
    }
}

pub static DEPOSIT_NORMS: [DepositNorm; 8] = [
    city("mumbai", "Mumbai", 3, 6, 4),
    city("bangalore", "Bangalore", 10, 11, 10),
    city("delhi", "Delhi NCR", 2, 3, 2),
    city("hyderabad", "Hyderabad", 2, 3, 2),
    city("chennai", "Chennai", 3, 6, 3),
    city("pune", "Pune", 2, 4, 3),
    city("kolkata", "Kolkata", 2, 3, 2),
    city("ahmedabad", "Ahmedabad", 2, 3, 2),
];

pub fn deposit_norm(key: &str) -> Option<&'static DepositNorm> {
    DEPOSIT_NORMS.iter().find(|norm| norm.key == key)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEstimate {
    pub min_deposit: f64,
    pub max_deposit: f64,
    pub typical_deposit: f64,
    pub broker_fee: f64,
    pub advance_rent: f64,
    /// Typical deposit plus one month brokerage and one month advance.
    pub total_move_in: f64,
}

pub fn rental_deposit(monthly_rent: f64, city_key: &str) -> Result<DepositEstimate, FinanceError> {
    let rent = require_non_negative("monthly rent", monthly_rent)?;
    let norm = deposit_norm(city_key)
        .ok_or_else(|| FinanceError::UnknownRegion(city_key.to_string()))?;

    let typical_deposit = rent * norm.typical_months as f64;
    Ok(DepositEstimate {
        min_deposit: rent * norm.min_months as f64,
        max_deposit: rent * norm.max_months as f64,
        typical_deposit,
        broker_fee: rent,
        advance_rent: rent,
        total_move_in: typical_deposit + 2.0 * rent,
    })
}
