use serde::{Deserialize, Serialize};

use super::{
    FinanceError, MAX_TENURE_MONTHS, MAX_TENURE_YEARS, require_non_negative, require_tenure,
};

/// Share of monthly income banks allow for all EMIs together.
pub const MAX_EMI_SHARE_OF_INCOME: f64 = 0.4;
/// Buyers are assumed to bring a 20 % down payment.
pub const DOWN_PAYMENT_SHARE: f64 = 0.2;
/// Rate used when estimating the EMI of an eligible loan.
pub const REFERENCE_RATE_PCT: f64 = 8.5;

pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 12.0 / 100.0
}

/// Equated monthly installment for a loan of `principal` over `months`.
pub fn emi(principal: f64, annual_rate_pct: f64, months: u32) -> Result<f64, FinanceError> {
    let principal = require_non_negative("principal", principal)?;
    let annual_rate_pct = require_non_negative("annual rate", annual_rate_pct)?;
    let months = require_tenure("months", months, MAX_TENURE_MONTHS)?;
    Ok(emi_unchecked(principal, monthly_rate(annual_rate_pct), months))
}

fn emi_unchecked(principal: f64, r: f64, months: u32) -> f64 {
    if r == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + r).powi(months as i32);
    principal * r * growth / (growth - 1.0)
}

/// Loan amount a given EMI pays off: the EMI formula solved for principal.
fn principal_for_emi(emi: f64, r: f64, months: u32) -> f64 {
    if r == 0.0 {
        return emi * months as f64;
    }
    let growth = (1.0 + r).powi(months as i32);
    emi * (growth - 1.0) / (r * growth)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub emi: f64,
    pub months: u32,
    pub total_payment: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amortization {
    pub summary: LoanSummary,
    pub schedule: Vec<Installment>,
}

/// Month-by-month split of each EMI into interest and principal.
///
/// The final installment absorbs rounding drift so the balance ends at zero.
pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    months: u32,
) -> Result<Amortization, FinanceError> {
    let emi = emi(principal, annual_rate_pct, months)?;
    let r = monthly_rate(annual_rate_pct);

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(months as usize);
    for month in 1..=months {
        let interest = balance * r;
        let principal_part = if month == months { balance } else { (emi - interest).min(balance) };
        balance = (balance - principal_part).max(0.0);
        schedule.push(Installment {
            month,
            payment: principal_part + interest,
            principal: principal_part,
            interest,
            balance,
        });
    }

    let total_payment: f64 = schedule.iter().map(|i| i.payment).sum();
    Ok(Amortization {
        summary: LoanSummary {
            emi,
            months,
            total_payment,
            total_interest: total_payment - principal,
        },
        schedule,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordability {
    pub max_emi: f64,
    pub loan_amount: f64,
    pub affordable_price: f64,
}

/// Property price someone can afford from their income, rounded to rupees.
pub fn affordability(
    monthly_income: f64,
    existing_emis: f64,
    annual_rate_pct: f64,
    tenure_years: u32,
) -> Result<Affordability, FinanceError> {
    let monthly_income = require_non_negative("monthly income", monthly_income)?;
    let existing_emis = require_non_negative("existing EMIs", existing_emis)?;
    let annual_rate_pct = require_non_negative("annual rate", annual_rate_pct)?;
    let tenure_years = require_tenure("tenure", tenure_years, MAX_TENURE_YEARS)?;

    let max_emi = monthly_income * MAX_EMI_SHARE_OF_INCOME - existing_emis;
    if max_emi <= 0.0 {
        return Ok(Affordability {
            max_emi: 0.0,
            loan_amount: 0.0,
            affordable_price: 0.0,
        });
    }

    let loan_amount = principal_for_emi(max_emi, monthly_rate(annual_rate_pct), tenure_years * 12);
    Ok(Affordability {
        max_emi: max_emi.round(),
        loan_amount: loan_amount.round(),
        affordable_price: (loan_amount / (1.0 - DOWN_PAYMENT_SHARE)).round(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Employment {
    Salaried,
    SelfEmployed,
}

impl Employment {
    fn retirement_age(self) -> i64 {
        match self {
            Employment::Salaried => 60,
            Employment::SelfEmployed => 65,
        }
    }

    fn income_multiplier(self) -> f64 {
        match self {
            Employment::Salaried => 6.0,
            Employment::SelfEmployed => 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub max_loan: f64,
    pub max_tenure_years: u32,
    pub estimated_emi: f64,
}

/// Largest home loan a lender is likely to offer.
///
/// Tenure runs to retirement, clamped to 5..=30 years. Existing monthly
/// liabilities are charged for the whole tenure, and tenures under 20 years
/// scale the result down proportionally.
pub fn eligibility(
    annual_income: f64,
    age: u32,
    employment: Employment,
    monthly_liabilities: f64,
) -> Result<Eligibility, FinanceError> {
    let annual_income = require_non_negative("annual income", annual_income)?;
    let monthly_liabilities = require_non_negative("monthly liabilities", monthly_liabilities)?;

    let max_tenure_years = (employment.retirement_age() - age as i64).clamp(5, 30) as u32;

    let liability_burden = monthly_liabilities * 12.0 * max_tenure_years as f64;
    let base = (annual_income * employment.income_multiplier() - liability_burden).max(0.0);
    let max_loan = base * (max_tenure_years as f64 / 20.0).min(1.0);

    let estimated_emi = if max_loan > 0.0 {
        emi_unchecked(max_loan, monthly_rate(REFERENCE_RATE_PCT), max_tenure_years * 12)
    } else {
        0.0
    };

    Ok(Eligibility {
        max_loan: max_loan.round(),
        max_tenure_years,
        estimated_emi: estimated_emi.round(),
    })
}
