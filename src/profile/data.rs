//! Investment profile matching the calculator input form

use serde::{Deserialize, Serialize};

use crate::error::TaxError;

/// Longest horizon accepted from outside callers
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Tax residency of the investor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Residency {
    Resident,
    /// Non-resident (NRI); withholding applies on redemption
    #[serde(alias = "NRI")]
    NonResident,
}

impl Residency {
    pub fn is_non_resident(&self) -> bool {
        matches!(self, Residency::NonResident)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Residency::Resident => "RESIDENT",
            Residency::NonResident => "NON_RESIDENT",
        }
    }
}

/// Fund category, which selects the tax regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundCategory {
    /// Equity-oriented fund: STCG/LTCG split with exemption
    Equity,
    /// Debt fund: all gains taxed at the investor's slab rate
    Debt,
}

impl FundCategory {
    pub fn is_equity(&self) -> bool {
        matches!(self, FundCategory::Equity)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundCategory::Equity => "EQUITY",
            FundCategory::Debt => "DEBT",
        }
    }
}

/// How the money goes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionMode {
    /// Monthly SIP installments
    #[serde(alias = "SIP")]
    Periodic,
    /// One-time investment
    #[serde(alias = "LUMPSUM")]
    LumpSum,
}

impl ContributionMode {
    pub fn is_periodic(&self) -> bool {
        matches!(self, ContributionMode::Periodic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionMode::Periodic => "PERIODIC",
            ContributionMode::LumpSum => "LUMP_SUM",
        }
    }
}

/// A single investment scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProfile {
    pub residency: Residency,

    pub fund_category: FundCategory,

    pub contribution_mode: ContributionMode,

    /// Monthly installment for SIPs, total principal for lump sums
    pub amount: f64,

    /// Number of years invested
    pub horizon_years: u32,

    /// Annualized nominal return assumption, in percent (12.0 = 12%)
    pub expected_annual_return_pct: f64,

    /// Marginal income-tax rate in percent (only used for debt funds)
    #[serde(default)]
    pub income_tax_slab_pct: f64,
}

impl InvestmentProfile {
    pub fn new(
        residency: Residency,
        fund_category: FundCategory,
        contribution_mode: ContributionMode,
        amount: f64,
        horizon_years: u32,
        expected_annual_return_pct: f64,
        income_tax_slab_pct: f64,
    ) -> Self {
        Self {
            residency,
            fund_category,
            contribution_mode,
            amount,
            horizon_years,
            expected_annual_return_pct,
            income_tax_slab_pct,
        }
    }

    /// Lump-sum equity profile for a resident investor
    pub fn equity_lump_sum(amount: f64, horizon_years: u32, expected_annual_return_pct: f64) -> Self {
        Self::new(
            Residency::Resident,
            FundCategory::Equity,
            ContributionMode::LumpSum,
            amount,
            horizon_years,
            expected_annual_return_pct,
            0.0,
        )
    }

    /// Monthly SIP into an equity fund for a resident investor
    pub fn equity_sip(monthly_amount: f64, horizon_years: u32, expected_annual_return_pct: f64) -> Self {
        Self::new(
            Residency::Resident,
            FundCategory::Equity,
            ContributionMode::Periodic,
            monthly_amount,
            horizon_years,
            expected_annual_return_pct,
            0.0,
        )
    }

    /// Annual return as a decimal rate
    pub fn annual_rate(&self) -> f64 {
        self.expected_annual_return_pct / 100.0
    }

    /// Slab rate as a decimal
    pub fn slab_rate(&self) -> f64 {
        self.income_tax_slab_pct / 100.0
    }

    /// Number of monthly installments for a SIP
    pub fn total_months(&self) -> u32 {
        self.horizon_years.saturating_mul(12)
    }

    /// Check the field constraints the engine relies on.
    ///
    /// The engine itself never rejects input; callers that accept profiles
    /// from outside (CLI, batch files, Lambda) run this first.
    pub fn validate(&self) -> Result<(), TaxError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(TaxError::InvalidProfile {
                field: "amount",
                reason: format!("must be a non-negative number, got {}", self.amount),
            });
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(TaxError::InvalidProfile {
                field: "horizon_years",
                reason: format!("must be at most {}, got {}", MAX_HORIZON_YEARS, self.horizon_years),
            });
        }
        if !self.expected_annual_return_pct.is_finite() || self.expected_annual_return_pct <= -100.0 {
            return Err(TaxError::InvalidProfile {
                field: "expected_annual_return_pct",
                reason: format!("must be greater than -100, got {}", self.expected_annual_return_pct),
            });
        }
        if !(0.0..=100.0).contains(&self.income_tax_slab_pct) {
            return Err(TaxError::InvalidProfile {
                field: "income_tax_slab_pct",
                reason: format!("must be within [0, 100], got {}", self.income_tax_slab_pct),
            });
        }
        Ok(())
    }
}
