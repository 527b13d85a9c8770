//! Jurisdiction tax rules (Finance Act 2024 defaults)
//!
//! Equity STCG is 20%, equity LTCG is 12.5% above a 1.25 lakh exemption, and
//! debt fund gains are taxed at the investor's slab rate regardless of holding
//! period.

pub mod loader;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadResult, TaxError};

pub const EQUITY_SHORT_TERM_RATE: f64 = 0.20;
pub const EQUITY_LONG_TERM_RATE: f64 = 0.125;
pub const LONG_TERM_EXEMPTION_LIMIT: f64 = 125_000.0;
pub const LONG_TERM_HOLDING_MONTHS: u32 = 12;

/// Rates and thresholds applied by the tax engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRules {
    /// Tax on equity gains held under the long-term threshold
    pub equity_short_term_rate: f64,

    /// Tax on equity gains above the exemption
    pub equity_long_term_rate: f64,

    /// Long-term gain exempt from tax, applied once to the projected gain
    pub long_term_exemption_limit: f64,

    /// Minimum holding period for equity long-term treatment
    pub long_term_holding_months: u32,

    /// Non-resident withholding on short-term equity gains
    pub withholding_short_term_rate: f64,

    /// Non-resident withholding on long-term equity gains (no exemption)
    pub withholding_long_term_rate: f64,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            equity_short_term_rate: EQUITY_SHORT_TERM_RATE,
            equity_long_term_rate: EQUITY_LONG_TERM_RATE,
            long_term_exemption_limit: LONG_TERM_EXEMPTION_LIMIT,
            long_term_holding_months: LONG_TERM_HOLDING_MONTHS,
            withholding_short_term_rate: EQUITY_SHORT_TERM_RATE,
            withholding_long_term_rate: EQUITY_LONG_TERM_RATE,
        }
    }
}

impl TaxRules {
    /// Load rules from the default CSV location
    pub fn from_csv() -> LoadResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RULES_PATH))
    }

    /// Load rules from a specific CSV file; missing keys keep their defaults
    pub fn from_csv_path(path: &Path) -> LoadResult<Self> {
        let table = loader::load_rule_table(path)?;
        Self::from_table(&table)
    }

    /// Build rules from a loaded key/value table
    ///
    /// `long_term_holding_months` must be a whole, non-negative month count.
    pub fn from_table(table: &HashMap<String, f64>) -> LoadResult<Self> {
        let mut rules = Self::default();

        for (key, &value) in table {
            match key.as_str() {
                "equity_short_term_rate" => rules.equity_short_term_rate = value,
                "equity_long_term_rate" => rules.equity_long_term_rate = value,
                "long_term_exemption_limit" => rules.long_term_exemption_limit = value,
                "long_term_holding_months" => rules.long_term_holding_months = whole_months(key, value)?,
                "withholding_short_term_rate" => rules.withholding_short_term_rate = value,
                "withholding_long_term_rate" => rules.withholding_long_term_rate = value,
                other => log::warn!("Ignoring unknown tax rule key: {}", other),
            }
        }

        Ok(rules)
    }

    /// Taxable long-term gain after the exemption
    pub fn taxable_long_term(&self, long_term_gains: f64) -> f64 {
        (long_term_gains - self.long_term_exemption_limit).max(0.0)
    }

    /// Whether an equity holding of `months` qualifies as long-term
    pub fn is_long_term(&self, months: u32) -> bool {
        months >= self.long_term_holding_months
    }
}

fn whole_months(key: &str, value: f64) -> LoadResult<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(TaxError::Parse {
            field: key.to_string(),
            value: value.to_string(),
        })
    }
}
