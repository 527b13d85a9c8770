//! Output structures for tax projections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tax treatment of a gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GainCategory {
    /// STCG, or slab-taxed debt gains
    ShortTerm,
    /// LTCG (equity held past the threshold)
    LongTerm,
}

impl GainCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GainCategory::ShortTerm => "STCG",
            GainCategory::LongTerm => "LTCG",
        }
    }
}

/// Computed tax figures for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub total_invested: f64,
    pub total_projected_value: f64,
    pub total_gains: f64,
    pub short_term_gains: f64,
    pub long_term_gains: f64,
    pub short_term_tax: f64,
    pub long_term_tax: f64,
    /// Estimated TDS; zero for residents
    pub withholding_estimate: f64,
    /// Projected value less short- and long-term tax
    pub net_post_tax_value: f64,
    pub is_equity_category: bool,
}

impl TaxResult {
    pub fn total_tax(&self) -> f64 {
        self.short_term_tax + self.long_term_tax
    }

    /// Tax as a share of total gains (0 when there are no gains)
    pub fn effective_tax_rate(&self) -> f64 {
        if self.total_gains > 0.0 {
            self.total_tax() / self.total_gains
        } else {
            0.0
        }
    }
}

/// One row of the installment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRow {
    pub installment: u32,
    pub remaining_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_date: Option<NaiveDate>,
    pub contribution: f64,
    pub final_value: f64,
    pub gain: f64,
    pub category: GainCategory,
}

/// Result plus the optional per-installment breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxProjection {
    pub result: TaxResult,
    pub installments: Vec<InstallmentRow>,
}

impl TaxProjection {
    /// Installments whose gains qualify as long-term
    pub fn long_term_installments(&self) -> impl Iterator<Item = &InstallmentRow> {
        self.installments
            .iter()
            .filter(|row| row.category == GainCategory::LongTerm)
    }

    /// Write the schedule as CSV
    pub fn write_schedule_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record([
            "Installment",
            "RemainingMonths",
            "ContributionDate",
            "Contribution",
            "FinalValue",
            "Gain",
            "Category",
        ])?;

        for row in &self.installments {
            let date = row
                .contribution_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            out.write_record([
                row.installment.to_string(),
                row.remaining_months.to_string(),
                date,
                format!("{:.2}", row.contribution),
                format!("{:.2}", row.final_value),
                format!("{:.2}", row.gain),
                row.category.as_str().to_string(),
            ])?;
        }

        out.flush()?;
        Ok(())
    }
}
