//! Prompt text sent to the advisory provider

use crate::profile::{ContributionMode, InvestmentProfile};
use crate::projection::TaxResult;

/// Build the planning-advice prompt for a profile and its computed result
pub fn build_prompt(profile: &InvestmentProfile, result: &TaxResult) -> String {
    let investor = if profile.residency.is_non_resident() {
        "Non-Resident Indian (NRI)"
    } else {
        "Resident Indian"
    };
    let cadence = match profile.contribution_mode {
        ContributionMode::Periodic => "per month",
        ContributionMode::LumpSum => "one-time",
    };
    let mode = match profile.contribution_mode {
        ContributionMode::Periodic => "SIP",
        ContributionMode::LumpSum => "LUMPSUM",
    };

    format!(
        "Act as an expert Indian Tax Consultant. Based on the following Mutual Fund investment scenario, \
provide a brief (max 200 words) strategic advice on tax planning.

User Profile: {investor}
Fund Type: {fund}
Investment Type: {mode}
Duration: {years} years
Amount: {amount} {cadence}

Calculated Results:
Total Gains: ₹{gains}
STCG Tax: ₹{stcg}
LTCG Tax: ₹{ltcg}
TDS (Estimated): ₹{tds}

Mention specifics about:
1. Finance Act 2024 changes (Equity STCG 20%, LTCG 12.5%, 1.25L exemption).
2. Tax harvesting strategies if applicable.
3. Repatriation (if NRI).
4. Debt fund tax parity with slab rates.
",
        fund = profile.fund_category.as_str(),
        years = profile.horizon_years,
        amount = format_inr(profile.amount),
        gains = format_inr(result.total_gains),
        stcg = format_inr(result.short_term_tax),
        ltcg = format_inr(result.long_term_tax),
        tds = format_inr(result.withholding_estimate),
    )
}

/// Format a rupee amount with Indian digit grouping (12,34,567)
pub fn format_inr(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        if end > 0 {
            groups.push(&head[..end]);
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
