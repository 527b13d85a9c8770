//! Core tax engine: project the plan, split gains, apply rules

use chrono::{Months, NaiveDate};

use crate::profile::{ContributionMode, FundCategory, InvestmentProfile};
use crate::rules::TaxRules;
use super::installments::{Installment, Installments};
use super::result::{GainCategory, InstallmentRow, TaxProjection, TaxResult};

/// Configuration for a projection run
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Whether to keep the per-installment schedule
    pub detailed_output: bool,

    /// Date of the first contribution, used to label schedule rows
    pub start_date: Option<NaiveDate>,
}

/// Main tax engine
#[derive(Debug, Clone, Default)]
pub struct TaxEngine {
    rules: TaxRules,
    config: EngineConfig,
}

/// Running gain totals while walking installments
#[derive(Debug, Default)]
struct GainTotals {
    projected_value: f64,
    short_term: f64,
    long_term: f64,
}

impl TaxEngine {
    /// Create a new engine with given rules and config
    pub fn new(rules: TaxRules, config: EngineConfig) -> Self {
        Self { rules, config }
    }

    pub fn with_rules(rules: TaxRules) -> Self {
        Self::new(rules, EngineConfig::default())
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    /// Compute the tax result for a profile
    pub fn compute(&self, profile: &InvestmentProfile) -> TaxResult {
        self.run(profile, None)
    }

    /// Compute the tax result and, if configured, the installment schedule
    pub fn project(&self, profile: &InvestmentProfile) -> TaxProjection {
        let mut installments = Vec::new();
        let schedule = if self.config.detailed_output {
            Some(&mut installments)
        } else {
            None
        };
        let result = self.run(profile, schedule);

        TaxProjection { result, installments }
    }

    fn run(&self, profile: &InvestmentProfile, mut schedule: Option<&mut Vec<InstallmentRow>>) -> TaxResult {
        let mut totals = GainTotals::default();

        for installment in Installments::new(profile) {
            let category = self.classify(profile.fund_category, &installment);
            let gain = installment.gain();

            totals.projected_value += installment.final_value;
            match category {
                GainCategory::ShortTerm => totals.short_term += gain,
                GainCategory::LongTerm => totals.long_term += gain,
            }

            if let Some(rows) = schedule.as_deref_mut() {
                rows.push(InstallmentRow {
                    installment: installment.number,
                    remaining_months: installment.remaining_months,
                    contribution_date: self.contribution_date(profile.contribution_mode, installment.number),
                    contribution: installment.contribution,
                    final_value: installment.final_value,
                    gain,
                    category,
                });
            }
        }

        let total_invested = match profile.contribution_mode {
            ContributionMode::Periodic => profile.amount * profile.total_months() as f64,
            ContributionMode::LumpSum => profile.amount,
        };

        let result = self.apply_tax(profile, total_invested, &totals);
        log::debug!(
            "{} {} {}: invested={:.2} value={:.2} stcg={:.2} ltcg={:.2} tax={:.2}",
            profile.residency.as_str(),
            profile.fund_category.as_str(),
            profile.contribution_mode.as_str(),
            result.total_invested,
            result.total_projected_value,
            result.short_term_gains,
            result.long_term_gains,
            result.total_tax(),
        );
        result
    }

    /// Holding-period rule, applied to each installment on its own
    fn classify(&self, category: FundCategory, installment: &Installment) -> GainCategory {
        match category {
            FundCategory::Equity if self.rules.is_long_term(installment.remaining_months) => GainCategory::LongTerm,
            // Debt gains are slab-taxed whatever the holding period
            FundCategory::Equity | FundCategory::Debt => GainCategory::ShortTerm,
        }
    }

    fn apply_tax(&self, profile: &InvestmentProfile, total_invested: f64, totals: &GainTotals) -> TaxResult {
        let rules = &self.rules;
        let short_term_gains = totals.short_term;
        let long_term_gains = totals.long_term;

        let (short_term_tax, long_term_tax) = match profile.fund_category {
            FundCategory::Equity => (
                short_term_gains * rules.equity_short_term_rate,
                // Exemption applies once to the terminal gain, not per fiscal year
                rules.taxable_long_term(long_term_gains) * rules.equity_long_term_rate,
            ),
            FundCategory::Debt => (short_term_gains * profile.slab_rate(), 0.0),
        };

        let withholding_estimate = if profile.residency.is_non_resident() {
            match profile.fund_category {
                // TDS is deducted on the gross gain, before any exemption claim
                FundCategory::Equity => {
                    short_term_gains * rules.withholding_short_term_rate
                        + long_term_gains * rules.withholding_long_term_rate
                }
                FundCategory::Debt => (short_term_gains + long_term_gains) * profile.slab_rate(),
            }
        } else {
            0.0
        };

        TaxResult {
            total_invested,
            total_projected_value: totals.projected_value,
            total_gains: short_term_gains + long_term_gains,
            short_term_gains,
            long_term_gains,
            short_term_tax,
            long_term_tax,
            withholding_estimate,
            net_post_tax_value: totals.projected_value - (short_term_tax + long_term_tax),
            is_equity_category: profile.fund_category.is_equity(),
        }
    }

    fn contribution_date(&self, mode: ContributionMode, number: u32) -> Option<NaiveDate> {
        let start = self.config.start_date?;
        match mode {
            ContributionMode::Periodic => start.checked_add_months(Months::new(number - 1)),
            ContributionMode::LumpSum => Some(start),
        }
    }
}

/// Compute the tax result under the default rules
pub fn compute(profile: &InvestmentProfile) -> TaxResult {
    TaxEngine::default().compute(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Residency;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn debt_lump_sum() -> InvestmentProfile {
        InvestmentProfile::new(
            Residency::Resident,
            FundCategory::Debt,
            ContributionMode::LumpSum,
            50_000.0,
            5,
            8.0,
            30.0,
        )
    }

    fn assert_gains_reconcile(result: &TaxResult) {
        let expected = result.total_projected_value - result.total_invested;
        let split = result.short_term_gains + result.long_term_gains;
        assert_relative_eq!(split, expected, epsilon = 1e-9, max_relative = 1e-6);
    }

    #[test]
    fn test_equity_lump_sum_ten_years() {
        let profile = InvestmentProfile::equity_lump_sum(100_000.0, 10, 12.0);
        let result = compute(&profile);

        assert_abs_diff_eq!(result.total_projected_value, 310_584.82, epsilon = 0.01);
        assert_abs_diff_eq!(result.long_term_gains, 210_584.82, epsilon = 0.01);
        assert_abs_diff_eq!(
            TaxRules::default().taxable_long_term(result.long_term_gains),
            85_584.82,
            epsilon = 0.01
        );
        assert_abs_diff_eq!(result.long_term_tax, 10_698.10, epsilon = 0.01);
        assert_eq!(result.short_term_gains, 0.0);
        assert_eq!(result.short_term_tax, 0.0);
        assert_eq!(result.withholding_estimate, 0.0);
        assert!(result.is_equity_category);
        assert_eq!(result.long_term_gains, result.total_projected_value - result.total_invested);
    }

    #[test]
    fn test_debt_lump_sum_slab_taxed() {
        let result = compute(&debt_lump_sum());

        assert_abs_diff_eq!(result.total_projected_value, 73_466.40, epsilon = 0.01);
        assert_abs_diff_eq!(result.short_term_gains, 23_466.40, epsilon = 0.01);
        assert_abs_diff_eq!(result.short_term_tax, 7_039.92, epsilon = 0.01);
        assert_eq!(result.long_term_gains, 0.0);
        assert_eq!(result.long_term_tax, 0.0);
        assert!(!result.is_equity_category);
    }

    #[test]
    fn test_one_year_sip_is_all_short_term() {
        let mut profile = InvestmentProfile::equity_sip(10_000.0, 1, 12.0);
        profile.residency = Residency::NonResident;
        let result = compute(&profile);

        assert_eq!(result.total_invested, 120_000.0);
        assert_eq!(result.long_term_gains, 0.0);
        assert!(result.short_term_gains > 0.0);
        assert_eq!(result.withholding_estimate, result.short_term_gains * 0.20);
        assert_abs_diff_eq!(result.short_term_tax, result.short_term_gains * 0.20, epsilon = 1e-9);
        assert_gains_reconcile(&result);
    }

    #[test]
    fn test_sip_splits_installments_by_age() {
        let engine = TaxEngine::new(
            TaxRules::default(),
            EngineConfig { detailed_output: true, start_date: None },
        );
        let projection = engine.project(&InvestmentProfile::equity_sip(10_000.0, 3, 12.0));

        // 36 installments; the first 24 have at least 12 months left
        assert_eq!(projection.installments.len(), 36);
        assert_eq!(projection.long_term_installments().count(), 24);
        assert!(projection.result.long_term_gains > 0.0);
        assert!(projection.result.short_term_gains > 0.0);

        let schedule_ltcg: f64 = projection.long_term_installments().map(|r| r.gain).sum();
        assert_abs_diff_eq!(schedule_ltcg, projection.result.long_term_gains, epsilon = 1e-6);
        assert_gains_reconcile(&projection.result);
    }

    #[test]
    fn test_debt_never_long_term() {
        for mode in [ContributionMode::LumpSum, ContributionMode::Periodic] {
            let mut profile = debt_lump_sum();
            profile.contribution_mode = mode;
            profile.horizon_years = 15;
            profile.residency = Residency::NonResident;
            let result = compute(&profile);

            assert_eq!(result.long_term_gains, 0.0);
            assert_eq!(result.long_term_tax, 0.0);
            assert_abs_diff_eq!(result.withholding_estimate, result.short_term_gains * 0.30, epsilon = 1e-9);
            assert_gains_reconcile(&result);
        }
    }

    #[test]
    fn test_long_term_withholding_ignores_exemption() {
        let mut profile = InvestmentProfile::equity_lump_sum(100_000.0, 10, 12.0);
        profile.residency = Residency::NonResident;
        let result = compute(&profile);

        assert_abs_diff_eq!(result.withholding_estimate, result.long_term_gains * 0.125, epsilon = 1e-9);
        assert!(result.withholding_estimate > result.long_term_tax);
    }

    #[test]
    fn test_degenerate_inputs_yield_zero_tax() {
        let profiles = [
            InvestmentProfile::equity_lump_sum(0.0, 10, 12.0),
            InvestmentProfile::equity_lump_sum(100_000.0, 0, 12.0),
            InvestmentProfile::equity_sip(0.0, 5, 12.0),
            InvestmentProfile::equity_sip(5_000.0, 0, 12.0),
            InvestmentProfile::equity_lump_sum(0.0, 7_000, 12.0),
            InvestmentProfile::equity_sip(0.0, 600, 12.0),
        ];

        for profile in &profiles {
            let result = compute(profile);
            assert!(result.total_projected_value.is_finite(), "{:?}", profile);
            assert!(result.total_gains.is_finite(), "{:?}", profile);
            assert_eq!(result.total_projected_value, result.total_invested, "{:?}", profile);
            assert_eq!(result.short_term_tax, 0.0);
            assert_eq!(result.long_term_tax, 0.0);
            assert_eq!(result.withholding_estimate, 0.0);
            assert!(result.net_post_tax_value.is_finite());
        }
    }

    #[test]
    fn test_lump_sum_under_one_year_is_short_term() {
        let result = compute(&InvestmentProfile::equity_lump_sum(100_000.0, 0, 12.0));
        assert_eq!(result.long_term_gains, 0.0);
        assert_eq!(result.short_term_gains, 0.0);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut profile = InvestmentProfile::equity_sip(7_500.0, 7, 11.5);
        profile.residency = Residency::NonResident;

        let first = compute(&profile);
        let second = compute(&profile);
        assert_eq!(first.total_projected_value.to_bits(), second.total_projected_value.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_net_value_subtracts_tax_only() {
        let mut profile = InvestmentProfile::equity_sip(10_000.0, 5, 12.0);
        profile.residency = Residency::NonResident;
        let result = compute(&profile);

        assert_eq!(
            result.net_post_tax_value,
            result.total_projected_value - (result.short_term_tax + result.long_term_tax)
        );
        assert!(result.withholding_estimate > 0.0);
    }

    #[test]
    fn test_schedule_dates_step_monthly() {
        let engine = TaxEngine::new(
            TaxRules::default(),
            EngineConfig {
                detailed_output: true,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            },
        );
        let projection = engine.project(&InvestmentProfile::equity_sip(1_000.0, 1, 10.0));

        assert_eq!(projection.installments[0].contribution_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(projection.installments[1].contribution_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(projection.installments[11].contribution_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_summary_only_projection_has_no_schedule() {
        let projection = TaxEngine::default().project(&InvestmentProfile::equity_sip(1_000.0, 2, 10.0));
        assert!(projection.installments.is_empty());
    }

    #[test]
    fn test_schedule_csv_has_header_and_rows() {
        let engine = TaxEngine::new(
            TaxRules::default(),
            EngineConfig { detailed_output: true, start_date: None },
        );
        let projection = engine.project(&InvestmentProfile::equity_sip(1_000.0, 2, 10.0));

        let mut buf = Vec::new();
        projection.write_schedule_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 25);
        assert!(lines[0].starts_with("Installment,RemainingMonths"));
        assert!(lines[1].ends_with(",LTCG"));
        assert!(lines[24].ends_with(",STCG"));
    }
}
