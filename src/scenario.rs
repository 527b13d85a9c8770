//! Scenario runner for batch and sensitivity runs
//!
//! Holds one set of tax rules and runs many profiles or return assumptions
//! against it without re-reading the rule file.

use rayon::prelude::*;

use crate::profile::{InvestmentProfile, ProfileRecord};
use crate::projection::{EngineConfig, TaxEngine, TaxProjection, TaxResult};
use crate::rules::TaxRules;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for pct in [8.0, 10.0, 12.0] {
///     let mut profile = base.clone();
///     profile.expected_annual_return_pct = pct;
///     let result = runner.run(&profile);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: TaxEngine,
}

/// Result of one batch entry
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub profile_id: u32,
    pub profile: InvestmentProfile,
    pub result: TaxResult,
}

impl ScenarioRunner {
    /// Create runner with the default rules
    pub fn new() -> Self {
        Self::with_rules(TaxRules::default())
    }

    /// Create runner by loading rules from the default CSV file
    pub fn from_csv() -> crate::error::LoadResult<Self> {
        Ok(Self::with_rules(TaxRules::from_csv()?))
    }

    /// Create runner from a specific rule file
    pub fn from_csv_path(path: &std::path::Path) -> crate::error::LoadResult<Self> {
        Ok(Self::with_rules(TaxRules::from_csv_path(path)?))
    }

    pub fn with_rules(rules: TaxRules) -> Self {
        Self {
            engine: TaxEngine::with_rules(rules),
        }
    }

    /// Compute a single profile
    pub fn run(&self, profile: &InvestmentProfile) -> TaxResult {
        self.engine.compute(profile)
    }

    /// Compute a single profile with its installment schedule
    pub fn run_detailed(&self, profile: &InvestmentProfile, config: EngineConfig) -> TaxProjection {
        let engine = TaxEngine::new(self.engine.rules().clone(), config);
        engine.project(profile)
    }

    /// Compute many profiles in parallel, preserving input order
    pub fn run_batch(&self, records: &[ProfileRecord]) -> Vec<BatchResult> {
        records
            .par_iter()
            .map(|record| BatchResult {
                profile_id: record.profile_id,
                profile: record.profile.clone(),
                result: self.engine.compute(&record.profile),
            })
            .collect()
    }

    /// Run one profile across several return assumptions (percent)
    pub fn run_return_sweep(&self, profile: &InvestmentProfile, returns_pct: &[f64]) -> Vec<TaxResult> {
        returns_pct
            .iter()
            .map(|&pct| {
                let mut scenario = profile.clone();
                scenario.expected_annual_return_pct = pct;
                self.engine.compute(&scenario)
            })
            .collect()
    }

    pub fn rules(&self) -> &TaxRules {
        self.engine.rules()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{load_profiles_from_reader, ContributionMode, FundCategory, Residency};

    #[test]
    fn test_return_sweep_is_monotonic() {
        let runner = ScenarioRunner::new();
        let returns = [-5.0, 0.0, 4.0, 8.0, 12.0, 15.0, 25.0];

        for mode in [ContributionMode::LumpSum, ContributionMode::Periodic] {
            for category in [FundCategory::Equity, FundCategory::Debt] {
                let profile =
                    InvestmentProfile::new(Residency::Resident, category, mode, 5_000.0, 6, 0.0, 20.0);
                let results = runner.run_return_sweep(&profile, &returns);

                assert_eq!(results.len(), returns.len());
                for pair in results.windows(2) {
                    assert!(pair[1].total_projected_value >= pair[0].total_projected_value);
                }
            }
        }
    }

    #[test]
    fn test_non_negative_return_never_loses_principal() {
        let runner = ScenarioRunner::new();
        let profile = InvestmentProfile::equity_sip(2_500.0, 4, 0.0);

        for result in runner.run_return_sweep(&profile, &[0.0, 0.5, 9.0]) {
            assert!(result.total_projected_value >= result.total_invested);
            assert!(result.short_term_tax >= 0.0);
            assert!(result.long_term_tax >= 0.0);
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let csv = "\
ProfileID,Residency,FundCategory,ContributionMode,Amount,HorizonYears,ExpectedReturnPct,TaxSlabPct
10,RESIDENT,EQUITY,LUMPSUM,100000,10,12,
20,RESIDENT,DEBT,LUMPSUM,50000,5,8,30
30,NRI,EQUITY,SIP,10000,1,12,
";
        let records = load_profiles_from_reader(csv.as_bytes()).unwrap();
        let runner = ScenarioRunner::new();
        let results = runner.run_batch(&records);

        let ids: Vec<_> = results.iter().map(|r| r.profile_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(results[0].result, runner.run(&records[0].profile));
        assert!(results[2].result.withholding_estimate > 0.0);
    }

    #[test]
    fn test_custom_rules_change_exemption() {
        let rules = TaxRules { long_term_exemption_limit: 0.0, ..TaxRules::default() };
        let runner = ScenarioRunner::with_rules(rules);
        let result = runner.run(&InvestmentProfile::equity_lump_sum(100_000.0, 10, 12.0));

        assert!((result.long_term_tax - result.long_term_gains * 0.125).abs() < 1e-9);
    }
}
