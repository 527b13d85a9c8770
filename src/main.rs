//! Fund Tax CLI
//!
//! Command-line interface for projecting mutual-fund capital-gains tax

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use fund_tax_system::advisory::{Advisor, AdvisoryConfig, GeminiAdvisor};
use fund_tax_system::projection::{EngineConfig, TaxEngine};
use fund_tax_system::{ContributionMode, FundCategory, InvestmentProfile, Residency, TaxRules};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResidencyArg {
    Resident,
    Nri,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FundArg {
    Equity,
    Debt,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Sip,
    LumpSum,
}

#[derive(Debug, Parser)]
#[command(name = "fund-tax", version, about = "Project capital-gains tax on a mutual-fund plan")]
struct Cli {
    /// Investor residency
    #[arg(long, value_enum, default_value = "resident")]
    residency: ResidencyArg,

    /// Fund category
    #[arg(long, value_enum, default_value = "equity")]
    fund: FundArg,

    /// Contribution mode
    #[arg(long, value_enum, default_value = "sip")]
    mode: ModeArg,

    /// Monthly installment (SIP) or total principal (lump sum)
    #[arg(long, default_value_t = 10_000.0)]
    amount: f64,

    /// Investment horizon in years
    #[arg(long, default_value_t = 5)]
    years: u32,

    /// Expected annual return in percent
    #[arg(long = "return", default_value_t = 12.0)]
    expected_return: f64,

    /// Income-tax slab rate in percent (debt funds)
    #[arg(long, default_value_t = 30.0)]
    slab: f64,

    /// Tax rules CSV (Key,Value); defaults are used if omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Write the installment schedule to this CSV file
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// First contribution date (YYYY-MM-DD) for schedule rows
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Ask the advisory provider for planning commentary
    #[arg(long)]
    advice: bool,
}

impl Cli {
    fn profile(&self) -> InvestmentProfile {
        InvestmentProfile::new(
            match self.residency {
                ResidencyArg::Resident => Residency::Resident,
                ResidencyArg::Nri => Residency::NonResident,
            },
            match self.fund {
                FundArg::Equity => FundCategory::Equity,
                FundArg::Debt => FundCategory::Debt,
            },
            match self.mode {
                ModeArg::Sip => ContributionMode::Periodic,
                ModeArg::LumpSum => ContributionMode::LumpSum,
            },
            self.amount,
            self.years,
            self.expected_return,
            self.slab,
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let profile = cli.profile();
    profile.validate().context("Invalid investment profile")?;

    let rules = match &cli.rules {
        Some(path) => TaxRules::from_csv_path(path)
            .with_context(|| format!("Failed to load tax rules from {}", path.display()))?,
        None => TaxRules::default(),
    };

    let config = EngineConfig {
        detailed_output: cli.schedule.is_some(),
        start_date: cli.start_date,
    };
    let projection = TaxEngine::new(rules, config).project(&profile);
    let result = &projection.result;

    println!("Fund Tax Projection");
    println!("===================\n");
    println!("Profile:");
    println!("  Residency:     {}", profile.residency.as_str());
    println!("  Fund:          {}", profile.fund_category.as_str());
    println!("  Mode:          {}", profile.contribution_mode.as_str());
    println!("  Amount:        ₹{:.2}", profile.amount);
    println!("  Horizon:       {} years", profile.horizon_years);
    println!("  Return:        {:.2}%", profile.expected_annual_return_pct);
    if !profile.fund_category.is_equity() {
        println!("  Slab rate:     {:.2}%", profile.income_tax_slab_pct);
    }
    println!();

    println!("Results:");
    println!("  Total invested:   ₹{:>14.2}", result.total_invested);
    println!("  Projected value:  ₹{:>14.2}", result.total_projected_value);
    println!("  STCG:             ₹{:>14.2}", result.short_term_gains);
    println!("  LTCG:             ₹{:>14.2}", result.long_term_gains);
    println!("  STCG tax:         ₹{:>14.2}", result.short_term_tax);
    println!("  LTCG tax:         ₹{:>14.2}", result.long_term_tax);
    if profile.residency.is_non_resident() {
        println!("  TDS (estimated):  ₹{:>14.2}", result.withholding_estimate);
    }
    println!("  Net post-tax:     ₹{:>14.2}", result.net_post_tax_value);
    println!("  Effective rate:    {:>13.2}%", result.effective_tax_rate() * 100.0);

    if let Some(path) = &cli.schedule {
        let file = File::create(path)
            .with_context(|| format!("Unable to create schedule file {}", path.display()))?;
        projection.write_schedule_csv(file)?;
        println!("\nInstallment schedule ({} rows) written to: {}", projection.installments.len(), path.display());
    }

    if cli.advice {
        let advisor = GeminiAdvisor::new(AdvisoryConfig::from_env())?;
        let outcome = advisor.advise(&profile, result).await;
        println!("\nAdvice:\n{}", outcome.text());
    }

    Ok(())
}
