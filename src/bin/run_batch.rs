//! Run tax projections for every profile in a CSV batch
//!
//! Usage: run_batch [profiles.csv] [output.csv]

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use fund_tax_system::profile::load_profiles;
use fund_tax_system::rules::loader::DEFAULT_RULES_PATH;
use fund_tax_system::scenario::ScenarioRunner;
use fund_tax_system::TaxError;

const DEFAULT_INPUT: &str = "data/sample_profiles.csv";
const DEFAULT_OUTPUT: &str = "batch_tax_output.csv";

/// Runner built from the rule file at `path`.
///
/// A missing file means the built-in rules; a file that exists but does not
/// load is an error.
fn load_runner(path: &Path) -> anyhow::Result<ScenarioRunner> {
    match ScenarioRunner::from_csv_path(path) {
        Ok(runner) => Ok(runner),
        Err(TaxError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            log::warn!("{} not found, using default tax rules", path.display());
            Ok(ScenarioRunner::new())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to load tax rules from {}", path.display()))),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string());
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let start = Instant::now();
    log::info!("Loading profiles from {}", input);
    let records = load_profiles(&input).with_context(|| format!("Failed to load profiles from {}", input))?;
    log::info!("Loaded {} profiles in {:?}", records.len(), start.elapsed());

    let runner = load_runner(Path::new(DEFAULT_RULES_PATH))?;

    let results = runner.run_batch(&records);
    log::info!("Projections complete in {:?}", start.elapsed());

    let file = File::create(&output).with_context(|| format!("Failed to create {}", output))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([
        "ProfileID",
        "Residency",
        "FundCategory",
        "ContributionMode",
        "TotalInvested",
        "ProjectedValue",
        "STCG",
        "LTCG",
        "STCGTax",
        "LTCGTax",
        "TDS",
        "NetPostTax",
    ])?;

    let mut total_tax = 0.0;
    for entry in &results {
        let r = &entry.result;
        total_tax += r.total_tax();
        writer.write_record([
            entry.profile_id.to_string(),
            entry.profile.residency.as_str().to_string(),
            entry.profile.fund_category.as_str().to_string(),
            entry.profile.contribution_mode.as_str().to_string(),
            format!("{:.2}", r.total_invested),
            format!("{:.2}", r.total_projected_value),
            format!("{:.2}", r.short_term_gains),
            format!("{:.2}", r.long_term_gains),
            format!("{:.2}", r.short_term_tax),
            format!("{:.2}", r.long_term_tax),
            format!("{:.2}", r.withholding_estimate),
            format!("{:.2}", r.net_post_tax_value),
        ])?;
    }
    writer.flush()?;

    println!("Processed {} profiles, total projected tax ₹{:.2}", results.len(), total_tax);
    println!("Output written to {}", output);
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
