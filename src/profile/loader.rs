//! Load investment profiles from a CSV batch file

use super::{ContributionMode, FundCategory, InvestmentProfile, Residency};
use crate::error::{LoadResult, TaxError};
use csv::Reader;
use std::path::Path;

/// A profile together with the identifier it carried in the input file
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub profile_id: u32,
    pub profile: InvestmentProfile,
}

/// Raw CSV row matching the batch input columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ProfileID")]
    profile_id: u32,
    #[serde(rename = "Residency")]
    residency: String,
    #[serde(rename = "FundCategory")]
    fund_category: String,
    #[serde(rename = "ContributionMode")]
    contribution_mode: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "HorizonYears")]
    horizon_years: u32,
    #[serde(rename = "ExpectedReturnPct")]
    expected_return_pct: f64,
    #[serde(rename = "TaxSlabPct", default)]
    tax_slab_pct: Option<f64>,
}

impl CsvRow {
    fn into_record(self) -> LoadResult<ProfileRecord> {
        let residency = match self.residency.trim().to_ascii_uppercase().as_str() {
            "RESIDENT" => Residency::Resident,
            "NRI" | "NON_RESIDENT" => Residency::NonResident,
            other => {
                return Err(TaxError::UnknownVariant { kind: "Residency", value: other.to_string() })
            }
        };

        let fund_category = match self.fund_category.trim().to_ascii_uppercase().as_str() {
            "EQUITY" => FundCategory::Equity,
            "DEBT" => FundCategory::Debt,
            other => {
                return Err(TaxError::UnknownVariant { kind: "FundCategory", value: other.to_string() })
            }
        };

        let contribution_mode = match self.contribution_mode.trim().to_ascii_uppercase().as_str() {
            "SIP" | "PERIODIC" => ContributionMode::Periodic,
            "LUMPSUM" | "LUMP_SUM" => ContributionMode::LumpSum,
            other => {
                return Err(TaxError::UnknownVariant {
                    kind: "ContributionMode",
                    value: other.to_string(),
                })
            }
        };

        let profile = InvestmentProfile {
            residency,
            fund_category,
            contribution_mode,
            amount: self.amount,
            horizon_years: self.horizon_years,
            expected_annual_return_pct: self.expected_return_pct,
            income_tax_slab_pct: self.tax_slab_pct.unwrap_or(0.0),
        };
        profile.validate()?;

        Ok(ProfileRecord { profile_id: self.profile_id, profile })
    }
}

/// Load all profiles from a CSV file
pub fn load_profiles<P: AsRef<Path>>(path: P) -> LoadResult<Vec<ProfileRecord>> {
    let reader = Reader::from_path(path)?;
    collect_records(reader)
}

/// Load profiles from any reader (e.g., string buffer, request body)
pub fn load_profiles_from_reader<R: std::io::Read>(reader: R) -> LoadResult<Vec<ProfileRecord>> {
    collect_records(Reader::from_reader(reader))
}

fn collect_records<R: std::io::Read>(mut reader: Reader<R>) -> LoadResult<Vec<ProfileRecord>> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ProfileID,Residency,FundCategory,ContributionMode,Amount,HorizonYears,ExpectedReturnPct,TaxSlabPct
1,RESIDENT,EQUITY,LUMPSUM,100000,10,12,
2,RESIDENT,DEBT,LUMPSUM,50000,5,8,30
3,NRI,EQUITY,SIP,10000,1,12,
";

    #[test]
    fn test_load_profiles_from_reader() {
        let records = load_profiles_from_reader(SAMPLE.as_bytes()).expect("Failed to load profiles");
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].profile_id, 1);
        assert_eq!(records[0].profile.contribution_mode, ContributionMode::LumpSum);
        assert_eq!(records[0].profile.income_tax_slab_pct, 0.0);

        assert_eq!(records[1].profile.fund_category, FundCategory::Debt);
        assert_eq!(records[1].profile.income_tax_slab_pct, 30.0);

        assert_eq!(records[2].profile.residency, Residency::NonResident);
        assert_eq!(records[2].profile.contribution_mode, ContributionMode::Periodic);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let csv = "\
ProfileID,Residency,FundCategory,ContributionMode,Amount,HorizonYears,ExpectedReturnPct,TaxSlabPct
7,RESIDENT,HYBRID,SIP,1000,3,10,20
";
        let err = load_profiles_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TaxError::UnknownVariant { kind: "FundCategory", .. }));
    }
}
