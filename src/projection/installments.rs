//! Per-installment growth and holding-period tracking

use crate::profile::{ContributionMode, InvestmentProfile};

/// One contribution as seen at the end of the horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Installment {
    /// Installment number (1-indexed)
    pub number: u32,

    /// Months the contribution stays invested
    pub remaining_months: u32,

    /// Amount contributed
    pub contribution: f64,

    /// Value at the end of the horizon
    pub final_value: f64,
}

impl Installment {
    pub fn gain(&self) -> f64 {
        self.final_value - self.contribution
    }
}

/// Lazily yields the installments of a plan.
///
/// A SIP yields one installment per month, made at the start of the month and
/// compounded monthly at `r / 12`. A lump sum yields a single installment
/// compounded annually over the whole horizon.
#[derive(Debug, Clone)]
pub struct Installments {
    mode: ContributionMode,
    amount: f64,
    horizon_years: u32,
    annual_rate: f64,
    total_months: u32,
    next: u32,
}

impl Installments {
    pub fn new(profile: &InvestmentProfile) -> Self {
        Self {
            mode: profile.contribution_mode,
            amount: profile.amount,
            horizon_years: profile.horizon_years,
            annual_rate: profile.annual_rate(),
            total_months: profile.total_months(),
            next: 1,
        }
    }

    fn installment_count(&self) -> u32 {
        match self.mode {
            ContributionMode::Periodic => self.total_months,
            ContributionMode::LumpSum => 1,
        }
    }
}

impl Iterator for Installments {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.next > self.installment_count() {
            return None;
        }
        let number = self.next;
        self.next += 1;

        let installment = match self.mode {
            ContributionMode::Periodic => {
                let remaining_months = self.total_months - number;
                let monthly_rate = self.annual_rate / 12.0;
                Installment {
                    number,
                    remaining_months,
                    contribution: self.amount,
                    final_value: grow(self.amount, monthly_rate, remaining_months),
                }
            }
            ContributionMode::LumpSum => Installment {
                number,
                remaining_months: self.total_months,
                contribution: self.amount,
                final_value: grow(self.amount, self.annual_rate, self.horizon_years),
            },
        };

        Some(installment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.installment_count() + 1).saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Installments {}

/// Value of `amount` after `periods` of growth at `rate`.
///
/// A zero amount stays zero even when the growth factor overflows.
fn grow(amount: f64, rate: f64, periods: u32) -> f64 {
    if amount == 0.0 {
        return 0.0;
    }
    amount * compound(rate, periods)
}

/// Growth factor `(1 + rate)^periods`
fn compound(rate: f64, periods: u32) -> f64 {
    match i32::try_from(periods) {
        Ok(n) => (1.0 + rate).powi(n),
        Err(_) => (1.0 + rate).powf(periods as f64),
    }
}
