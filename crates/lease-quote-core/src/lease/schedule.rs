//! Month-by-month amortization of a solved lease.
//!
//! Effective interest method: each instalment pays the month's interest on
//! the opening balance and the rest reduces principal. The balance runs from
//! the financed principal down to the buyout.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::lease::solver::SolvedLease;
use crate::types::{round_money, Money};

/// A single row in the lease amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Month number (1-indexed)
    pub month: u32,
    pub opening_balance: Money,
    pub instalment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

impl ScheduleRow {
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            month: self.month,
            opening_balance: round_money(self.opening_balance, dp),
            instalment: round_money(self.instalment, dp),
            interest: round_money(self.interest, dp),
            principal: round_money(self.principal, dp),
            closing_balance: round_money(self.closing_balance, dp),
        }
    }
}

pub fn build_schedule(lease: &SolvedLease) -> Vec<ScheduleRow> {
    let n = lease.term_months;
    let mut rows = Vec::with_capacity(n as usize);
    let mut balance = lease.principal;

    for month in 1..=n {
        let opening = balance;
        let interest = opening * lease.monthly_rate;
        let principal = lease.monthly_instalment_net - interest;
        balance = opening - principal;

        // Snap decimal residue on the last period onto the buyout.
        if month == n && (balance - lease.buyout).abs() < dec!(0.0001) {
            balance = lease.buyout;
        }

        rows.push(ScheduleRow {
            month,
            opening_balance: opening,
            instalment: lease.monthly_instalment_net,
            interest,
            principal,
            closing_balance: balance,
        });
    }

    rows
}

pub fn schedule_interest(rows: &[ScheduleRow]) -> Money {
    rows.iter().map(|r| r.interest).sum()
}

/// Balance left after the last instalment, due as the buyout.
pub fn final_balance(rows: &[ScheduleRow]) -> Money {
    rows.last()
        .map(|r| r.closing_balance)
        .unwrap_or(Decimal::ZERO)
}
