//! Total nominal outlay split into presentation buckets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CostComponent;
use crate::lease::solver::SolvedLease;
use crate::types::{round_money, Money};

/// Down payment, instalments and buyout in net currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub down_payment: Money,
    pub sum_of_instalments: Money,
    pub buyout: Money,
}

/// One labelled slice of the breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSlice {
    pub component: CostComponent,
    pub label: String,
    pub amount: Money,
}

impl CostBreakdown {
    pub fn from_lease(lease: &SolvedLease) -> Self {
        Self {
            down_payment: lease.down_payment,
            sum_of_instalments: lease.monthly_instalment_net * Decimal::from(lease.term_months),
            buyout: lease.buyout,
        }
    }

    /// Total nominal cash outlay, D + n·A + R.
    pub fn total(&self) -> Money {
        self.down_payment + self.sum_of_instalments + self.buyout
    }

    pub fn amount(&self, component: CostComponent) -> Money {
        match component {
            CostComponent::DownPayment => self.down_payment,
            CostComponent::Instalments => self.sum_of_instalments,
            CostComponent::Buyout => self.buyout,
        }
    }

    /// Slices in presentation order.
    pub fn components(&self, order: &[CostComponent]) -> Vec<CostSlice> {
        order
            .iter()
            .map(|&component| CostSlice {
                component,
                label: component.label().to_string(),
                amount: self.amount(component),
            })
            .collect()
    }

    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            down_payment: round_money(self.down_payment, dp),
            sum_of_instalments: round_money(self.sum_of_instalments, dp),
            buyout: round_money(self.buyout, dp),
        }
    }
}
