//! Dashboard figures over a set of purchase orders.

use serde::{Deserialize, Serialize};

use procura_core::Money;

use crate::order::PurchaseOrder;
use crate::status::PurchaseOrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: PurchaseOrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementKpi {
    pub total_orders: usize,
    /// One entry per status, in lifecycle order (zero counts included).
    pub status_counts: Vec<StatusCount>,
    /// Grand totals of orders still waiting on goods or bills.
    pub pending_value: Money,
    pub completed_value: Money,
    /// Billed amount over completed orders.
    pub total_billed_value: Money,
}

impl ProcurementKpi {
    pub fn compute<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a PurchaseOrder>,
    {
        let mut counts = [0usize; PurchaseOrderStatus::ALL.len()];
        let mut total_orders = 0;
        let mut pending_value = Money::zero();
        let mut completed_value = Money::zero();
        let mut total_billed_value = Money::zero();

        for po in orders {
            total_orders += 1;
            if let Some(idx) = PurchaseOrderStatus::ALL.iter().position(|s| *s == po.status()) {
                counts[idx] += 1;
            }
            match po.status() {
                PurchaseOrderStatus::ToReceive | PurchaseOrderStatus::ToBill => {
                    pending_value = pending_value + po.grand_total();
                }
                PurchaseOrderStatus::Completed => {
                    completed_value = completed_value + po.grand_total();
                    total_billed_value = total_billed_value + po.total_billed();
                }
                _ => {}
            }
        }

        Self {
            total_orders,
            status_counts: PurchaseOrderStatus::ALL
                .into_iter()
                .zip(counts)
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            pending_value,
            completed_value,
            total_billed_value,
        }
    }

    pub fn count(&self, status: PurchaseOrderStatus) -> usize {
        self.status_counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}
