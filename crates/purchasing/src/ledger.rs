//! Monetary bookkeeping on a purchase order.
//!
//! Pure functions only: nothing here mutates an order. The workflow asks the
//! ledger for the new running total and then records it through an event.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use procura_core::{DomainError, Money};


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be greater than zero (got {0})")]
    InvalidAmount(Money),

    #[error("total received ({attempted}) cannot exceed PO total ({grand_total})")]
    OverReceipt { attempted: Money, grand_total: Money },

    #[error("total billed ({attempted}) would exceed PO total ({grand_total})")]
    OverBilling { attempted: Money, grand_total: Money },
}

impl From<LedgerError> for DomainError {
    fn from(value: LedgerError) -> Self {
        DomainError::business_rule(value.to_string())
    }
}

/// The three running totals of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub grand_total: Money,
    pub total_received: Money,
    pub total_billed: Money,
}

impl LedgerTotals {
    pub fn is_fully_received(&self) -> bool {
        self.total_received >= self.grand_total
    }

    pub fn is_fully_billed(&self) -> bool {
        self.total_billed >= self.grand_total
    }

    /// Billed share of the grand total in whole percent, rounded half-up.
    pub fn billed_percent(&self) -> u32 {
        if self.grand_total.is_zero() {
            return 0;
        }
        (self.total_billed.value() * Decimal::ONE_HUNDRED / self.grand_total.value())
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// New `total_received` after receiving `amount`.
    pub fn apply_receipt(&self, amount: Money) -> Result<Money, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        match self.total_received.checked_add(amount) {
            Some(next) if next <= self.grand_total => Ok(next),
            attempted => Err(LedgerError::OverReceipt {
                attempted: attempted.unwrap_or(amount),
                grand_total: self.grand_total,
            }),
        }
    }

    /// New `total_billed` after billing `amount`.
    pub fn apply_invoice(&self, amount: Money) -> Result<Money, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        match self.total_billed.checked_add(amount) {
            Some(next) if next <= self.grand_total => Ok(next),
            attempted => Err(LedgerError::OverBilling {
                attempted: attempted.unwrap_or(amount),
                grand_total: self.grand_total,
            }),
        }
    }
}
