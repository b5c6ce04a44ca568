use serde::{Deserialize, Serialize};

use procura_core::{DomainError, DomainResult, Money, Quantity, UnitPrice};

pub const DEFAULT_UNIT: &str = "PCS";

/// Line item as submitted by the caller (not yet numbered or priced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub description: String,
    pub item_code: Option<String>,
    pub unit: Option<String>,
    pub ordered_qty: Quantity,
    pub unit_price: UnitPrice,
}

impl NewItem {
    pub fn new(description: impl Into<String>, ordered_qty: Quantity, unit_price: UnitPrice) -> Self {
        Self {
            description: description.into(),
            item_code: None,
            unit: None,
            ordered_qty,
            unit_price,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.item_code = Some(code.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Purchase order line item.
///
/// `line_total` is derived from quantity and price at construction and the
/// fields are private, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    line_no: u32,
    description: String,
    item_code: Option<String>,
    unit: String,
    ordered_qty: Quantity,
    unit_price: UnitPrice,
    received_qty: Quantity,
    line_total: Money,
}

impl PurchaseOrderItem {
    pub fn from_new(line_no: u32, item: NewItem) -> DomainResult<Self> {
        if item.description.trim().is_empty() {
            return Err(DomainError::business_rule(format!(
                "line {line_no}: item description is required"
            )));
        }
        if !item.ordered_qty.is_positive() {
            return Err(DomainError::business_rule(format!(
                "line {line_no}: ordered quantity must be positive"
            )));
        }
        if item.unit_price.value().is_sign_negative() {
            return Err(DomainError::business_rule(format!(
                "line {line_no}: unit price cannot be negative"
            )));
        }

        let line_total = item.ordered_qty.checked_total(item.unit_price).ok_or_else(|| {
            DomainError::business_rule(format!("line {line_no}: line total overflows"))
        })?;

        Ok(Self {
            line_no,
            description: item.description,
            item_code: item.item_code.filter(|c| !c.trim().is_empty()),
            unit: item.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            ordered_qty: item.ordered_qty,
            unit_price: item.unit_price,
            received_qty: Quantity::zero(),
            line_total,
        })
    }

    pub fn line_no(&self) -> u32 {
        self.line_no
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn item_code(&self) -> Option<&str> {
        self.item_code.as_deref()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn ordered_qty(&self) -> Quantity {
        self.ordered_qty
    }

    pub fn unit_price(&self) -> UnitPrice {
        self.unit_price
    }

    pub fn received_qty(&self) -> Quantity {
        self.received_qty
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }

    pub fn remaining_qty(&self) -> Quantity {
        self.ordered_qty - self.received_qty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(qty: &str, price: &str) -> NewItem {
        NewItem::new("Copy paper A4", qty.parse().unwrap(), price.parse().unwrap())
    }

    #[test]
    fn computes_line_total_and_defaults() {
        let item = PurchaseOrderItem::from_new(1, new_item("10", "5.00")).unwrap();
        assert_eq!(item.line_total(), "50.00".parse().unwrap());
        assert_eq!(item.unit(), DEFAULT_UNIT);
        assert!(item.received_qty().is_zero());
        assert_eq!(item.remaining_qty(), item.ordered_qty());
    }

    #[test]
    fn keeps_code_and_unit() {
        let item = PurchaseOrderItem::from_new(
            2,
            new_item("2.5", "4.0000").with_code("PAP-A4").with_unit("BOX"),
        )
        .unwrap();
        assert_eq!(item.line_no(), 2);
        assert_eq!(item.item_code(), Some("PAP-A4"));
        assert_eq!(item.unit(), "BOX");
        assert_eq!(item.line_total(), "10.00".parse().unwrap());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let err = PurchaseOrderItem::from_new(1, new_item("0", "5.00")).unwrap_err();
        assert!(matches!(err, DomainError::BusinessRuleViolation(msg) if msg.contains("quantity")));
    }

    #[test]
    fn rejects_negative_price_and_blank_description() {
        assert!(PurchaseOrderItem::from_new(1, new_item("1", "-1")).is_err());
        let mut blank = new_item("1", "1");
        blank.description = "  ".to_string();
        assert!(PurchaseOrderItem::from_new(1, blank).is_err());
    }
}
