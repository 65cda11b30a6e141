use serde::{Deserialize, Serialize};

use stockpile_core::{DomainError, DomainResult, ValueObject};

/// Order line: a request for `quantity` units of `sku` on behalf of an order.
///
/// Immutable value object. Two lines are equal iff order id, SKU and quantity
/// all match, so a line can be a set member or map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OrderLineRecord", into = "OrderLineRecord")]
pub struct OrderLine {
    order_id: String,
    sku: String,
    quantity: u64,
}

impl OrderLine {
    /// Build a validated order line.
    ///
    /// Fails with [`DomainError::Validation`] for a blank order id or SKU, or a
    /// zero quantity.
    pub fn new(
        order_id: impl Into<String>,
        sku: impl Into<String>,
        quantity: u64,
    ) -> DomainResult<Self> {
        let order_id = order_id.into();
        let sku = sku.into();

        if order_id.trim().is_empty() {
            return Err(DomainError::validation("order_id cannot be empty"));
        }
        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Self {
            order_id,
            sku,
            quantity,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }
}

impl ValueObject for OrderLine {}

/// Wire shape of an order line; converted through [`OrderLine::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderLineRecord {
    order_id: String,
    sku: String,
    quantity: u64,
}

impl TryFrom<OrderLineRecord> for OrderLine {
    type Error = DomainError;

    fn try_from(record: OrderLineRecord) -> Result<Self, Self::Error> {
        OrderLine::new(record.order_id, record.sku, record.quantity)
    }
}

impl From<OrderLine> for OrderLineRecord {
    fn from(line: OrderLine) -> Self {
        Self {
            order_id: line.order_id,
            sku: line.sku,
            quantity: line.quantity,
        }
    }
}
