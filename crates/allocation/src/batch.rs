use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockpile_core::{DomainError, Entity};

use crate::order_line::OrderLine;

/// Entity: a lot of stock for one SKU, in the warehouse (`eta == None`) or
/// arriving on `eta`.
///
/// Identity is the `reference`; equality and hashing ignore the allocation
/// set, so a batch stays stable inside a `HashSet` while lines come and go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BatchRecord", into = "BatchRecord")]
pub struct Batch {
    reference: String,
    sku: String,
    eta: Option<NaiveDate>,
    purchased_quantity: u64,
    allocations: HashSet<OrderLine>,
}

impl Batch {
    pub fn new(
        reference: impl Into<String>,
        sku: impl Into<String>,
        purchased_quantity: u64,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            eta,
            purchased_quantity,
            allocations: HashSet::new(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn eta(&self) -> Option<NaiveDate> {
        self.eta
    }

    pub fn purchased_quantity(&self) -> u64 {
        self.purchased_quantity
    }

    pub fn allocations(&self) -> impl Iterator<Item = &OrderLine> + '_ {
        self.allocations.iter()
    }

    pub fn is_allocated(&self, line: &OrderLine) -> bool {
        self.allocations.contains(line)
    }

    pub fn allocated_quantity(&self) -> u64 {
        self.allocations.iter().map(OrderLine::quantity).sum()
    }

    pub fn available_quantity(&self) -> u64 {
        // Never underflows: `allocate` refuses lines that exceed availability.
        self.purchased_quantity - self.allocated_quantity()
    }

    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        self.sku == line.sku() && self.available_quantity() >= line.quantity()
    }

    /// Attach `line` to this batch.
    ///
    /// Ineligible lines are ignored without error; check [`Batch::can_allocate`]
    /// first when the outcome matters. Re-allocating a held line is a no-op.
    pub fn allocate(&mut self, line: &OrderLine) {
        if self.can_allocate(line) {
            self.allocations.insert(line.clone());
        }
    }

    /// Release `line` if this batch holds it; otherwise a no-op.
    pub fn deallocate(&mut self, line: &OrderLine) {
        self.allocations.remove(line);
    }

    /// "Greater than" under [`by_preference`]: `self` would be picked after `other`.
    pub fn is_later_than(&self, other: &Batch) -> bool {
        by_preference(self, other) == Ordering::Greater
    }
}

/// Preference comparator used to rank candidate batches.
///
/// In-stock batches come before any shipment, shipments by ascending ETA.
/// Two in-stock batches (or two with the same ETA) compare equal, so a stable
/// sort keeps their input order.
pub fn by_preference(a: &Batch, b: &Batch) -> Ordering {
    match (a.eta, b.eta) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Batch {}

impl Hash for Batch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl Entity for Batch {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}

/// Snapshot shape handed to and received from persistence collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BatchRecord {
    reference: String,
    sku: String,
    eta: Option<NaiveDate>,
    purchased_quantity: u64,
    #[serde(default)]
    allocations: Vec<OrderLine>,
}

impl TryFrom<BatchRecord> for Batch {
    type Error = DomainError;

    fn try_from(record: BatchRecord) -> Result<Self, Self::Error> {
        let mut batch = Batch::new(
            record.reference,
            record.sku,
            record.purchased_quantity,
            record.eta,
        );

        let mut allocated: u64 = 0;
        for line in record.allocations {
            if line.sku() != batch.sku {
                return Err(DomainError::invariant(format!(
                    "batch {} (sku {}) holds a line for sku {}",
                    batch.reference,
                    batch.sku,
                    line.sku()
                )));
            }
            if batch.allocations.contains(&line) {
                continue;
            }
            allocated = allocated
                .checked_add(line.quantity())
                .ok_or_else(|| DomainError::invariant("allocated quantity overflow"))?;
            batch.allocations.insert(line);
        }

        if allocated > batch.purchased_quantity {
            return Err(DomainError::invariant(format!(
                "batch {} allocates {} of {} purchased",
                batch.reference, allocated, batch.purchased_quantity
            )));
        }

        Ok(batch)
    }
}

impl From<Batch> for BatchRecord {
    fn from(batch: Batch) -> Self {
        let mut allocations: Vec<OrderLine> = batch.allocations.into_iter().collect();
        allocations.sort_by(|a, b| {
            (a.order_id(), a.quantity()).cmp(&(b.order_id(), b.quantity()))
        });

        Self {
            reference: batch.reference,
            sku: batch.sku,
            eta: batch.eta,
            purchased_quantity: batch.purchased_quantity,
            allocations,
        }
    }
}
