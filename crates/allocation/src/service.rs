//! Allocation service: pick the preferred batch that can take an order line.

use thiserror::Error;
use tracing::{debug, instrument};

use stockpile_core::DomainError;

use crate::batch::{Batch, by_preference};
use crate::order_line::OrderLine;

/// Failure surfaced by [`allocate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// No candidate batch both carries the SKU and has enough available stock.
    #[error("Out of stock for SKU {sku}")]
    OutOfStock { sku: String },
}

impl From<AllocationError> for DomainError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::OutOfStock { sku } => DomainError::out_of_stock(sku),
        }
    }
}

/// Allocate `line` to the most preferred eligible batch and return its reference.
///
/// Candidates are ranked with [`by_preference`] (stable, so in-stock ties keep
/// input order) and the first one that [`Batch::can_allocate`] the line gets
/// it. Only that batch is mutated; the order of `batches` is left untouched.
///
/// Nothing deduplicates across calls: running this again for the same line
/// against batches that no longer hold it allocates it a second time.
#[instrument(
    skip(line, batches),
    fields(
        order_id = %line.order_id(),
        sku = %line.sku(),
        quantity = line.quantity(),
        candidates = batches.len()
    ),
    err
)]
pub fn allocate(line: &OrderLine, batches: &mut [Batch]) -> Result<String, AllocationError> {
    let mut ranked: Vec<&mut Batch> = batches.iter_mut().collect();
    ranked.sort_by(|a, b| by_preference(a, b));

    let batch = ranked
        .into_iter()
        .find(|batch| batch.can_allocate(line))
        .ok_or_else(|| AllocationError::OutOfStock {
            sku: line.sku().to_string(),
        })?;

    batch.allocate(line);
    debug!(
        batch = %batch.reference(),
        available = batch.available_quantity(),
        "order line allocated"
    );

    Ok(batch.reference().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(order_id: &str, sku: &str, quantity: u64) -> OrderLine {
        OrderLine::new(order_id, sku, quantity).unwrap()
    }

    #[test]
    fn prefers_current_stock_batches_to_shipments() {
        let mut batches = vec![
            Batch::new("shipment-batch", "RETRO-CLOCK", 100, Some(date(2025, 3, 1))),
            Batch::new("in-stock-batch", "RETRO-CLOCK", 100, None),
        ];

        let reference = allocate(&line("oref", "RETRO-CLOCK", 10), &mut batches).unwrap();

        assert_eq!(reference, "in-stock-batch");
        assert_eq!(batches[0].available_quantity(), 100);
        assert_eq!(batches[1].available_quantity(), 90);
    }

    #[test]
    fn prefers_earlier_batches() {
        let mut batches = vec![
            Batch::new("slow-batch", "MINIMALIST-SPOON", 100, Some(date(2025, 3, 1))),
            Batch::new("medium-batch", "MINIMALIST-SPOON", 100, Some(date(2025, 2, 1))),
            Batch::new("speedy-batch", "MINIMALIST-SPOON", 100, Some(date(2025, 1, 1))),
        ];

        let reference = allocate(&line("order1", "MINIMALIST-SPOON", 10), &mut batches).unwrap();

        assert_eq!(reference, "speedy-batch");
        assert_eq!(batches[0].available_quantity(), 100);
        assert_eq!(batches[1].available_quantity(), 100);
        assert_eq!(batches[2].available_quantity(), 90);
    }

    #[test]
    fn skips_preferred_batch_without_enough_stock() {
        let mut batches = vec![
            Batch::new("in-stock-batch", "LAMP", 5, None),
            Batch::new("shipment-batch", "LAMP", 100, Some(date(2025, 3, 1))),
        ];

        let reference = allocate(&line("o1", "LAMP", 10), &mut batches).unwrap();

        assert_eq!(reference, "shipment-batch");
        assert_eq!(batches[0].available_quantity(), 5);
    }

    #[test]
    fn ties_between_in_stock_batches_keep_input_order() {
        let mut batches = vec![
            Batch::new("second", "LAMP", 100, None),
            Batch::new("first", "LAMP", 100, None),
        ];

        let reference = allocate(&line("o1", "LAMP", 10), &mut batches).unwrap();
        assert_eq!(reference, "second");
    }

    #[test]
    fn does_not_reorder_callers_batches() {
        let mut batches = vec![
            Batch::new("late", "LAMP", 100, Some(date(2025, 2, 1))),
            Batch::new("early", "LAMP", 100, Some(date(2025, 1, 1))),
        ];

        allocate(&line("o1", "LAMP", 1), &mut batches).unwrap();

        assert_eq!(batches[0].reference(), "late");
        assert_eq!(batches[1].reference(), "early");
    }

    #[test]
    fn raises_out_of_stock_if_cannot_allocate() {
        let mut batches = vec![Batch::new("batch1", "SMALL-FORK", 5, None)];

        let err = allocate(&line("order1", "SMALL-FORK", 10), &mut batches).unwrap_err();

        assert_eq!(
            err,
            AllocationError::OutOfStock {
                sku: "SMALL-FORK".to_string()
            }
        );
        assert_eq!(err.to_string(), "Out of stock for SKU SMALL-FORK");
        assert_eq!(batches[0].available_quantity(), 5);
    }

    #[test]
    fn out_of_stock_when_no_batch_carries_the_sku() {
        let mut batches = vec![
            Batch::new("b1", "CHAIR", 100, None),
            Batch::new("b2", "TABLE", 100, Some(date(2025, 1, 1))),
        ];

        let err = allocate(&line("o1", "LAMP", 10), &mut batches).unwrap_err();

        assert!(matches!(err, AllocationError::OutOfStock { ref sku } if sku == "LAMP"));
        assert!(batches.iter().all(|b| b.available_quantity() == 100));
    }

    #[test]
    fn out_of_stock_for_empty_candidate_list() {
        let err = allocate(&line("o1", "LAMP", 1), &mut []).unwrap_err();
        assert_eq!(DomainError::from(err), DomainError::out_of_stock("LAMP"));
    }

    #[test]
    fn same_line_is_not_deduplicated_across_calls() {
        let order = line("o1", "LAMP", 10);
        let mut first = vec![Batch::new("a", "LAMP", 100, None)];
        let mut second = vec![Batch::new("b", "LAMP", 100, None)];

        assert_eq!(allocate(&order, &mut first).unwrap(), "a");
        assert_eq!(allocate(&order, &mut second).unwrap(), "b");

        // Same batch again: set semantics keep the quantity unchanged.
        assert_eq!(allocate(&order, &mut first).unwrap(), "a");
        assert_eq!(first[0].available_quantity(), 90);
    }
}
