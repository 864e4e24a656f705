//! # Register Reports
//!
//! Pure aggregation over a session's ledger. The summary recomputes the
//! balance from scratch (opening + ingresos - egresos) instead of trusting
//! the stored running balance, so a drifted register is visible at close
//! time rather than silently carried forward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::Money;
use crate::types::{Movement, MovementKind, MovementLine, PaymentMethod, Register};

// =============================================================================
// Register Summary
// =============================================================================

/// Totals for one register session, recomputed from its movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSummary {
    pub opening_balance: Money,
    pub total_ingresos: Money,
    pub total_egresos: Money,
    /// opening + ingresos - egresos.
    pub expected_balance: Money,
    /// Net cash flow per payment method (ingresos minus egresos).
    /// BTreeMap keeps report rows in the conventional method order.
    pub by_payment_method: BTreeMap<PaymentMethod, Money>,
    pub movement_count: usize,
}

impl RegisterSummary {
    /// Recomputes session totals from the full movement list.
    ///
    /// `Sistema` and `Cierre` entries are bookkeeping rows and contribute
    /// nothing to any total.
    pub fn compute(register: &Register, movements: &[Movement]) -> Self {
        let mut total_ingresos = Money::ZERO;
        let mut total_egresos = Money::ZERO;
        let mut by_payment_method: BTreeMap<PaymentMethod, Money> = BTreeMap::new();

        for movement in movements {
            match movement.kind {
                MovementKind::Ingreso => total_ingresos += movement.amount(),
                MovementKind::Egreso => total_egresos += movement.amount(),
                MovementKind::Sistema | MovementKind::Cierre => continue,
            }
            if let Some(method) = movement.payment_method {
                let entry = by_payment_method.entry(method).or_insert(Money::ZERO);
                *entry += movement.balance_delta();
            }
        }

        RegisterSummary {
            opening_balance: register.opening_balance(),
            total_ingresos,
            total_egresos,
            expected_balance: register.opening_balance() + total_ingresos - total_egresos,
            by_payment_method,
            movement_count: movements.len(),
        }
    }

    /// True when the recomputed balance matches the register's stored
    /// running balance.
    pub fn is_consistent_with(&self, register: &Register) -> bool {
        self.expected_balance == register.current_balance()
    }
}

// =============================================================================
// Product Stats
// =============================================================================

/// Units and revenue for one product across a set of sale lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStat {
    pub product_id: String,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Money,
}

/// Aggregates sale lines per product, highest revenue first.
pub fn product_stats(lines: &[MovementLine]) -> Vec<ProductStat> {
    let mut by_product: BTreeMap<&str, ProductStat> = BTreeMap::new();

    for line in lines {
        let entry = by_product
            .entry(line.product_id.as_str())
            .or_insert_with(|| ProductStat {
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                units_sold: 0,
                revenue: Money::ZERO,
            });
        entry.units_sold += line.quantity;
        entry.revenue += line.subtotal();
    }

    let mut stats: Vec<ProductStat> = by_product.into_values().collect();
    stats.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    stats
}

// =============================================================================
// Time Filters
// =============================================================================

/// Movements recorded in the half-open window `[from, to)`.
pub fn movements_between(
    movements: &[Movement],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<&Movement> {
    movements
        .iter()
        .filter(|m| m.recorded_at >= from && m.recorded_at < to)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
