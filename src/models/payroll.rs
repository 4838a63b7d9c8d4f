//! Monthly payroll model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One employee's payroll for one calendar month.
///
/// A row is unique per `(employee_id, year, month)`. `compensation` is
/// snapshotted from the employee when the row is first created and is not
/// overwritten by recalculation; `bonus` and `deductions` are owned by the
/// aggregator; `gross_pay` and `net_pay` are derived and recomputed on
/// every save via [`PayRoll::recompute_totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRoll {
    /// The employee this row belongs to.
    pub employee_id: String,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// Base compensation, snapshotted at row creation.
    pub compensation: Decimal,
    /// Overtime bonus for the month.
    pub bonus: Decimal,
    /// Lateness and absence deductions for the month.
    pub deductions: Decimal,
    /// Tax withheld; set by administrative edits, not by recalculation.
    pub tax: Decimal,
    /// Derived: `compensation + bonus`.
    pub gross_pay: Decimal,
    /// Derived: `gross_pay - tax - deductions`.
    pub net_pay: Decimal,
}

impl PayRoll {
    /// Creates a fresh payroll row for a month with the given base
    /// compensation and tax, and zero bonus/deductions.
    pub fn new(
        employee_id: impl Into<String>,
        year: i32,
        month: u32,
        compensation: Decimal,
        tax: Decimal,
    ) -> Self {
        let mut payroll = Self {
            employee_id: employee_id.into(),
            year,
            month,
            compensation,
            bonus: Decimal::ZERO,
            deductions: Decimal::ZERO,
            tax,
            gross_pay: Decimal::ZERO,
            net_pay: Decimal::ZERO,
        };
        payroll.recompute_totals();
        payroll
    }

    /// Recomputes the derived `gross_pay` and `net_pay` fields.
    ///
    /// Invariant: this runs on every save, so the derived fields always
    /// reflect the current `compensation`, `bonus`, `tax`, and
    /// `deductions`; they are never independently settable.
    pub fn recompute_totals(&mut self) {
        self.gross_pay = self.compensation + self.bonus;
        self.net_pay = self.gross_pay - self.tax - self.deductions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_new_row_has_zero_bonus_and_deductions() {
        let payroll = PayRoll::new("emp_001", 2025, 8, decimal("5000"), Decimal::ZERO);
        assert_eq!(payroll.bonus, Decimal::ZERO);
        assert_eq!(payroll.deductions, Decimal::ZERO);
        assert_eq!(payroll.gross_pay, decimal("5000"));
        assert_eq!(payroll.net_pay, decimal("5000"));
    }

    #[test]
    fn test_recompute_totals_derives_gross_and_net() {
        let mut payroll = PayRoll::new("emp_001", 2025, 8, decimal("5000"), decimal("250"));
        payroll.bonus = decimal("150");
        payroll.deductions = decimal("120");
        payroll.recompute_totals();

        assert_eq!(payroll.gross_pay, decimal("5150"));
        assert_eq!(payroll.net_pay, decimal("4780")); // 5150 - 250 - 120
    }

    #[test]
    fn test_stale_derived_fields_are_overwritten() {
        let mut payroll = PayRoll::new("emp_001", 2025, 8, decimal("5000"), Decimal::ZERO);
        payroll.gross_pay = decimal("999999");
        payroll.net_pay = decimal("999999");
        payroll.recompute_totals();

        assert_eq!(payroll.gross_pay, decimal("5000"));
        assert_eq!(payroll.net_pay, decimal("5000"));
    }

    #[test]
    fn test_payroll_round_trip() {
        let payroll = PayRoll::new("emp_001", 2025, 8, decimal("5000"), decimal("100"));
        let json = serde_json::to_string(&payroll).unwrap();
        let deserialized: PayRoll = serde_json::from_str(&json).unwrap();
        assert_eq!(payroll, deserialized);
    }
}
