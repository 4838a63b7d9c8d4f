//! Company-wide payroll rate policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Singleton company-wide deduction and bonus rates.
///
/// All rates are non-negative monetary amounts. A missing policy row is not
/// an error: the engine substitutes [`CompanyPolicy::default`], which is
/// all-zero and makes recalculation a no-op on bonus/deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPolicy {
    /// Deduction per cumulative hour of lateness.
    pub late_deduction_per_hour: Decimal,
    /// Bonus per cumulative hour of overtime.
    pub overtime_bonus_per_hour: Decimal,
    /// Flat deduction per absent day.
    pub absent_deduction: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_zero_rated() {
        let policy = CompanyPolicy::default();
        assert_eq!(policy.late_deduction_per_hour, Decimal::ZERO);
        assert_eq!(policy.overtime_bonus_per_hour, Decimal::ZERO);
        assert_eq!(policy.absent_deduction, Decimal::ZERO);
    }

    #[test]
    fn test_policy_deserialization() {
        let json = r#"{
            "late_deduction_per_hour": "10",
            "overtime_bonus_per_hour": "15",
            "absent_deduction": "100"
        }"#;
        let policy: CompanyPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.late_deduction_per_hour, Decimal::new(10, 0));
        assert_eq!(policy.overtime_bonus_per_hour, Decimal::new(15, 0));
        assert_eq!(policy.absent_deduction, Decimal::new(100, 0));
    }
}
