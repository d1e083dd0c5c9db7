//! Shared primitive types used across every generator.

/// A stable, unique identifier for any generated entity.
pub type EntityId = String;

/// Master seed for a generation run.
pub type Seed = u64;

/// Monetary amount in the operator's reporting currency.
pub type Money = f64;

/// Round a monetary amount to cents.
pub fn round_cents(amount: Money) -> Money {
    (amount * 100.0).round() / 100.0
}
