//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use rust_decimal::Decimal;

/// Normalizes a `Decimal` passed by value or behind any number of references
/// into an owned `Decimal`. Askama passes filter inputs with varying reference
/// depth depending on the expression (owned for method calls, `&` for field
/// access, `&&` for `if let` bindings), so the `money` filter accepts all of them.
pub trait AsDecimal {
    fn as_decimal(&self) -> Decimal;
}

impl AsDecimal for Decimal {
    fn as_decimal(&self) -> Decimal {
        *self
    }
}

impl<T: AsDecimal + ?Sized> AsDecimal for &T {
    fn as_decimal(&self) -> Decimal {
        (**self).as_decimal()
    }
}

/// Format a decimal amount as money with two fraction digits.
///
/// Usage in templates: `{{ price|money }}`
#[askama::filter_fn]
pub fn money(value: impl AsDecimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.as_decimal()))
}

pub(crate) fn format_money(value: &Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}
