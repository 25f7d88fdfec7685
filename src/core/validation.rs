//! Input checks run over a batch before any product lookup.

use rust_decimal::Decimal;

use super::error::ValidationError;
use super::types::*;

/// Validate every invoice of a batch.
/// Returns all validation errors found (not just the first).
pub fn validate_batch(invoices: &[Invoice]) -> Vec<ValidationError> {
    invoices.iter().flat_map(validate_invoice).collect()
}

/// Validate a single booked invoice.
///
/// Malformed records are rejected, never clamped: a negative net amount or
/// quantity has no meaning for a usage report.
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let prefix = format!("invoice[{}]", invoice.number);

    let code = invoice.currency_code.trim();
    if code.is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.currency"),
            "currency code must not be empty",
        ));
    } else if code.len() != 3 {
        errors.push(ValidationError::new(
            format!("{prefix}.currency"),
            format!("currency code '{code}' must be 3 characters (ISO 4217)"),
        ));
    }

    if invoice.net_amount < Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.net_amount"),
            format!("net amount must not be negative, got {}", invoice.net_amount),
        ));
    }

    for (i, line) in invoice.lines.iter().enumerate() {
        validate_line(line, &format!("{prefix}.lines[{i}]"), &mut errors);
    }

    errors
}

fn validate_line(line: &Line, path: &str, errors: &mut Vec<ValidationError>) {
    if line.product_number().trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{path}.product"),
            "product number must not be empty",
        ));
    }

    if line.quantity < Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{path}.quantity"),
            format!("quantity must not be negative, got {}", line.quantity),
        ));
    } else if line.quantity.trunc() > Decimal::from(u32::MAX) {
        errors.push(ValidationError::new(
            format!("{path}.quantity"),
            format!("quantity {} exceeds the credit range", line.quantity),
        ));
    }

    if line.net_amount < Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{path}.net_amount"),
            format!("net amount must not be negative, got {}", line.net_amount),
        ));
    }
}
