//! Line-item arithmetic for quotes.
//!
//! Totals are always recomputed here; whatever the front end displayed is only
//! checked against the recomputed value, never stored.

use serde::Serialize;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::quotes::{LineItem, LineItemInput};

/// Platform fee shown on the payment summary. Display only.
pub const PLATFORM_FEE_RATE: f64 = 0.05;

/// Half a cent: anything closer than this is the same amount.
const CURRENCY_TOLERANCE: f64 = 0.005;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("Please add at least one line item with a description and amount")]
    NoValidLineItems,

    #[error("Line item {line}: quantity and unit price must be non-negative numbers")]
    InvalidNumber { line: usize },

    #[error("Line item {line}: amount is too large")]
    LineTooLarge { line: usize },

    #[error("Quote total is too large")]
    TotalTooLarge,

    #[error("Line item {line}: total {claimed:.2} does not match quantity x unit price ({computed:.2})")]
    LineTotalMismatch { line: usize, claimed: f64, computed: f64 },

    #[error("Quote total {claimed:.2} does not match the sum of line items ({computed:.2})")]
    TotalMismatch { claimed: f64, computed: f64 },
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Round to currency precision (cents).
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    round_currency(quantity * unit_price)
}

fn same_amount(a: f64, b: f64) -> bool {
    (a - b).abs() < CURRENCY_TOLERANCE
}

/// The valid line items of a submission and their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedQuote {
    pub line_items: Vec<LineItem>,
    pub total_amount: f64,
}

/// Recompute every line total, drop incomplete rows and sum the rest.
///
/// A row counts when it has a non-blank description and a positive total.
/// Line numbers in errors are 1-based, as the vendor sees them.
pub fn price_line_items(
    inputs: &[LineItemInput],
    claimed_total: Option<f64>,
) -> Result<PricedQuote, PricingError> {
    let mut line_items = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        let line = index + 1;
        let valid_number = |n: f64| n.is_finite() && n >= 0.0;
        if !valid_number(input.quantity) || !valid_number(input.unit_price) {
            return Err(PricingError::InvalidNumber { line });
        }

        let total = line_total(input.quantity, input.unit_price);
        if !total.is_finite() {
            return Err(PricingError::LineTooLarge { line });
        }
        if let Some(claimed) = input.total {
            if !same_amount(claimed, total) {
                return Err(PricingError::LineTotalMismatch {
                    line,
                    claimed,
                    computed: total,
                });
            }
        }

        let description = input.description.trim();
        if description.is_empty() || total <= 0.0 {
            continue;
        }

        line_items.push(LineItem {
            description: description.to_string(),
            quantity: input.quantity,
            unit_price: input.unit_price,
            total,
        });
    }

    if line_items.is_empty() {
        return Err(PricingError::NoValidLineItems);
    }

    let total_amount = round_currency(line_items.iter().map(|item| item.total).sum());
    if !total_amount.is_finite() {
        return Err(PricingError::TotalTooLarge);
    }
    if let Some(claimed) = claimed_total {
        if !same_amount(claimed, total_amount) {
            return Err(PricingError::TotalMismatch {
                claimed,
                computed: total_amount,
            });
        }
    }

    Ok(PricedQuote {
        line_items,
        total_amount,
    })
}

/// What the client sees before confirming an acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub subtotal: f64,
    pub platform_fee: f64,
    pub total: f64,
}

impl PaymentSummary {
    pub fn for_amount(subtotal: f64) -> Self {
        let subtotal = round_currency(subtotal);
        let platform_fee = round_currency(subtotal * PLATFORM_FEE_RATE);
        Self {
            subtotal,
            platform_fee,
            total: round_currency(subtotal + platform_fee),
        }
    }
}
