//! Typed slot extraction.
//!
//! Handlers branch on these results explicitly instead of coercing nullable
//! slot text and failing the invocation mid-fulfillment.

use crate::event::Slots;

/// Outcome of looking up one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// Present and parseable.
    Value(T),
    /// Absent, or present with a null value.
    Missing,
    /// Present but not parseable as the requested type; carries the raw text.
    Invalid(String),
}

impl<T> Slot<T> {
    /// The parsed value, if present and valid.
    pub fn value(&self) -> Option<&T> {
        match self {
            Slot::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Slot text, verbatim.
pub fn text(slots: &Slots, name: &str) -> Slot<String> {
    match slots.get(name) {
        Some(Some(value)) => Slot::Value(value.clone()),
        _ => Slot::Missing,
    }
}

/// Slot parsed as a number.
pub fn number(slots: &Slots, name: &str) -> Slot<f64> {
    match slots.get(name) {
        Some(Some(raw)) => match raw.trim().parse::<f64>() {
            Ok(value) => Slot::Value(value),
            Err(_) => Slot::Invalid(raw.clone()),
        },
        _ => Slot::Missing,
    }
}
