//! Shared library for the storefront bot Lambda functions.
//!
//! This crate provides the Lex event and dialog-action model, typed slot
//! extraction, the item-store abstraction, and common types used by both
//! bot functions.

pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod response;
pub mod slots;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Bot, CurrentIntent, InvocationSource, LexEvent, SessionAttributes, Slots};
pub use item::{Item, NO_MATCH_MESSAGE};
pub use response::{DialogAction, FulfillmentState, LexResponse, Message};
pub use slots::Slot;
pub use store::{DynamoItemStore, ItemStore, MemoryItemStore, PutOutcome};
