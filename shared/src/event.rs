//! Inbound Lex event model.
//!
//! The platform posts one JSON event per turn; the shapes here mirror its
//! camelCase wire format.

use std::collections::HashMap;

use serde::Deserialize;

/// Slot values as Lex delivers them: a present key may still hold null.
pub type Slots = HashMap<String, Option<String>>;

/// Session attributes carried across turns.
pub type SessionAttributes = HashMap<String, String>;

/// Intent-recognition event posted by the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    pub bot: Bot,
    pub user_id: String,
    pub invocation_source: InvocationSource,
    pub current_intent: CurrentIntent,
    #[serde(default)]
    pub session_attributes: Option<SessionAttributes>,
}

/// Bot identification block.
#[derive(Debug, Clone, Deserialize)]
pub struct Bot {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Whether the platform is still collecting slots or ready for fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum InvocationSource {
    DialogCodeHook,
    FulfillmentCodeHook,
}

/// The recognized intent and its slot values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentIntent {
    pub name: String,
    #[serde(default)]
    pub slots: Slots,
}
