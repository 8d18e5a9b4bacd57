//! Outbound dialog-action model and response builders.
//!
//! A code hook answers every event with exactly one of four dialog actions;
//! the constructors here are the only way the bots build them.

use serde::Serialize;

use crate::event::{SessionAttributes, Slots};

/// Response envelope returned to the platform.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponse {
    pub session_attributes: SessionAttributes,
    pub dialog_action: DialogAction,
}

/// The four dialog-action shapes a code hook may return.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum DialogAction {
    /// Hand slot filling back to the platform.
    Delegate { slots: Slots },

    /// Ask the user for one named slot.
    #[serde(rename_all = "camelCase")]
    ElicitSlot {
        intent_name: String,
        slots: Slots,
        slot_to_elicit: String,
        message: Message,
    },

    /// Ask the user to confirm the intent before fulfillment.
    #[serde(rename_all = "camelCase")]
    ConfirmIntent {
        intent_name: String,
        slots: Slots,
        message: Message,
    },

    /// End the turn with a fulfillment state and message.
    #[serde(rename_all = "camelCase")]
    Close {
        fulfillment_state: FulfillmentState,
        message: Message,
    },
}

/// Terminal state reported with a Close action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FulfillmentState {
    Fulfilled,
    Failed,
}

/// Message block shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: String,
    pub content: String,
}

impl Message {
    /// Plain-text message.
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self {
            content_type: "PlainText".to_string(),
            content: content.into(),
        }
    }
}

impl LexResponse {
    /// Hand slot filling back to the platform.
    pub fn delegate(session_attributes: SessionAttributes, slots: Slots) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::Delegate { slots },
        }
    }

    /// Ask the user for one named slot.
    pub fn elicit_slot(
        session_attributes: SessionAttributes,
        intent_name: impl Into<String>,
        slots: Slots,
        slot_to_elicit: impl Into<String>,
        message: Message,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::ElicitSlot {
                intent_name: intent_name.into(),
                slots,
                slot_to_elicit: slot_to_elicit.into(),
                message,
            },
        }
    }

    /// Ask the user to confirm the intent before fulfillment.
    pub fn confirm_intent(
        session_attributes: SessionAttributes,
        intent_name: impl Into<String>,
        slots: Slots,
        message: Message,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::ConfirmIntent {
                intent_name: intent_name.into(),
                slots,
                message,
            },
        }
    }

    /// End the turn with a fulfillment state and message.
    pub fn close(
        session_attributes: SessionAttributes,
        fulfillment_state: FulfillmentState,
        message: Message,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::Close {
                fulfillment_state,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn attrs() -> SessionAttributes {
        HashMap::from([("productQuery".to_string(), "{}".to_string())])
    }

    fn slots() -> Slots {
        HashMap::from([("ProductCategory".to_string(), Some("computers".to_string()))])
    }

    #[test]
    fn test_delegate_shape() {
        let response = LexResponse::delegate(attrs(), slots());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["dialogAction"]["type"], "Delegate");
        assert_eq!(json["dialogAction"]["slots"]["ProductCategory"], "computers");
        assert_eq!(json["sessionAttributes"]["productQuery"], "{}");
    }

    #[test]
    fn test_elicit_slot_shape() {
        let response = LexResponse::elicit_slot(
            attrs(),
            "GetProductInfo",
            slots(),
            "MinPrice",
            Message::plain_text("What is the minimum price?"),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["dialogAction"]["type"], "ElicitSlot");
        assert_eq!(json["dialogAction"]["intentName"], "GetProductInfo");
        assert_eq!(json["dialogAction"]["slotToElicit"], "MinPrice");
        assert_eq!(json["dialogAction"]["message"]["contentType"], "PlainText");
        assert_eq!(
            json["dialogAction"]["message"]["content"],
            "What is the minimum price?"
        );
    }

    #[test]
    fn test_confirm_intent_shape() {
        let response = LexResponse::confirm_intent(
            attrs(),
            "PlaceOrder",
            slots(),
            Message::plain_text("Shall I place the order?"),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["dialogAction"]["type"], "ConfirmIntent");
        assert_eq!(json["dialogAction"]["intentName"], "PlaceOrder");
        assert_eq!(json["dialogAction"]["message"]["content"], "Shall I place the order?");
    }

    #[test]
    fn test_close_shape() {
        let response = LexResponse::close(
            attrs(),
            FulfillmentState::Fulfilled,
            Message::plain_text("Done!"),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["dialogAction"]["type"], "Close");
        assert_eq!(json["dialogAction"]["fulfillmentState"], "Fulfilled");
        assert_eq!(json["dialogAction"]["message"]["content"], "Done!");
    }
}
