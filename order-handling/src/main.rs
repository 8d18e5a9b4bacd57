//! Order Handling Lambda - fulfillment code hook for the order bot.
//!
//! Serves two intents: order status lookup by order number, and order
//! placement against the product catalog. Placement allocates a 5-digit
//! order number through a conditional write, so two concurrent invocations
//! can never share one.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use chrono::Utc;
use lambda_runtime::{service_fn, Error as LambdaError, LambdaEvent};
use rand::Rng;
use serde::Serialize;
use shared::item::{
    i64_attr, render_item, string_attr, ATTR_INVENTORY, ATTR_NAME, ATTR_ORDER_NUMBER,
    ATTR_PRODUCT_ID,
};
use shared::{
    slots, Config, DynamoItemStore, Error, FulfillmentState, InvocationSource, Item, ItemStore,
    LexEvent, LexResponse, Message, PutOutcome, NO_MATCH_MESSAGE,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Intents served by this bot.
const INTENT_CHECK_ORDER: &str = "CheckOrderStatus";
const INTENT_PLACE_ORDER: &str = "PlaceOrder";

/// Slot names.
const SLOT_ORDER_NUMBER: &str = "OrderNumber";
const SLOT_PRODUCT_NAME: &str = "ProductName";

/// Session attributes recording the most recent queries.
const SESSION_ORDER_QUERY: &str = "orderQuery";
const SESSION_PROD_QUERY: &str = "prodQuery";

/// Order numbers are 5-digit.
const ORDER_NUMBER_MIN: u32 = 10_000;
const ORDER_NUMBER_MAX: u32 = 99_999;

/// Resample attempts before giving up on a free order number.
const ORDER_NUMBER_ATTEMPTS: usize = 32;

const STATUS_IN_TRANSIT: &str = "In Transit";

/// Handler state built once per container.
struct AppState {
    store: Arc<dyn ItemStore>,
    config: Config,
}

impl AppState {
    async fn new() -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = aws_sdk_dynamodb::Client::new(&aws_config);
        Self {
            store: Arc::new(DynamoItemStore::new(client)),
            config: Config::from_env(),
        }
    }
}

/// Record written to the order table for each placed order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Order {
    order_number: String,
    order_timestamp: String,
    product: String,
    status: String,
    #[serde(rename = "ProductID")]
    product_id: String,
}

/// Order status lookup by order number. The last matching record wins when
/// order numbers collide.
async fn check_order(state: &AppState, event: LexEvent) -> Result<LexResponse, Error> {
    let intent_name = event.current_intent.name;
    let slots = event.current_intent.slots;
    let mut session_attributes = event.session_attributes.unwrap_or_default();

    let order_number = slots::text(&slots, SLOT_ORDER_NUMBER);

    let query = serde_json::json!({
        "Order_number": order_number.value(),
    })
    .to_string();
    session_attributes.insert(SESSION_ORDER_QUERY.to_string(), query.clone());

    if event.invocation_source == InvocationSource::DialogCodeHook {
        return Ok(LexResponse::delegate(session_attributes, slots));
    }

    let Some(order_number) = order_number.value() else {
        return Ok(LexResponse::elicit_slot(
            session_attributes,
            intent_name,
            slots,
            SLOT_ORDER_NUMBER,
            Message::plain_text("Which order number should I check?"),
        ));
    };

    debug!("Pulling order info for={}", query);

    let mut details = None;
    for order in state.store.scan(&state.config.order_table).await? {
        if string_attr(&order, ATTR_ORDER_NUMBER)? == order_number.as_str() {
            details = Some(order);
        }
    }

    let content = match details {
        Some(order) => render_item(&order),
        None => NO_MATCH_MESSAGE.to_string(),
    };

    Ok(LexResponse::close(
        session_attributes,
        FulfillmentState::Fulfilled,
        Message::plain_text(content),
    ))
}

/// Order placement. Matches the product identifier case-insensitively and
/// gates on inventory; inventory itself is not decremented here.
async fn place_order(state: &AppState, event: LexEvent) -> Result<LexResponse, Error> {
    let intent_name = event.current_intent.name;
    let slots = event.current_intent.slots;
    let mut session_attributes = event.session_attributes.unwrap_or_default();

    let product_name = slots::text(&slots, SLOT_PRODUCT_NAME);

    let query = serde_json::json!({
        "Prod_name": product_name.value(),
    })
    .to_string();
    session_attributes.insert(SESSION_PROD_QUERY.to_string(), query.clone());

    if event.invocation_source == InvocationSource::DialogCodeHook {
        return Ok(LexResponse::delegate(session_attributes, slots));
    }

    let Some(product_name) = product_name.value() else {
        return Ok(LexResponse::elicit_slot(
            session_attributes,
            intent_name,
            slots,
            SLOT_PRODUCT_NAME,
            Message::plain_text("Which product ID would you like to order?"),
        ));
    };

    debug!("Pulling product availability for={}", query);

    let mut content = String::new();
    for product in state.store.scan(&state.config.product_table).await? {
        let item_name = string_attr(&product, ATTR_NAME)?;
        if !string_attr(&product, ATTR_PRODUCT_ID)?.eq_ignore_ascii_case(product_name) {
            continue;
        }
        if i64_attr(&product, ATTR_INVENTORY)? > 0 {
            let order_number = place_order_record(state, item_name, product_name).await?;
            content.push_str(&format!(
                "Success! Your order for {item_name} has been placed. \
                 Use the order number {order_number} to check the progress of your order. \
                 Thank you!"
            ));
        } else {
            content.push_str(&format!(
                "No {item_name}s in stock! Please try again at a later time."
            ));
        }
    }
    if content.is_empty() {
        content.push_str(NO_MATCH_MESSAGE);
    }

    Ok(LexResponse::close(
        session_attributes,
        FulfillmentState::Fulfilled,
        Message::plain_text(content),
    ))
}

/// Allocate an unused order number and insert the order record. The write is
/// conditional on the order number being absent; a collision resamples.
async fn place_order_record(
    state: &AppState,
    item_name: &str,
    product_id: &str,
) -> Result<u32, Error> {
    for _ in 0..ORDER_NUMBER_ATTEMPTS {
        let order_number = rand::thread_rng().gen_range(ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX);
        let order = Order {
            order_number: order_number.to_string(),
            order_timestamp: Utc::now().to_rfc3339(),
            product: item_name.to_string(),
            status: STATUS_IN_TRANSIT.to_string(),
            product_id: product_id.to_uppercase(),
        };
        let item: Item = serde_dynamo::to_item(&order)
            .map_err(|e| Error::Record(format!("order serialization failed: {e}")))?;

        match state
            .store
            .put_new(&state.config.order_table, ATTR_ORDER_NUMBER, item)
            .await?
        {
            PutOutcome::Inserted => {
                info!("Placed order {} for product {}", order_number, product_id);
                return Ok(order_number);
            }
            PutOutcome::KeyExists => {
                debug!("Order number {} already taken, resampling", order_number);
            }
        }
    }
    Err(Error::OrderNumbersExhausted(ORDER_NUMBER_ATTEMPTS))
}

async fn dispatch(state: &AppState, event: LexEvent) -> Result<LexResponse, Error> {
    debug!(
        "dispatch userId={}, intentName={}",
        event.user_id, event.current_intent.name
    );

    let intent_name = event.current_intent.name.clone();
    match intent_name.as_str() {
        INTENT_CHECK_ORDER => check_order(state, event).await,
        INTENT_PLACE_ORDER => place_order(state, event).await,
        _ => Err(Error::UnsupportedIntent(intent_name)),
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<LexEvent>,
) -> Result<LexResponse, LambdaError> {
    let event = event.payload;
    debug!("event.bot.name={}", event.bot.name);
    Ok(dispatch(&state, event).await?)
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await);

    lambda_runtime::run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
