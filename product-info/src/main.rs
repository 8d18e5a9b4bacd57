//! Product Information Lambda - fulfillment code hook for the catalog bot.
//!
//! Serves three intents: price-range search over the product catalog, the
//! same search over the comparison catalog, and single-product detail
//! lookup. All reads are full-table scans filtered in the handler.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, Error as LambdaError, LambdaEvent};
use shared::item::{
    f64_attr, number_attr, render_item, string_attr, ATTR_CATEGORY, ATTR_NAME, ATTR_PRICE,
    ATTR_PRODUCT_ID,
};
use shared::{
    slots, Config, DynamoItemStore, Error, FulfillmentState, InvocationSource, ItemStore,
    LexEvent, LexResponse, Message, NO_MATCH_MESSAGE,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Intents served by this bot.
const INTENT_PRODUCT_INFO: &str = "GetProductInfo";
const INTENT_COMPARE_PRODUCTS: &str = "CompareProducts";
const INTENT_PRODUCT_DETAILS: &str = "SpecificProductDetails";

/// Slot names.
const SLOT_CATEGORY: &str = "ProductCategory";
const SLOT_MIN_PRICE: &str = "MinPrice";
const SLOT_MAX_PRICE: &str = "MaxPrice";
const SLOT_PRODUCT_ID: &str = "ProductID";

/// Session attribute recording the most recent catalog query.
const SESSION_PRODUCT_QUERY: &str = "productQuery";

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

/// Map spoken category names onto the catalog's category labels. Anything
/// else passes through unmapped.
fn canonical_category(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "computers" => "PCs".to_string(),
        "accessories" => "Accessories".to_string(),
        "printers" => "Printers".to_string(),
        _ => raw.to_string(),
    }
}

/// Price-range search shared by the info and comparison intents. The
/// comparison catalog carries no product identifiers, so its replies skip
/// that column.
async fn price_range_lookup(
    state: &AppState,
    event: LexEvent,
    table: &str,
    include_product_id: bool,
) -> Result<LexResponse, Error> {
    let intent_name = event.current_intent.name;
    let slots = event.current_intent.slots;
    let mut session_attributes = event.session_attributes.unwrap_or_default();

    let category = slots::text(&slots, SLOT_CATEGORY);
    let category = category.value().map(|raw| canonical_category(raw));
    let min_price = slots::number(&slots, SLOT_MIN_PRICE);
    let max_price = slots::number(&slots, SLOT_MAX_PRICE);

    let query = serde_json::json!({
        "ProductCategory": category,
        "min_price": min_price.value(),
        "max_price": max_price.value(),
    })
    .to_string();
    session_attributes.insert(SESSION_PRODUCT_QUERY.to_string(), query.clone());

    if event.invocation_source == InvocationSource::DialogCodeHook {
        return Ok(LexResponse::delegate(session_attributes, slots));
    }

    let Some(category) = category else {
        return Ok(LexResponse::elicit_slot(
            session_attributes,
            intent_name,
            slots,
            SLOT_CATEGORY,
            Message::plain_text("Which product category are you interested in?"),
        ));
    };
    let Some(&min_price) = min_price.value() else {
        return Ok(LexResponse::elicit_slot(
            session_attributes,
            intent_name,
            slots,
            SLOT_MIN_PRICE,
            Message::plain_text("What is the minimum price for your search?"),
        ));
    };
    let Some(&max_price) = max_price.value() else {
        return Ok(LexResponse::elicit_slot(
            session_attributes,
            intent_name,
            slots,
            SLOT_MAX_PRICE,
            Message::plain_text("What is the maximum price for your search?"),
        ));
    };

    debug!("Pulling item info for={}", query);

    let mut content = String::new();
    for product in state.store.scan(table).await? {
        if string_attr(&product, ATTR_CATEGORY)? != category {
            continue;
        }
        // Bounds are exclusive on both ends.
        let price = f64_attr(&product, ATTR_PRICE)?;
        if price > min_price && price < max_price {
            let name = string_attr(&product, ATTR_NAME)?;
            let price_text = number_attr(&product, ATTR_PRICE)?;
            if include_product_id {
                let product_id = string_attr(&product, ATTR_PRODUCT_ID)?;
                content.push_str(&format!("{name}: ${price_text} Product ID: {product_id} | "));
            } else {
                content.push_str(&format!("{name}: ${price_text} | "));
            }
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

/// Single-product detail lookup. Stored identifiers are lowered before
/// comparing; the slot text is used as given. The last matching record wins
/// when identifiers collide.
async fn product_details(state: &AppState, event: LexEvent) -> Result<LexResponse, Error> {
    let intent_name = event.current_intent.name;
    let slots = event.current_intent.slots;
    let mut session_attributes = event.session_attributes.unwrap_or_default();

    let product_id = slots::text(&slots, SLOT_PRODUCT_ID);

    let query = serde_json::json!({
        "ProductSearched": product_id.value(),
    })
    .to_string();
    session_attributes.insert(SESSION_PRODUCT_QUERY.to_string(), query.clone());

    if event.invocation_source == InvocationSource::DialogCodeHook {
        return Ok(LexResponse::delegate(session_attributes, slots));
    }

    let Some(product_id) = product_id.value() else {
        return Ok(LexResponse::elicit_slot(
            session_attributes,
            intent_name,
            slots,
            SLOT_PRODUCT_ID,
            Message::plain_text("Which product ID should I look up?"),
        ));
    };

    debug!("Pulling item info for={}", query);

    let mut details = None;
    for product in state.store.scan(&state.config.product_table).await? {
        if string_attr(&product, ATTR_PRODUCT_ID)?.to_lowercase() == *product_id {
            details = Some(product);
        }
    }

    let content = match details {
        Some(product) => render_item(&product),
        None => NO_MATCH_MESSAGE.to_string(),
    };

    Ok(LexResponse::close(
        session_attributes,
        FulfillmentState::Fulfilled,
        Message::plain_text(content),
    ))
}

async fn dispatch(state: &AppState, event: LexEvent) -> Result<LexResponse, Error> {
    debug!(
        "dispatch userId={}, intentName={}",
        event.user_id, event.current_intent.name
    );

    let intent_name = event.current_intent.name.clone();
    match intent_name.as_str() {
        INTENT_PRODUCT_INFO => {
            price_range_lookup(state, event, &state.config.product_table, true).await
        }
        INTENT_COMPARE_PRODUCTS => {
            price_range_lookup(state, event, &state.config.compare_table, false).await
        }
        INTENT_PRODUCT_DETAILS => product_details(state, event).await,
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
