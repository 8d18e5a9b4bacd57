//! Attribute-map record helpers.
//!
//! Store records arrive as maps of attribute name to typed value; these
//! helpers read the scalar types the catalog and order tables use and
//! render whole records for replies.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::error::{Error, Result};

/// A store record: attribute name to typed value.
pub type Item = HashMap<String, AttributeValue>;

/// Reply shown when a lookup matches nothing.
pub const NO_MATCH_MESSAGE: &str = "No items for that criteria found!";

/// Product catalog attribute names.
pub const ATTR_CATEGORY: &str = "item category";
pub const ATTR_PRICE: &str = "price";
pub const ATTR_NAME: &str = "item";
pub const ATTR_PRODUCT_ID: &str = "product_id";
pub const ATTR_INVENTORY: &str = "inventory";

/// Order table key attribute.
pub const ATTR_ORDER_NUMBER: &str = "OrderNumber";

/// String attribute. Record shape is part of the table contract; a missing
/// or mistyped attribute fails the invocation.
pub fn string_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value),
        Some(_) => Err(Error::Record(format!("attribute {name} is not a string"))),
        None => Err(Error::Record(format!("attribute {name} is missing"))),
    }
}

/// Number attribute as its stored text. DynamoDB numbers travel as strings;
/// replies echo the stored text rather than a reformatted float.
pub fn number_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str> {
    match item.get(name) {
        Some(AttributeValue::N(value)) => Ok(value),
        Some(_) => Err(Error::Record(format!("attribute {name} is not a number"))),
        None => Err(Error::Record(format!("attribute {name} is missing"))),
    }
}

/// Number attribute parsed for range comparisons.
pub fn f64_attr(item: &Item, name: &str) -> Result<f64> {
    let raw = number_attr(item, name)?;
    raw.parse()
        .map_err(|_| Error::Record(format!("attribute {name} is not numeric: {raw}")))
}

/// Number attribute parsed as an integer count.
pub fn i64_attr(item: &Item, name: &str) -> Result<i64> {
    let raw = number_attr(item, name)?;
    raw.parse()
        .map_err(|_| Error::Record(format!("attribute {name} is not an integer: {raw}")))
}

/// Scalar text of an attribute value, for generic record rendering.
fn scalar_text(value: &AttributeValue) -> String {
    match value {
        AttributeValue::S(text) => text.clone(),
        AttributeValue::N(number) => number.clone(),
        AttributeValue::Bool(flag) => flag.to_string(),
        other => format!("{other:?}"),
    }
}

/// Render a whole record as `key: value | ` pairs, sorted by attribute name
/// so replies are stable.
pub fn render_item(item: &Item) -> String {
    let mut names: Vec<&String> = item.keys().collect();
    names.sort();

    let mut rendered = String::new();
    for name in names {
        rendered.push_str(name);
        rendered.push_str(": ");
        rendered.push_str(&scalar_text(&item[name]));
        rendered.push_str(" | ");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Item {
        let mut item = Item::new();
        item.insert("product_id".to_string(), AttributeValue::S("P1".to_string()));
        item.insert("price".to_string(), AttributeValue::N("499.99".to_string()));
        item.insert("inventory".to_string(), AttributeValue::N("3".to_string()));
        item
    }

    #[test]
    fn test_string_attr() {
        let item = record();
        assert_eq!(string_attr(&item, "product_id").unwrap(), "P1");
        assert!(string_attr(&item, "price").is_err());
        assert!(string_attr(&item, "missing").is_err());
    }

    #[test]
    fn test_number_attrs() {
        let item = record();
        assert_eq!(number_attr(&item, "price").unwrap(), "499.99");
        assert_eq!(f64_attr(&item, "price").unwrap(), 499.99);
        assert_eq!(i64_attr(&item, "inventory").unwrap(), 3);
        assert!(i64_attr(&item, "price").is_err());
        assert!(f64_attr(&item, "product_id").is_err());
    }

    #[test]
    fn test_render_item_sorted_with_trailing_separator() {
        let item = record();
        assert_eq!(
            render_item(&item),
            "inventory: 3 | price: 499.99 | product_id: P1 | "
        );
    }
}
