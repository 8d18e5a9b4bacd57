//! Table storage behind a trait so handlers can run against DynamoDB in
//! production and an in-memory fake in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use crate::error::{Error, Result};
use crate::item::Item;

/// Result of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The record was written.
    Inserted,
    /// A record with the same key already exists; nothing was written.
    KeyExists,
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All records in a table.
    async fn scan(&self, table: &str) -> Result<Vec<Item>>;

    /// Write a record unconditionally.
    async fn put(&self, table: &str, item: Item) -> Result<()>;

    /// Write a record only if no record with the same value for `key_attr`
    /// exists yet.
    async fn put_new(&self, table: &str, key_attr: &str, item: Item) -> Result<PutOutcome>;
}

/// DynamoDB-backed store.
pub struct DynamoItemStore {
    client: Client,
}

impl DynamoItemStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn scan(&self, table: &str) -> Result<Vec<Item>> {
        let mut stream = self
            .client
            .scan()
            .table_name(table)
            .into_paginator()
            .items()
            .send();

        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item.map_err(|e| Error::Store(e.to_string()))?);
        }
        Ok(items)
    }

    async fn put(&self, table: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;
        Ok(())
    }

    async fn put_new(&self, table: &str, key_attr: &str, item: Item) -> Result<PutOutcome> {
        let result = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#key)")
            .expression_attribute_names("#key", key_attr)
            .send()
            .await;

        match result {
            Ok(_) => Ok(PutOutcome::Inserted),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Ok(PutOutcome::KeyExists)
            }
            Err(err) => Err(Error::Store(err.to_string())),
        }
    }
}

/// In-memory store for tests. Tables are plain vectors, so scans return
/// records in insertion order.
#[derive(Default)]
pub struct MemoryItemStore {
    tables: Mutex<HashMap<String, Vec<Item>>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a table.
    pub fn count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn scan(&self, table: &str) -> Result<Vec<Item>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default())
    }

    async fn put(&self, table: &str, item: Item) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(item);
        Ok(())
    }

    async fn put_new(&self, table: &str, key_attr: &str, item: Item) -> Result<PutOutcome> {
        let key = match item.get(key_attr) {
            Some(value) => value.clone(),
            None => {
                return Err(Error::Record(format!(
                    "conditional write without key attribute {key_attr}"
                )))
            }
        };

        let mut tables = self.tables.lock().unwrap();
        let records = tables.entry(table.to_string()).or_default();
        if records.iter().any(|existing| existing.get(key_attr) == Some(&key)) {
            return Ok(PutOutcome::KeyExists);
        }
        records.push(item);
        Ok(PutOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::AttributeValue;

    use super::*;

    fn keyed(key: &str) -> Item {
        let mut item = Item::new();
        item.insert("OrderNumber".to_string(), AttributeValue::S(key.to_string()));
        item
    }

    #[tokio::test]
    async fn test_scan_returns_records_in_insertion_order() {
        let store = MemoryItemStore::new();
        store.put("orders", keyed("10001")).await.unwrap();
        store.put("orders", keyed("10002")).await.unwrap();

        let items = store.scan("orders").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("OrderNumber"), Some(&AttributeValue::S("10001".to_string())));
        assert_eq!(items[1].get("OrderNumber"), Some(&AttributeValue::S("10002".to_string())));
    }

    #[tokio::test]
    async fn test_scan_of_unknown_table_is_empty() {
        let store = MemoryItemStore::new();
        assert!(store.scan("orders").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_new_refuses_duplicate_key() {
        let store = MemoryItemStore::new();

        let first = store.put_new("orders", "OrderNumber", keyed("10001")).await.unwrap();
        assert_eq!(first, PutOutcome::Inserted);

        let second = store.put_new("orders", "OrderNumber", keyed("10001")).await.unwrap();
        assert_eq!(second, PutOutcome::KeyExists);

        assert_eq!(store.count("orders"), 1);
    }

    #[tokio::test]
    async fn test_put_new_requires_key_attribute() {
        let store = MemoryItemStore::new();
        let result = store.put_new("orders", "OrderNumber", Item::new()).await;
        assert!(result.is_err());
        assert_eq!(store.count("orders"), 0);
    }
}
