use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use record_ingest_core::contract::Record;
use record_ingest_core::item::{record_item, ItemAttribute};

use crate::adapters::record_store::{RecordStore, StoreError};

#[derive(Debug, Clone)]
pub struct DynamoDbRecordStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoDbRecordStore {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

impl RecordStore for DynamoDbRecordStore {
    fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError> {
        let client = self.client.clone();
        let table_name = table.to_string();
        let item = item_attributes(record);

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name.as_str())
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| StoreError::PutItem {
                        table: table_name.clone(),
                        reason: DisplayErrorContext(&error).to_string(),
                    })
            })
        })
    }
}

pub fn item_attributes(record: &Record) -> HashMap<String, AttributeValue> {
    record_item(record)
        .into_iter()
        .map(|(name, attribute)| {
            let value = match attribute {
                ItemAttribute::String(text) => AttributeValue::S(text),
                ItemAttribute::Number(text) => AttributeValue::N(text),
            };
            (name.to_string(), value)
        })
        .collect()
}
