use std::collections::BTreeMap;

use crate::contract::Record;

pub const PARTITION_KEY: &str = "id";
pub const TITLE_ATTRIBUTE: &str = "title";
pub const YEAR_ATTRIBUTE: &str = "year";

/// SDK-free view of the two DynamoDB attribute kinds a record uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAttribute {
    String(String),
    Number(String),
}

pub fn record_item(record: &Record) -> BTreeMap<&'static str, ItemAttribute> {
    BTreeMap::from([
        (PARTITION_KEY, ItemAttribute::String(record.id.clone())),
        (TITLE_ATTRIBUTE, ItemAttribute::String(record.title.clone())),
        (YEAR_ATTRIBUTE, ItemAttribute::Number(record.year_text())),
    ])
}
