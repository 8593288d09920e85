//! Conversion between items and the flat key-value records exchanged with
//! the persistence layer.
//!
//! A record maps field names to primitive values: strings, integers and a
//! list of tag strings. Dates are `YYYY-MM-DD` strings and the estimated
//! value is stored in minor units under `estimated_value_minor`.

use serde_json::{Map, Value};

use crate::{EngineError, Item, ResultEngine};

/// A flat field name to value map.
pub type Record = Map<String, Value>;

impl Item {
    pub fn to_record(&self) -> ResultEngine<Record> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            other => Err(EngineError::InvalidItem(format!(
                "item serialized to a non-object value: {other}"
            ))),
        }
    }

    pub fn from_record(record: Record) -> ResultEngine<Item> {
        serde_json::from_value(Value::Object(record))
            .map_err(|err| EngineError::InvalidItem(format!("malformed record: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::Money;

    fn laptop() -> Item {
        Item::new(
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            "Laptop",
            "Dell",
            "Model A",
            "SN1",
            Money::new(120_050),
            "Work laptop",
        )
        .tags(["Work", "Electronics"])
        .count(2)
    }

    #[test]
    fn record_uses_primitive_fields() {
        let record = laptop().to_record().unwrap();

        assert_eq!(record["purchase_date"], json!("2023-01-02"));
        assert_eq!(record["description"], json!("Laptop"));
        assert_eq!(record["serial_number"], json!("SN1"));
        assert_eq!(record["estimated_value_minor"], json!(120_050));
        assert_eq!(record["item_count"], json!(2));
        assert_eq!(record["item_tags"], json!(["Electronics", "Work"]));
    }

    #[test]
    fn record_restores_item() {
        let item = laptop();
        let restored = Item::from_record(item.to_record().unwrap()).unwrap();

        assert_eq!(restored, item);
    }

    #[test]
    fn optional_fields_default() {
        let record = json!({
            "purchase_date": "2023-03-04",
            "description": "Desk",
            "estimated_value_minor": 20000,
        });
        let Value::Object(record) = record else {
            unreachable!()
        };

        let item = Item::from_record(record).unwrap();
        assert_eq!(item.description, "Desk");
        assert_eq!(item.make, "");
        assert_eq!(item.item_count, 0);
        assert!(item.item_tags.is_empty());
    }

    #[test]
    fn malformed_record_is_invalid_item() {
        let mut record = laptop().to_record().unwrap();
        record.insert("purchase_date".to_string(), json!("yesterday"));

        let err = Item::from_record(record).unwrap_err();
        assert!(matches!(err, EngineError::InvalidItem(_)));
    }
}
