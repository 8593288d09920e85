//! The module contains the `Item` type, one tracked possession, and the
//! validation applied to raw text before an item is built.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// Format accepted for purchase dates typed by the user.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A tracked possession.
///
/// Fields are public: an item on its own carries no invariant. The rules
/// (non-negative value, unique serial numbers) are enforced by the
/// [`Inventory`](crate::Inventory) that owns it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub purchase_date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    /// Manufacturer serial number. Empty when unknown.
    #[serde(default)]
    pub serial_number: String,
    #[serde(rename = "estimated_value_minor")]
    pub estimated_value: Money,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub item_tags: BTreeSet<String>,
}

/// The validated part of the raw input collected for a new item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInput {
    pub purchase_date: NaiveDate,
    pub description: String,
    pub estimated_value: Money,
}

impl ItemInput {
    /// Build the item, filling in the free-form fields.
    pub fn into_item(
        self,
        make: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
        comment: impl Into<String>,
    ) -> Item {
        Item::new(
            self.purchase_date,
            self.description,
            make,
            model,
            serial_number,
            self.estimated_value,
            comment,
        )
    }
}

impl Item {
    pub fn new(
        purchase_date: NaiveDate,
        description: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
        estimated_value: Money,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            purchase_date,
            description: description.into(),
            make: make.into(),
            model: model.into(),
            serial_number: serial_number.into(),
            estimated_value,
            comment: comment.into(),
            item_count: 0,
            item_tags: BTreeSet::new(),
        }
    }

    /// Replace the tags. Surrounding whitespace is trimmed and blank tags are
    /// dropped.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.item_tags = tags
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn count(mut self, item_count: u32) -> Self {
        self.item_count = item_count;
        self
    }

    /// Key the item is stored under by the persistence layer.
    pub fn store_key(&self) -> &str {
        &self.description
    }

    /// Returns `true` if the item carries every tag in `tags`.
    pub fn has_tags(&self, tags: &BTreeSet<String>) -> bool {
        tags.is_subset(&self.item_tags)
    }

    /// Validate raw input against today's date.
    ///
    /// See [`Item::check_input_on`].
    pub fn check_input(
        purchase_date: &str,
        description: &str,
        estimated_value: &str,
    ) -> ResultEngine<ItemInput> {
        Self::check_input_on(purchase_date, description, estimated_value, today())
    }

    /// Validate raw input collected for a new item.
    ///
    /// Checks run in order and the first failure is returned:
    /// 1. the description is not blank;
    /// 2. the purchase date parses as `YYYY-MM-DD`;
    /// 3. the purchase date is not after `today`;
    /// 4. the estimated value parses and is not negative.
    pub fn check_input_on(
        purchase_date: &str,
        description: &str,
        estimated_value: &str,
        today: NaiveDate,
    ) -> ResultEngine<ItemInput> {
        let description = description.trim();
        if description.is_empty() {
            return Err(EngineError::InvalidItem(
                "description must not be empty".to_string(),
            ));
        }

        let purchase_date = NaiveDate::parse_from_str(purchase_date.trim(), DATE_FORMAT)
            .map_err(|_| {
                EngineError::InvalidDate(format!(
                    "\"{}\" is not a date (expected YYYY-MM-DD)",
                    purchase_date.trim()
                ))
            })?;
        if purchase_date > today {
            return Err(EngineError::InvalidDate(format!(
                "purchase date {purchase_date} is in the future"
            )));
        }

        let estimated_value: Money = estimated_value.parse()?;
        if estimated_value.is_negative() {
            return Err(EngineError::InvalidAmount(
                "estimated value must not be negative".to_string(),
            ));
        }

        Ok(ItemInput {
            purchase_date,
            description: description.to_string(),
            estimated_value,
        })
    }

    /// Validate raw input and return the first problem as a message.
    ///
    /// The message is empty when the input is valid.
    pub fn validate_input(purchase_date: &str, description: &str, estimated_value: &str) -> String {
        Self::validate_input_on(purchase_date, description, estimated_value, today())
    }

    pub fn validate_input_on(
        purchase_date: &str,
        description: &str,
        estimated_value: &str,
        today: NaiveDate,
    ) -> String {
        match Self::check_input_on(purchase_date, description, estimated_value, today) {
            Ok(_) => String::new(),
            Err(err) => err.to_string(),
        }
    }
}

/// The current calendar date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
