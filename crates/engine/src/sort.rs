//! Orderings applied to the displayed items of an inventory.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::{EngineError, Item};

/// Item field an inventory can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    Date,
    Value,
    Description,
    Make,
    Model,
    SerialNumber,
    Count,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Date,
        SortField::Value,
        SortField::Description,
        SortField::Make,
        SortField::Model,
        SortField::SerialNumber,
        SortField::Count,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Value => "Value",
            SortField::Description => "Description",
            SortField::Make => "Make",
            SortField::Model => "Model",
            SortField::SerialNumber => "SerialNumber",
            SortField::Count => "Count",
        }
    }

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortField::Date => a.purchase_date.cmp(&b.purchase_date),
            SortField::Value => a.estimated_value.cmp(&b.estimated_value),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Make => a.make.cmp(&b.make),
            SortField::Model => a.model.cmp(&b.model),
            SortField::SerialNumber => a.serial_number.cmp(&b.serial_number),
            SortField::Count => a.item_count.cmp(&b.item_count),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::KeyNotFound(format!("sort field {wanted}")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            other => Err(EngineError::KeyNotFound(format!("sort direction {other}"))),
        }
    }
}

/// An ordering over items.
///
/// A sort without a field leaves the order untouched. That is what the
/// default sort does, and what a sort parsed from an unknown field name does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Build a sort from user-facing names.
    ///
    /// An unknown field gives a sort that does nothing; an unknown direction
    /// falls back to ascending.
    pub fn parse(field: &str, direction: &str) -> Self {
        let field = field.parse().ok();
        if field.is_none() {
            tracing::debug!("ignoring unknown sort field");
        }
        Self {
            field,
            direction: direction.parse().unwrap_or_default(),
        }
    }

    /// Compare two items. Equal keys compare `Equal` in both directions, so a
    /// stable sort keeps their relative order.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let Some(field) = self.field else {
            return Ordering::Equal;
        };
        match self.direction {
            SortDirection::Ascending => field.compare(a, b),
            SortDirection::Descending => field.compare(b, a),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Money;

    fn valued(description: &str, value: i64) -> Item {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Item::new(date, description, "", "", "", Money::from_major(value), "")
    }

    #[test]
    fn parses_names() {
        assert_eq!("value".parse::<SortField>().unwrap(), SortField::Value);
        assert_eq!("Date".parse::<SortField>().unwrap(), SortField::Date);
        assert!("NonExistingField".parse::<SortField>().is_err());
        assert_eq!(
            "Descending".parse::<SortDirection>().unwrap(),
            SortDirection::Descending
        );
    }

    #[test]
    fn unknown_field_is_a_no_op() {
        let sort = Sort::parse("InvalidType", "Ascending");
        assert_eq!(sort.field, None);
        assert_eq!(
            sort.compare(&valued("a", 1), &valued("b", 2)),
            Ordering::Equal
        );
    }

    #[test]
    fn descending_reverses() {
        let cheap = valued("cheap", 1);
        let dear = valued("dear", 2);

        let ascending = Sort::new(SortField::Value, SortDirection::Ascending);
        let descending = Sort::new(SortField::Value, SortDirection::Descending);

        assert_eq!(ascending.compare(&cheap, &dear), Ordering::Less);
        assert_eq!(descending.compare(&cheap, &dear), Ordering::Greater);
        assert_eq!(descending.compare(&cheap, &cheap.clone()), Ordering::Equal);
    }

    #[test]
    fn description_is_lexicographic() {
        let sort = Sort::parse("Description", "Ascending");
        assert_eq!(
            sort.compare(&valued("Apple iPhone", 0), &valued("Bose Headphones", 0)),
            Ordering::Less
        );
    }
}
