//! Predicates selecting which items of an inventory are displayed.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{EngineError, Item, ResultEngine};

/// Conditions an item must satisfy to be displayed.
///
/// Every condition must hold. The default filter matches every item.
///
/// Substring conditions are case-sensitive literal containment; an empty
/// substring matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    /// Inclusive lower bound on the purchase date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the purchase date.
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub make: String,
    /// Tags an item must all carry.
    pub required_tags: BTreeSet<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    #[must_use]
    pub fn description(mut self, substring: impl Into<String>) -> Self {
        self.description = substring.into();
        self
    }

    #[must_use]
    pub fn make(mut self, substring: impl Into<String>) -> Self {
        self.make = substring.into();
        self
    }

    #[must_use]
    pub fn required_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if `item` satisfies every condition.
    ///
    /// A range whose start is after its end matches nothing.
    pub fn matches(&self, item: &Item) -> bool {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return false;
        }
        if self.start_date.is_some_and(|start| item.purchase_date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| item.purchase_date > end) {
            return false;
        }

        item.description.contains(self.description.as_str())
            && item.make.contains(self.make.as_str())
            && item.has_tags(&self.required_tags)
    }

    /// Reject a date range with only one bound.
    ///
    /// Used by [`Inventory::apply_filter`](crate::Inventory::apply_filter);
    /// [`Filter::matches`] itself treats a missing bound as unbounded.
    pub fn check(&self) -> ResultEngine<()> {
        match (self.start_date, self.end_date) {
            (Some(_), None) => Err(EngineError::InvalidFilter(
                "start date given without end date".to_string(),
            )),
            (None, Some(_)) => Err(EngineError::InvalidFilter(
                "end date given without start date".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
