//! The `Inventory` holds the user's items and the filtered, sorted view of
//! them. The user can have multiple inventories.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{EngineError, Filter, Item, Money, Record, ResultEngine, Sort};

/// Holds items, their total value and the current view over them.
///
/// The backing sequence keeps insertion order. The displayed items are a
/// view over it, recomputed only by [`Inventory::filter_items`] and
/// [`Inventory::sort_items`]. Mutations keep the view consistent without
/// re-running either pass: added items are appended to it, removed items
/// drop out of it and replaced items are updated in place.
///
/// Two inventories are equal when they have the same `id`.
#[derive(Clone, Debug)]
pub struct Inventory {
    pub id: Uuid,
    pub name: String,
    items: Vec<Item>,
    value: Money,
    filter: Filter,
    sort: Sort,
    /// Indexes into `items`.
    displayed: Vec<usize>,
}

impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Inventory {}

impl Inventory {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            items: Vec::new(),
            value: Money::ZERO,
            filter: Filter::default(),
            sort: Sort::default(),
            displayed: Vec::new(),
        }
    }

    /// The backing sequence, in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of the estimated values of all items.
    pub fn value(&self) -> Money {
        self.value
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// The current view, in display order.
    pub fn displayed_items(&self) -> Vec<&Item> {
        self.displayed.iter().map(|&index| &self.items[index]).collect()
    }

    /// Every tag used by at least one item.
    pub fn all_tags(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .flat_map(|item| item.item_tags.iter().map(String::as_str))
            .collect()
    }

    /// Add an item. Serial numbers are not checked; see
    /// [`Inventory::import_item`] for the strict variant.
    pub fn add_item(&mut self, item: Item) -> ResultEngine<()> {
        ensure_value(&item)?;
        let value = add_value(self.value, item.estimated_value)?;
        tracing::debug!(inventory = %self.name, description = %item.description, "adding item");

        self.value = value;
        self.items.push(item);
        self.displayed.push(self.items.len() - 1);
        Ok(())
    }

    /// Add an item, refusing a serial number already present.
    ///
    /// Items without a serial number never collide.
    pub fn import_item(&mut self, item: Item) -> ResultEngine<()> {
        ensure_value(&item)?;
        if !item.serial_number.is_empty()
            && self
                .items
                .iter()
                .any(|existing| existing.serial_number == item.serial_number)
        {
            return Err(EngineError::ExistingKey(item.serial_number));
        }
        self.add_item(item)
    }

    /// Remove the first item equal to `item`.
    ///
    /// Returns `None`, leaving the inventory untouched, when no item matches.
    pub fn remove_item(&mut self, item: &Item) -> Option<Item> {
        let index = self.items.iter().position(|existing| existing == item)?;
        Some(self.detach(index))
    }

    /// Remove the item at `index`.
    pub fn remove(&mut self, index: usize) -> ResultEngine<Item> {
        if index >= self.items.len() {
            return Err(not_found(index));
        }
        Ok(self.detach(index))
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, item: Item) -> ResultEngine<Item> {
        ensure_value(&item)?;
        let slot = self.items.get_mut(index).ok_or_else(|| not_found(index))?;
        let value = replace_value(self.value, slot.estimated_value, item.estimated_value)?;
        tracing::debug!(inventory = %self.name, index, "replacing item");

        self.value = value;
        Ok(std::mem::replace(slot, item))
    }

    /// Edit the item at `index` in place.
    ///
    /// If the edited item ends up with a negative value the edit is undone
    /// and an error returned.
    pub fn update<F>(&mut self, index: usize, edit: F) -> ResultEngine<()>
    where
        F: FnOnce(&mut Item),
    {
        let slot = self.items.get_mut(index).ok_or_else(|| not_found(index))?;
        let previous = slot.clone();
        edit(slot);

        let value = ensure_value(slot).and_then(|()| {
            replace_value(self.value, previous.estimated_value, slot.estimated_value)
        });
        match value {
            Ok(value) => {
                self.value = value;
                Ok(())
            }
            Err(err) => {
                *slot = previous;
                Err(err)
            }
        }
    }

    /// Replace every item. Nothing changes if any item is invalid.
    ///
    /// The displayed items are reset to the new backing order.
    pub fn replace_items(&mut self, items: Vec<Item>) -> ResultEngine<()> {
        let value = items.iter().try_fold(Money::ZERO, |total, item| {
            ensure_value(item)?;
            add_value(total, item.estimated_value)
        })?;
        tracing::debug!(inventory = %self.name, count = items.len(), "replacing items");

        self.value = value;
        self.displayed = (0..items.len()).collect();
        self.items = items;
        Ok(())
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = sort;
    }

    /// Set `filter` after rejecting a half-open date range, then run the
    /// filter pass.
    pub fn apply_filter(&mut self, filter: Filter) -> ResultEngine<()> {
        filter.check()?;
        self.filter = filter;
        self.filter_items();
        Ok(())
    }

    /// Recompute the displayed items: every item matching the current filter,
    /// in backing order.
    pub fn filter_items(&mut self) {
        let filter = &self.filter;
        self.displayed = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| filter.matches(item).then_some(index))
            .collect();
    }

    /// Reorder the displayed items by the current sort. The sort is stable.
    pub fn sort_items(&mut self) {
        let items = &self.items;
        let sort = &self.sort;
        self.displayed
            .sort_by(|&a, &b| sort.compare(&items[a], &items[b]));
    }

    pub fn records(&self) -> ResultEngine<Vec<Record>> {
        self.items.iter().map(Item::to_record).collect()
    }

    /// Replace every item with the ones decoded from `records`.
    pub fn load_records(&mut self, records: Vec<Record>) -> ResultEngine<()> {
        let items = records
            .into_iter()
            .map(Item::from_record)
            .collect::<ResultEngine<Vec<_>>>()?;
        self.replace_items(items)
    }

    fn detach(&mut self, index: usize) -> Item {
        let item = self.items.remove(index);
        tracing::debug!(inventory = %self.name, description = %item.description, "removed item");

        self.value -= item.estimated_value;
        self.displayed.retain(|&shown| shown != index);
        for shown in &mut self.displayed {
            if *shown > index {
                *shown -= 1;
            }
        }
        item
    }
}

fn ensure_value(item: &Item) -> ResultEngine<()> {
    if item.estimated_value.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "estimated value of \"{}\" must not be negative",
            item.description
        )));
    }
    Ok(())
}

fn add_value(total: Money, value: Money) -> ResultEngine<Money> {
    total.checked_add(value).ok_or_else(too_large)
}

/// The total after swapping `old` for `new`.
fn replace_value(total: Money, old: Money, new: Money) -> ResultEngine<Money> {
    total
        .checked_sub(old)
        .and_then(|rest| rest.checked_add(new))
        .ok_or_else(too_large)
}

fn too_large() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

fn not_found(index: usize) -> EngineError {
    EngineError::KeyNotFound(format!("item {index}"))
}
