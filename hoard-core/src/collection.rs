use log::warn;

use crate::{
    CreatedList, DestroyedItem, DestroyedList, ItemPair, List, ListItem, PrimaryKey,
    ReconcileError,
};

/// The lists of one kind for one game.
///
/// The aggregate list is kept apart from the regular lists, so it is always
/// first when the collection is read and can't be lost to a reordering.
/// Every `apply_*` method validates before it mutates, so an error leaves the
/// collection untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListCollection {
    aggregate: Option<List>,
    regular: Vec<List>,
}

impl ListCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from lists as the server returned them.
    pub fn from_lists(lists: Vec<List>) -> Result<Self, ReconcileError> {
        if lists.first().map(|l| !l.aggregate).unwrap_or(false) {
            warn!("Aggregate list was not returned first");
        }

        let (mut aggregates, regular): (Vec<_>, Vec<_>) =
            lists.into_iter().partition(|l| l.aggregate);

        if aggregates.len() > 1 {
            return Err(ReconcileError::DuplicateAggregate);
        }

        let aggregate = aggregates.pop();

        if aggregate.is_none() && !regular.is_empty() {
            return Err(ReconcileError::MissingAggregate);
        }

        Ok(Self { aggregate, regular })
    }

    /// All lists, aggregate first
    pub fn lists(&self) -> impl Iterator<Item = &List> {
        self.aggregate.iter().chain(self.regular.iter())
    }

    /// All lists, aggregate first
    pub fn to_vec(&self) -> Vec<List> {
        self.lists().cloned().collect()
    }

    pub fn aggregate(&self) -> Option<&List> {
        self.aggregate.as_ref()
    }

    pub fn regular_lists(&self) -> &[List] {
        &self.regular
    }

    pub fn list(&self, list_id: PrimaryKey) -> Option<&List> {
        self.lists().find(|l| l.id == list_id)
    }

    /// Finds an item on one of the regular lists
    pub fn item(&self, item_id: PrimaryKey) -> Option<&ListItem> {
        self.regular.iter().find_map(|l| l.item(item_id))
    }

    pub fn len(&self) -> usize {
        self.regular.len() + self.aggregate.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregate.is_none() && self.regular.is_empty()
    }

    /// Applies a newly created list.
    ///
    /// A pair replaces the whole collection. A single list goes right after
    /// the aggregate list.
    pub fn apply_created_list(&mut self, created: CreatedList) -> Result<(), ReconcileError> {
        match created {
            CreatedList::WithAggregate { aggregate, list } => {
                if !aggregate.aggregate {
                    return Err(ReconcileError::MissingAggregate);
                }
                if list.aggregate {
                    return Err(ReconcileError::DuplicateAggregate);
                }

                self.aggregate = Some(aggregate);
                self.regular = vec![list];
            }
            CreatedList::Single(list) => {
                if list.aggregate {
                    return Err(ReconcileError::DuplicateAggregate);
                }
                if self.aggregate.is_none() {
                    return Err(ReconcileError::MissingAggregate);
                }

                self.regular.insert(0, list);
            }
        }

        Ok(())
    }

    /// Replaces the list with the same id
    pub fn apply_updated_list(&mut self, list: List) -> Result<(), ReconcileError> {
        let list_id = list.id;

        if let Some(aggregate) = self.aggregate.as_mut().filter(|a| a.id == list_id) {
            *aggregate = list;
            return Ok(());
        }

        let existing = self
            .regular
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or(ReconcileError::ListNotFound(list_id))?;

        *existing = list;
        Ok(())
    }

    /// Removes a destroyed list. If the server reports the aggregate list is
    /// gone too, the whole collection is cleared.
    pub fn apply_destroyed_list(
        &mut self,
        list_id: PrimaryKey,
        destroyed: DestroyedList,
    ) -> Result<(), ReconcileError> {
        match destroyed {
            DestroyedList::Emptied => {
                self.aggregate = None;
                self.regular.clear();
            }
            DestroyedList::Adjusted(aggregate) => {
                if !aggregate.aggregate {
                    return Err(ReconcileError::MissingAggregate);
                }

                let index = self
                    .regular
                    .iter()
                    .position(|l| l.id == list_id)
                    .ok_or(ReconcileError::ListNotFound(list_id))?;

                self.regular.remove(index);
                self.aggregate = Some(aggregate);
            }
        }

        Ok(())
    }

    /// Applies `[aggregate_item, regular_item]` to the aggregate list and the
    /// regular list with the given id. Matching items are replaced in place,
    /// new ones are prepended. Applying the same pair twice changes nothing.
    pub fn apply_item_pair(
        &mut self,
        list_id: PrimaryKey,
        pair: ItemPair,
    ) -> Result<(), ReconcileError> {
        let aggregate = self
            .aggregate
            .as_mut()
            .ok_or(ReconcileError::MissingAggregate)?;

        let regular = self
            .regular
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or(ReconcileError::ListNotFound(list_id))?;

        aggregate.upsert_item(pair.aggregate);
        regular.upsert_item(pair.regular);

        Ok(())
    }

    /// Removes a destroyed item from its regular list and adjusts the
    /// aggregate list to match. Returns the removed item.
    pub fn apply_destroyed_item(
        &mut self,
        item_id: PrimaryKey,
        destroyed: DestroyedItem,
    ) -> Result<ListItem, ReconcileError> {
        let aggregate = self
            .aggregate
            .as_mut()
            .ok_or(ReconcileError::MissingAggregate)?;

        let removed = self
            .regular
            .iter_mut()
            .find_map(|l| l.remove_item(item_id))
            .ok_or(ReconcileError::ItemNotFound(item_id))?;

        match destroyed {
            DestroyedItem::Removed => {
                aggregate.remove_matching(&removed.description);
            }
            DestroyedItem::Adjusted(item) => aggregate.upsert_item(item),
        }

        Ok(removed)
    }
}
