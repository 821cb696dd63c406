use hoard_core::{
    ApiError, Flash, ItemAttributes, List, ListCollection, ListItem, ListKind, PrimaryKey,
    ReconcileError,
};
use log::info;
use parking_lot::Mutex;

use crate::{Api, HoardContext, HoardEvent, Lifetime, LoadingState, StoreError, StoreResult};

const GAME_NOT_FOUND: &str =
    "We couldn't find the game you're looking for. Try refreshing the page.";
const LIST_GAME_NOT_FOUND: &str =
    "The game you're trying to add a list to could not be found. Try refreshing the page.";
const LIST_NOT_FOUND: &str =
    "The list you're looking for could not be found. Try refreshing the page to fix this.";
const ITEM_LIST_NOT_FOUND: &str =
    "The list you're trying to add an item to could not be found. Try refreshing the page.";
const ITEM_NOT_FOUND: &str =
    "The item you're looking for could not be found. Try refreshing the page to fix this.";
const ITEM_NOT_DELETED: &str = "Your item was not deleted.";

/// What a quantity change ended up doing to an item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemChange {
    Updated(ListItem),
    Destroyed,
    /// Removal was declined, nothing was sent
    Kept,
}

/// Holds the lists of one kind for the active game and keeps them in
/// step with the server.
pub struct ListStore<A> {
    context: HoardContext<A>,
    kind: ListKind,
    lifetime: Lifetime,

    collection: Mutex<ListCollection>,
    loading_state: Mutex<LoadingState>,
}

impl<A> ListStore<A>
where
    A: Api,
{
    pub fn new(context: &HoardContext<A>, kind: ListKind) -> Self {
        Self {
            context: context.clone(),
            kind,
            lifetime: Lifetime::new(),
            collection: Default::default(),
            loading_state: Default::default(),
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// All lists, aggregate first
    pub fn lists(&self) -> Vec<List> {
        self.collection.lock().to_vec()
    }

    pub fn collection(&self) -> ListCollection {
        self.collection.lock().clone()
    }

    pub fn loading_state(&self) -> LoadingState {
        *self.loading_state.lock()
    }

    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    /// Stops the store from writing any response that arrives from now on.
    pub fn unmount(&self) {
        self.lifetime.end();
    }

    pub async fn fetch_lists(&self, game_id: PrimaryKey) -> StoreResult<Vec<List>> {
        let token = self.context.token(&self.lifetime)?;
        self.set_loading_state(LoadingState::Loading);

        let result = self.context.api.lists(&token, self.kind, game_id).await;
        self.lifetime.ensure_alive()?;

        let lists = match result {
            Ok(lists) => lists,
            Err(ApiError::Unauthorized) => return Err(self.context.unauthorized(&self.lifetime)),
            Err(error) => {
                self.set_loading_state(LoadingState::Error);
                return Err(self.fail(error, GAME_NOT_FOUND));
            }
        };

        let collection = match ListCollection::from_lists(lists) {
            Ok(collection) => collection,
            Err(error) => {
                self.set_loading_state(LoadingState::Error);
                return Err(self.context.inconsistent(error));
            }
        };

        let lists = self.commit(|current| {
            *current = collection;
            Ok(current.to_vec())
        })?;

        self.set_loading_state(LoadingState::Done);
        Ok(lists)
    }

    /// Creates a list. The first list of a game comes back together with
    /// the aggregate list the server made for it.
    pub async fn create_list(&self, game_id: PrimaryKey, title: &str) -> StoreResult<List> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .create_list(&token, self.kind, game_id, title)
            .await;
        self.lifetime.ensure_alive()?;

        let created = result.map_err(|e| self.fail(e, LIST_GAME_NOT_FOUND))?;
        let list = created.list().clone();

        self.commit(|collection| collection.apply_created_list(created))?;

        info!("Created {} \"{}\"", self.kind.human_name(), list.title);
        Ok(list)
    }

    pub async fn update_list(&self, list_id: PrimaryKey, title: &str) -> StoreResult<List> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .update_list(&token, self.kind, list_id, title)
            .await;
        self.lifetime.ensure_alive()?;

        let list = result.map_err(|e| self.fail(e, LIST_NOT_FOUND))?;
        let updated = list.clone();

        self.commit(|collection| collection.apply_updated_list(updated))?;
        Ok(list)
    }

    pub async fn destroy_list(&self, list_id: PrimaryKey) -> StoreResult<()> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .destroy_list(&token, self.kind, list_id)
            .await;
        self.lifetime.ensure_alive()?;

        let destroyed = result.map_err(|e| self.fail(e, LIST_NOT_FOUND))?;
        self.commit(|collection| collection.apply_destroyed_list(list_id, destroyed))
    }

    /// Adds an item to a regular list. Returns the item as stored on that list.
    pub async fn create_list_item(
        &self,
        list_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> StoreResult<ListItem> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .create_list_item(&token, self.kind, list_id, attributes)
            .await;
        self.lifetime.ensure_alive()?;

        let pair = result.map_err(|e| self.fail_item(e, ITEM_LIST_NOT_FOUND))?;
        let item = pair.regular.clone();

        self.commit(|collection| collection.apply_item_pair(list_id, pair))?;
        Ok(item)
    }

    pub async fn update_list_item(
        &self,
        item_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> StoreResult<ListItem> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .update_list_item(&token, self.kind, item_id, attributes)
            .await;
        self.lifetime.ensure_alive()?;

        let pair = result.map_err(|e| self.fail_item(e, ITEM_NOT_FOUND))?;
        let item = pair.regular.clone();
        let list_id = item.list_id;

        self.commit(|collection| collection.apply_item_pair(list_id, pair))?;
        Ok(item)
    }

    pub async fn increment_item(&self, item_id: PrimaryKey) -> StoreResult<ListItem> {
        let item = self.find_item(item_id)?;
        let quantity = item.quantity.checked_add(1).ok_or_else(|| {
            self.context.inconsistent(ReconcileError::QuantityOutOfRange(item_id))
        })?;

        self.update_list_item(item_id, &ItemAttributes::quantity(quantity))
            .await
    }

    /// Lowers the quantity by one. When that would leave none, `confirm` decides
    /// whether the item is destroyed instead.
    pub async fn decrement_item<F>(
        &self,
        item_id: PrimaryKey,
        confirm: F,
    ) -> StoreResult<ItemChange>
    where
        F: FnOnce(&ListItem) -> bool,
    {
        let item = self.find_item(item_id)?;

        if item.quantity > 1 {
            let attributes = ItemAttributes::quantity(item.quantity - 1);
            let updated = self.update_list_item(item_id, &attributes).await?;

            return Ok(ItemChange::Updated(updated));
        }

        if confirm(&item) {
            self.destroy_list_item(item_id).await?;
            Ok(ItemChange::Destroyed)
        } else {
            self.context.emit(HoardEvent::Flash(Flash::info(ITEM_NOT_DELETED)));
            Ok(ItemChange::Kept)
        }
    }

    /// Destroys an item. Returns the item as it was on its regular list.
    pub async fn destroy_list_item(&self, item_id: PrimaryKey) -> StoreResult<ListItem> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .destroy_list_item(&token, self.kind, item_id)
            .await;
        self.lifetime.ensure_alive()?;

        let destroyed = result.map_err(|e| self.fail_item(e, ITEM_NOT_FOUND))?;
        self.commit(|collection| collection.apply_destroyed_item(item_id, destroyed))
    }

    fn find_item(&self, item_id: PrimaryKey) -> StoreResult<ListItem> {
        self.lifetime.ensure_alive()?;

        let item = self.collection.lock().item(item_id).cloned();
        item.ok_or_else(|| self.context.inconsistent(ReconcileError::ItemNotFound(item_id)))
    }

    /// Builds the next collection from a copy of the current one and swaps it in.
    /// The lock is held throughout, so concurrent commits apply one after the other.
    fn commit<T, F>(&self, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut ListCollection) -> Result<T, ReconcileError>,
    {
        let mut collection = self.collection.lock();

        let mut next = collection.clone();
        let value = apply(&mut next).map_err(|e| self.context.inconsistent(e))?;
        let lists = next.to_vec();

        *collection = next;

        info!("Committed {} {}(s)", lists.len(), self.kind.human_name());
        self.context.emit(HoardEvent::ListsUpdated {
            kind: self.kind,
            lists,
        });

        Ok(value)
    }

    fn fail(&self, error: ApiError, not_found: &str) -> StoreError {
        self.context
            .fail(&self.lifetime, error, self.kind.human_name(), not_found)
    }

    fn fail_item(&self, error: ApiError, not_found: &str) -> StoreError {
        let model = format!("{} item", self.kind.human_name());
        self.context.fail(&self.lifetime, error, &model, not_found)
    }

    fn set_loading_state(&self, new_state: LoadingState) {
        *self.loading_state.lock() = new_state;
        self.context.emit(HoardEvent::ListsLoading {
            kind: self.kind,
            new_state,
        });
    }
}
