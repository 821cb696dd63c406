use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use crossbeam::atomic::AtomicCell;
use hoard_client::{
    Api, Hoard, HoardEvent, ItemChange, Lifetime, ListStore, LoadingState, StoreError, LOGIN_ROUTE,
};
use hoard_core::{
    ApiError, ApiResult, CreatedList, DestroyedItem, DestroyedList, FlashKind, Game,
    ItemAttributes, ItemPair, List, ListItem, ListKind, NewGame, PrimaryKey, ReconcileError,
    UpdatedGame, UserProfile,
};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Answers requests with scripted replies, in order, and records every call.
#[derive(Clone, Default)]
struct MockApi {
    replies: Arc<Mutex<VecDeque<ApiResult<Value>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    end_on_call: Arc<Mutex<Option<Lifetime>>>,
    /// When set, created items are made up from this counter instead of scripted
    fresh_ids: Option<Arc<AtomicCell<PrimaryKey>>>,
}

impl MockApi {
    fn with_fresh_items() -> Self {
        Self {
            fresh_ids: Some(Arc::new(AtomicCell::new(1000))),
            ..Default::default()
        }
    }

    fn reply(&self, reply: ApiResult<Value>) {
        self.replies.lock().push_back(reply);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Ends the lifetime while the next request is in flight
    fn end_during_call(&self, lifetime: Lifetime) {
        *self.end_on_call.lock() = Some(lifetime);
    }

    fn next<T: DeserializeOwned>(&self, call: String) -> ApiResult<T> {
        self.calls.lock().push(call);

        if let Some(lifetime) = self.end_on_call.lock().take() {
            lifetime.end();
        }

        let reply = self.replies.lock().pop_front().expect("a reply is scripted");
        reply.map(|value| serde_json::from_value(value).expect("scripted reply decodes"))
    }
}

#[async_trait]
impl Api for MockApi {
    async fn current_user(&self, _token: &str) -> ApiResult<UserProfile> {
        self.next("GET /users/current".to_string())
    }

    async fn games(&self, _token: &str) -> ApiResult<Vec<Game>> {
        self.next("GET /games".to_string())
    }

    async fn create_game(&self, _token: &str, new_game: &NewGame) -> ApiResult<Game> {
        self.next(format!("POST /games {}", new_game.name))
    }

    async fn update_game(
        &self,
        _token: &str,
        game_id: PrimaryKey,
        _updated_game: &UpdatedGame,
    ) -> ApiResult<Game> {
        self.next(format!("PATCH /games/{}", game_id))
    }

    async fn destroy_game(&self, _token: &str, game_id: PrimaryKey) -> ApiResult<()> {
        self.next::<Value>(format!("DELETE /games/{}", game_id))
            .map(|_| ())
    }

    async fn lists(
        &self,
        _token: &str,
        kind: ListKind,
        game_id: PrimaryKey,
    ) -> ApiResult<Vec<List>> {
        self.next(format!("GET /games/{}/{}", game_id, kind.lists_resource()))
    }

    async fn create_list(
        &self,
        _token: &str,
        kind: ListKind,
        game_id: PrimaryKey,
        _title: &str,
    ) -> ApiResult<CreatedList> {
        self.next(format!("POST /games/{}/{}", game_id, kind.lists_resource()))
    }

    async fn update_list(
        &self,
        _token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
        _title: &str,
    ) -> ApiResult<List> {
        self.next(format!("PATCH /{}/{}", kind.lists_resource(), list_id))
    }

    async fn destroy_list(
        &self,
        _token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
    ) -> ApiResult<DestroyedList> {
        let call = format!("DELETE /{}/{}", kind.lists_resource(), list_id);
        let reply: Option<List> = self.next(call)?;

        Ok(reply.map_or(DestroyedList::Emptied, DestroyedList::Adjusted))
    }

    async fn create_list_item(
        &self,
        _token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
        _attributes: &ItemAttributes,
    ) -> ApiResult<ItemPair> {
        if let Some(ids) = &self.fresh_ids {
            tokio::task::yield_now().await;

            let id = ids.fetch_add(2);
            let description = format!("Item {}", id);

            return Ok(ItemPair {
                aggregate: serde_json::from_value(item(id, 1, &description, 1)).unwrap(),
                regular: serde_json::from_value(item(id + 1, list_id, &description, 1)).unwrap(),
            });
        }

        self.next(format!(
            "POST /{}/{}/{}",
            kind.lists_resource(),
            list_id,
            kind.items_resource()
        ))
    }

    async fn update_list_item(
        &self,
        _token: &str,
        kind: ListKind,
        item_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> ApiResult<ItemPair> {
        let quantity = attributes.quantity.map(|q| q.to_string()).unwrap_or_default();
        self.next(format!(
            "PATCH /{}/{} {}",
            kind.items_resource(),
            item_id,
            quantity
        ))
    }

    async fn destroy_list_item(
        &self,
        _token: &str,
        kind: ListKind,
        item_id: PrimaryKey,
    ) -> ApiResult<DestroyedItem> {
        let call = format!("DELETE /{}/{}", kind.items_resource(), item_id);
        let reply: Option<ListItem> = self.next(call)?;

        Ok(reply.map_or(DestroyedItem::Removed, DestroyedItem::Adjusted))
    }
}

fn item(id: PrimaryKey, list_id: PrimaryKey, description: &str, quantity: u32) -> Value {
    json!({
        "id": id,
        "list_id": list_id,
        "description": description,
        "quantity": quantity,
        "notes": null
    })
}

fn lists() -> Value {
    json!([
        {
            "id": 1,
            "game_id": 3,
            "title": "All Items",
            "aggregate": true,
            "list_items": [item(10, 1, "ebony sword", 3), item(11, 1, "Iron ingot", 1)]
        },
        {
            "id": 7,
            "game_id": 3,
            "title": "Proudspire Manor",
            "aggregate": false,
            "list_items": [item(20, 7, "Ebony sword", 1), item(21, 7, "Iron ingot", 1)]
        },
        {
            "id": 8,
            "game_id": 3,
            "title": "Breezehome",
            "aggregate": false,
            "list_items": [item(30, 8, "Ebony sword", 2)]
        }
    ])
}

fn ids(store: &ListStore<MockApi>) -> Vec<PrimaryKey> {
    store.lists().iter().map(|l| l.id).collect()
}

/// A signed in client with a shopping list store already holding `lists()`
async fn loaded() -> (MockApi, Hoard<MockApi>, ListStore<MockApi>) {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));
    let store = hoard.list_store(ListKind::Shopping);

    api.reply(Ok(lists()));
    store.fetch_lists(3).await.unwrap();
    hoard.drain_events();

    (api, hoard, store)
}

fn flashes(hoard: &Hoard<MockApi>) -> Vec<hoard_core::Flash> {
    hoard
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            HoardEvent::Flash(flash) => Some(flash),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_fetch_puts_aggregate_first() {
    let (api, _hoard, store) = loaded().await;

    assert_eq!(ids(&store), vec![1, 7, 8]);
    assert_eq!(store.loading_state(), LoadingState::Done);
    assert_eq!(api.calls(), vec!["GET /games/3/shopping_lists"]);
}

#[tokio::test]
async fn test_new_item_is_prepended_to_both_lists() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(json!([
        item(856, 1, "Dwarven metal ingots", 10),
        item(855, 7, "Dwarven metal ingots", 10)
    ])));

    let created = store
        .create_list_item(7, &ItemAttributes::new("Dwarven metal ingots", 10))
        .await
        .unwrap();

    let collection = store.collection();
    assert_eq!(created.id, 855);
    assert_eq!(collection.aggregate().unwrap().list_items[0].id, 856);
    assert_eq!(collection.aggregate().unwrap().list_items.len(), 3);
    assert_eq!(collection.list(7).unwrap().list_items[0].id, 855);
    assert_eq!(collection.list(8).unwrap().list_items.len(), 1);
}

#[tokio::test]
async fn test_existing_item_is_updated_ignoring_case() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(json!([
        item(10, 1, "Ebony Sword", 5),
        item(30, 8, "Ebony Sword", 4)
    ])));

    store
        .update_list_item(30, &ItemAttributes::quantity(4))
        .await
        .unwrap();

    let collection = store.collection();
    let aggregate = collection.aggregate().unwrap();
    assert_eq!(aggregate.list_items.len(), 2);
    assert_eq!(aggregate.list_items[0].quantity, 5);
    assert_eq!(collection.list(8).unwrap().list_items[0].quantity, 4);
    assert_eq!(collection.list(8).unwrap().list_items.len(), 1);
}

#[tokio::test]
async fn test_declined_decrement_sends_nothing() {
    let (api, hoard, store) = loaded().await;

    let change = store.decrement_item(20, |_| false).await.unwrap();

    assert_eq!(change, ItemChange::Kept);
    assert_eq!(api.calls().len(), 1);
    assert_eq!(store.collection().item(20).unwrap().quantity, 1);

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].kind, FlashKind::Info);
    assert!(flashes[0].messages[0].contains("not deleted"));
}

#[tokio::test]
async fn test_confirmed_decrement_destroys_item() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(json!(item(10, 1, "ebony sword", 2))));

    let change = store.decrement_item(20, |item| item.id == 20).await.unwrap();

    assert_eq!(change, ItemChange::Destroyed);
    assert_eq!(api.calls()[1], "DELETE /shopping_list_items/20");
    assert!(store.collection().item(20).is_none());
    assert_eq!(store.collection().aggregate().unwrap().list_items[0].quantity, 2);
}

#[tokio::test]
async fn test_decrement_above_one_updates_quantity() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(json!([
        item(10, 1, "ebony sword", 2),
        item(30, 8, "Ebony sword", 1)
    ])));

    let change = store
        .decrement_item(30, |_| panic!("nothing to confirm"))
        .await
        .unwrap();

    assert!(matches!(change, ItemChange::Updated(item) if item.quantity == 1));
    assert_eq!(api.calls()[1], "PATCH /shopping_list_items/30 1");
}

#[tokio::test]
async fn test_increment_sends_next_quantity() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(json!([
        item(10, 1, "ebony sword", 4),
        item(30, 8, "Ebony sword", 3)
    ])));

    let updated = store.increment_item(30).await.unwrap();

    assert_eq!(updated.quantity, 3);
    assert_eq!(api.calls()[1], "PATCH /shopping_list_items/30 3");
}

#[tokio::test]
async fn test_refused_title_keeps_lists() {
    let (api, hoard, store) = loaded().await;
    let before = store.collection();

    api.reply(Err(ApiError::Validation(vec![
        "Title must be unique per game.".to_string()
    ])));

    let error = store.create_list(3, "Breezehome").await.unwrap_err();

    assert_eq!(
        error.validation_messages(),
        Some(&["Title must be unique per game.".to_string()][..])
    );
    assert_eq!(store.collection(), before);

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].kind, FlashKind::Error);
    assert_eq!(
        flashes[0].header.as_deref(),
        Some("1 error(s) prevented your shopping list from being saved:")
    );
    assert_eq!(flashes[0].messages, vec!["Title must be unique per game."]);
}

#[tokio::test]
async fn test_first_list_comes_with_aggregate() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));
    let store = hoard.list_store(ListKind::Inventory);

    api.reply(Ok(json!([])));
    store.fetch_lists(3).await.unwrap();

    api.reply(Ok(json!([
        { "id": 2, "game_id": 3, "title": "Honeyside", "aggregate": false, "list_items": [] },
        { "id": 1, "game_id": 3, "title": "All Items", "aggregate": true, "list_items": [] }
    ])));

    let list = store.create_list(3, "Honeyside").await.unwrap();

    assert_eq!(list.id, 2);
    assert_eq!(ids(&store), vec![1, 2]);
    assert_eq!(api.calls()[1], "POST /games/3/inventory_lists");
}

#[tokio::test]
async fn test_unauthorized_redirects_without_changes() {
    let (api, hoard, store) = loaded().await;
    let before = store.collection();

    api.reply(Err(ApiError::Unauthorized));

    let error = store.destroy_list(7).await.unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(store.collection(), before);
    assert!(store.lifetime().is_ended());
    assert!(!hoard.session().is_signed_in());

    let events = hoard.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, HoardEvent::Redirect { to } if *to == LOGIN_ROUTE)));
    assert!(!events.iter().any(|e| matches!(e, HoardEvent::Flash(_))));

    let next = store.destroy_list(8).await.unwrap_err();
    assert!(matches!(next, StoreError::Cancelled));
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_destroying_last_list_empties_store() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(Value::Null));
    store.destroy_list(8).await.unwrap();

    assert!(store.lists().is_empty());
}

#[tokio::test]
async fn test_destroying_list_keeps_adjusted_aggregate() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(json!({
        "id": 1,
        "game_id": 3,
        "title": "All Items",
        "aggregate": true,
        "list_items": [item(10, 1, "ebony sword", 2), item(11, 1, "Iron ingot", 1)]
    })));
    store.destroy_list(7).await.unwrap();

    assert_eq!(ids(&store), vec![1, 8]);
    assert_eq!(store.collection().aggregate().unwrap().list_items[0].quantity, 2);
}

#[tokio::test]
async fn test_destroying_item_without_body_removes_aggregate_item() {
    let (api, _hoard, store) = loaded().await;

    api.reply(Ok(Value::Null));
    let removed = store.destroy_list_item(21).await.unwrap();

    let collection = store.collection();
    assert_eq!(removed.description, "Iron ingot");
    assert!(collection.list(7).unwrap().item(21).is_none());
    assert!(collection.aggregate().unwrap().item_by_description("iron ingot").is_none());
}

#[tokio::test]
async fn test_fetch_for_missing_game_is_an_error() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));
    let store = hoard.list_store(ListKind::Shopping);

    api.reply(Err(ApiError::NotFound));

    let error = store.fetch_lists(99).await.unwrap_err();

    assert!(matches!(error, StoreError::Api(ApiError::NotFound)));
    assert_eq!(store.loading_state(), LoadingState::Error);
    assert!(hoard.session().is_signed_in());

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert!(flashes[0].messages[0].contains("couldn't find the game"));
}

#[tokio::test]
async fn test_unauthorized_fetch_leaves_loading_state() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));
    let store = hoard.list_store(ListKind::Shopping);

    api.reply(Err(ApiError::Unauthorized));
    store.fetch_lists(3).await.unwrap_err();

    assert_eq!(store.loading_state(), LoadingState::Loading);
}

#[tokio::test]
async fn test_missing_token_makes_no_request() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), None);
    let store = hoard.list_store(ListKind::Shopping);

    let error = store.fetch_lists(3).await.unwrap_err();

    assert!(error.is_unauthorized());
    assert!(api.calls().is_empty());
    assert!(hoard
        .drain_events()
        .iter()
        .any(|e| matches!(e, HoardEvent::Redirect { .. })));
}

#[tokio::test]
async fn test_late_response_is_ignored() {
    let (api, hoard, store) = loaded().await;
    let before = store.collection();

    api.end_during_call(store.lifetime().clone());
    api.reply(Err(ApiError::Unexpected("Internal Server Error".to_string())));

    let error = store.destroy_list(7).await.unwrap_err();

    assert!(matches!(error, StoreError::Cancelled));
    assert_eq!(store.collection(), before);
    assert!(hoard.drain_events().is_empty());
}

#[tokio::test]
async fn test_unexpected_failure_flashes_apology() {
    let (api, hoard, store) = loaded().await;

    api.reply(Err(ApiError::Unexpected("Internal Server Error".to_string())));
    store.update_list(7, "Vlindrel Hall").await.unwrap_err();

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].messages, vec![hoard_core::UNEXPECTED_ERROR_MESSAGE]);
}

#[tokio::test]
async fn test_active_game_follows_query() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));

    api.reply(Ok(json!([
        { "id": 4, "user_id": 1, "name": "Skyrim", "description": null },
        { "id": 9, "user_id": 1, "name": "Morrowind" }
    ])));
    hoard.games.fetch_games().await.unwrap();

    assert_eq!(hoard.games.active_game_id(Some("?game_id=9")), Some(9));
    assert_eq!(hoard.games.active_game_id(Some("?game_id=nope")), Some(4));
    assert_eq!(hoard.games.active_game_id(None), Some(4));
    assert_eq!(hoard.games.loading_state(), LoadingState::Done);
}

#[tokio::test]
async fn test_games_are_kept_in_step() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));

    api.reply(Ok(json!({ "id": 4, "user_id": 1, "name": "Skyrim" })));
    api.reply(Ok(json!({ "id": 4, "user_id": 1, "name": "Skyrim SE" })));
    api.reply(Ok(Value::Null));

    hoard.games.create_game("Skyrim", None).await.unwrap();
    hoard
        .games
        .update_game(
            4,
            &UpdatedGame {
                name: Some("Skyrim SE".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(hoard.games.game(4).unwrap().name, "Skyrim SE");

    hoard.games.destroy_game(4).await.unwrap();

    assert!(hoard.games.games().is_empty());
    assert_eq!(
        api.calls(),
        vec!["POST /games Skyrim", "PATCH /games/4", "DELETE /games/4"]
    );
}

#[tokio::test]
async fn test_profile_is_fetched() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));

    api.reply(Ok(json!({ "id": 1, "uid": "dovahkiin", "email": "dragonborn@example.com" })));

    let profile = hoard.fetch_profile().await.unwrap();

    assert_eq!(profile.uid, "dovahkiin");
    assert_eq!(hoard.session().profile(), Some(profile));
}

#[tokio::test]
async fn test_signing_in_allows_requests() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), None);

    hoard.session().sign_in("token");
    api.reply(Ok(json!({ "id": 1, "uid": "dovahkiin", "email": "dragonborn@example.com" })));

    hoard.fetch_profile().await.unwrap();

    assert!(hoard.session().is_signed_in());
    assert_eq!(api.calls(), vec!["GET /users/current"]);
    assert!(matches!(
        hoard.try_event(),
        Some(HoardEvent::ProfileUpdated { .. })
    ));
    assert!(hoard.try_event().is_none());
}

#[tokio::test]
async fn test_missing_list_for_new_item_flashes() {
    let (api, hoard, store) = loaded().await;
    let before = store.collection();

    api.reply(Err(ApiError::NotFound));

    let error = store
        .create_list_item(42, &ItemAttributes::new("Leek", 1))
        .await
        .unwrap_err();

    assert!(matches!(error, StoreError::Api(ApiError::NotFound)));
    assert_eq!(store.collection(), before);
    assert!(hoard.session().is_signed_in());

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].kind, FlashKind::Error);
    assert!(flashes[0].messages[0].starts_with("The list you're trying to add an item to"));
    assert!(flashes[0].messages[0].contains("refreshing the page"));
}

#[tokio::test]
async fn test_missing_item_on_update_flashes() {
    let (api, hoard, store) = loaded().await;
    let before = store.collection();

    api.reply(Err(ApiError::NotFound));

    store
        .update_list_item(30, &ItemAttributes::quantity(5))
        .await
        .unwrap_err();

    assert_eq!(store.collection(), before);

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert!(flashes[0].messages[0].starts_with("The item you're looking for could not be found"));
}

#[tokio::test]
async fn test_missing_game_for_new_list_flashes() {
    let (api, hoard, store) = loaded().await;
    let before = store.collection();

    api.reply(Err(ApiError::NotFound));

    store.create_list(99, "Hjerim").await.unwrap_err();

    assert_eq!(store.collection(), before);

    let flashes = flashes(&hoard);
    assert_eq!(flashes.len(), 1);
    assert!(flashes[0].messages[0].starts_with("The game you're trying to add a list to"));
    assert!(flashes[0].messages[0].contains("refreshing the page"));
}

#[tokio::test]
async fn test_increment_at_largest_quantity_sends_nothing() {
    let api = MockApi::default();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));
    let store = hoard.list_store(ListKind::Shopping);

    api.reply(Ok(json!([
        {
            "id": 1,
            "game_id": 3,
            "title": "All Items",
            "aggregate": true,
            "list_items": [item(10, 1, "Septim", u32::MAX)]
        },
        {
            "id": 7,
            "game_id": 3,
            "title": "Proudspire Manor",
            "aggregate": false,
            "list_items": [item(20, 7, "Septim", u32::MAX)]
        }
    ])));
    store.fetch_lists(3).await.unwrap();
    hoard.drain_events();

    let error = store.increment_item(20).await.unwrap_err();

    assert!(matches!(
        error,
        StoreError::Reconcile(ReconcileError::QuantityOutOfRange(20))
    ));
    assert_eq!(api.calls().len(), 1);
    assert_eq!(store.collection().item(20).unwrap().quantity, u32::MAX);
    assert_eq!(
        flashes(&hoard)[0].messages,
        vec![hoard_core::UNEXPECTED_ERROR_MESSAGE]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_items_on_different_lists_are_all_kept() {
    const LISTS: PrimaryKey = 32;
    const ITEMS_PER_LIST: usize = 20;

    let api = MockApi::with_fresh_items();
    let hoard = Hoard::new(api.clone(), Some("token".to_string()));
    let store = Arc::new(hoard.list_store(ListKind::Shopping));

    let mut lists = vec![json!({
        "id": 1,
        "game_id": 3,
        "title": "All Items",
        "aggregate": true,
        "list_items": []
    })];
    for list_id in 100..100 + LISTS {
        lists.push(json!({
            "id": list_id,
            "game_id": 3,
            "title": format!("House {}", list_id),
            "aggregate": false,
            "list_items": []
        }));
    }

    api.reply(Ok(Value::Array(lists)));
    store.fetch_lists(3).await.unwrap();

    let tasks: Vec<_> = (100..100 + LISTS)
        .map(|list_id| {
            let store = store.clone();

            tokio::spawn(async move {
                for n in 0..ITEMS_PER_LIST {
                    let attributes = ItemAttributes::new(format!("Item {} {}", list_id, n), 1);
                    store.create_list_item(list_id, &attributes).await.unwrap();
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let collection = store.collection();
    let expected = LISTS as usize * ITEMS_PER_LIST;

    assert_eq!(collection.aggregate().unwrap().list_items.len(), expected);
    assert_eq!(collection.regular_lists().len(), LISTS as usize);
    for list in collection.regular_lists() {
        assert_eq!(list.list_items.len(), ITEMS_PER_LIST);
    }
}
