use async_trait::async_trait;
use hoard_core::{
    ApiResult, CreatedList, DestroyedItem, DestroyedList, Game, ItemAttributes, ItemPair, List,
    ListKind, NewGame, PrimaryKey, UpdatedGame, UserProfile,
};

mod http;
pub use http::*;

/// Represents a backend the stores can talk to.
///
/// Implementations classify failures themselves, so stores only ever see an
/// [hoard_core::ApiError].
#[async_trait]
pub trait Api: Send + Sync {
    async fn current_user(&self, token: &str) -> ApiResult<UserProfile>;

    async fn games(&self, token: &str) -> ApiResult<Vec<Game>>;
    async fn create_game(&self, token: &str, new_game: &NewGame) -> ApiResult<Game>;
    async fn update_game(
        &self,
        token: &str,
        game_id: PrimaryKey,
        updated_game: &UpdatedGame,
    ) -> ApiResult<Game>;
    async fn destroy_game(&self, token: &str, game_id: PrimaryKey) -> ApiResult<()>;

    async fn lists(
        &self,
        token: &str,
        kind: ListKind,
        game_id: PrimaryKey,
    ) -> ApiResult<Vec<List>>;
    async fn create_list(
        &self,
        token: &str,
        kind: ListKind,
        game_id: PrimaryKey,
        title: &str,
    ) -> ApiResult<CreatedList>;
    async fn update_list(
        &self,
        token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
        title: &str,
    ) -> ApiResult<List>;
    async fn destroy_list(
        &self,
        token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
    ) -> ApiResult<DestroyedList>;

    async fn create_list_item(
        &self,
        token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> ApiResult<ItemPair>;
    async fn update_list_item(
        &self,
        token: &str,
        kind: ListKind,
        item_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> ApiResult<ItemPair>;
    async fn destroy_list_item(
        &self,
        token: &str,
        kind: ListKind,
        item_id: PrimaryKey,
    ) -> ApiResult<DestroyedItem>;
}
