use std::time::Duration;

use async_trait::async_trait;
use hoard_core::{
    classify, ApiError, ApiResult, CreatedList, DestroyedItem, DestroyedList, Game,
    ItemAttributes, ItemPair, List, ListKind, NewGame, PrimaryKey, UpdatedGame, UserProfile,
    ValidationPolicy,
};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::Api;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// How to reach the backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// How long a request may take before it counts as failed
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// The REST backend, reached over HTTP
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

#[derive(Serialize)]
struct ListAttributes<'a> {
    title: &'a str,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(config.base_url.clone()),
        })
    }

    fn request(&self, method: Method, path: &str, token: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        debug!("{} {}", method, url);

        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, policy: ValidationPolicy) -> ApiResult<Reply> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Unexpected(e.to_string()))?
            .to_vec();

        debug!("Responded with {}", status);

        if status.is_success() {
            Ok(Reply { status, body })
        } else {
            Err(classify(status.as_u16(), &body, policy))
        }
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn current_user(&self, token: &str) -> ApiResult<UserProfile> {
        let request = self.request(Method::GET, "users/current", token)?;
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn games(&self, token: &str) -> ApiResult<Vec<Game>> {
        let request = self.request(Method::GET, "games", token)?;
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn create_game(&self, token: &str, new_game: &NewGame) -> ApiResult<Game> {
        let request = self
            .request(Method::POST, "games", token)?
            .json(&nest("game", new_game)?);
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn update_game(
        &self,
        token: &str,
        game_id: PrimaryKey,
        updated_game: &UpdatedGame,
    ) -> ApiResult<Game> {
        let request = self
            .request(Method::PATCH, &format!("games/{}", game_id), token)?
            .json(&nest("game", updated_game)?);
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn destroy_game(&self, token: &str, game_id: PrimaryKey) -> ApiResult<()> {
        let request = self.request(Method::DELETE, &format!("games/{}", game_id), token)?;
        self.send(request, ValidationPolicy::Any).await?;

        Ok(())
    }

    async fn lists(
        &self,
        token: &str,
        kind: ListKind,
        game_id: PrimaryKey,
    ) -> ApiResult<Vec<List>> {
        let path = format!("games/{}/{}", game_id, kind.lists_resource());
        let request = self.request(Method::GET, &path, token)?;
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn create_list(
        &self,
        token: &str,
        kind: ListKind,
        game_id: PrimaryKey,
        title: &str,
    ) -> ApiResult<CreatedList> {
        let path = format!("games/{}/{}", game_id, kind.lists_resource());
        let request = self
            .request(Method::POST, &path, token)?
            .json(&nest(kind.list_model(), &ListAttributes { title })?);
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn update_list(
        &self,
        token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
        title: &str,
    ) -> ApiResult<List> {
        let path = format!("{}/{}", kind.lists_resource(), list_id);
        let request = self
            .request(Method::PATCH, &path, token)?
            .json(&nest(kind.list_model(), &ListAttributes { title })?);
        let reply = self.send(request, ValidationPolicy::Any).await?;

        decode(&reply.body)
    }

    async fn destroy_list(
        &self,
        token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
    ) -> ApiResult<DestroyedList> {
        let path = format!("{}/{}", kind.lists_resource(), list_id);
        let request = self.request(Method::DELETE, &path, token)?;
        let reply = self.send(request, ValidationPolicy::Any).await?;

        let adjusted = decode_destroyed(&reply)?;
        Ok(adjusted.map_or(DestroyedList::Emptied, DestroyedList::Adjusted))
    }

    async fn create_list_item(
        &self,
        token: &str,
        kind: ListKind,
        list_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> ApiResult<ItemPair> {
        let path = format!(
            "{}/{}/{}",
            kind.lists_resource(),
            list_id,
            kind.items_resource()
        );
        let request = self
            .request(Method::POST, &path, token)?
            .json(&nest(kind.item_model(), attributes)?);
        let reply = self.send(request, item_policy(kind, ItemWrite::Create)).await?;

        decode(&reply.body)
    }

    async fn update_list_item(
        &self,
        token: &str,
        kind: ListKind,
        item_id: PrimaryKey,
        attributes: &ItemAttributes,
    ) -> ApiResult<ItemPair> {
        let path = format!("{}/{}", kind.items_resource(), item_id);
        let request = self
            .request(Method::PATCH, &path, token)?
            .json(&nest(kind.item_model(), attributes)?);
        let reply = self.send(request, item_policy(kind, ItemWrite::Update)).await?;

        decode(&reply.body)
    }

    async fn destroy_list_item(
        &self,
        token: &str,
        kind: ListKind,
        item_id: PrimaryKey,
    ) -> ApiResult<DestroyedItem> {
        let path = format!("{}/{}", kind.items_resource(), item_id);
        let request = self.request(Method::DELETE, &path, token)?;
        let reply = self.send(request, ValidationPolicy::Any).await?;

        let adjusted = decode_destroyed(&reply)?;
        Ok(adjusted.map_or(DestroyedItem::Removed, DestroyedItem::Adjusted))
    }
}

/// Joining onto a base without a trailing slash would drop its last segment
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url
}

/// Nests attributes under the model name, e.g. `{"shopping_list": {"title": ...}}`
fn nest<T>(model: &str, attributes: &T) -> ApiResult<serde_json::Value>
where
    T: Serialize + ?Sized,
{
    let attributes =
        serde_json::to_value(attributes).map_err(|e| ApiError::Unexpected(e.to_string()))?;

    let mut body = serde_json::Map::new();
    body.insert(model.to_string(), attributes);

    Ok(serde_json::Value::Object(body))
}

fn decode<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Unexpected(format!("Could not read response: {}", e)))
}

fn is_empty(reply: &Reply) -> bool {
    reply.status == StatusCode::NO_CONTENT || reply.body.iter().all(|b| b.is_ascii_whitespace())
}

/// A destroy answers 204 when nothing survived, or 200 with what did
fn decode_destroyed<T>(reply: &Reply) -> ApiResult<Option<T>>
where
    T: DeserializeOwned,
{
    if is_empty(reply) {
        Ok(None)
    } else {
        decode(&reply.body).map(Some)
    }
}

#[derive(Debug, Clone, Copy)]
enum ItemWrite {
    Create,
    Update,
}

/// Which 422 messages count as validation errors when writing an item
fn item_policy(kind: ListKind, write: ItemWrite) -> ValidationPolicy {
    let attributes = match write {
        ItemWrite::Create => kind.item_create_attributes(),
        ItemWrite::Update => kind.item_update_attributes(),
    };

    ValidationPolicy::Attributes(attributes)
}
