use hoard_core::{ApiError, Game, NewGame, PrimaryKey, UpdatedGame};
use log::info;
use parking_lot::Mutex;
use url::form_urlencoded;

use crate::{Api, HoardContext, HoardEvent, Lifetime, LoadingState, StoreError, StoreResult};

const GAME_NOT_FOUND: &str =
    "The game you're looking for could not be found. Try refreshing the page to fix this.";

/// The games of the signed in user
pub struct GameRegistry<A> {
    context: HoardContext<A>,
    lifetime: Lifetime,

    games: Mutex<Vec<Game>>,
    loading_state: Mutex<LoadingState>,
}

impl<A> GameRegistry<A>
where
    A: Api,
{
    pub fn new(context: &HoardContext<A>) -> Self {
        Self {
            context: context.clone(),
            lifetime: Lifetime::new(),
            games: Default::default(),
            loading_state: Default::default(),
        }
    }

    pub fn games(&self) -> Vec<Game> {
        self.games.lock().clone()
    }

    pub fn game(&self, game_id: PrimaryKey) -> Option<Game> {
        self.games.lock().iter().find(|g| g.id == game_id).cloned()
    }

    pub fn loading_state(&self) -> LoadingState {
        *self.loading_state.lock()
    }

    pub fn unmount(&self) {
        self.lifetime.end();
    }

    /// The game a route points at through its `game_id` parameter, or the
    /// first game when the parameter is absent or not a key.
    pub fn active_game_id(&self, query: Option<&str>) -> Option<PrimaryKey> {
        let requested = query.and_then(game_id_param);

        requested.or_else(|| self.games.lock().first().map(|g| g.id))
    }

    pub async fn fetch_games(&self) -> StoreResult<Vec<Game>> {
        let token = self.context.token(&self.lifetime)?;
        self.set_loading_state(LoadingState::Loading);

        let result = self.context.api.games(&token).await;
        self.lifetime.ensure_alive()?;

        match result {
            Ok(games) => {
                self.commit(|current| *current = games.clone());
                self.set_loading_state(LoadingState::Done);

                Ok(games)
            }
            Err(ApiError::Unauthorized) => Err(self.context.unauthorized(&self.lifetime)),
            Err(error) => {
                self.set_loading_state(LoadingState::Error);
                Err(self.fail(error))
            }
        }
    }

    pub async fn create_game(&self, name: &str, description: Option<&str>) -> StoreResult<Game> {
        let token = self.context.token(&self.lifetime)?;
        let new_game = NewGame {
            name: name.to_string(),
            description: description.map(str::to_string),
        };

        let result = self.context.api.create_game(&token, &new_game).await;
        self.lifetime.ensure_alive()?;

        let game = result.map_err(|e| self.fail(e))?;
        self.commit(|games| games.push(game.clone()));

        info!("Created game \"{}\"", game.name);
        Ok(game)
    }

    pub async fn update_game(
        &self,
        game_id: PrimaryKey,
        updated_game: &UpdatedGame,
    ) -> StoreResult<Game> {
        let token = self.context.token(&self.lifetime)?;

        let result = self
            .context
            .api
            .update_game(&token, game_id, updated_game)
            .await;
        self.lifetime.ensure_alive()?;

        let game = result.map_err(|e| self.fail(e))?;
        self.commit(|games| match games.iter_mut().find(|g| g.id == game.id) {
            Some(existing) => *existing = game.clone(),
            None => games.push(game.clone()),
        });

        Ok(game)
    }

    pub async fn destroy_game(&self, game_id: PrimaryKey) -> StoreResult<()> {
        let token = self.context.token(&self.lifetime)?;

        let result = self.context.api.destroy_game(&token, game_id).await;
        self.lifetime.ensure_alive()?;

        result.map_err(|e| self.fail(e))?;
        self.commit(|games| games.retain(|g| g.id != game_id));

        Ok(())
    }

    fn commit<F>(&self, apply: F)
    where
        F: FnOnce(&mut Vec<Game>),
    {
        let mut games = self.games.lock();
        apply(&mut games);

        self.context.emit(HoardEvent::GamesUpdated {
            games: games.clone(),
        });
    }

    fn fail(&self, error: ApiError) -> StoreError {
        self.context.fail(&self.lifetime, error, "game", GAME_NOT_FOUND)
    }

    fn set_loading_state(&self, new_state: LoadingState) {
        *self.loading_state.lock() = new_state;
        self.context.emit(HoardEvent::GamesLoading { new_state });
    }
}

/// Reads `game_id` from a query string, with or without the leading `?`
fn game_id_param(query: &str) -> Option<PrimaryKey> {
    let query = query.strip_prefix('?').unwrap_or(query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "game_id")
        .and_then(|(_, value)| value.parse().ok())
}
