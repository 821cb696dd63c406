mod api;
mod error;
mod events;
mod games;
mod lists;
mod session;
mod state;

use std::sync::Arc;

use crossbeam::channel::unbounded;
use hoard_core::{ApiError, Flash, ListKind, ReconcileError, UserProfile};
use log::{debug, error, warn};

pub use api::*;
pub use error::*;
pub use events::*;
pub use games::*;
pub use lists::*;
pub use session::*;
pub use state::*;

/// The hoard client, holding the session and the game registry, and handing out list stores.
pub struct Hoard<A> {
    context: HoardContext<A>,
    event_receiver: EventReceiver,

    pub games: GameRegistry<A>,
}

/// A type passed to the stores, to reach the api and the session, and to emit events.
pub struct HoardContext<A> {
    pub api: Arc<A>,
    pub session: Arc<Session>,

    event_sender: EventSender,
}

impl<A> Hoard<A>
where
    A: Api,
{
    pub fn new(api: A, token: Option<String>) -> Self {
        let (event_sender, event_receiver) = unbounded();

        let context = HoardContext {
            api: Arc::new(api),
            session: Arc::new(Session::new(token, event_sender.clone())),
            event_sender,
        };

        let games = GameRegistry::new(&context);

        Self {
            context,
            event_receiver,
            games,
        }
    }

    pub fn session(&self) -> &Session {
        &self.context.session
    }

    /// Fetches the profile of the signed in user
    pub async fn fetch_profile(&self) -> StoreResult<UserProfile> {
        self.context
            .session
            .fetch_profile(self.context.api.as_ref())
            .await
    }

    /// Creates a store for the lists of the given kind, with its own lifetime.
    pub fn list_store(&self, kind: ListKind) -> ListStore<A> {
        ListStore::new(&self.context, kind)
    }

    /// Returns the next pending event, if any
    pub fn try_event(&self) -> Option<HoardEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Returns all pending events
    pub fn drain_events(&self) -> Vec<HoardEvent> {
        self.event_receiver.try_iter().collect()
    }
}

impl<A> HoardContext<A> {
    pub fn emit(&self, event: HoardEvent) {
        if self.event_sender.send(event).is_err() {
            debug!("Event dropped, nothing is listening");
        }
    }

    /// Returns the session token, or redirects to login if there is none.
    pub(crate) fn token(&self, lifetime: &Lifetime) -> StoreResult<String> {
        lifetime.ensure_alive()?;

        match self.session.token() {
            Some(token) => Ok(token),
            None => Err(self.unauthorized(lifetime)),
        }
    }

    /// Ends the lifetime of the store that made the request, forgets the session and redirects.
    pub(crate) fn unauthorized(&self, lifetime: &Lifetime) -> StoreError {
        lifetime.end();
        self.session.logout_and_redirect();

        StoreError::Api(ApiError::Unauthorized)
    }

    /// Routes a failed request to a redirect or a flash message.
    pub(crate) fn fail(
        &self,
        lifetime: &Lifetime,
        error: ApiError,
        model: &str,
        not_found: &str,
    ) -> StoreError {
        match &error {
            ApiError::Unauthorized => return self.unauthorized(lifetime),
            ApiError::NotFound => {
                warn!("Could not find {}", model);
                self.emit(HoardEvent::Flash(Flash::error(not_found)));
            }
            ApiError::Validation(messages) => {
                warn!("Server refused {}: {}", model, messages.join(", "));
                self.emit(HoardEvent::Flash(Flash::validation(model, messages.clone())));
            }
            ApiError::Unexpected(reason) => {
                error!("Request for {} failed: {}", model, reason);
                self.emit(HoardEvent::Flash(Flash::unexpected()));
            }
        }

        StoreError::Api(error)
    }

    /// Reports a response that could not be applied to local state.
    pub(crate) fn inconsistent(&self, error: ReconcileError) -> StoreError {
        error!("Could not apply server response: {}", error);
        self.emit(HoardEvent::Flash(Flash::unexpected()));

        StoreError::Reconcile(error)
    }
}

impl<A> Clone for HoardContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
            event_sender: self.event_sender.clone(),
        }
    }
}
