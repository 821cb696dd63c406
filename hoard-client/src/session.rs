use hoard_core::{ApiError, Flash, UserProfile};
use log::{debug, error, info};
use parking_lot::RwLock;

use crate::{Api, EventSender, HoardEvent, StoreError, StoreResult, LOGIN_ROUTE};

/// The signed in user's token and profile.
pub struct Session {
    token: RwLock<Option<String>>,
    profile: RwLock<Option<UserProfile>>,
    event_sender: EventSender,
}

impl Session {
    pub fn new(token: Option<String>, event_sender: EventSender) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
            profile: Default::default(),
            event_sender,
        }
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    /// Forgets the token and profile and sends the user to the login route
    pub fn logout_and_redirect(&self) {
        *self.token.write() = None;
        *self.profile.write() = None;

        info!("Session ended, redirecting to {}", LOGIN_ROUTE);
        self.emit(HoardEvent::Redirect { to: LOGIN_ROUTE });
    }

    /// Fetches the profile. Without a token this redirects without making a request.
    pub async fn fetch_profile<A>(&self, api: &A) -> StoreResult<UserProfile>
    where
        A: Api + ?Sized,
    {
        let Some(token) = self.token() else {
            self.logout_and_redirect();
            return Err(ApiError::Unauthorized.into());
        };

        match api.current_user(&token).await {
            Ok(profile) => {
                *self.profile.write() = Some(profile.clone());
                self.emit(HoardEvent::ProfileUpdated {
                    profile: profile.clone(),
                });

                Ok(profile)
            }
            Err(ApiError::Unauthorized) => {
                self.logout_and_redirect();
                Err(ApiError::Unauthorized.into())
            }
            Err(e) => {
                error!("Could not fetch profile: {}", e);
                self.emit(HoardEvent::Flash(Flash::unexpected()));

                Err(StoreError::Api(e))
            }
        }
    }

    fn emit(&self, event: HoardEvent) {
        if self.event_sender.send(event).is_err() {
            debug!("Event dropped, nothing is listening");
        }
    }
}
