use crossbeam::channel::{Receiver, Sender};
use hoard_core::{Flash, Game, List, ListKind, UserProfile};

use crate::LoadingState;

pub type EventSender = Sender<HoardEvent>;
pub type EventReceiver = Receiver<HoardEvent>;

/// Where the user is sent when the session is gone.
pub const LOGIN_ROUTE: &str = "/login";

/// Events emitted by the stores, for whatever presents them.
#[derive(Debug, Clone)]
pub enum HoardEvent {
    /// The profile of the signed in user was fetched
    ProfileUpdated { profile: UserProfile },
    /// The games changed
    GamesUpdated { games: Vec<Game> },
    /// The game registry started or finished loading
    GamesLoading { new_state: LoadingState },
    /// The lists of a kind changed, aggregate list first
    ListsUpdated { kind: ListKind, lists: Vec<List> },
    /// A list store started or finished loading
    ListsLoading {
        kind: ListKind,
        new_state: LoadingState,
    },
    /// A message for the user
    Flash(Flash),
    /// The user must be sent to another route
    Redirect { to: &'static str },
}
