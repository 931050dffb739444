//! The curator: a persona-driven assistant bound to one catalog item at a time.
//!
//! [`CuratorSession`] is one conversation. [`CuratorDesk`] holds the session
//! for whichever item is currently displayed and replaces it when the item
//! changes, so no context ever carries over from one item to the next.

pub mod persona;
mod session;

pub use session::{CuratorSession, SessionPhase, CURATOR_FALLBACKS};

use crate::catalog::CatalogItem;
use crate::error::ConfigError;
use crate::llm::ClientFactory;

/// Shown in place of the greeting when no client can be built.
pub const ARCHIVES_UNAVAILABLE: &str =
    "I am unable to connect to the archives (API Key missing).";

/// Owns at most one active session, for the item currently on display.
pub struct CuratorDesk<'f> {
    factory: &'f ClientFactory,
    active: Option<(String, CuratorSession)>,
}

impl<'f> CuratorDesk<'f> {
    pub fn new(factory: &'f ClientFactory) -> Self {
        Self {
            factory,
            active: None,
        }
    }

    /// Display an item: discard any current session and open a fresh one.
    ///
    /// The previous session is discarded even if the new one cannot open.
    pub fn view(&mut self, item: &CatalogItem) -> Result<&CuratorSession, ConfigError> {
        self.close();
        let client = self.factory.get_client()?;
        let session = CuratorSession::for_item(client, item);
        tracing::info!(item = %item.id, session = %session.id(), "Curator attending {}", item.name);
        let (_, session) = self.active.insert((item.id.clone(), session));
        Ok(session)
    }

    /// Close the detail view, discarding its session.
    pub fn close(&mut self) {
        if let Some((_, session)) = self.active.take() {
            session.discard();
        }
    }

    pub fn active(&self) -> Option<&CuratorSession> {
        self.active.as_ref().map(|(_, session)| session)
    }

    /// Id of the item whose session is active.
    pub fn active_item(&self) -> Option<&str> {
        self.active.as_ref().map(|(id, _)| id.as_str())
    }
}
