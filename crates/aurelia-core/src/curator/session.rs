//! A multi-turn curator conversation bound to one item.
//!
//! The session keeps two sequences. The transcript is everything shown to the
//! user (greeting, questions, replies, fallback lines). The history is what the
//! model is sent: only exchanges that produced a reply. Each send is therefore
//! a function of (instruction, history, new message).

use super::persona;
use crate::catalog::CatalogItem;
use crate::fallback::{collapse, BusyFlag, Fallback, FallbackTexts};
use crate::llm::{ClientHandle, LlmRequest, Turn};
use crate::types::ChatMessage;
use parking_lot::Mutex;
use uuid::Uuid;

/// In-character replies used when the model gives no answer.
pub const CURATOR_FALLBACKS: FallbackTexts = FallbackTexts {
    empty: "I apologize, I'm having trouble finding that information.",
    failed: "Pardon me, I seem to have lost my train of thought. Please try again.",
    busy: "One moment, please. I am still considering your previous question.",
};

/// Lifecycle of a session. Discarding consumes the session, so there is no
/// discarded variant to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Opened, no message sent yet
    Created,
    /// At least one turn attempted
    Active,
}

struct SessionState {
    phase: SessionPhase,
    transcript: Vec<ChatMessage>,
    history: Vec<Turn>,
}

/// One conversation with the curator about one item.
pub struct CuratorSession {
    id: Uuid,
    instruction: String,
    client: ClientHandle,
    state: Mutex<SessionState>,
    busy: BusyFlag,
}

impl CuratorSession {
    /// Open a session bound to the persona and the given item context.
    ///
    /// The context is fixed for the session's lifetime and travels only in the
    /// system instruction.
    pub fn open(client: ClientHandle, item_context: &str) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            instruction: persona::system_instruction(item_context),
            client,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Created,
                transcript: Vec::new(),
                history: Vec::new(),
            }),
            busy: BusyFlag::default(),
        };
        tracing::debug!(session = %session.id, "Opened curator session");
        session
    }

    /// Open a session for a catalog item, seeded with the local greeting.
    pub fn for_item(client: ClientHandle, item: &CatalogItem) -> Self {
        let session = Self::open(client, &persona::item_context(item));
        session
            .state
            .lock()
            .transcript
            .push(ChatMessage::assistant(persona::greeting(item)));
        session
    }

    /// Send a message and return the curator's reply.
    ///
    /// Always returns text. Blank input is ignored and yields an empty string.
    /// Failures yield one of [`CURATOR_FALLBACKS`] and leave the session usable.
    pub async fn send(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let Some(_guard) = self.busy.try_acquire() else {
            return collapse(Err(Fallback::Busy), &CURATOR_FALLBACKS, "Curator reply");
        };

        let history = {
            let mut state = self.state.lock();
            state.phase = SessionPhase::Active;
            state.transcript.push(ChatMessage::user(text));
            state.history.clone()
        };

        tracing::debug!(
            session = %self.id,
            history_turns = history.len(),
            provider = self.client.name(),
            "Sending curator message"
        );
        let request = LlmRequest::chat(&self.instruction, &history, text);
        let outcome = self
            .client
            .generate(&request)
            .await
            .map(|resp| resp.text)
            .map_err(Fallback::from);

        let mut state = self.state.lock();
        if let Ok(ref reply) = outcome {
            state.history.push(Turn::user_text(text));
            state.history.push(Turn::assistant_text(reply.clone()));
        }
        let reply = collapse(outcome, &CURATOR_FALLBACKS, "Curator reply");
        state.transcript.push(ChatMessage::assistant(reply.clone()));
        reply
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    /// Snapshot of every message shown so far, oldest first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().transcript.clone()
    }

    /// Snapshot of the turns the model will see on the next send.
    pub fn history(&self) -> Vec<Turn> {
        self.state.lock().history.clone()
    }

    /// Whether a reply is pending.
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// End the session. Nothing is persisted.
    pub fn discard(self) {
        let state = self.state.into_inner();
        tracing::debug!(
            session = %self.id,
            messages = state.transcript.len(),
            "Discarded curator session"
        );
    }
}
