mod builder;
mod state;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use crate::conversation::{Conversation, ConversationSnapshot};
pub use builder::ControllerBuilder;
use state::{Command, ControllerState, Stage};

/// A handle to a running conversation controller.
///
/// The controller owns the message log, the input buffer and the request
/// lifecycle. All of them live in a dedicated task which handles commands
/// one at a time, so the methods here only enqueue a command and return
/// immediately. Observe the results with [`Self::subscribe`]: a new
/// snapshot is published after every mutation.
///
/// Only one request may be in flight. Submissions that arrive while the
/// controller is awaiting a response are dropped, as are submissions whose
/// text is empty or whitespace-only.
///
/// Handles are cheap to clone. The controller task ends once every handle
/// has been dropped and the in-flight request (if any) has settled.
#[derive(Clone)]
pub struct ConversationController {
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshot_rx: watch::Receiver<ConversationSnapshot>,
    chat_id: Arc<str>,
}

impl ConversationController {
    /// Submits `text` as a user message.
    pub fn submit<S: Into<String>>(&self, text: S) {
        self.dispatch(Command::Submit(Some(text.into())));
    }

    /// Submits whatever is currently in the input buffer.
    pub fn submit_pending(&self) {
        self.dispatch(Command::Submit(None));
    }

    /// Replaces the input buffer.
    pub fn update_input<S: Into<String>>(&self, text: S) {
        self.dispatch(Command::UpdateInput(text.into()));
    }

    /// Brings the conversation back to its initial state, abandoning the
    /// in-flight request if there is one.
    pub fn reset(&self) {
        self.dispatch(Command::Reset);
    }

    /// Returns the latest published snapshot.
    #[inline]
    pub fn snapshot(&self) -> ConversationSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Returns a receiver that is notified after every mutation.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Returns the chat id sent along with every request.
    #[inline]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    #[inline]
    fn dispatch(&self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("controller task has terminated, drop the command");
        }
    }
}

impl ConversationController {
    fn spawn_from_builder(builder: ControllerBuilder) -> Self {
        let ControllerBuilder {
            client,
            config,
            on_failure,
        } = builder;

        let client = client.with_timeout(config.request_timeout);
        let chat_id = config.new_chat_id();
        let conversation = Conversation::seeded(config.welcome_message.as_deref());
        let (snapshot_tx, snapshot_rx) =
            watch::channel(conversation.snapshot(false));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let state = ControllerState {
            client,
            config,
            chat_id: chat_id.clone(),
            conversation,
            stage: Stage::Idle,
            in_flight: None,
            next_turn: 1,
            snapshot_tx,
            cmd_tx: cmd_tx.downgrade(),
            on_failure,
        };
        tokio::spawn(
            state::run(state, cmd_rx)
                .instrument(debug_span!("controller", chat_id = %chat_id)),
        );

        Self {
            cmd_tx,
            snapshot_rx,
            chat_id: chat_id.into(),
        }
    }
}
