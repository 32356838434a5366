use std::fmt::{self, Debug};

use chatflow_model::{PredictionProviderError, PredictionRequest};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::builder::FailureObserver;
use crate::config::ControllerConfig;
use crate::conversation::{Conversation, ConversationSnapshot, Role};
use crate::prediction_client::{PredictResult, PredictionClient};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    /// Waiting for the answer of the given turn.
    Awaiting(u64),
}

pub enum Command {
    /// `None` submits the pending input.
    Submit(Option<String>),
    UpdateInput(String),
    Reset,
    Settled { turn: u64, result: PredictResult },
}

impl Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Submit(text) => f.debug_tuple("Submit").field(text).finish(),
            Command::UpdateInput(text) => {
                f.debug_tuple("UpdateInput").field(text).finish()
            }
            Command::Reset => f.write_str("Reset"),
            Command::Settled { turn, result } => f
                .debug_struct("Settled")
                .field("turn", turn)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

pub struct ControllerState {
    pub(super) client: PredictionClient,
    pub(super) config: ControllerConfig,
    pub(super) chat_id: String,
    pub(super) conversation: Conversation,
    pub(super) stage: Stage,
    pub(super) in_flight: Option<JoinHandle<()>>,
    pub(super) next_turn: u64,
    pub(super) snapshot_tx: watch::Sender<ConversationSnapshot>,
    // Weak, so the task can tell when all handles are gone.
    pub(super) cmd_tx: mpsc::WeakUnboundedSender<Command>,
    pub(super) on_failure: Option<FailureObserver>,
}

pub async fn run(
    mut state: ControllerState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        state.handle(cmd);
    }
    state.abort_in_flight();
    debug!("will terminate");
}

impl ControllerState {
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(text) => self.submit(text),
            Command::UpdateInput(text) => {
                self.conversation.pending_input = text;
                self.publish();
            }
            Command::Reset => self.reset(),
            Command::Settled { turn, result } => self.settle(turn, result),
        }
    }

    fn submit(&mut self, text: Option<String>) {
        let text =
            text.unwrap_or_else(|| self.conversation.pending_input.clone());
        if text.trim().is_empty() {
            trace!("ignore empty submission");
            return;
        }
        if let Stage::Awaiting(turn) = self.stage {
            debug!("turn {turn} is still in flight, drop the submission");
            return;
        }

        // The answer can only come back through a live handle.
        let Some(cmd_tx) = self.cmd_tx.upgrade() else {
            debug!("no handle is alive, drop the submission");
            return;
        };

        let turn = self.next_turn;
        self.next_turn += 1;

        // The user message and the cleared input must be observable before
        // the request goes out.
        self.conversation.push(Role::User, text.clone());
        self.conversation.pending_input.clear();
        self.stage = Stage::Awaiting(turn);
        self.publish();

        let request = PredictionRequest::new(text, &self.chat_id);
        let client = self.client.clone();
        debug!("dispatch turn {turn}");
        self.in_flight = Some(tokio::spawn(async move {
            let result = client.predict(request).await;
            cmd_tx.send(Command::Settled { turn, result }).ok();
        }));
    }

    fn settle(&mut self, turn: u64, result: PredictResult) {
        if self.stage != Stage::Awaiting(turn) {
            debug!("discard the answer of abandoned turn {turn}");
            return;
        }
        self.in_flight = None;

        let content = match result {
            Ok(resp) => resp.text,
            Err(err) => {
                warn!(
                    "turn {turn} failed ({}), fall back: {err}",
                    err.kind()
                );
                if let Some(on_failure) = &self.on_failure {
                    on_failure(&*err);
                }
                self.config.fallback_message.clone()
            }
        };
        self.conversation.push(Role::Bot, content);
        self.stage = Stage::Idle;
        self.publish();
    }

    fn reset(&mut self) {
        self.abort_in_flight();
        self.stage = Stage::Idle;
        self.conversation =
            Conversation::seeded(self.config.welcome_message.as_deref());
        self.publish();
    }

    fn abort_in_flight(&mut self) {
        if let Some(task) = self.in_flight.take() {
            debug!("abort the in-flight request");
            task.abort();
        }
    }

    #[inline]
    fn publish(&self) {
        let is_awaiting = matches!(self.stage, Stage::Awaiting(_));
        self.snapshot_tx
            .send_replace(self.conversation.snapshot(is_awaiting));
    }
}
