// ============================================
// Feed Session
// ============================================
//
// One session per mounted feed. Inbound calls from the rendering layer are
// queued on a bounded mpsc channel and processed by a single task, one event
// at a time, so a forced pause of the previous entry always completes before
// the next event is looked at. The task also owns the load timeout: a
// `Loading` entry that the media pipeline never confirms is failed once
// `load_timeout` elapses, without blocking the queue.
//
// Dropping every handle (or calling `shutdown`) tears the session down and
// releases the decode slot. Sessions share nothing with each other.

use super::{PlaybackScheduler, StateListener};
use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::models::{ControlOutcome, EntrySnapshot, FeedEvent, LoadTicket, StateChange};
use feed_core::{CatalogItem, ItemId};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Forwards transitions to the session's notification channel
struct ChannelListener {
    session_id: Uuid,
    tx: mpsc::UnboundedSender<StateChange>,
}

impl StateListener for ChannelListener {
    fn on_state_change(&mut self, change: &StateChange) {
        if self.tx.send(change.clone()).is_err() {
            debug!(session_id = %self.session_id, "State change receiver dropped");
        }
    }
}

enum Command {
    Event {
        event: FeedEvent,
        reply: oneshot::Sender<Result<ControlOutcome>>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<EntrySnapshot>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

pub struct FeedSession {
    session_id: Uuid,
    scheduler: PlaybackScheduler<ChannelListener>,
    commands: mpsc::Receiver<Command>,
    /// Deadline of the load currently waiting on the media pipeline
    deadline: Option<(LoadTicket, Instant)>,
}

impl FeedSession {
    /// Start a session over a ranked feed.
    ///
    /// Returns the handle for inbound calls and the receiver of every
    /// `on_state_change` notification, in transition order.
    ///
    /// The notification channel is unbounded so the scheduler never waits on
    /// its listener. One event yields at most four transitions (teardown one
    /// per non-idle entry), so pending notifications grow with undrained
    /// events, not with feed length. The receiver must be drained, or dropped
    /// to discard notifications.
    ///
    /// Must be called from within a tokio runtime; otherwise `InvalidInput`
    /// is returned and no task is started.
    pub fn spawn(
        items: Vec<CatalogItem>,
        config: PlaybackConfig,
    ) -> Result<(FeedSessionHandle, mpsc::UnboundedReceiver<StateChange>)> {
        let runtime = Handle::try_current().map_err(|e| {
            PlaybackError::InvalidInput(format!("feed session needs a tokio runtime: {}", e))
        })?;
        let session_id = Uuid::new_v4();
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let capacity = config.event_queue_capacity;
        let entry_count = items.len();

        let scheduler = PlaybackScheduler::new(
            items,
            config,
            ChannelListener {
                session_id,
                tx: change_tx,
            },
        )?;

        let (command_tx, command_rx) = mpsc::channel(capacity);
        let session = FeedSession {
            session_id,
            scheduler,
            commands: command_rx,
            deadline: None,
        };
        let task = runtime.spawn(session.run());

        info!(session_id = %session_id, entries = entry_count, "Feed session started");

        Ok((
            FeedSessionHandle {
                session_id,
                commands: command_tx,
                task: Some(task),
            },
            change_rx,
        ))
    }

    async fn run(mut self) {
        let mut shutdown_reply = None;

        loop {
            let deadline = self.deadline;
            let timer = sleep_until(deadline.map_or_else(Instant::now, |(_, at)| at));

            tokio::select! {
                biased;

                _ = timer, if deadline.is_some() => {
                    if let Some((ticket, _)) = deadline {
                        if self.scheduler.expire_load(ticket) {
                            warn!(session_id = %self.session_id, "Load timed out");
                        }
                    }
                }
                command = self.commands.recv() => match command {
                    Some(Command::Event { event, reply }) => {
                        let outcome = self.scheduler.apply(event);
                        let _ = reply.send(outcome);
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.scheduler.snapshot());
                    }
                    Some(Command::Shutdown { reply }) => {
                        shutdown_reply = Some(reply);
                        break;
                    }
                    None => break,
                },
            }

            self.sync_deadline();
        }

        self.scheduler.teardown();
        info!(session_id = %self.session_id, "Feed session closed");

        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }

    /// Arm the timer for a new pending load, disarm it once the load resolves
    fn sync_deadline(&mut self) {
        match self.scheduler.pending_load() {
            Some(ticket) if self.deadline.map(|(t, _)| t) != Some(ticket) => {
                let at = Instant::now() + self.scheduler.config().load_timeout();
                self.deadline = Some((ticket, at));
            }
            Some(_) => {}
            None => self.deadline = None,
        }
    }
}

/// Inbound API of a running feed session
pub struct FeedSessionHandle {
    session_id: Uuid,
    commands: mpsc::Sender<Command>,
    task: Option<JoinHandle<()>>,
}

impl FeedSessionHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub async fn observe_visibility(
        &self,
        entry_id: impl Into<ItemId>,
        ratio: f64,
    ) -> Result<ControlOutcome> {
        self.send(FeedEvent::Visibility {
            entry_id: entry_id.into(),
            ratio,
        })
        .await
    }

    pub async fn toggle(&self, entry_id: impl Into<ItemId>) -> Result<ControlOutcome> {
        self.send(FeedEvent::Toggle {
            entry_id: entry_id.into(),
        })
        .await
    }

    pub async fn media_ready(&self, entry_id: impl Into<ItemId>) -> Result<ControlOutcome> {
        self.send(FeedEvent::MediaReady {
            entry_id: entry_id.into(),
        })
        .await
    }

    pub async fn media_failed(
        &self,
        entry_id: impl Into<ItemId>,
        reason: impl Into<String>,
    ) -> Result<ControlOutcome> {
        self.send(FeedEvent::MediaFailed {
            entry_id: entry_id.into(),
            reason: reason.into(),
        })
        .await
    }

    pub async fn retry(&self, entry_id: impl Into<ItemId>) -> Result<ControlOutcome> {
        self.send(FeedEvent::Retry {
            entry_id: entry_id.into(),
        })
        .await
    }

    /// Queue any event; resolves once it has been fully processed
    pub async fn send(&self, event: FeedEvent) -> Result<ControlOutcome> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Event { event, reply })
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    pub async fn snapshot(&self) -> Result<Vec<EntrySnapshot>> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)
    }

    /// Tear the session down and wait until the slot is released
    pub async fn shutdown(mut self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { reply })
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        rx.await.map_err(|_| PlaybackError::SessionClosed)?;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(session_id = %self.session_id, error = %e, "Feed session task failed");
            }
        }
        Ok(())
    }
}
