//! Async session handle with enemy-turn pacing.
//!
//! `SessionHandle::spawn` moves a `Session` into its own tokio task. The
//! task is the only owner of the session, so commands are applied one at
//! a time in arrival order. Each accepted command and each enemy sub-phase
//! publishes a snapshot on a broadcast channel.
//!
//! ## Pacing
//!
//! After End Turn the task waits `enemy_attack_delay_ms`, resolves enemy
//! attacks, then waits in proportion to the attack log before handing the
//! turn back. Each pause is a spawned sleep that reports back with the
//! generation it was scheduled under. Any accepted mutation bumps the
//! generation and aborts the pending sleep, so a stale wake-up is ignored
//! and can never act on a superseded state. Shutdown aborts it as well.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::session::Session;
use super::snapshot::Snapshot;
use crate::core::{Command, CommandError, GameStatus, PacingConfig};
use crate::rules::EnemyPhase;

const MAILBOX_CAPACITY: usize = 32;
const BROADCAST_CAPACITY: usize = 64;

enum Request {
    Command {
        command: Command,
        reply: oneshot::Sender<Result<Snapshot, CommandError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Option<Snapshot>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Client side of a running session task.
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    snapshots: broadcast::Sender<Snapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Spawn a task that owns `session`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(session: Session) -> Self {
        let pacing = session.engine().config().pacing.clone();
        let (requests, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        let (snapshots, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();

        let actor = SessionActor {
            session,
            pacing,
            snapshots: snapshots.clone(),
            generation: 0,
            timer: None,
            wake_tx,
        };
        let task = tokio::spawn(actor.run(mailbox, wake_rx));

        Self {
            requests,
            snapshots,
            task,
        }
    }

    /// Send a command and wait for its result.
    pub async fn send(&self, command: Command) -> Result<Snapshot, CommandError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::Command { command, reply })
            .await
            .map_err(|_| CommandError::unknown("session closed"))?;
        response
            .await
            .map_err(|_| CommandError::unknown("session closed"))?
    }

    /// Current snapshot, if a game has been started.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.requests.send(Request::Snapshot { reply }).await.ok()?;
        response.await.ok().flatten()
    }

    /// Receive every snapshot published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Stop the task, cancelling any pending pacing timer.
    pub async fn shutdown(self) {
        let (reply, response) = oneshot::channel();
        if self.requests.send(Request::Shutdown { reply }).await.is_ok() {
            let _ = response.await;
        }
        let _ = self.task.await;
    }
}

struct SessionActor {
    session: Session,
    pacing: PacingConfig,
    snapshots: broadcast::Sender<Snapshot>,
    /// Bumped on every accepted mutation.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    wake_tx: mpsc::UnboundedSender<u64>,
}

impl SessionActor {
    async fn run(mut self, mut mailbox: mpsc::Receiver<Request>, mut wake_rx: mpsc::UnboundedReceiver<u64>) {
        loop {
            tokio::select! {
                request = mailbox.recv() => match request {
                    Some(Request::Command { command, reply }) => {
                        let result = self.handle_command(command);
                        let _ = reply.send(result);
                    }
                    Some(Request::Snapshot { reply }) => {
                        let _ = reply.send(self.session.snapshot());
                    }
                    Some(Request::Shutdown { reply }) => {
                        self.cancel_timer();
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        self.cancel_timer();
                        break;
                    }
                },
                Some(generation) = wake_rx.recv() => self.handle_wake(generation),
            }
        }
        info!("session task stopped");
    }

    fn handle_command(&mut self, command: Command) -> Result<Snapshot, CommandError> {
        let snapshot = self.session.execute(command)?;
        self.mutated(&snapshot);
        if snapshot.status == GameStatus::EnemyTurn {
            self.schedule(self.pacing.attack_delay());
        }
        Ok(snapshot)
    }

    fn handle_wake(&mut self, generation: u64) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "stale pacing timer ignored");
            return;
        }
        self.timer = None;

        match self.session.advance_enemy_turn() {
            Ok((phase, snapshot)) => {
                self.mutated(&snapshot);
                if let EnemyPhase::AttacksResolved { log_entries } = phase {
                    if snapshot.status == GameStatus::EnemyTurn {
                        self.schedule(self.pacing.return_delay(log_entries));
                    }
                }
            }
            Err(err) => warn!(code = ?err.code, message = %err.message, "enemy phase failed"),
        }
    }

    /// Invalidate pending timers and publish.
    fn mutated(&mut self, snapshot: &Snapshot) {
        self.generation += 1;
        self.cancel_timer();
        let _ = self.snapshots.send(snapshot.clone());
    }

    fn schedule(&mut self, delay: Duration) {
        self.cancel_timer();
        let generation = self.generation;
        let wake = self.wake_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = wake.send(generation);
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
