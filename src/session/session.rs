//! The synchronous session aggregate.
//!
//! A `Session` owns at most one `GameState` and is the only thing that
//! mutates it. Every command runs against a checkpoint: if the handler
//! fails or panics, the checkpoint is restored, so a rejected command
//! leaves the state exactly as it was. The checkpoint is an `im` clone
//! and shares structure with the live state.
//!
//! ```
//! use card_gauntlet::cards::catalog::starter_deck;
//! use card_gauntlet::core::{Command, GameStatus};
//! use card_gauntlet::session::Session;
//!
//! let mut session = Session::standard(42);
//! let snapshot = session.execute(Command::StartGame { deck: starter_deck() }).unwrap();
//! assert_eq!(snapshot.status, GameStatus::Playing);
//!
//! session.execute(Command::EndTurn).unwrap();
//! let snapshot = session.run_enemy_turn().unwrap();
//! assert_eq!(snapshot.turn, 2);
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::snapshot::Snapshot;
use crate::cards::catalog::standard_registry;
use crate::cards::CardId;
use crate::core::{Command, CommandError, CommandRecord, GameError, GameResult, GameState, GameStatus, RulesConfig};
use crate::rules::{EnemyPhase, Engine};

/// One player's game session.
pub struct Session {
    engine: Engine,
    state: Option<GameState>,
    seed: u64,
    games_started: u64,
}

impl Session {
    /// Create a session with no game in progress.
    #[must_use]
    pub fn new(engine: Engine, seed: u64) -> Self {
        Self {
            engine,
            state: None,
            seed,
            games_started: 0,
        }
    }

    /// A session over the built-in catalog and default rules.
    #[must_use]
    pub fn standard(seed: u64) -> Self {
        Self::with_config(RulesConfig::default(), seed)
    }

    /// A session over the built-in catalog with custom rules.
    #[must_use]
    pub fn with_config(config: RulesConfig, seed: u64) -> Self {
        Self::new(Engine::new(Arc::new(standard_registry()), config), seed)
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The live state, if a game has been started.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> Option<GameStatus> {
        self.state.as_ref().map(|s| s.status)
    }

    /// Snapshot of the current game.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state.as_ref().map(Snapshot::from_state)
    }

    /// Execute one client command.
    pub fn execute(&mut self, command: Command) -> Result<Snapshot, CommandError> {
        let name = command.name();
        match command {
            Command::StartGame { deck } => self.guarded(name, |session| session.start_game(&deck)),
            command => self.guarded(name, |session| {
                let state = session.state.as_mut().ok_or(GameError::GameNotStarted)?;
                session.engine.apply(state, &command)
            }),
        }?;
        self.current_snapshot()
    }

    /// Run the next enemy sub-phase.
    pub fn advance_enemy_turn(&mut self) -> Result<(EnemyPhase, Snapshot), CommandError> {
        let phase = self.guarded("advance_enemy_turn", |session| {
            let state = session.state.as_mut().ok_or(GameError::GameNotStarted)?;
            session.engine.advance_enemy_turn(state)
        })?;
        Ok((phase, self.current_snapshot()?))
    }

    /// Run the enemy turn to completion without pauses.
    pub fn run_enemy_turn(&mut self) -> Result<Snapshot, CommandError> {
        loop {
            let (phase, snapshot) = self.advance_enemy_turn()?;
            if phase == EnemyPhase::PlayerTurnBegan || snapshot.status != GameStatus::EnemyTurn {
                return Ok(snapshot);
            }
        }
    }

    /// Rebuild a game from its seed and command history.
    ///
    /// Enemy turns are run to completion between commands, the same way a
    /// paced session would before accepting the next command. If the history
    /// ends on `EndTurn`, the replayed game stops at the start of that enemy
    /// turn.
    pub fn replay(engine: Engine, seed: u64, history: &[CommandRecord]) -> Result<Self, CommandError> {
        let mut session = Self::new(engine, seed);
        for record in history {
            if session.status() == Some(GameStatus::EnemyTurn) {
                session.run_enemy_turn()?;
            }
            session.execute(record.command.clone())?;
        }
        debug!(seed, commands = history.len(), "game replayed");
        Ok(session)
    }

    fn start_game(&mut self, deck: &[CardId]) -> GameResult<()> {
        if self.state.as_ref().is_some_and(|s| !s.status.is_terminal()) {
            return Err(GameError::GameAlreadyStarted);
        }
        let seed = self.seed.wrapping_add(self.games_started);
        let mut state = self.engine.start_game(deck, seed)?;
        state.history.push_back(CommandRecord {
            round: state.round,
            turn: state.turn,
            command: Command::StartGame { deck: deck.to_vec() },
        });
        self.state = Some(state);
        self.games_started += 1;
        Ok(())
    }

    fn current_snapshot(&self) -> Result<Snapshot, CommandError> {
        self.snapshot()
            .ok_or_else(|| CommandError::from(GameError::GameNotStarted))
    }

    /// Run `f` against a checkpoint, restoring it on error or panic.
    fn guarded<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> GameResult<T>,
    ) -> Result<T, CommandError> {
        let checkpoint = self.state.clone();
        let games_started = self.games_started;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&mut *self)));
        match outcome {
            Ok(Ok(value)) => {
                debug!(command = name, "command accepted");
                Ok(value)
            }
            Ok(Err(err)) => {
                self.state = checkpoint;
                self.games_started = games_started;
                warn!(command = name, code = ?err.code(), %err, "command rejected");
                Err(err.into())
            }
            Err(payload) => {
                self.state = checkpoint;
                self.games_started = games_started;
                let message = panic_message(payload.as_ref());
                warn!(command = name, %message, "internal fault recovered");
                Err(CommandError::unknown(message))
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(state) = &self.state {
            info!(round = state.round, status = ?state.status, "session closed");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}
