//! Session state machine granting exclusive turn access to player tasks
//!
//! One [`Session`] is one game: a fixed set of seats, one secret, and a
//! lifecycle of waiting for players, rotating turns, and ending on the first
//! correct attempt. Every piece of mutable state lives behind a single
//! `tokio::sync::watch` channel per session: mutations go through
//! `send_modify`, which serializes them against each other and broadcasts a
//! wakeup to every parked task; each waiter re-checks its own predicate after
//! waking, so a wakeup meant for another waiter just parks it again. That one
//! discipline covers every interleaving hazard the turn rotation has.

use rand::Rng;
use shared::Comparison;
use thiserror::Error;
use tokio::sync::watch;

/// A player's stable position within a session, in `[0, players)`.
pub type Seat = u32;

/// Violations of the session's synchronization contract.
///
/// These indicate a broken caller, not a misbehaving player: protocol-level
/// junk (malformed guesses, dead connections) never reaches this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session already has its full complement of players")]
    Full,
    #[error("seat {seat} submitted a turn out of order (current turn is seat {current})")]
    OutOfTurn { seat: Seat, current: Seat },
    #[error("turn submitted before all players joined")]
    NotStarted,
    #[error("turn submitted after the session ended")]
    Ended,
}

/// Parameters a session is built from.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seats that must be filled before the game starts.
    pub players: u32,
    /// Lowest value the secret can take.
    pub low: i64,
    /// Highest value the secret can take, inclusive.
    pub high: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            players: shared::DEFAULT_PLAYER_COUNT,
            low: shared::DEFAULT_SECRET_LOW,
            high: shared::DEFAULT_SECRET_HIGH,
        }
    }
}

/// Terminal result of a session, produced at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Seat,
    pub secret: i64,
}

/// What a task parked in [`Session::wait_for_turn`] was released for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSignal {
    YourTurn,
    Ended,
}

#[derive(Debug, Clone)]
struct State {
    joined: u32,
    started: bool,
    ended: bool,
    current_turn: Seat,
    departed: Vec<bool>,
    outcome: Option<Outcome>,
}

/// Next non-departed seat after `from`, wrapping round-robin. Falls back to
/// `from` itself when no other live seat exists.
fn next_live_seat(state: &State, from: Seat) -> Seat {
    let n = state.departed.len() as u32;
    for step in 1..=n {
        let seat = (from + step) % n;
        if !state.departed[seat as usize] {
            return seat;
        }
    }
    from
}

/// One guessing game among a fixed set of seats sharing one secret.
///
/// Handlers hold the session behind an `Arc` and only ever talk to it
/// through these methods; none of them can observe a half-applied
/// transition.
pub struct Session {
    secret: i64,
    config: SessionConfig,
    state: watch::Sender<State>,
}

impl Session {
    /// Creates a session with a uniformly random secret in the configured
    /// inclusive range.
    pub fn new(config: SessionConfig) -> Self {
        let secret = rand::thread_rng().gen_range(config.low..=config.high);
        Self::with_secret(config, secret)
    }

    /// Creates a session with a fixed secret, for tests and callers that
    /// manage their own randomness.
    pub fn with_secret(config: SessionConfig, secret: i64) -> Self {
        assert!(config.players >= 1, "a session needs at least one seat");
        assert!(config.low <= config.high, "secret range must be non-empty");

        let (state, _) = watch::channel(State {
            joined: 0,
            started: false,
            ended: false,
            current_turn: 0,
            departed: vec![false; config.players as usize],
            outcome: None,
        });

        Self {
            secret,
            config,
            state,
        }
    }

    pub fn secret(&self) -> i64 {
        self.secret
    }

    pub fn players(&self) -> u32 {
        self.config.players
    }

    /// Inclusive range the secret was drawn from.
    pub fn secret_range(&self) -> (i64, i64) {
        (self.config.low, self.config.high)
    }

    /// Seats admitted so far.
    pub fn joined(&self) -> u32 {
        self.state.borrow().joined
    }

    pub fn is_full(&self) -> bool {
        self.state.borrow().joined == self.config.players
    }

    pub fn is_ended(&self) -> bool {
        self.state.borrow().ended
    }

    /// The session outcome, if a winning attempt has been recorded.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.borrow().outcome
    }

    /// Seat currently holding the turn. Only meaningful while the game is
    /// in progress.
    pub fn current_seat(&self) -> Seat {
        self.state.borrow().current_turn
    }

    /// Assigns the next sequential seat.
    ///
    /// The admission that fills the last seat also flips the session to
    /// in-progress; both happen under one state update, so a late
    /// connection can never race the started check.
    pub fn admit(&self) -> Result<Seat, SessionError> {
        let mut admitted = Err(SessionError::Full);
        self.state.send_modify(|s| {
            if s.joined >= self.config.players {
                return;
            }
            let seat = s.joined;
            s.joined += 1;
            if s.joined == self.config.players {
                s.started = true;
                // The opening turn must belong to a live seat.
                if s.departed[s.current_turn as usize] {
                    s.current_turn = next_live_seat(s, s.current_turn);
                }
            }
            admitted = Ok(seat);
        });
        admitted
    }

    /// Parks the caller until every seat is admitted, or until the session
    /// ends first.
    ///
    /// Wakeups are broadcast to all waiters regardless of what each is
    /// waiting for, so the predicate is re-checked on every wake before
    /// returning.
    pub async fn wait_until_started(&self) {
        let mut rx = self.state.subscribe();
        loop {
            {
                let s = rx.borrow_and_update();
                if s.started || s.ended {
                    return;
                }
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Parks the caller until the given seat holds the turn or the session
    /// ends, and reports which of the two released it.
    pub async fn wait_for_turn(&self, seat: Seat) -> TurnSignal {
        let mut rx = self.state.subscribe();
        loop {
            {
                let s = rx.borrow_and_update();
                if s.ended {
                    return TurnSignal::Ended;
                }
                if s.started && s.current_turn == seat {
                    return TurnSignal::YourTurn;
                }
            }
            if rx.changed().await.is_err() {
                return TurnSignal::Ended;
            }
        }
    }

    /// Records an evaluated attempt for the seat holding the turn.
    ///
    /// A non-winning attempt hands the turn to the next live seat; a win
    /// ends the session and records the outcome. Either way every parked
    /// task is woken. Calling this from any other seat, before the game
    /// starts, or after it ends breaks the synchronization contract and is
    /// reported as a [`SessionError`] rather than silently accepted.
    pub fn submit(&self, seat: Seat, comparison: Comparison) -> Result<(), SessionError> {
        let mut result = Ok(());
        self.state.send_modify(|s| {
            if !s.started {
                result = Err(SessionError::NotStarted);
            } else if s.ended {
                result = Err(SessionError::Ended);
            } else if s.current_turn != seat {
                result = Err(SessionError::OutOfTurn {
                    seat,
                    current: s.current_turn,
                });
            } else if comparison == Comparison::Equal {
                s.ended = true;
                s.outcome = Some(Outcome {
                    winner: seat,
                    secret: self.secret,
                });
            } else {
                s.current_turn = next_live_seat(s, seat);
            }
        });
        result
    }

    /// Marks a seat as departed.
    ///
    /// A departed seat is skipped by the rotation from then on. If the seat
    /// held the turn, the turn advances immediately so the remaining
    /// players never wait on a dead connection; once every seat has
    /// departed the session ends with no outcome. Idempotent, and safe to
    /// call on every handler exit path.
    pub fn leave(&self, seat: Seat) {
        self.state.send_modify(|s| {
            if s.departed[seat as usize] {
                return;
            }
            s.departed[seat as usize] = true;
            if s.ended {
                return;
            }
            if s.departed.iter().all(|&d| d) {
                s.ended = true;
                return;
            }
            if s.current_turn == seat {
                s.current_turn = next_live_seat(s, seat);
            }
        });
    }
}
