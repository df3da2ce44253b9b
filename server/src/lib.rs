//! # Guessing Game Server Library
//!
//! Authoritative server for the turn-based number-guessing game. A fixed
//! number of players connect over TCP, and the server enforces that exactly
//! one of them at a time may submit a guess against a shared secret,
//! rotating turns in seat order until somebody gets it right.
//!
//! ## Architecture
//!
//! One tokio task runs per connected player; all of them share a single
//! [`session::Session`] behind an `Arc`. The session is the only mutable
//! shared state in the system, and every read and write of it goes through
//! one `watch` channel, which both serializes mutations and broadcasts
//! wakeups to parked tasks. Handlers therefore never poll: they suspend on
//! the session until the state they care about (game started, their turn,
//! game over) actually changes.
//!
//! ## Module Organization
//!
//! ### Session Module (`session`)
//! The turn-synchronization core: seat admission, the
//! awaiting-players → in-progress → ended state machine, round-robin turn
//! handoff, forfeiture of departed seats, and the terminal outcome record.
//!
//! ### Lobby Module (`lobby`)
//! Membership tracking for one session: sequential seat assignment, the
//! admission that starts the game, and per-seat peer bookkeeping.
//!
//! ### Handler Module (`handler`)
//! The per-connection player loop: prompt, read one line, validate,
//! evaluate, submit. Generic over the stream type so tests can drive it
//! with in-memory pipes.
//!
//! ### Network Module (`network`)
//! The TCP listener: accepts connections, fills a lobby, spawns one
//! handler task per player, and runs sessions back to back.

pub mod handler;
pub mod lobby;
pub mod network;
pub mod session;
