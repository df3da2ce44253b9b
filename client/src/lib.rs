//! # Guessing Game Client Library
//!
//! Client side of the turn-based number-guessing game. The client connects
//! to a server, renders the server's messages as human-readable text, and
//! answers each turn prompt with one integer line.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! Owns the connection: decodes newline-delimited server messages, prints
//! them, and writes back one reply line per turn prompt.
//!
//! ### Strategy Module (`strategy`)
//! Produces the replies: either the automatic range-narrowing guesser,
//! which tracks the interval the secret must still lie in and draws random
//! attempts from it, or manual entry forwarded from stdin.

pub mod network;
pub mod strategy;
