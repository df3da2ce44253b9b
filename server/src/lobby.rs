//! Seat admission and membership tracking for a single session
//!
//! The lobby is the only component that hands out seats. Assignment is
//! sequential, capacity is enforced by the session itself, and the admission
//! that fills the last seat starts the game (see [`Session::admit`]). Peer
//! addresses are kept per seat so connection events can be traced in the
//! server logs.

use crate::session::{Seat, Session, SessionError};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

/// Admits incoming connections to one session until every seat is taken.
pub struct Lobby {
    session: Arc<Session>,
    peers: Vec<(Seat, SocketAddr)>,
}

impl Lobby {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            peers: Vec::new(),
        }
    }

    /// Admits one connection, assigning the next free seat.
    ///
    /// Returns [`SessionError::Full`] once every seat has been handed out;
    /// the caller decides what to do with the excess connection.
    pub fn admit(&mut self, addr: SocketAddr) -> Result<Seat, SessionError> {
        let seat = self.session.admit()?;
        info!("player {} connected from {}", seat, addr);
        self.peers.push((seat, addr));

        if self.is_full() {
            info!(
                "all {} players connected, game starting",
                self.session.players()
            );
        }
        Ok(seat)
    }

    /// True once every seat has been handed out.
    pub fn is_full(&self) -> bool {
        self.session.is_full()
    }

    /// Number of admitted players.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peer address of an admitted seat.
    pub fn peer(&self, seat: Seat) -> Option<SocketAddr> {
        self.peers
            .iter()
            .find(|(s, _)| *s == seat)
            .map(|(_, addr)| *addr)
    }
}
