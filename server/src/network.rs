//! TCP accept loop building sessions and spawning player handlers

use crate::handler::run_player;
use crate::lobby::Lobby;
use crate::session::{Outcome, Session, SessionConfig};
use log::{error, info};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Listens for players and runs guessing-game sessions one after another.
///
/// A session admits connections until every seat is taken; connections
/// arriving while a game is in progress simply queue in the listen backlog
/// for the next session.
pub struct GameServer {
    listener: TcpListener,
    config: SessionConfig,
}

impl GameServer {
    pub async fn bind(addr: &str, config: SessionConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let listener = TcpListener::bind(addr).await?;
        info!("server listening on {}", listener.local_addr()?);
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accepts players and runs sessions until the listener fails.
    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        loop {
            let session = Arc::new(Session::new(self.config.clone()));
            self.run_session(session).await?;
        }
    }

    /// Runs a single game on the given session: admits players until every
    /// seat is taken, then waits for all handlers to finish.
    pub async fn run_session(
        &self,
        session: Arc<Session>,
    ) -> Result<Option<Outcome>, Box<dyn Error + Send + Sync>> {
        info!(
            "waiting for {} players, the secret number is {}",
            session.players(),
            session.secret()
        );

        let mut lobby = Lobby::new(Arc::clone(&session));
        let mut handlers = Vec::new();

        while !lobby.is_full() {
            let (stream, addr) = self.listener.accept().await?;
            let seat = lobby.admit(addr)?;
            handlers.push(tokio::spawn(run_player(Arc::clone(&session), seat, stream)));
        }

        for handle in handlers {
            if let Err(e) = handle.await {
                error!("player handler panicked: {}", e);
            }
        }

        match session.outcome() {
            Some(outcome) => {
                info!(
                    "player {} won, the secret number was {}",
                    outcome.winner, outcome.secret
                );
                Ok(Some(outcome))
            }
            None => {
                info!("session ended with no winner");
                Ok(None)
            }
        }
    }
}
