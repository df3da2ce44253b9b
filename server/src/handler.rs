//! Per-connection player loop driving one seat through the game
//!
//! One handler task runs per admitted connection. The loop never reads from
//! the socket unless its seat holds the turn, so the only suspension points
//! are the session waits and the turn-holder's line read. Malformed input is
//! answered and re-prompted without touching the session; a dead connection
//! forfeits the seat so the rotation keeps moving.

use crate::session::{Seat, Session, TurnSignal};
use log::{debug, error, warn};
use shared::{evaluate, Comparison, ServerMessage};
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, WriteHalf};

/// Runs one player's connection until the session ends or the peer drops.
///
/// The seat is marked departed on every exit path, so a handler that dies
/// mid-turn can never stall the remaining players (see [`Session::leave`]).
pub async fn run_player<S>(session: Arc<Session>, seat: Seat, stream: S)
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    if let Err(e) = drive(&session, seat, stream).await {
        warn!("player {} dropped: {}", seat, e);
    }
    session.leave(seat);
    debug!("player {} handler finished", seat);
}

async fn drive<S>(
    session: &Session,
    seat: Seat,
    stream: S,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();
    let (low, high) = session.secret_range();

    send(
        &mut writer,
        &ServerMessage::Welcome {
            seat,
            players: session.players(),
        },
    )
    .await?;
    send(
        &mut writer,
        &ServerMessage::WaitingForPlayers {
            joined: session.joined(),
            needed: session.players(),
        },
    )
    .await?;

    session.wait_until_started().await;
    if !session.is_ended() {
        send(&mut writer, &ServerMessage::GameStarted).await?;
    }

    loop {
        let current = session.current_seat();
        if current != seat && !session.is_ended() {
            send(&mut writer, &ServerMessage::WaitingForSeat { seat: current }).await?;
        }

        match session.wait_for_turn(seat).await {
            TurnSignal::Ended => break,
            TurnSignal::YourTurn => {}
        }

        // Re-prompt until a line parses; malformed input never consumes the
        // turn, so the same seat retries unbounded.
        let comparison = loop {
            send(&mut writer, &ServerMessage::YourTurn { low, high }).await?;
            let line = match lines.next_line().await? {
                Some(line) => line,
                None => return Err("connection closed mid-turn".into()),
            };

            match line.trim().parse::<i64>() {
                Ok(attempt) => break evaluate(attempt, session.secret()),
                Err(_) => {
                    debug!("player {} sent a non-numeric guess", seat);
                    send(&mut writer, &ServerMessage::InvalidInput).await?;
                }
            }
        };

        let reply = match comparison {
            Comparison::Equal => ServerMessage::YouWon {
                secret: session.secret(),
            },
            other => ServerMessage::Hint { comparison: other },
        };
        send(&mut writer, &reply).await?;

        if let Err(e) = session.submit(seat, comparison) {
            error!("turn contract violated by seat {}: {}", seat, e);
            return Err(e.into());
        }

        if comparison == Comparison::Equal {
            break;
        }
    }

    if let Some(outcome) = session.outcome() {
        if outcome.winner != seat {
            send(
                &mut writer,
                &ServerMessage::OtherWon {
                    winner: outcome.winner,
                    secret: outcome.secret,
                },
            )
            .await?;
        }
    }

    writer.shutdown().await?;
    Ok(())
}

async fn send<S>(
    writer: &mut WriteHalf<S>,
    message: &ServerMessage,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    S: AsyncWrite,
{
    let mut line = message.to_line()?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use std::time::Duration;
    use tokio::io::{duplex, DuplexStream};
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    struct TestPeer {
        lines: tokio::io::Lines<BufReader<tokio::io::ReadHalf<DuplexStream>>>,
        writer: WriteHalf<DuplexStream>,
    }

    impl TestPeer {
        fn new(stream: DuplexStream) -> Self {
            let (reader, writer) = tokio::io::split(stream);
            Self {
                lines: BufReader::new(reader).lines(),
                writer,
            }
        }

        async fn recv(&mut self) -> ServerMessage {
            let line = timeout(WAIT, self.lines.next_line())
                .await
                .expect("timed out waiting for a server message")
                .expect("read failed")
                .expect("server closed the connection early");
            ServerMessage::from_line(&line).expect("undecodable server line")
        }

        async fn recv_until(&mut self, want: impl Fn(&ServerMessage) -> bool) -> ServerMessage {
            loop {
                let message = self.recv().await;
                if want(&message) {
                    return message;
                }
            }
        }

        async fn send_line(&mut self, line: &str) {
            self.writer
                .write_all(format!("{}\n", line).as_bytes())
                .await
                .unwrap();
        }
    }

    fn solo_session(secret: i64) -> Arc<Session> {
        let config = SessionConfig {
            players: 1,
            ..SessionConfig::default()
        };
        let session = Arc::new(Session::with_secret(config, secret));
        session.admit().unwrap();
        session
    }

    #[tokio::test]
    async fn test_malformed_input_reprompts_without_consuming_the_turn() {
        let session = solo_session(42);
        let (server_side, client_side) = duplex(1024);
        let handler = tokio::spawn(run_player(Arc::clone(&session), 0, server_side));
        let mut peer = TestPeer::new(client_side);

        peer.recv_until(|m| matches!(m, ServerMessage::YourTurn { .. }))
            .await;
        peer.send_line("abc").await;
        peer.recv_until(|m| matches!(m, ServerMessage::InvalidInput))
            .await;

        // Same seat is prompted again; the gate never moved.
        peer.recv_until(|m| matches!(m, ServerMessage::YourTurn { .. }))
            .await;
        assert_eq!(session.current_seat(), 0);

        peer.send_line("42").await;
        match peer
            .recv_until(|m| matches!(m, ServerMessage::YouWon { .. }))
            .await
        {
            ServerMessage::YouWon { secret } => assert_eq!(secret, 42),
            _ => unreachable!(),
        }

        timeout(WAIT, handler).await.unwrap().unwrap();
        assert!(session.is_ended());
    }

    #[tokio::test]
    async fn test_wrong_guesses_produce_hints() {
        let session = solo_session(42);
        let (server_side, client_side) = duplex(1024);
        let handler = tokio::spawn(run_player(Arc::clone(&session), 0, server_side));
        let mut peer = TestPeer::new(client_side);

        for (guess, expected) in [("10", Comparison::TooLow), ("90", Comparison::TooHigh)] {
            peer.recv_until(|m| matches!(m, ServerMessage::YourTurn { .. }))
                .await;
            peer.send_line(guess).await;
            match peer
                .recv_until(|m| matches!(m, ServerMessage::Hint { .. }))
                .await
            {
                ServerMessage::Hint { comparison } => assert_eq!(comparison, expected),
                _ => unreachable!(),
            }
        }

        peer.recv_until(|m| matches!(m, ServerMessage::YourTurn { .. }))
            .await;
        peer.send_line("42").await;
        peer.recv_until(|m| matches!(m, ServerMessage::YouWon { .. }))
            .await;
        timeout(WAIT, handler).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_disconnect_mid_turn_forfeits_the_seat() {
        let config = SessionConfig {
            players: 2,
            ..SessionConfig::default()
        };
        let session = Arc::new(Session::with_secret(config, 42));
        session.admit().unwrap();
        session.admit().unwrap();

        let (server_side, client_side) = duplex(1024);
        let handler = tokio::spawn(run_player(Arc::clone(&session), 0, server_side));
        let mut peer = TestPeer::new(client_side);

        peer.recv_until(|m| matches!(m, ServerMessage::YourTurn { .. }))
            .await;
        drop(peer);

        timeout(WAIT, handler).await.unwrap().unwrap();
        assert_eq!(session.current_seat(), 1);
        assert!(!session.is_ended());
    }

    #[tokio::test]
    async fn test_losing_handler_receives_the_outcome() {
        let config = SessionConfig {
            players: 2,
            ..SessionConfig::default()
        };
        let session = Arc::new(Session::with_secret(config, 42));
        session.admit().unwrap();
        session.admit().unwrap();

        let (server_side, client_side) = duplex(1024);
        let handler = tokio::spawn(run_player(Arc::clone(&session), 1, server_side));
        let mut peer = TestPeer::new(client_side);

        peer.recv_until(|m| matches!(m, ServerMessage::WaitingForSeat { .. }))
            .await;

        // Seat 0 wins while seat 1 is parked waiting for its turn.
        session.submit(0, Comparison::Equal).unwrap();

        match peer
            .recv_until(|m| matches!(m, ServerMessage::OtherWon { .. }))
            .await
        {
            ServerMessage::OtherWon { winner, secret } => {
                assert_eq!(winner, 0);
                assert_eq!(secret, 42);
            }
            _ => unreachable!(),
        }
        timeout(WAIT, handler).await.unwrap().unwrap();
    }
}
