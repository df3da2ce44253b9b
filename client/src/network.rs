//! Client connection loop decoding server messages and answering prompts

use crate::strategy::GuessSource;
use log::{info, warn};
use shared::{Comparison, ServerMessage};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Connects to a server and plays one game to completion.
pub struct GameClient {
    server_addr: String,
    source: GuessSource,
}

impl GameClient {
    pub fn new(server_addr: &str, source: GuessSource) -> Self {
        Self {
            server_addr: server_addr.to_string(),
            source,
        }
    }

    /// Runs until the game ends or the server closes the connection.
    pub async fn run(mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let stream = TcpStream::connect(&self.server_addr).await?;
        info!("connected to {}", self.server_addr);

        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            let message = match ServerMessage::from_line(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("undecodable server line: {}", e);
                    continue;
                }
            };

            println!("{}", render(&message));

            match message {
                ServerMessage::YourTurn { low, high } => {
                    let reply = self.source.next_attempt(low, high).await?;
                    writer.write_all(format!("{}\n", reply).as_bytes()).await?;
                }
                ServerMessage::Hint { comparison } => self.source.observe(comparison),
                ServerMessage::YouWon { .. } | ServerMessage::OtherWon { .. } => break,
                _ => {}
            }
        }

        Ok(())
    }
}

/// Human-readable rendition of a wire message.
fn render(message: &ServerMessage) -> String {
    match message {
        ServerMessage::Welcome { seat, players } => {
            format!("Welcome to 'Guess the number'! You are player {} of {}.", seat, players)
        }
        ServerMessage::WaitingForPlayers { joined, needed } => {
            format!("Waiting for players ({}/{} connected)...", joined, needed)
        }
        ServerMessage::GameStarted => "All players are connected! The game begins.".to_string(),
        ServerMessage::YourTurn { low, high } => {
            format!("Your turn. Enter a number ({}-{}):", low, high)
        }
        ServerMessage::WaitingForSeat { seat } => {
            format!("Waiting for player {} to move...", seat)
        }
        ServerMessage::Hint { comparison } => match comparison {
            Comparison::TooLow => "The secret number is higher.".to_string(),
            Comparison::TooHigh => "The secret number is lower.".to_string(),
            Comparison::Equal => "You guessed it!".to_string(),
        },
        ServerMessage::InvalidInput => "Please enter a valid number.".to_string(),
        ServerMessage::YouWon { secret } => {
            format!("You guessed it! You won! The secret number was {}.", secret)
        }
        ServerMessage::OtherWon { winner, secret } => {
            format!("Player {} won! The secret number was {}.", winner, secret)
        }
    }
}
