//! Guess sources answering the server's turn prompts
//!
//! Two ways to produce a guess: the automatic range-narrowing guesser and
//! manual entry from stdin. The automatic guesser mirrors a human playing
//! the game: it keeps the range the secret must still lie in, guesses
//! uniformly inside it, and never repeats its previous attempt.

use log::debug;
use rand::Rng;
use shared::Comparison;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Narrows `[min, max]` after every hint and draws the next attempt from
/// what remains.
#[derive(Debug)]
pub struct RangeNarrowingGuesser {
    min: i64,
    max: i64,
    last: Option<i64>,
}

impl RangeNarrowingGuesser {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            last: None,
        }
    }

    /// Shrinks the feasible range to fit inside the server-announced one.
    pub fn clamp_to(&mut self, low: i64, high: i64) {
        self.min = self.min.max(low);
        self.max = self.max.min(high);
    }

    pub fn next_guess(&mut self) -> i64 {
        let mut rng = rand::thread_rng();
        let mut attempt = rng.gen_range(self.min..=self.max);
        // Avoid repeating the previous attempt, unless the range has shrunk
        // to a single value.
        while self.min < self.max && Some(attempt) == self.last {
            attempt = rng.gen_range(self.min..=self.max);
        }
        self.last = Some(attempt);
        attempt
    }

    /// Narrows the range from the server's verdict on the last attempt.
    pub fn observe(&mut self, comparison: Comparison) {
        let Some(last) = self.last else { return };
        match comparison {
            Comparison::TooLow => self.min = self.min.max(last + 1),
            Comparison::TooHigh => self.max = self.max.min(last - 1),
            Comparison::Equal => {}
        }
        debug!("feasible range narrowed to {}-{}", self.min, self.max);
    }
}

/// Where the reply to a `YourTurn` prompt comes from.
///
/// Replies are raw wire lines: the automatic guesser always produces a
/// number, while manual entry is forwarded as typed and left to the server
/// to validate.
pub enum GuessSource {
    Auto(RangeNarrowingGuesser),
    Manual(Lines<BufReader<Stdin>>),
}

impl GuessSource {
    /// Automatic guesser over the default secret range.
    pub fn auto() -> Self {
        GuessSource::Auto(RangeNarrowingGuesser::new(
            shared::DEFAULT_SECRET_LOW,
            shared::DEFAULT_SECRET_HIGH,
        ))
    }

    /// Guesses typed by hand on stdin.
    pub fn manual() -> Self {
        GuessSource::Manual(BufReader::new(tokio::io::stdin()).lines())
    }

    /// Produces the next reply line for a prompt covering `[low, high]`.
    pub async fn next_attempt(
        &mut self,
        low: i64,
        high: i64,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        match self {
            GuessSource::Auto(guesser) => {
                guesser.clamp_to(low, high);
                let attempt = guesser.next_guess();
                println!("guessing {}", attempt);
                Ok(attempt.to_string())
            }
            GuessSource::Manual(lines) => match lines.next_line().await? {
                Some(line) => Ok(line),
                None => Err("stdin closed".into()),
            },
        }
    }

    /// Feeds a hint back into the strategy.
    pub fn observe(&mut self, comparison: Comparison) {
        if let GuessSource::Auto(guesser) = self {
            guesser.observe(comparison);
        }
    }
}
