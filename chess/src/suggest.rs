//! Move suggestion from external collaborators
//!
//! A collaborator implements [`Suggest`]: it receives an immutable snapshot of the game and
//! may propose a move. The proposal is not trusted, [`Game::play_suggested()`] pushes it
//! through the same checks as any other move.
//!
//! [`Game::play_suggested()`]: crate::game::Game::play_suggested

use crate::board::Board;
use crate::game::PushError;
use crate::moves::Move;
use crate::types::Color;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Maximum value of [`Limits::skill()`]
pub const MAX_SKILL: u8 = 20;

/// Resource limits passed to the collaborator
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Limits {
    time: Duration,
    skill: u8,
}

impl Limits {
    #[inline]
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Playing strength, from 0 to [`MAX_SKILL`]
    #[inline]
    pub fn skill(&self) -> u8 {
        self.skill
    }

    #[inline]
    pub fn with_time(self, time: Duration) -> Limits {
        Limits { time, ..self }
    }

    /// Sets the playing strength, values above [`MAX_SKILL`] are clamped
    #[inline]
    pub fn with_skill(self, skill: u8) -> Limits {
        Limits {
            skill: skill.min(MAX_SKILL),
            ..self
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            time: Duration::from_secs(1),
            skill: 10,
        }
    }
}

/// Snapshot of the game handed to the collaborator
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub board: &'a Board,
    /// Side to move
    pub side: Color,
    /// Full FEN of the position
    pub fen: String,
    pub limits: Limits,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuggestError {
    /// The collaborator cannot be reached
    #[error("suggestion source unavailable: {0}")]
    Unavailable(String),
    /// No collaborator proposed a move
    #[error("no move suggested")]
    NoMove,
    /// The proposed move was rejected
    #[error("suggested move rejected: {0}")]
    Rejected(#[from] PushError),
}

/// Source of suggested moves
pub trait Suggest {
    /// Proposes a move for `req.side`, or returns `None` if there is nothing to propose
    fn suggest(&mut self, req: &Request<'_>) -> Result<Option<Move>, SuggestError>;
}

impl<S: Suggest + ?Sized> Suggest for Box<S> {
    fn suggest(&mut self, req: &Request<'_>) -> Result<Option<Move>, SuggestError> {
        (**self).suggest(req)
    }
}

/// Picks a uniformly random legal move
pub struct RandomSuggest<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomSuggest<R> {
    pub fn new(rng: R) -> Self {
        RandomSuggest { rng }
    }
}

impl RandomSuggest<StdRng> {
    /// Creates a deterministic source, the same seed yields the same choices
    pub fn from_seed(seed: u64) -> Self {
        RandomSuggest::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomSuggest::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Suggest for RandomSuggest<R> {
    fn suggest(&mut self, req: &Request<'_>) -> Result<Option<Move>, SuggestError> {
        let moves = req.board.all_legal_moves(req.side);
        Ok(moves.choose(&mut self.rng).copied())
    }
}

/// Asks `primary` first, and `fallback` if `primary` is unavailable or has no move
pub struct Fallback<P, F> {
    pub primary: P,
    pub fallback: F,
}

impl<P, F> Fallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Fallback { primary, fallback }
    }
}

impl<P: Suggest, F: Suggest> Suggest for Fallback<P, F> {
    fn suggest(&mut self, req: &Request<'_>) -> Result<Option<Move>, SuggestError> {
        match self.primary.suggest(req) {
            Ok(Some(mv)) => Ok(Some(mv)),
            Ok(None) | Err(SuggestError::Unavailable(_)) => self.fallback.suggest(req),
            Err(e) => Err(e),
        }
    }
}
