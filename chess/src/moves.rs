//! Moves and move history

use crate::piece::Piece;
use crate::types::{Coord, PieceKind};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chess move
///
/// A move is just a pair of squares. Castling is a king move over two files, the rook
/// displacement is implied. Whether the move is legal depends on the position, see
/// [`Board::is_legal()`](crate::board::Board::is_legal).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    src: Coord,
    dst: Coord,
}

impl Move {
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move { src, dst }
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }
}

/// Maximum number of legal moves for one side
///
/// A side has at most 16 pieces, and none of them has more than 27 destinations.
pub const MAX_MOVES: usize = 16 * 27;

/// List of moves which doesn't allocate
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVES>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_MOVES>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_MOVES>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Rook displacement made by castling
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RookShift {
    pub src: Coord,
    pub dst: Coord,
    pub had_moved: bool,
}

/// Record which allows to take back one applied move exactly
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub(crate) mv: Move,
    pub(crate) kind: PieceKind,
    pub(crate) had_moved: bool,
    pub(crate) captured: Option<Piece>,
    pub(crate) rook: Option<RookShift>,
}

impl HistoryEntry {
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Kind of the moved piece
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Moved flag of the moved piece before the move
    #[inline]
    pub fn had_moved(&self) -> bool {
        self.had_moved
    }

    /// Piece removed from the destination square, as it was before the capture
    #[inline]
    pub fn captured(&self) -> Option<&Piece> {
        self.captured.as_ref()
    }

    /// Rook displacement if the move was castling
    #[inline]
    pub fn castling_rook(&self) -> Option<&RookShift> {
        self.rook.as_ref()
    }

    /// Returns `true` if the move resets the halfmove clock
    #[inline]
    pub fn is_irreversible(&self) -> bool {
        self.kind == PieceKind::Pawn || self.captured.is_some()
    }
}
