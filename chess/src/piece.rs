//! Pieces standing on the board

use crate::types::{Color, Coord, PieceKind};

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chess piece together with its location
///
/// A piece can be created freely to set up a position, but once it is put on the
/// [`Board`](crate::board::Board), only the board changes its square and its moved flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    coord: Coord,
    has_moved: bool,
}

impl Piece {
    /// Creates a piece which has not moved yet
    #[inline]
    pub const fn new(color: Color, kind: PieceKind, coord: Coord) -> Piece {
        Piece {
            kind,
            color,
            coord,
            has_moved: false,
        }
    }

    /// Returns the same piece with the moved flag set to `has_moved`
    #[inline]
    pub const fn with_moved(self, has_moved: bool) -> Piece {
        Piece { has_moved, ..self }
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Returns `true` if the piece has made at least one move
    ///
    /// Matters for pawn double steps and for castling.
    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.kind.value()
    }

    #[inline]
    pub const fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color as u8 == color as u8 && self.kind as u8 == kind as u8
    }

    /// Returns the FEN letter of the piece, uppercase for White
    pub fn as_char(&self) -> char {
        let c = self.kind.as_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn as_utf8_char(&self) -> char {
        let (white, black) = match self.kind {
            PieceKind::Pawn => ('♙', '♟'),
            PieceKind::King => ('♔', '♚'),
            PieceKind::Knight => ('♘', '♞'),
            PieceKind::Bishop => ('♗', '♝'),
            PieceKind::Rook => ('♖', '♜'),
            PieceKind::Queen => ('♕', '♛'),
        };
        match self.color {
            Color::White => white,
            Color::Black => black,
        }
    }

    pub(crate) fn relocate(&mut self, dst: Coord) {
        self.coord = dst;
        self.has_moved = true;
    }

    pub(crate) fn restore(&mut self, src: Coord, has_moved: bool) {
        self.coord = src;
        self.has_moved = has_moved;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.as_char(), self.coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_chars() {
        let c = Coord::from_parts(File::D, Rank::R1);
        let queen = Piece::new(Color::White, PieceKind::Queen, c);
        assert_eq!(queen.as_char(), 'Q');
        assert_eq!(queen.as_utf8_char(), '♕');
        assert_eq!(queen.to_string(), "Qd1");

        let knight = Piece::new(Color::Black, PieceKind::Knight, c);
        assert_eq!(knight.as_char(), 'n');
        assert_eq!(knight.as_utf8_char(), '♞');
        assert!(knight.is(Color::Black, PieceKind::Knight));
        assert!(!knight.is(Color::White, PieceKind::Knight));
    }

    #[test]
    fn test_relocate() {
        let src = Coord::from_parts(File::E, Rank::R2);
        let dst = Coord::from_parts(File::E, Rank::R4);
        let mut pawn = Piece::new(Color::White, PieceKind::Pawn, src);
        assert!(!pawn.has_moved());
        assert_eq!(pawn.value(), 1);

        pawn.relocate(dst);
        assert_eq!(pawn.coord(), dst);
        assert!(pawn.has_moved());

        pawn.restore(src, false);
        assert_eq!(pawn, Piece::new(Color::White, PieceKind::Pawn, src));
        assert!(pawn.with_moved(true).has_moved());
    }
}
