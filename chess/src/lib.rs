//! # Chess rules
//!
//! This crate implements the rules of chess: pieces and their movement, castling, check,
//! checkmate and stalemate detection, applying and undoing moves. En passant and promotion
//! are not supported, so a pawn which reaches the last rank just stays there.
//!
//! The main entry points are [`Board`], which holds the position and the history of applied
//! moves, and [`Game`], which also tracks whose turn it is.
//!
//! # Example
//!
//! ```
//! use chessrules::{Board, Color, Coord, Move, GameStatus};
//! use std::str::FromStr;
//!
//! let mut board = Board::initial();
//! assert_eq!(board.all_legal_moves(Color::White).len(), 20);
//!
//! let e2 = Coord::from_str("e2").unwrap();
//! let e4 = Coord::from_str("e4").unwrap();
//! board.apply_move(Move::new(e2, e4)).unwrap();
//! assert_eq!(board.placement(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
//! assert_eq!(board.status(Color::Black), Ok(GameStatus::InProgress));
//!
//! board.undo_move().unwrap();
//! assert_eq!(board, Board::initial());
//! ```

pub mod board;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod suggest;

pub use chessrules_base::{geometry, squares, types};

pub use board::{Board, GameStatus, RawBoard};
pub use game::{Game, Outcome};
pub use moves::{Move, MoveList};
pub use piece::Piece;
pub use squares::SquareSet;
pub use suggest::{Limits, Suggest};
pub use types::{CastlingSide, Color, Coord, File, PieceKind, Rank};
