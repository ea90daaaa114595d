//! Game controller which tracks turns

use crate::board::{Board, GameStatus, MoveError, NoKing};
use crate::geometry;
use crate::moves::{HistoryEntry, Move, MoveList};
use crate::suggest::{Limits, Request, Suggest, SuggestError};
use crate::types::{CastlingSide, Color, Coord, PieceKind};

use std::fmt;

use thiserror::Error;

/// Error pushing a move into [`Game`]
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum PushError {
    /// The game is already over
    #[error("game is finished")]
    Finished,
    /// The piece on the source square belongs to the side which is not to move
    #[error("piece at {0} does not belong to the side to move")]
    WrongSide(Coord),
    /// The board rejected the move
    #[error("bad move: {0}")]
    Move(#[from] MoveError),
}

/// Error starting [`Game`] from an arbitrary position
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum SetupError {
    /// One of the sides has no king
    #[error("{0}")]
    NoKing(#[from] NoKing),
    /// The side which is not to move is in check
    #[error("opponent king is attacked")]
    OpponentKingAttacked,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot apply move #{}: {}", .pos + 1, .source)]
pub struct ReplayError {
    pub pos: usize,
    pub source: PushError,
}

/// Result of a finished game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl Outcome {
    /// Returns the winner, or `None` in case of draw
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate { winner } => Some(winner),
            Outcome::Stalemate => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Outcome::Checkmate { winner: Color::White } => write!(f, "white wins by checkmate"),
            Outcome::Checkmate { winner: Color::Black } => write!(f, "black wins by checkmate"),
            Outcome::Stalemate => write!(f, "draw by stalemate"),
        }
    }
}

/// Chess game
///
/// Wraps [`Board`] and keeps the side to move, which alternates after each move
/// starting from White. The status is recomputed after every change, so the game knows
/// when it is over and refuses further moves.
///
/// # Example
///
/// ```
/// # use chessrules::{Game, Move, Coord, Color, Outcome};
/// # use std::str::FromStr;
/// #
/// let mut game = Game::new();
/// for (src, dst) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
///     let mv = Move::new(Coord::from_str(src).unwrap(), Coord::from_str(dst).unwrap());
///     game.push(mv).unwrap();
/// }
/// assert_eq!(game.outcome(), Some(Outcome::Checkmate { winner: Color::Black }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side: Color,
    first_side: Color,
    status: GameStatus,
}

impl Game {
    /// Starts a new game from the initial position
    pub fn new() -> Game {
        Game::with_board(Board::initial(), Color::White)
    }

    /// Starts a game from `board` with `side` to move
    ///
    /// Both kings must be present, and the king of the side which is not to move must not
    /// be in check, otherwise it could be captured.
    pub fn from_board(board: Board, side: Color) -> Result<Game, SetupError> {
        for color in [Color::White, Color::Black] {
            board.king_pos(color).ok_or(NoKing(color))?;
        }
        if board.is_check(side.inv()) {
            return Err(SetupError::OpponentKingAttacked);
        }
        Ok(Game::with_board(board, side))
    }

    fn with_board(board: Board, side: Color) -> Game {
        let mut res = Game {
            board,
            side,
            first_side: side,
            status: GameStatus::InProgress,
        };
        res.update_status();
        res
    }

    /// Replays `moves` from the initial position
    ///
    /// Fails on the first move which cannot be pushed, reporting its index.
    pub fn from_moves(moves: impl IntoIterator<Item = Move>) -> Result<Game, ReplayError> {
        let mut res = Game::new();
        for (pos, mv) in moves.into_iter().enumerate() {
            res.push(mv)
                .map_err(|source| ReplayError { pos, source })?;
        }
        Ok(res)
    }

    fn update_status(&mut self) {
        self.status = self
            .board
            .status(self.side)
            .unwrap_or(GameStatus::InProgress);
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::InProgress => None,
            GameStatus::Checkmate => Some(Outcome::Checkmate {
                winner: self.side.inv(),
            }),
            GameStatus::Stalemate => Some(Outcome::Stalemate),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the number of moves played
    #[inline]
    pub fn len(&self) -> usize {
        self.board.history().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the moves played, from the first one
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.board.history().iter().map(HistoryEntry::mv)
    }

    /// Returns all the legal moves for the side to move
    pub fn legal_moves(&self) -> MoveList {
        self.board.all_legal_moves(self.side)
    }

    /// Applies the move of the side to move and passes the turn
    pub fn push(&mut self, mv: Move) -> Result<(), PushError> {
        if self.is_finished() {
            return Err(PushError::Finished);
        }
        if let Some(p) = self.board.get(mv.src()) {
            if p.color() != self.side {
                return Err(PushError::WrongSide(mv.src()));
            }
        }
        self.board.apply_move(mv)?;
        self.side = self.side.inv();
        self.update_status();
        Ok(())
    }

    /// Takes back the last move and returns it
    pub fn pop(&mut self) -> Option<Move> {
        let mv = self.board.undo_move().ok()?;
        self.side = self.side.inv();
        self.update_status();
        Some(mv)
    }

    /// Returns to the initial position with White to move
    pub fn reset(&mut self) {
        self.board.reset();
        self.side = Color::White;
        self.first_side = Color::White;
        self.status = GameStatus::InProgress;
    }

    /// Asks `engine` for a move and plays it
    ///
    /// The proposal is pushed as any other move, so an illegal one is rejected and
    /// leaves the game unchanged.
    pub fn play_suggested<S: Suggest + ?Sized>(
        &mut self,
        engine: &mut S,
        limits: Limits,
    ) -> Result<Move, SuggestError> {
        if self.is_finished() {
            return Err(PushError::Finished.into());
        }
        let req = Request {
            board: &self.board,
            side: self.side,
            fen: self.fen(),
            limits,
        };
        let mv = engine.suggest(&req)?.ok_or(SuggestError::NoMove)?;
        self.push(mv)?;
        Ok(mv)
    }

    fn has_castling_right(&self, color: Color, side: CastlingSide) -> bool {
        let rank = geometry::home_rank(color);
        let king = self
            .board
            .get(geometry::king_home(color))
            .filter(|p| p.is(color, PieceKind::King) && !p.has_moved());
        let rook = self
            .board
            .get2(geometry::castling_rook_src(side), rank)
            .filter(|p| p.is(color, PieceKind::Rook) && !p.has_moved());
        king.is_some() && rook.is_some()
    }

    /// Returns the number of half-moves since the last capture or pawn move
    pub fn halfmove_clock(&self) -> usize {
        self.board
            .history()
            .iter()
            .rev()
            .take_while(|e| !e.is_irreversible())
            .count()
    }

    /// Returns the move number, which starts from 1 and grows after each Black move
    pub fn fullmove_number(&self) -> usize {
        let shift = match self.first_side {
            Color::White => 0,
            Color::Black => 1,
        };
        1 + (self.len() + shift) / 2
    }

    /// Returns the position in FEN
    ///
    /// Castling rights are derived from the pieces which have not moved, en passant square
    /// is always `-`.
    pub fn fen(&self) -> String {
        let mut castling = String::new();
        for color in [Color::White, Color::Black] {
            for (side, ch) in [(CastlingSide::King, 'K'), (CastlingSide::Queen, 'Q')] {
                if self.has_castling_right(color, side) {
                    castling.push(match color {
                        Color::White => ch,
                        Color::Black => ch.to_ascii_lowercase(),
                    });
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        format!(
            "{} {} {} - {} {}",
            self.board,
            self.side.as_char(),
            castling,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn mv(src: &str, dst: &str) -> Move {
        Move::new(Coord::from_str(src).unwrap(), Coord::from_str(dst).unwrap())
    }

    fn moves(list: &[(&str, &str)]) -> Vec<Move> {
        list.iter().map(|&(src, dst)| mv(src, dst)).collect()
    }

    const FOOLS_MATE: [(&str, &str); 4] = [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")];

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new();
        assert_eq!(game.side(), Color::White);
        assert_eq!(game.legal_moves().len(), 20);
        for m in moves(&FOOLS_MATE) {
            assert!(!game.is_finished());
            game.push(m).unwrap();
        }
        assert_eq!(game.side(), Color::White);
        assert_eq!(game.status(), GameStatus::Checkmate);
        assert_eq!(
            game.outcome(),
            Some(Outcome::Checkmate {
                winner: Color::Black
            })
        );
        assert_eq!(game.outcome().unwrap().winner(), Some(Color::Black));
        assert_eq!(game.outcome().unwrap().to_string(), "black wins by checkmate");
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.push(mv("a2", "a3")), Err(PushError::Finished));

        assert_eq!(game.pop(), Some(mv("d8", "h4")));
        assert!(!game.is_finished());
        assert_eq!(game.side(), Color::Black);
        assert_eq!(game.len(), 3);
    }

    #[test]
    fn test_push_errors() {
        let mut game = Game::new();
        let before = game.clone();
        assert_eq!(
            game.push(mv("e7", "e5")),
            Err(PushError::WrongSide(Coord::from_str("e7").unwrap()))
        );
        assert_eq!(
            game.push(mv("e3", "e4")),
            Err(PushError::Move(MoveError::NoPieceAtSource(
                Coord::from_str("e3").unwrap()
            )))
        );
        assert_eq!(
            game.push(mv("b1", "d2")),
            Err(PushError::Move(MoveError::IllegalDestination {
                src: Coord::from_str("b1").unwrap(),
                dst: Coord::from_str("d2").unwrap(),
            }))
        );
        assert_eq!(game, before);
        assert_eq!(game.pop(), None);
        assert_eq!(game, before);
    }

    #[test]
    fn test_replay() {
        let game = Game::from_moves(moves(&FOOLS_MATE)).unwrap();
        assert!(game.is_finished());
        assert_eq!(game.moves().collect::<Vec<_>>(), moves(&FOOLS_MATE));

        let err = Game::from_moves(moves(&[("e2", "e4"), ("e7", "e5"), ("e4", "e5")])).unwrap_err();
        assert_eq!(err.pos, 2);
        assert_eq!(
            err.to_string(),
            "cannot apply move #3: bad move: piece at e4 cannot move to e5"
        );

        let mut game = Game::from_moves(moves(&FOOLS_MATE)).unwrap();
        game.reset();
        assert_eq!(game, Game::new());
        assert!(game.is_empty());
    }

    #[test]
    fn test_fen() {
        let mut game = Game::new();
        assert_eq!(
            game.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
        game.push(mv("e2", "e4")).unwrap();
        assert_eq!(
            game.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        game.push(mv("g8", "f6")).unwrap();
        assert_eq!(
            game.fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
        game.push(mv("e1", "e2")).unwrap();
        assert_eq!(
            game.fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 2 2"
        );
        game.push(mv("h8", "g8")).unwrap();
        assert_eq!(
            game.fen(),
            "rnbqkbr1/pppppppp/5n2/8/4P3/8/PPPPKPPP/RNBQ1BNR w q - 3 3"
        );
        game.pop();
        game.pop();
        assert_eq!(
            game.fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
    }

    #[test]
    fn test_black_first() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/4K3").unwrap();
        let mut game = Game::from_board(board, Color::Black).unwrap();
        assert_eq!(game.fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
        game.push(mv("e8", "d8")).unwrap();
        assert_eq!(game.fen(), "3k4/8/8/8/8/8/8/4K3 w - - 1 2");
    }

    #[test]
    fn test_stalemate() {
        let board = Board::from_placement("7k/8/6K1/8/8/8/8/5Q2").unwrap();
        let mut game = Game::from_board(board, Color::White).unwrap();
        game.push(mv("f1", "f7")).unwrap();
        assert_eq!(game.outcome(), Some(Outcome::Stalemate));
        assert_eq!(game.outcome().unwrap().winner(), None);
        assert_eq!(game.push(mv("h8", "h7")), Err(PushError::Finished));
    }

    #[test]
    fn test_setup_errors() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/4R1K1").unwrap();
        assert_eq!(
            Game::from_board(board.clone(), Color::White),
            Err(SetupError::OpponentKingAttacked)
        );
        let mut game = Game::from_board(board, Color::Black).unwrap();
        assert!(game.legal_moves().iter().all(|m| m.src() == Coord::from_str("e8").unwrap()));
        game.push(mv("e8", "d7")).unwrap();
        assert_eq!(game.push(mv("e1", "e8")), Ok(()));
        assert_eq!(game.board().king_pos(Color::Black), Some(Coord::from_str("d7").unwrap()));

        let board = Board::from_placement("8/8/8/8/8/8/8/4R1K1").unwrap();
        assert_eq!(
            Game::from_board(board, Color::White),
            Err(SetupError::NoKing(NoKing(Color::Black)))
        );
        let board = Board::from_placement("4k3/8/8/8/8/8/8/8").unwrap();
        assert_eq!(
            Game::from_board(board, Color::Black),
            Err(SetupError::NoKing(NoKing(Color::White)))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_moves() {
        let game = Game::from_moves(moves(&[("e2", "e4"), ("e7", "e5"), ("g1", "f3")])).unwrap();
        let saved = serde_json::to_string(&game.moves().collect::<Vec<_>>()).unwrap();
        let loaded: Vec<Move> = serde_json::from_str(&saved).unwrap();
        let restored = Game::from_moves(loaded).unwrap();
        assert_eq!(restored.fen(), game.fen());
        assert_eq!(restored, game);
    }
}
