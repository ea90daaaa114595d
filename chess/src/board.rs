//! Board and related things

use crate::moves::{HistoryEntry, Move, MoveList, RookShift};
use crate::piece::Piece;
use crate::squares::SquareSet;
use crate::types::{Color, Coord, File, PieceKind, Rank};
use crate::{geometry, movegen};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
}

/// Error parsing the piece placement (i.e. the first part of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error building [`Board`] from piece placement
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PositionError {
    /// Placement cannot be parsed
    #[error("cannot parse placement: {0}")]
    Placement(#[from] PlacementParseError),
    /// Placement was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Error indicating that a move was rejected
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Source square is empty
    #[error("no piece at {0}")]
    NoPieceAtSource(Coord),
    /// The piece cannot go to the destination square
    #[error("piece at {src} cannot move to {dst}")]
    IllegalDestination { src: Coord, dst: Coord },
}

/// Error returned when undoing a move on a board without history
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
#[error("no moves to undo")]
pub struct NothingToUndo;

/// Error returned by game end queries when the king of the given color is absent
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
#[error("no king of color {0:?}")]
pub struct NoKing(pub Color);

/// Game state for the side to move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The side to move has legal moves
    InProgress,
    /// The side to move is in check and has no legal moves
    Checkmate,
    /// The side to move is not in check and has no legal moves
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Raw chess position
///
/// Raw board contains only the pieces, each of them on its own square. Unlike [`Board`],
/// it has no move history and is not validated, so it's a cheap `Copy` value which can be
/// used to set up positions or to probe moves without touching the original.
///
/// # Example
///
/// ```
/// # use chessrules::{RawBoard, Board, Piece, Color, PieceKind, Coord, File, Rank};
/// #
/// let mut raw = RawBoard::empty();
/// raw.put(Piece::new(Color::White, PieceKind::King, Coord::from_parts(File::B, Rank::R2)));
/// raw.put(Piece::new(Color::Black, PieceKind::King, Coord::from_parts(File::D, Rank::R5)));
///
/// let board: Board = raw.try_into().unwrap();
/// assert_eq!(board.placement(), "8/8/8/3k4/8/8/1K6/8");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    cells: [Option<Piece>; 64],
}

impl RawBoard {
    /// Returns a board without pieces
    #[inline]
    pub const fn empty() -> RawBoard {
        RawBoard { cells: [None; 64] }
    }

    /// Returns a board with the initial position
    pub fn initial() -> RawBoard {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut res = RawBoard::empty();
        for color in [Color::White, Color::Black] {
            let pawn_rank = geometry::pawn_rank(color);
            let home_rank = geometry::home_rank(color);
            for (file, kind) in File::iter().zip(BACK_RANK) {
                res.put(Piece::new(color, PieceKind::Pawn, Coord::from_parts(file, pawn_rank)));
                res.put(Piece::new(color, kind, Coord::from_parts(file, home_rank)));
            }
        }
        res
    }

    /// Parses the piece placement part of FEN
    ///
    /// Does the same as [`RawBoard::from_str`]. Since placement says nothing about the moved
    /// flags, the pieces away from their initial squares are considered moved. For pawns, it
    /// means that they stand not on their initial rank, for kings and rooks, that they stand
    /// not on their initial squares.
    #[inline]
    pub fn from_placement(s: &str) -> Result<RawBoard, PlacementParseError> {
        RawBoard::from_str(s)
    }

    /// Returns the piece standing on `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<&Piece> {
        self.cells[c.index()].as_ref()
    }

    /// Returns the piece standing on the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<&Piece> {
        self.get(Coord::from_parts(file, rank))
    }

    /// Puts `piece` to its square, replacing the piece that stood there
    #[inline]
    pub fn put(&mut self, piece: Piece) {
        self.cells[piece.coord().index()] = Some(piece);
    }

    /// Removes the piece from square `c`, returning it
    #[inline]
    pub fn remove(&mut self, c: Coord) -> Option<Piece> {
        self.cells[c.index()].take()
    }

    /// Iterates over all the pieces on the board
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }

    /// Iterates over all the pieces of color `c`
    pub fn pieces_of(&self, c: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |p| p.color() == c)
    }

    /// Returns the set of all occupied squares
    pub fn occupied(&self) -> SquareSet {
        self.pieces().map(Piece::coord).collect()
    }

    /// Returns the set of squares occupied by the pieces of color `c`
    pub fn occupied_by(&self, c: Color) -> SquareSet {
        self.pieces_of(c).map(Piece::coord).collect()
    }

    /// Returns the position of the king of color `c`, if any
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        self.pieces_of(c)
            .find(|p| p.kind() == PieceKind::King)
            .map(Piece::coord)
    }

    /// Returns the piece placement in FEN format
    ///
    /// Does the same as `RawBoard::to_string()`.
    #[inline]
    pub fn placement(&self) -> String {
        self.to_string()
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use chessrules::{RawBoard, board::PrettyStyle};
    /// #
    /// let r = RawBoard::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(r.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { raw: self, style }
    }

    /// Makes the move without any validation
    ///
    /// Handles captures and the rook displacement for castling. Returns `None` and
    /// changes nothing if the source square is empty.
    pub(crate) fn make(&mut self, mv: Move) -> Option<HistoryEntry> {
        let (src, dst) = (mv.src(), mv.dst());
        let mut piece = self.remove(src)?;
        let had_moved = piece.has_moved();

        let mut rook = None;
        if piece.kind() == PieceKind::King && src.rank() == dst.rank() {
            if let Some(side) = geometry::castling_side(src.file(), dst.file()) {
                let rook_src = Coord::from_parts(geometry::castling_rook_src(side), src.rank());
                let rook_dst = Coord::from_parts(geometry::castling_rook_dst(side), src.rank());
                if let Some(mut r) = self.remove(rook_src) {
                    let shift = RookShift {
                        src: rook_src,
                        dst: rook_dst,
                        had_moved: r.has_moved(),
                    };
                    r.relocate(rook_dst);
                    self.put(r);
                    rook = Some(shift);
                }
            }
        }

        let captured = self.remove(dst);
        piece.relocate(dst);
        self.put(piece);

        Some(HistoryEntry {
            mv,
            kind: piece.kind(),
            had_moved,
            captured,
            rook,
        })
    }

    /// Takes back the move recorded in `entry`
    ///
    /// `entry` must be the record of the last move made on this board.
    pub(crate) fn unmake(&mut self, entry: &HistoryEntry) {
        let (src, dst) = (entry.mv.src(), entry.mv.dst());
        if let Some(mut piece) = self.remove(dst) {
            piece.restore(src, entry.had_moved);
            self.put(piece);
        }
        if let Some(captured) = entry.captured {
            self.put(captured);
        }
        if let Some(shift) = entry.rook {
            if let Some(mut r) = self.remove(shift.dst) {
                r.restore(shift.src, shift.had_moved);
                self.put(r);
            }
        }
    }
}

impl Default for RawBoard {
    #[inline]
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

/// Chess board with move history
///
/// The board owns the pieces and the stack of applied moves. It is used for every chess
/// operation: generating legal moves, making and undoing moves, detecting check,
/// checkmate and stalemate.
///
/// The board doesn't track whose turn it is. All the queries which depend on it take the
/// side as a parameter, and [`Board::apply_move()`] accepts a legal move of either side.
/// Use [`Game`](crate::game::Game) if you need turns.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    r: RawBoard,
    history: Vec<HistoryEntry>,
}

impl Board {
    /// Returns a board with the initial position
    pub fn initial() -> Board {
        Board {
            r: RawBoard::initial(),
            history: Vec::new(),
        }
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// See [`RawBoard::from_placement()`] for details.
    pub fn from_placement(s: &str) -> Result<Board, PositionError> {
        Board::from_str(s)
    }

    /// Returns a view over the raw board
    #[inline]
    pub fn raw(&self) -> &RawBoard {
        &self.r
    }

    /// Returns the piece standing on `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<&Piece> {
        self.r.get(c)
    }

    /// Returns the piece standing on the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<&Piece> {
        self.r.get2(file, rank)
    }

    #[inline]
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.r.pieces()
    }

    #[inline]
    pub fn pieces_of(&self, c: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.r.pieces_of(c)
    }

    #[inline]
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        self.r.king_pos(c)
    }

    /// Returns the total material value of the pieces of color `c`
    pub fn material(&self, c: Color) -> u32 {
        self.pieces_of(c).map(Piece::value).sum()
    }

    /// Returns the applied moves, from the first one to the last one
    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(HistoryEntry::mv)
    }

    /// Returns `true` if any piece of color `by` attacks `c`
    #[inline]
    pub fn is_square_attacked(&self, c: Coord, by: Color) -> bool {
        movegen::is_square_attacked(&self.r, c, by)
    }

    /// Returns `true` if the king of color `c` is in check
    ///
    /// If there is no such king, returns `false`.
    pub fn is_check(&self, c: Color) -> bool {
        self.king_pos(c)
            .map_or(false, |k| self.is_square_attacked(k, c.inv()))
    }

    /// Returns all the pieces that give check to the king of color `c`
    pub fn checkers(&self, c: Color) -> SquareSet {
        self.king_pos(c)
            .map_or(SquareSet::EMPTY, |k| movegen::attackers(&self.r, k, c.inv()))
    }

    /// Returns the candidate destinations of the piece on `src`
    ///
    /// Candidates may leave the own king under attack. Use [`Board::legal_moves()`] to get
    /// only legal moves. If `src` is empty, returns an empty set.
    pub fn candidate_moves(&self, src: Coord) -> SquareSet {
        self.get(src)
            .map_or(SquareSet::EMPTY, |p| movegen::candidates(&self.r, p))
    }

    /// Returns the legal destinations of the piece on `src`
    ///
    /// Each candidate move is tried on a copy of the position and kept only if the
    /// piece's own king is not attacked afterwards. If the king is absent, all the
    /// candidates are legal. If `src` is empty, returns an empty set.
    pub fn legal_moves(&self, src: Coord) -> SquareSet {
        let piece = match self.get(src) {
            Some(p) => p,
            None => return SquareSet::EMPTY,
        };
        movegen::candidates(&self.r, piece)
            .into_iter()
            .filter(|&dst| self.keeps_king_safe(piece.color(), Move::new(src, dst)))
            .collect()
    }

    fn keeps_king_safe(&self, color: Color, mv: Move) -> bool {
        let mut probe = self.r;
        if probe.make(mv).is_none() {
            return false;
        }
        match probe.king_pos(color) {
            Some(k) => !movegen::is_square_attacked(&probe, k, color.inv()),
            None => true,
        }
    }

    /// Returns `true` if `mv` is legal for the piece standing on its source square
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves(mv.src()).has(mv.dst())
    }

    /// Returns all the legal moves of color `c`
    pub fn all_legal_moves(&self, c: Color) -> MoveList {
        let mut res = MoveList::new();
        for piece in self.pieces_of(c) {
            let src = piece.coord();
            res.extend(self.legal_moves(src).into_iter().map(|dst| Move::new(src, dst)));
        }
        res
    }

    /// Returns `true` if color `c` has at least one legal move
    pub fn has_legal_moves(&self, c: Color) -> bool {
        self.pieces_of(c)
            .any(|p| self.legal_moves(p.coord()).is_nonempty())
    }

    /// Calculates the game status assuming that color `c` is to move
    ///
    /// Fails if there is no king of color `c`.
    pub fn status(&self, c: Color) -> Result<GameStatus, NoKing> {
        let king = self.king_pos(c).ok_or(NoKing(c))?;
        if self.has_legal_moves(c) {
            return Ok(GameStatus::InProgress);
        }
        if self.is_square_attacked(king, c.inv()) {
            Ok(GameStatus::Checkmate)
        } else {
            Ok(GameStatus::Stalemate)
        }
    }

    /// Returns `true` if color `c` is checkmated
    ///
    /// If there is no king of color `c`, returns `false`.
    #[inline]
    pub fn is_checkmate(&self, c: Color) -> bool {
        self.status(c) == Ok(GameStatus::Checkmate)
    }

    /// Returns `true` if color `c` is stalemated
    ///
    /// If there is no king of color `c`, returns `false`.
    #[inline]
    pub fn is_stalemate(&self, c: Color) -> bool {
        self.status(c) == Ok(GameStatus::Stalemate)
    }

    /// Applies the move after checking its legality
    ///
    /// If the move is castling, the rook is moved as well. On error, the board is left
    /// unchanged.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.get(mv.src()).is_none() {
            return Err(MoveError::NoPieceAtSource(mv.src()));
        }
        if !self.is_legal(mv) {
            return Err(MoveError::IllegalDestination {
                src: mv.src(),
                dst: mv.dst(),
            });
        }
        let entry = self
            .r
            .make(mv)
            .ok_or(MoveError::NoPieceAtSource(mv.src()))?;
        self.history.push(entry);
        Ok(())
    }

    /// Takes back the last applied move and returns it
    pub fn undo_move(&mut self) -> Result<Move, NothingToUndo> {
        let entry = self.history.pop().ok_or(NothingToUndo)?;
        self.r.unmake(&entry);
        Ok(entry.mv)
    }

    /// Puts the board to the initial position and clears the history
    pub fn reset(&mut self) {
        self.r = RawBoard::initial();
        self.history.clear();
    }

    /// Returns the piece placement in FEN format
    ///
    /// This is only the first field of FEN, since the board doesn't know the side to move.
    /// See [`Game::fen()`](crate::game::Game::fen) for a complete FEN.
    #[inline]
    pub fn placement(&self) -> String {
        self.r.placement()
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// See docs for [`RawBoard::pretty()`] for more usage details.
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.r.pretty(style)
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::initial()
    }
}

impl TryFrom<RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: RawBoard) -> Result<Board, ValidateError> {
        for color in [Color::White, Color::Black] {
            if raw.pieces_of(color).count() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            let kings = raw
                .pieces_of(color)
                .filter(|p| p.kind() == PieceKind::King)
                .count();
            if kings > 1 {
                return Err(ValidateError::TooManyKings(color));
            }
        }
        Ok(Board {
            r: raw,
            history: Vec::new(),
        })
    }
}

impl TryFrom<&RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: &RawBoard) -> Result<Board, ValidateError> {
        (*raw).try_into()
    }
}

/// Style for [`RawBoard::pretty()`] and [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`RawBoard::pretty()`] for more details.
pub struct Pretty<'a> {
    raw: &'a RawBoard,
    style: PrettyStyle,
}

fn is_on_initial_square(piece: &Piece) -> bool {
    let color = piece.color();
    let c = piece.coord();
    match piece.kind() {
        PieceKind::Pawn => c.rank() == geometry::pawn_rank(color),
        PieceKind::King => c == geometry::king_home(color),
        PieceKind::Rook => {
            c.rank() == geometry::home_rank(color) && matches!(c.file(), File::A | File::H)
        }
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
    }
}

fn parse_cells(s: &str) -> Result<RawBoard, PlacementParseError> {
    type Error = PlacementParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut res = RawBoard::empty();
    for ch in s.chars() {
        match ch {
            '1'..='8' => {
                let add = (ch as u8 - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
            }
            '/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                let kind = PieceKind::from_char(ch).ok_or(Error::UnexpectedChar(ch))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let coord = Coord::from_parts(File::from_index(file), Rank::from_index(rank));
                let piece = Piece::new(color, kind, coord);
                res.put(piece.with_moved(!is_on_initial_square(&piece)));
                file += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(res)
}

impl FromStr for RawBoard {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        parse_cells(s)
    }
}

impl FromStr for Board {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(RawBoard::from_str(s)?.try_into()?)
    }
}

impl Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = match self.get2(file, rank) {
                    Some(p) => p,
                    None => {
                        empty += 1;
                        continue;
                    }
                };
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", piece.as_char())?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.r.fmt(f)
    }
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const EMPTY: char;

    fn piece(p: &Piece) -> char;

    fn fmt(r: &RawBoard, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                let c = r.get2(file, rank).map_or(Self::EMPTY, Self::piece);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const EMPTY: char = '.';

    fn piece(p: &Piece) -> char {
        p.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const EMPTY: char = '.';

    fn piece(p: &Piece) -> char {
        p.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.raw, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.raw, f),
        }
    }
}
