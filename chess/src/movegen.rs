//! Move generation for single pieces
//!
//! This module computes _candidate_ moves, i.e. destinations reachable by the piece
//! according to its movement rules and the board occupancy. Candidate moves may leave
//! the mover's own king under attack; [`Board::legal_moves()`](crate::board::Board::legal_moves)
//! filters such moves out.

use crate::board::RawBoard;
use crate::geometry;
use crate::piece::Piece;
use crate::squares::SquareSet;
use crate::types::{CastlingSide, Color, Coord, File, PieceKind};

type Delta = (isize, isize);

const KNIGHT_DELTAS: [Delta; 8] = [
    (-1, -2),
    (1, -2),
    (-2, -1),
    (2, -1),
    (-2, 1),
    (2, 1),
    (-1, 2),
    (1, 2),
];

const KING_DELTAS: [Delta; 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const DIAG_DIRS: [Delta; 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const LINE_DIRS: [Delta; 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

fn leaps(src: Coord, deltas: &[Delta]) -> SquareSet {
    deltas
        .iter()
        .filter_map(|&(df, dr)| src.try_shift(df, dr))
        .collect()
}

/// Casts a ray from `src` (exclusive) in direction `dir` until the board edge or
/// the first occupied square (inclusive)
pub fn ray(b: &RawBoard, src: Coord, dir: Delta) -> SquareSet {
    let (df, dr) = dir;
    let mut res = SquareSet::EMPTY;
    let mut cur = src;
    while let Some(next) = cur.try_shift(df, dr) {
        res.set(next);
        if b.get(next).is_some() {
            break;
        }
        cur = next;
    }
    res
}

fn rays(b: &RawBoard, src: Coord, dirs: &[Delta]) -> SquareSet {
    dirs.iter()
        .fold(SquareSet::EMPTY, |acc, &dir| acc | ray(b, src, dir))
}

fn pawn_attacks(color: Color, src: Coord) -> SquareSet {
    let fwd = geometry::pawn_forward_delta(color);
    leaps(src, &[(-1, fwd), (1, fwd)])
}

fn pawn_pushes(b: &RawBoard, pawn: &Piece) -> SquareSet {
    let fwd = geometry::pawn_forward_delta(pawn.color());
    let mut res = SquareSet::EMPTY;
    let single = match pawn.coord().try_shift(0, fwd) {
        Some(c) if b.get(c).is_none() => c,
        _ => return res,
    };
    res.set(single);
    if !pawn.has_moved() {
        if let Some(double) = single.try_shift(0, fwd) {
            if b.get(double).is_none() {
                res.set(double);
            }
        }
    }
    res
}

/// Returns the squares attacked by `piece`
///
/// Attacks don't care who stands on the target square: pawns attack both forward
/// diagonals and never the square ahead, sliding pieces attack up to and including
/// the first piece in each direction. Castling is never an attack.
pub fn attacks(b: &RawBoard, piece: &Piece) -> SquareSet {
    let src = piece.coord();
    match piece.kind() {
        PieceKind::Pawn => pawn_attacks(piece.color(), src),
        PieceKind::King => leaps(src, &KING_DELTAS),
        PieceKind::Knight => leaps(src, &KNIGHT_DELTAS),
        PieceKind::Bishop => rays(b, src, &DIAG_DIRS),
        PieceKind::Rook => rays(b, src, &LINE_DIRS),
        PieceKind::Queen => rays(b, src, &DIAG_DIRS) | rays(b, src, &LINE_DIRS),
    }
}

/// Returns `true` if any piece of color `by` attacks `coord`
pub fn is_square_attacked(b: &RawBoard, coord: Coord, by: Color) -> bool {
    b.pieces_of(by).any(|p| attacks(b, p).has(coord))
}

/// Returns the squares of all pieces of color `by` that attack `coord`
pub fn attackers(b: &RawBoard, coord: Coord, by: Color) -> SquareSet {
    b.pieces_of(by)
        .filter(|p| attacks(b, p).has(coord))
        .map(Piece::coord)
        .collect()
}

fn files_between(a: File, b: File) -> impl Iterator<Item = File> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (lo.index() + 1..hi.index()).map(File::from_index)
}

/// Returns `true` if `color` may castle to side `side` in the current position
///
/// Requires an unmoved king on its initial square, an unmoved rook of the same color in
/// the corresponding corner, empty squares between them, and no attack on the squares the
/// king starts from, passes through and lands on.
pub fn can_castle(b: &RawBoard, color: Color, side: CastlingSide) -> bool {
    let rank = geometry::home_rank(color);
    let king_src = Coord::from_parts(geometry::KING_FILE, rank);
    let rook_src = Coord::from_parts(geometry::castling_rook_src(side), rank);

    match b.get(king_src) {
        Some(king) if king.is(color, PieceKind::King) && !king.has_moved() => {}
        _ => return false,
    }
    match b.get(rook_src) {
        Some(rook) if rook.is(color, PieceKind::Rook) && !rook.has_moved() => {}
        _ => return false,
    }

    if files_between(geometry::KING_FILE, rook_src.file())
        .any(|f| b.get(Coord::from_parts(f, rank)).is_some())
    {
        return false;
    }

    let king_dst = geometry::castling_king_dst(side);
    let inv = color.inv();
    files_between(geometry::KING_FILE, king_dst)
        .chain([geometry::KING_FILE, king_dst])
        .all(|f| !is_square_attacked(b, Coord::from_parts(f, rank), inv))
}

fn castlings(b: &RawBoard, king: &Piece) -> SquareSet {
    let color = king.color();
    let rank = geometry::home_rank(color);
    if king.has_moved() || king.coord() != Coord::from_parts(geometry::KING_FILE, rank) {
        return SquareSet::EMPTY;
    }
    [CastlingSide::King, CastlingSide::Queen]
        .into_iter()
        .filter(|&side| can_castle(b, color, side))
        .map(|side| Coord::from_parts(geometry::castling_king_dst(side), rank))
        .collect()
}

/// Returns the candidate destinations of `piece`
///
/// The result never contains a square occupied by a piece of the same color, but may
/// contain squares with opponent's pieces.
pub fn candidates(b: &RawBoard, piece: &Piece) -> SquareSet {
    let own = b.occupied_by(piece.color());
    match piece.kind() {
        PieceKind::Pawn => {
            let enemy = b.occupied_by(piece.color().inv());
            pawn_pushes(b, piece) | (pawn_attacks(piece.color(), piece.coord()) & enemy)
        }
        PieceKind::King => (attacks(b, piece) & !own) | castlings(b, piece),
        _ => attacks(b, piece) & !own,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn c(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn set(coords: &[&str]) -> SquareSet {
        coords.iter().map(|s| c(s)).collect()
    }

    fn cands(b: &RawBoard, at: &str) -> SquareSet {
        candidates(b, b.get(c(at)).unwrap())
    }

    #[test]
    fn test_knight() {
        let b = RawBoard::from_placement("8/8/8/8/4N3/8/8/8").unwrap();
        assert_eq!(
            cands(&b, "e4"),
            set(&["d6", "f6", "c5", "g5", "c3", "g3", "d2", "f2"])
        );

        let b = RawBoard::from_placement("8/8/8/8/8/8/2P5/N7").unwrap();
        assert_eq!(cands(&b, "a1"), set(&["b3"]));

        let b = RawBoard::from_placement("8/8/8/8/8/1p6/2p5/N7").unwrap();
        assert_eq!(cands(&b, "a1"), set(&["b3", "c2"]));
    }

    #[test]
    fn test_sliders() {
        let b = RawBoard::from_placement("8/8/8/3p4/8/1P1R2n1/8/8").unwrap();
        assert_eq!(
            cands(&b, "d3"),
            set(&["d4", "d5", "c3", "e3", "f3", "g3", "d2", "d1"])
        );

        let b = RawBoard::from_placement("8/8/8/8/8/2B5/1P6/8").unwrap();
        assert_eq!(
            cands(&b, "c3"),
            set(&["d2", "e1", "b4", "a5", "d4", "e5", "f6", "g7", "h8"])
        );

        let b = RawBoard::from_placement("7k/8/8/8/8/8/8/Q7").unwrap();
        assert_eq!(cands(&b, "a1").len(), 21);
        assert!(cands(&b, "a1").has(c("h8")));
    }

    #[test]
    fn test_pawn() {
        let b = RawBoard::from_placement("8/8/8/8/8/8/4P3/8").unwrap();
        assert_eq!(cands(&b, "e2"), set(&["e3", "e4"]));

        let b = RawBoard::from_placement("8/8/8/8/8/4n3/4P3/8").unwrap();
        assert_eq!(cands(&b, "e2"), SquareSet::EMPTY);

        let b = RawBoard::from_placement("8/8/8/8/4n3/8/4P3/8").unwrap();
        assert_eq!(cands(&b, "e2"), set(&["e3"]));

        let b = RawBoard::from_placement("8/8/8/8/8/3p1N2/4P3/8").unwrap();
        assert_eq!(cands(&b, "e2"), set(&["e3", "e4", "d3"]));

        let b = RawBoard::from_placement("8/4p3/5P2/8/8/8/8/8").unwrap();
        assert_eq!(cands(&b, "e7"), set(&["e6", "e5", "f6"]));

        // Moved pawns make single steps only
        let b = RawBoard::from_placement("8/8/8/8/8/4P3/8/8").unwrap();
        assert_eq!(cands(&b, "e3"), set(&["e4"]));

        // No promotion, a pawn on the last rank is stuck
        let b = RawBoard::from_placement("4P3/8/8/8/8/8/8/8").unwrap();
        assert_eq!(cands(&b, "e8"), SquareSet::EMPTY);
    }

    #[test]
    fn test_attacks() {
        let b = RawBoard::from_placement("8/8/8/8/8/8/4P3/8").unwrap();
        let pawn = b.get(c("e2")).unwrap();
        assert_eq!(attacks(&b, pawn), set(&["d3", "f3"]));
        assert!(is_square_attacked(&b, c("f3"), Color::White));
        assert!(!is_square_attacked(&b, c("e3"), Color::White));
        assert!(!is_square_attacked(&b, c("f3"), Color::Black));

        // Defended pieces are attacked, but are not candidate moves
        let b = RawBoard::from_placement("8/8/8/8/8/8/8/R2B4").unwrap();
        let rook = b.get(c("a1")).unwrap();
        assert!(attacks(&b, rook).has(c("d1")));
        assert!(!candidates(&b, rook).has(c("d1")));
        assert!(!attacks(&b, rook).has(c("e1")));

        let b = RawBoard::from_placement("4k3/8/8/8/1b6/8/8/r3K3").unwrap();
        assert_eq!(attackers(&b, c("e1"), Color::Black), set(&["b4", "a1"]));
        assert_eq!(attackers(&b, c("e2"), Color::Black), SquareSet::EMPTY);
    }

    #[test]
    fn test_attacks_vs_candidates() {
        // Pawn pushes are not attacks, empty diagonals are
        let b = RawBoard::from_placement("8/8/8/8/8/8/4P3/8").unwrap();
        let pawn = b.get(c("e2")).unwrap();
        assert_eq!(candidates(&b, pawn), set(&["e3", "e4"]));
        assert!(!is_square_attacked(&b, c("e3"), Color::White));
        assert!(!is_square_attacked(&b, c("e4"), Color::White));
        assert!(is_square_attacked(&b, c("d3"), Color::White));
        assert!(!candidates(&b, pawn).has(c("d3")));

        // A defended piece is attacked, though it is not a candidate of its defender
        let b = RawBoard::from_placement("8/8/8/8/8/4k3/3n4/4K3").unwrap();
        assert!(is_square_attacked(&b, c("d2"), Color::Black));
        assert!(!cands(&b, "e3").has(c("d2")));
        assert!(cands(&b, "e1").has(c("d2")));
    }

    #[test]
    fn test_king() {
        let b = RawBoard::from_placement("8/8/8/8/8/8/8/7K").unwrap();
        assert_eq!(cands(&b, "h1"), set(&["g1", "g2", "h2"]));

        let b = RawBoard::from_placement("8/8/8/8/8/8/3PPP2/3QK3").unwrap();
        assert_eq!(cands(&b, "e1"), set(&["f1"]));
    }

    #[test]
    fn test_castling() {
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        assert!(can_castle(&b, Color::White, CastlingSide::King));
        assert!(can_castle(&b, Color::White, CastlingSide::Queen));
        assert!(can_castle(&b, Color::Black, CastlingSide::King));
        assert!(can_castle(&b, Color::Black, CastlingSide::Queen));
        assert!(cands(&b, "e1").has(c("g1")));
        assert!(cands(&b, "e1").has(c("c1")));
        assert!(cands(&b, "e8").has(c("g8")));
        assert!(cands(&b, "e8").has(c("c8")));

        // Piece between the king and the rook
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/8/RN2K1NR").unwrap();
        assert!(!can_castle(&b, Color::White, CastlingSide::King));
        assert!(!can_castle(&b, Color::White, CastlingSide::Queen));

        // b1 is not crossed by the king, but it must still be empty
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/8/Rn2K2R").unwrap();
        assert!(!can_castle(&b, Color::White, CastlingSide::Queen));

        // ... while an attack on b1 doesn't matter
        let b = RawBoard::from_placement("1r2k3/8/8/8/8/8/8/R3K3").unwrap();
        assert!(can_castle(&b, Color::White, CastlingSide::Queen));

        // Pawn attacks on the squares crossed by the king
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/4p3/R3K2R").unwrap();
        assert!(!can_castle(&b, Color::White, CastlingSide::King));
        assert!(!can_castle(&b, Color::White, CastlingSide::Queen));

        // Attacked destination only
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/7p/R3K2R").unwrap();
        assert!(!can_castle(&b, Color::White, CastlingSide::King));
        assert!(can_castle(&b, Color::White, CastlingSide::Queen));

        // Wrong rook
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/8/R3K2r").unwrap();
        assert!(!can_castle(&b, Color::White, CastlingSide::King));
        let b = RawBoard::from_placement("r3k2r/8/8/8/8/8/8/R3K2B").unwrap();
        assert!(!can_castle(&b, Color::White, CastlingSide::King));
    }
}
