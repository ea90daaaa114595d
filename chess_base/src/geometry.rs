use crate::types::{CastlingSide, Color, Coord, File, Rank};

/// File of both kings in the initial position
pub const KING_FILE: File = File::E;

/// Rank where pieces of color `c` stand in the initial position
pub const fn home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Square of the king of color `c` in the initial position
pub const fn king_home(c: Color) -> Coord {
    Coord::from_parts(KING_FILE, home_rank(c))
}

/// Rank where pawns of color `c` stand in the initial position
pub const fn pawn_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Change of rank index after a single pawn step
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const fn castling_rook_src(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    }
}

pub const fn castling_rook_dst(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    }
}

pub const fn castling_king_dst(s: CastlingSide) -> File {
    match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    }
}

/// Returns the castling side if a king moving from `src` to `dst` along one rank
/// jumps over two files
pub const fn castling_side(src: File, dst: File) -> Option<CastlingSide> {
    match dst as isize - src as isize {
        2 => Some(CastlingSide::King),
        -2 => Some(CastlingSide::Queen),
        _ => None,
    }
}
