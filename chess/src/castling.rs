//! Castling rights, castling metadata, and the castling field parser
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! Castling is described in three layers. A [`Dimension`](struct.Dimension.html) is one of
//! the four color-side pairs in which castling can happen. [`Rights`](struct.Rights.html)
//! is the set of dimensions still available in a position. [`Info`](struct.Info.html) is
//! per-game metadata derived from the position encoding: where the rooks actually start
//! (they vary in Chess960), which squares must be empty and which must be safe for each
//! dimension, and which rights to strip when a move touches a given square.
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use crate::bitboard::{between2, between12, Bitboard};
use crate::error::ParseFenError;
use crate::{Color, File, Rank, Square};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The side of the board a king castles toward: the h file or the a file.
///
/// In standard chess these are the king side and queen side, but in Chess960 the king may
/// start on either half of the board, so the rook's file is the stable way to name them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Side {
    H = 0,
    A = 1,
}

impl Side {
    /// The number of castling sides
    pub const COUNT: usize = 2;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A color and side pair; one of the four ways castling can happen on a board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dimension(u8);

impl Dimension {
    /// The number of castling dimensions
    pub const COUNT: usize = Side::COUNT * Color::COUNT;

    /// White castling toward the h file
    pub const WHITE_H: Dimension = Dimension(0);
    /// White castling toward the a file
    pub const WHITE_A: Dimension = Dimension(1);
    /// Black castling toward the h file
    pub const BLACK_H: Dimension = Dimension(2);
    /// Black castling toward the a file
    pub const BLACK_A: Dimension = Dimension(3);

    /// Returns the dimension for the given color and side
    pub fn new(color: Color, side: Side) -> Dimension {
        Dimension(color as u8 * Side::COUNT as u8 + side as u8)
    }

    /// Returns the color castling in this dimension
    pub fn color(self) -> Color {
        match self.0 / Side::COUNT as u8 {
            0 => Color::White,
            _ => Color::Black,
        }
    }

    /// Returns the side being castled toward
    pub fn side(self) -> Side {
        match self.0 % Side::COUNT as u8 {
            0 => Side::H,
            _ => Side::A,
        }
    }
}

impl From<Dimension> for usize {
    fn from(dim: Dimension) -> usize {
        dim.0 as usize
    }
}

/// Returns the squares the king and rook land on after castling in `dim`.
///
/// The destinations are fixed for both standard chess and Chess960: the king always ends
/// on the c or g file and the rook beside it on the d or f file, on the castling color's
/// back rank.
pub fn end_squares(dim: Dimension) -> (Square, Square) {
    let rank = match dim.color() {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    };

    let (king_file, rook_file) = match dim.side() {
        Side::H => (File::G, File::F),
        Side::A => (File::C, File::D),
    };

    (Square::from_coord(king_file, rank), Square::from_coord(rook_file, rank))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of castling dimensions, stored as four bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rights(u8);

impl Rights {
    /// The empty set of rights
    pub const NONE: Rights = Rights(0);
    /// White's right to castle toward the h file
    pub const WHITE_H: Rights = Rights(1 << 0);
    /// White's right to castle toward the a file
    pub const WHITE_A: Rights = Rights(1 << 1);
    /// Black's right to castle toward the h file
    pub const BLACK_H: Rights = Rights(1 << 2);
    /// Black's right to castle toward the a file
    pub const BLACK_A: Rights = Rights(1 << 3);
    /// Both of white's rights
    pub const WHITE: Rights = Rights(0b0011);
    /// Both of black's rights
    pub const BLACK: Rights = Rights(0b1100);
    /// All four rights
    pub const ALL: Rights = Rights(0b1111);

    /// Returns `true` if the right for the given dimension is in the set
    pub fn has(self, dim: Dimension) -> bool {
        self.0 & Rights::from(dim).0 != 0
    }

    /// Returns `true` if every right of `subset` is in the set
    pub fn contains(self, subset: Rights) -> bool {
        self.0 & subset.0 == subset.0
    }

    /// Returns `true` if the set is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Dimension> for Rights {
    fn from(dim: Dimension) -> Rights {
        Rights(1 << dim.0)
    }
}

impl From<Rights> for u8 {
    fn from(rights: Rights) -> u8 {
        rights.0
    }
}

impl std::ops::Add for Rights {
    type Output = Rights;

    /// Set union
    fn add(self, rhs: Rights) -> Rights {
        Rights(self.0 | rhs.0)
    }
}

impl std::ops::AddAssign for Rights {
    fn add_assign(&mut self, rhs: Rights) {
        self.0 |= rhs.0;
    }
}

impl std::ops::Sub for Rights {
    type Output = Rights;

    /// Set difference
    fn sub(self, rhs: Rights) -> Rights {
        Rights(self.0 & !rhs.0)
    }
}

impl std::ops::SubAssign for Rights {
    fn sub_assign(&mut self, rhs: Rights) {
        self.0 &= !rhs.0;
    }
}

impl std::ops::BitAnd for Rights {
    type Output = Rights;

    /// Set intersection
    fn bitand(self, rhs: Rights) -> Rights {
        Rights(self.0 & rhs.0)
    }
}

impl fmt::Display for Rights {
    /// Writes the rights in FEN letters, or `-` for the empty set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return '-'.fmt(f);
        }

        if self.has(Dimension::WHITE_H) { 'K'.fmt(f)?; }
        if self.has(Dimension::WHITE_A) { 'Q'.fmt(f)?; }
        if self.has(Dimension::BLACK_H) { 'k'.fmt(f)?; }
        if self.has(Dimension::BLACK_A) { 'q'.fmt(f)?; }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Castling metadata for one game, immutable once parsed.
///
/// For each dimension the `Info` records where the rook starts, which squares must be
/// empty (the king's and rook's paths, minus the two pieces themselves), and which squares
/// must not be attacked (every square the king starts on, traverses or lands on). It also
/// holds a
/// 64-entry table of the rights to strip when a move touches a given square, so rights
/// maintenance during move making is two table lookups.
#[derive(Debug, Copy, Clone)]
pub struct Info {
    chess960: bool,
    rooks: [Square; Dimension::COUNT],
    blocker_masks: [Bitboard; Dimension::COUNT],
    attack_masks: [Bitboard; Dimension::COUNT],
    masks: [Rights; Square::COUNT],
}

impl Info {
    /// Returns the metadata of a standard chess game: kings on e1/e8, rooks on the
    /// h and a files.
    pub fn standard() -> Info {
        Info::new(Square::E1, File::H, File::A, Square::E8, File::H, File::A, false)
    }

    /// Parses the castling field of a position encoding.
    ///
    /// Accepts `-`, the standard letters `KQkq`, and Shredder-FEN file letters `A..H`
    /// (white) and `a..h` (black). A file letter names the castling rook's file; which
    /// side it belongs to follows from its position relative to the king. The board is in
    /// Chess960 mode whenever the first character is not one of `KQkq`.
    pub fn parse(field: &str, white_king: Square, black_king: Square)
        -> Result<(Info, Rights), ParseFenError>
    {
        if field == "-" {
            // rook positions are inconsequential without rights; assume standard
            return Ok((Info::standard(), Rights::NONE));
        }

        if field.is_empty() || field.len() > Dimension::COUNT {
            return Err(ParseFenError::UnknownCastlingChar);
        }

        let chess960 = !field.starts_with(|c| "KQkq".contains(c));

        let mut rights = Rights::NONE;

        // rook files default to those of standard chess
        let mut white_h = File::H;
        let mut white_a = File::A;
        let mut black_h = File::H;
        let mut black_a = File::A;

        for right in field.chars() {
            if chess960 {
                match right {
                    'a'..='h' => {
                        let file: File = right.to_string().parse().expect("INFALLIBLE");
                        if file > black_king.file() {
                            black_h = file;
                            rights += Rights::BLACK_H;
                        } else {
                            black_a = file;
                            rights += Rights::BLACK_A;
                        }
                    }
                    'A'..='H' => {
                        let file: File = right.to_ascii_lowercase().to_string().parse()
                            .expect("INFALLIBLE");
                        if file > white_king.file() {
                            white_h = file;
                            rights += Rights::WHITE_H;
                        } else {
                            white_a = file;
                            rights += Rights::WHITE_A;
                        }
                    }
                    _ => return Err(ParseFenError::UnknownCastlingChar),
                }
            } else {
                match right {
                    'K' => rights += Rights::WHITE_H,
                    'Q' => rights += Rights::WHITE_A,
                    'k' => rights += Rights::BLACK_H,
                    'q' => rights += Rights::BLACK_A,
                    _ => return Err(ParseFenError::UnknownCastlingChar),
                }
            }
        }

        Ok((
            Info::new(white_king, white_h, white_a, black_king, black_h, black_a, chess960),
            rights,
        ))
    }

    fn new(
        white_king: Square, white_h_file: File, white_a_file: File,
        black_king: Square, black_h_file: File, black_a_file: File,
        chess960: bool,
    ) -> Info {
        let white_rook_h = Square::from_coord(white_h_file, Rank::R1);
        let white_rook_a = Square::from_coord(white_a_file, Rank::R1);
        let black_rook_h = Square::from_coord(black_h_file, Rank::R8);
        let black_rook_a = Square::from_coord(black_a_file, Rank::R8);

        let rooks = [white_rook_h, white_rook_a, black_rook_h, black_rook_a];
        let kings = [white_king, white_king, black_king, black_king];

        // The king's path to its end square and the rook's path to its end square must
        // both be empty, except for the castling king and rook themselves.
        let blocker_mask = |dim: usize| {
            let (king_end, rook_end) = end_squares(Dimension(dim as u8));
            (between2(kings[dim], king_end) | between2(rooks[dim], rook_end))
                - (Bitboard::from(kings[dim]) | rooks[dim].into())
        };

        // Every square the king starts on, traverses or lands on must be safe.
        let attack_mask = |dim: usize| {
            let (king_end, _) = end_squares(Dimension(dim as u8));
            between12(kings[dim], king_end)
        };

        let blocker_masks = [blocker_mask(0), blocker_mask(1), blocker_mask(2), blocker_mask(3)];
        let attack_masks = [attack_mask(0), attack_mask(1), attack_mask(2), attack_mask(3)];

        let mut masks = [Rights::NONE; Square::COUNT];

        // moves to or from a rook square mean the rook moved or was captured
        masks[white_rook_h as usize] = Rights::WHITE_H;
        masks[white_rook_a as usize] = Rights::WHITE_A;
        masks[black_rook_h as usize] = Rights::BLACK_H;
        masks[black_rook_a as usize] = Rights::BLACK_A;

        // moves from a king square lose both of that color's rights
        masks[white_king as usize] = Rights::WHITE;
        masks[black_king as usize] = Rights::BLACK;

        Info { chess960, rooks, blocker_masks, attack_masks, masks }
    }

    /// Returns the rights to strip for any move touching the given square
    pub fn mask(&self, sq: Square) -> Rights {
        self.masks[sq as usize]
    }

    /// Returns the starting square of the castling rook for the given dimension
    pub fn rook(&self, dim: Dimension) -> Square {
        self.rooks[usize::from(dim)]
    }

    /// Returns the squares which must be empty for castling in the given dimension
    pub fn blocker_mask(&self, dim: Dimension) -> Bitboard {
        self.blocker_masks[usize::from(dim)]
    }

    /// Returns the squares which must be safe for castling in the given dimension
    pub fn attack_mask(&self, dim: Dimension) -> Bitboard {
        self.attack_masks[usize::from(dim)]
    }

    /// Returns `true` if the position encoding used Chess960 castling notation
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square::*;

    #[test]
    fn dimensions_pair_color_and_side() {
        assert_eq!(Dimension::new(Color::White, Side::H), Dimension::WHITE_H);
        assert_eq!(Dimension::new(Color::Black, Side::A), Dimension::BLACK_A);
        assert_eq!(Dimension::BLACK_H.color(), Color::Black);
        assert_eq!(Dimension::BLACK_H.side(), Side::H);
    }

    #[test]
    fn end_squares_are_fixed() {
        assert_eq!(end_squares(Dimension::WHITE_H), (G1, F1));
        assert_eq!(end_squares(Dimension::WHITE_A), (C1, D1));
        assert_eq!(end_squares(Dimension::BLACK_H), (G8, F8));
        assert_eq!(end_squares(Dimension::BLACK_A), (C8, D8));
    }

    #[test]
    fn rights_are_a_bitset() {
        let mut rights = Rights::WHITE_H + Rights::BLACK_A;
        assert!(rights.has(Dimension::WHITE_H));
        assert!(!rights.has(Dimension::WHITE_A));
        assert!(rights.contains(Rights::WHITE_H));
        assert!(!rights.contains(Rights::WHITE));

        rights -= Rights::WHITE_H;
        assert_eq!(rights, Rights::BLACK_A);
        assert_eq!(Rights::ALL - Rights::WHITE, Rights::BLACK);
        assert_eq!(Rights::ALL & Rights::BLACK, Rights::BLACK);
    }

    #[test]
    fn rights_display_in_fen_letters() {
        assert_eq!(Rights::ALL.to_string(), "KQkq");
        assert_eq!((Rights::WHITE_H + Rights::BLACK_A).to_string(), "Kq");
        assert_eq!(Rights::NONE.to_string(), "-");
    }

    #[test]
    fn parse_dash_gives_no_rights() {
        let (info, rights) = Info::parse("-", E1, E8).unwrap();
        assert_eq!(rights, Rights::NONE);
        assert!(!info.is_chess960());
    }

    #[test]
    fn parse_standard_letters() {
        let (info, rights) = Info::parse("KQkq", E1, E8).unwrap();

        assert_eq!(rights, Rights::ALL);
        assert!(!info.is_chess960());
        assert_eq!(info.rook(Dimension::WHITE_H), H1);
        assert_eq!(info.rook(Dimension::WHITE_A), A1);
        assert_eq!(info.rook(Dimension::BLACK_H), H8);
        assert_eq!(info.rook(Dimension::BLACK_A), A8);
    }

    #[test]
    fn parse_shredder_files() {
        // kings on e1/e8 with rooks on their standard files
        let (info, rights) = Info::parse("HAha", E1, E8).unwrap();

        assert_eq!(rights, Rights::ALL);
        assert!(info.is_chess960());
        assert_eq!(info.rook(Dimension::WHITE_H), H1);
        assert_eq!(info.rook(Dimension::WHITE_A), A1);
    }

    #[test]
    fn parse_shredder_sides_follow_the_king() {
        // kings on c1/c8; the b-file rooks are on the a side, the d-file rooks on the h side
        let (info, rights) = Info::parse("BDbd", C1, C8).unwrap();

        assert_eq!(rights, Rights::ALL);
        assert!(info.is_chess960());
        assert_eq!(info.rook(Dimension::WHITE_A), B1);
        assert_eq!(info.rook(Dimension::WHITE_H), D1);
        assert_eq!(info.rook(Dimension::BLACK_A), B8);
        assert_eq!(info.rook(Dimension::BLACK_H), D8);
    }

    #[test]
    fn parse_rejects_unknown_characters() {
        assert!(Info::parse("KX", E1, E8).is_err());
        assert!(Info::parse("Kx", E1, E8).is_err());
        assert!(Info::parse("", E1, E8).is_err());
        assert!(Info::parse("KQkqK", E1, E8).is_err());
    }

    #[test]
    fn standard_masks_cover_king_and_rook_squares() {
        let (info, _) = Info::parse("KQkq", E1, E8).unwrap();

        assert_eq!(info.mask(E1), Rights::WHITE);
        assert_eq!(info.mask(H1), Rights::WHITE_H);
        assert_eq!(info.mask(A1), Rights::WHITE_A);
        assert_eq!(info.mask(E8), Rights::BLACK);
        assert_eq!(info.mask(H8), Rights::BLACK_H);
        assert_eq!(info.mask(A8), Rights::BLACK_A);
        assert_eq!(info.mask(E4), Rights::NONE);
    }

    #[test]
    fn standard_blocker_and_attack_masks() {
        let (info, _) = Info::parse("KQkq", E1, E8).unwrap();

        // white h side: f1 and g1 must be empty; e1, f1 and g1 must be safe
        assert_eq!(
            info.blocker_mask(Dimension::WHITE_H),
            Bitboard::from(F1) | G1.into()
        );
        assert_eq!(
            info.attack_mask(Dimension::WHITE_H),
            Bitboard::from(E1) | F1.into() | G1.into()
        );

        // white a side: b1, c1 and d1 must be empty; e1, d1 and c1 must be safe
        assert_eq!(
            info.blocker_mask(Dimension::WHITE_A),
            Bitboard::from(B1) | C1.into() | D1.into()
        );
        assert_eq!(
            info.attack_mask(Dimension::WHITE_A),
            Bitboard::from(C1) | D1.into() | E1.into()
        );
    }
}
