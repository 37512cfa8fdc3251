//! Legal move generation and position management for standard chess and Chess960.
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Overview
//! The crate is built around two central types. [`Position`](struct.Position.html) is a
//! snapshot of the board: piece placement in both mailbox and bitboard form, the side to
//! move, castling rights, the en-passant target and an incrementally maintained Zobrist
//! hash. [`Board`](struct.Board.html) owns a stack of positions and provides
//! [`make_move`](struct.Board.html#method.make_move),
//! [`undo_move`](struct.Board.html#method.undo_move), fully legal move generation, and a
//! [`perft`](struct.Board.html#method.perft) node counter.
//!
//! ```rust
//! use chess::Board;
//!
//! let mut board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//!     .parse().unwrap();
//!
//! let moves = board.moves();
//! assert_eq!(moves.len(), 20);
//!
//! board.make_move(moves[0]);
//! board.undo_move();
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]

use std::ops;
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::convert::TryFrom;

use crate::error::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on, based on the color of the pieces for that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;
}

impl ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color
    ///
    /// # Example
    /// ```
    /// use chess::Color;
    /// assert_eq!(!Color::White, Color::Black);
    /// assert_eq!(!Color::Black, Color::White);
    /// ```
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => 'w'.fmt(f),
            Color::Black => 'b'.fmt(f),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" => Ok(Color::White),
            "b" => Ok(Color::Black),
            _   => Err(ParseColorError),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::White
    }
}

impl TryFrom<usize> for Color {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Color>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Color> for usize {
    fn from(value: Color) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The type of a chess piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// The number of piece types
    pub const COUNT: usize = Piece::King as usize + 1;
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Pawn => "P",
            Piece::Knight => "N",
            Piece::Bishop => "B",
            Piece::Rook => "R",
            Piece::Queen => "Q",
            Piece::King => "K",
        }.fmt(f)
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P"|"p" => Ok(Piece::Pawn),
            "N"|"n" => Ok(Piece::Knight),
            "B"|"b" => Ok(Piece::Bishop),
            "R"|"r" => Ok(Piece::Rook),
            "Q"|"q" => Ok(Piece::Queen),
            "K"|"k" => Ok(Piece::King),
            _       => Err(ParsePieceError),
        }
    }
}

impl TryFrom<usize> for Piece {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Piece>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Piece> for usize {
    fn from(value: Piece) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A piece of a specific color, encoded as `color * 6 + piece`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum ColoredPiece {
    WhitePawn = 0, WhiteKnight = 1, WhiteBishop = 2,
    WhiteRook = 3, WhiteQueen = 4, WhiteKing = 5,
    BlackPawn = 6, BlackKnight = 7, BlackBishop = 8,
    BlackRook = 9, BlackQueen = 10, BlackKing = 11,
}

impl ColoredPiece {
    /// The number of colored piece types
    pub const COUNT: usize = Piece::COUNT * Color::COUNT;

    /// Returns the colored piece of the given color and type
    pub fn new(color: Color, piece: Piece) -> ColoredPiece {
        ColoredPiece::try_from(color as usize * Piece::COUNT + piece as usize)
            .expect("INFALLIBLE")
    }

    /// Returns the piece type, disregarding color
    pub fn piece(self) -> Piece {
        Piece::try_from(self as usize % Piece::COUNT).expect("INFALLIBLE")
    }

    /// Returns the color of the piece
    pub fn color(self) -> Color {
        Color::try_from(self as usize / Piece::COUNT).expect("INFALLIBLE")
    }
}

impl fmt::Display for ColoredPiece {
    /// Formats the piece as its FEN letter: uppercase for white, lowercase for black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.piece().to_string();
        match self.color() {
            Color::White => s.fmt(f),
            Color::Black => s.to_lowercase().fmt(f),
        }
    }
}

impl FromStr for ColoredPiece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let piece: Piece = s.parse()?;
        let color = match s.chars().next() {
            Some(c) if c.is_uppercase() => Color::White,
            Some(_) => Color::Black,
            None => return Err(ParsePieceError),
        };

        Ok(ColoredPiece::new(color, piece))
    }
}

impl TryFrom<usize> for ColoredPiece {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, ColoredPiece>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<ColoredPiece> for usize {
    fn from(value: ColoredPiece) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, labeled from left to right from `White`'s perspective as
/// `A` through `H`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum File {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl File {
    /// The number of files
    pub const COUNT: usize = File::H as usize + 1;
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            File::A => "a",
            File::B => "b",
            File::C => "c",
            File::D => "d",
            File::E => "e",
            File::F => "f",
            File::G => "g",
            File::H => "h",
        }.fmt(f)
    }
}

impl FromStr for File {
    type Err = ParseFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a"|"A" => Ok(File::A),
            "b"|"B" => Ok(File::B),
            "c"|"C" => Ok(File::C),
            "d"|"D" => Ok(File::D),
            "e"|"E" => Ok(File::E),
            "f"|"F" => Ok(File::F),
            "g"|"G" => Ok(File::G),
            "h"|"H" => Ok(File::H),
            _       => Err(ParseFileError),
        }
    }
}

impl TryFrom<usize> for File {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, File>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<File> for usize {
    fn from(value: File) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, labeled from nearest to farthest from `White`'s perspective
/// as `R1` through `R8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Rank {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = Rank::R8 as usize + 1;
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::R1 => "1",
            Rank::R2 => "2",
            Rank::R3 => "3",
            Rank::R4 => "4",
            Rank::R5 => "5",
            Rank::R6 => "6",
            Rank::R7 => "7",
            Rank::R8 => "8",
        }.fmt(f)
    }
}

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Rank::R1),
            "2" => Ok(Rank::R2),
            "3" => Ok(Rank::R3),
            "4" => Ok(Rank::R4),
            "5" => Ok(Rank::R5),
            "6" => Ok(Rank::R6),
            "7" => Ok(Rank::R7),
            "8" => Ok(Rank::R8),
            _   => Err(ParseRankError),
        }
    }
}

impl TryFrom<usize> for Rank {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Rank>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Rank> for usize {
    fn from(value: Rank) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board, labeled using the `File` and `Rank` as coordinates.
///
/// Squares are numbered `rank * 8 + file`, so `A1 = 0`, `B1 = 1` and `H8 = 63`. This is also
/// the bit index of the square within a [`Bitboard`](bitboard/struct.Bitboard.html).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Square {
    // discriminants are spelled out so nothing can go wrong when we use transmute later
    A1 =  0, B1 =  1, C1 =  2, D1 =  3, E1 =  4, F1 =  5, G1 =  6, H1 =  7,
    A2 =  8, B2 =  9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}

impl Square {
    /// The number of squares
    pub const COUNT: usize = Square::H8 as usize + 1;

    /// Returns a square from its file and rank
    pub fn from_coord(file: File, rank: Rank) -> Square {
        Square::try_from((rank as usize) * File::COUNT + file as usize).expect("INFALLIBLE")
    }

    /// Returns the square's file
    pub fn file(self) -> File {
        File::try_from((self as usize) % File::COUNT).expect("INFALLIBLE")
    }

    /// Returns the square's rank
    pub fn rank(self) -> Rank {
        Rank::try_from((self as usize) / File::COUNT).expect("INFALLIBLE")
    }

    /// Returns the index of the diagonal (a1 to h8 direction) the square lies on, `0..15`
    pub fn diagonal(self) -> usize {
        7 + self.rank() as usize - self.file() as usize
    }

    /// Returns the index of the anti-diagonal (h1 to a8 direction) the square lies on, `0..15`
    pub fn anti_diagonal(self) -> usize {
        self.rank() as usize + self.file() as usize
    }

    /// Returns the square offset by the given direction.
    ///
    /// The result must remain on the board; moving off of it is a logic error.
    pub fn shift(self, direction: Direction) -> Square {
        Square::try_from((self as i8 + i8::from(direction)) as usize).expect("off the board")
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.file().to_string() + &self.rank().to_string()).fmt(f)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c: Vec<_> = s.chars().collect();
        if c.len() == 2 {
            Ok(Square::from_coord(c[0].to_string().parse()?, c[1].to_string().parse()?))
        } else {
            Err(ParseSquareError)
        }
    }
}

impl TryFrom<usize> for Square {
    type Error = TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if value < Self::COUNT {
            unsafe { Ok(mem::transmute::<u8, Square>(value as u8)) }
        } else {
            Err(TryFromIntError)
        }
    }
}

impl From<Square> for usize {
    fn from(value: Square) -> Self {
        value as Self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A signed offset in square-index space.
///
/// `NORTH` is one rank toward black's side, `EAST` one file toward the h file. Composite
/// directions are sums of the cardinals. The value is what gets added to a square index
/// when a square or bitboard is shifted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Direction(i8);

impl Direction {
    /// One rank up, from white's perspective
    pub const NORTH: Direction = Direction(8);
    /// One file to the right, from white's perspective
    pub const EAST: Direction = Direction(1);
    /// One rank down, from white's perspective
    pub const SOUTH: Direction = Direction(-8);
    /// One file to the left, from white's perspective
    pub const WEST: Direction = Direction(-1);

    /// Diagonally up and to the right
    pub const NORTH_EAST: Direction = Direction(8 + 1);
    /// Diagonally up and to the left
    pub const NORTH_WEST: Direction = Direction(8 - 1);
    /// Diagonally down and to the right
    pub const SOUTH_EAST: Direction = Direction(-8 + 1);
    /// Diagonally down and to the left
    pub const SOUTH_WEST: Direction = Direction(-8 - 1);

    /// The direction a pawn of color `c` advances
    pub fn up(c: Color) -> Direction {
        match c {
            Color::White => Direction::NORTH,
            Color::Black => Direction::SOUTH,
        }
    }

    /// The direction opposite to a pawn advance for color `c`
    pub fn down(c: Color) -> Direction {
        match c {
            Color::White => Direction::SOUTH,
            Color::Black => Direction::NORTH,
        }
    }
}

impl ops::Add for Direction {
    type Output = Direction;

    fn add(self, rhs: Direction) -> Direction {
        Direction(self.0 + rhs.0)
    }
}

impl ops::Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Direction {
        Direction(-self.0)
    }
}

impl From<Direction> for i8 {
    fn from(value: Direction) -> Self {
        value.0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod error;
pub mod bitboard;
pub mod zobrist;
pub mod castling;
mod moves;
mod fen;
mod position;
mod movegen;
mod board;

pub use crate::moves::{Move, MoveFlag, MoveList};
pub use crate::fen::Fen;
pub use crate::position::Position;
pub use crate::board::Board;
pub use crate::zobrist::Zobrist;




#[cfg(test)]
mod direction_tests {
    use super::{Color, Direction};

    #[test]
    fn composites_are_sums_of_cardinals() {
        assert_eq!(Direction::NORTH + Direction::EAST, Direction::NORTH_EAST);
        assert_eq!(Direction::SOUTH + Direction::WEST, Direction::SOUTH_WEST);
        assert_eq!(-Direction::NORTH, Direction::SOUTH);
    }

    #[test]
    fn up_depends_on_color() {
        assert_eq!(Direction::up(Color::White), Direction::NORTH);
        assert_eq!(Direction::up(Color::Black), Direction::SOUTH);
        assert_eq!(Direction::down(Color::White), Direction::SOUTH);
        assert_eq!(Direction::down(Color::Black), Direction::NORTH);
    }
}
