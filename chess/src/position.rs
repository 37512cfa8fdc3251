//! Contains the board state representation
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fmt;
use crate::bitboard::{self, Bitboard};
use crate::castling;
use crate::fen::Fen;
use crate::zobrist::Zobrist;
use crate::{Color, ColoredPiece, File, Piece, Rank, Square};

use crate::Color::*;
use crate::Piece::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A snapshot of the board at one point in a game.
///
/// The piece placement is kept in three redundant forms that are always consistent: a
/// 64-entry mailbox for square lookups, one bitboard per piece type covering both colors,
/// and one bitboard per color. Alongside the placement the position stores the side to
/// move, castling rights, the en-passant target, the half-move draw clock, the set of
/// pieces giving check, and a Zobrist hash that is maintained incrementally by every
/// mutation.
///
/// `Position` is a plain value; [`Board`](struct.Board.html) copies it on every move, so
/// undoing a move is simply dropping the copy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) mailbox: [Option<ColoredPiece>; Square::COUNT],
    pub(crate) piece_bbs: [Bitboard; Piece::COUNT],
    pub(crate) color_bbs: [Bitboard; Color::COUNT],

    pub(crate) hash: Zobrist,

    pub(crate) checkers: Bitboard,
    pub(crate) check_num: u8,

    pub(crate) rights: castling::Rights,
    pub(crate) side_to_move: Color,
    pub(crate) ep_target: Option<Square>,
    pub(crate) draw_clock: u16,
}

impl Position {
    /// Builds a position from a parsed position encoding.
    pub fn from_fen(fen: &Fen) -> Position {
        let mut pos = Position {
            mailbox: [None; Square::COUNT],
            piece_bbs: [Bitboard::EMPTY; Piece::COUNT],
            color_bbs: [Bitboard::EMPTY; Color::COUNT],
            hash: Zobrist::NONE,
            checkers: Bitboard::EMPTY,
            check_num: 0,
            rights: fen.castling_rights,
            side_to_move: fen.side_to_move,
            ep_target: fen.ep_target,
            draw_clock: fen.draw_clock,
        };

        if pos.side_to_move == Black {
            pos.hash += Zobrist::SIDE_TO_MOVE;
        }
        if let Some(ep) = pos.ep_target {
            pos.hash += Zobrist::ep_key(ep);
        }
        pos.hash += Zobrist::castling_key(pos.rights);

        for sq in 0..Square::COUNT {
            if let Some(piece) = fen.mailbox[sq] {
                pos.insert(Square::try_from(sq).expect("INFALLIBLE"), piece);
            }
        }

        pos.generate_checkers();

        pos
    }

    /// Returns the color whose turn it is
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the en-passant target square, if any
    pub fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }

    /// Returns the castling rights still available
    pub fn rights(&self) -> castling::Rights {
        self.rights
    }

    /// Returns the number of half-moves since the last pawn move or capture
    pub fn draw_clock(&self) -> u16 {
        self.draw_clock
    }

    /// Returns the position's Zobrist hash
    pub fn hash(&self) -> Zobrist {
        self.hash
    }

    /// Returns the enemy pieces attacking the side to move's king
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    /// Returns the number of pieces giving check: 0, 1 or 2
    pub fn check_num(&self) -> u8 {
        self.check_num
    }

    /// Returns `true` if the side to move is in check
    pub fn in_check(&self) -> bool {
        self.check_num > 0
    }

    /// Returns a bitboard of all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.color_bbs[White as usize] | self.color_bbs[Black as usize]
    }

    /// Returns a bitboard of the squares occupied by the given color
    pub fn occupied_by(&self, c: Color) -> Bitboard {
        self.color_bbs[c as usize]
    }

    /// Returns a bitboard of the squares occupied by the given piece type, of both colors
    pub fn pieces(&self, p: Piece) -> Bitboard {
        self.piece_bbs[p as usize]
    }

    /// Returns the piece standing on the given square, if any
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.mailbox[sq as usize]
    }

    /// Returns the square of the given color's king
    pub fn king(&self, c: Color) -> Square {
        (self.pieces(King) & self.occupied_by(c)).lsb().expect("INFALLIBLE")
    }

    /// Places a piece on an empty square, keeping all representations and the hash
    /// consistent.
    pub(crate) fn insert(&mut self, sq: Square, piece: ColoredPiece) {
        debug_assert!(self.mailbox[sq as usize].is_none());

        self.mailbox[sq as usize] = Some(piece);
        self.piece_bbs[piece.piece() as usize].toggle(sq);
        self.color_bbs[piece.color() as usize].toggle(sq);

        self.hash += Zobrist::piece_key(piece, sq);
    }

    /// Removes the piece standing on a square, keeping all representations and the hash
    /// consistent.
    pub(crate) fn remove(&mut self, sq: Square) {
        let piece = self.mailbox[sq as usize].expect("no piece to remove");

        self.mailbox[sq as usize] = None;
        self.piece_bbs[piece.piece() as usize].toggle(sq);
        self.color_bbs[piece.color() as usize].toggle(sq);

        self.hash -= Zobrist::piece_key(piece, sq);
    }

    /// Returns `true` if any piece of color `by` attacks `sq`, with `blockers` as the
    /// occupancy seen by sliding pieces.
    ///
    /// Passing an occupancy with the defending king removed lets callers test the squares
    /// a king could flee to, since the king cannot block a slider's ray against itself.
    pub fn attacked(&self, by: Color, sq: Square, blockers: Bitboard) -> bool {
        let attackers = self.occupied_by(by);

        // a pawn of the attacked color on `sq` would attack exactly the squares from
        // which enemy pawns attack `sq`
        let attacking_pawns = self.pieces(Pawn) & attackers;
        if attacking_pawns.intersects(bitboard::pawn_attacks(!by, sq)) {
            return true;
        }

        let attacking_knights = self.pieces(Knight) & attackers;
        if attacking_knights.intersects(bitboard::knight_attacks(sq)) {
            return true;
        }

        let queens = self.pieces(Queen);

        let attacking_bishops = (self.pieces(Bishop) | queens) & attackers;
        if attacking_bishops.intersects(bitboard::bishop_attacks(sq, blockers)) {
            return true;
        }

        let attacking_rooks = (self.pieces(Rook) | queens) & attackers;
        if attacking_rooks.intersects(bitboard::rook_attacks(sq, blockers)) {
            return true;
        }

        let attacking_king = self.pieces(King) & attackers;
        if attacking_king.intersects(bitboard::king_attacks(sq)) {
            return true;
        }

        false
    }

    /// Returns `true` if any square of `targets` is attacked by color `by`
    pub fn attacked_any(&self, by: Color, targets: Bitboard, blockers: Bitboard) -> bool {
        targets.into_iter().any(|sq| self.attacked(by, sq, blockers))
    }

    /// Regenerates the checker bitboard and check count for the side to move.
    ///
    /// Treats the king as a super-piece: pieces that fall inside one of the king's own
    /// attack ranges with a matching move type are the ones giving check.
    pub(crate) fn generate_checkers(&mut self) {
        let friends = self.occupied_by(self.side_to_move);
        let enemies = self.occupied_by(!self.side_to_move);
        let occupied = friends | enemies;

        let king = self.king(self.side_to_move);

        let p = self.pieces(Pawn);
        let n = self.pieces(Knight);
        let b = self.pieces(Bishop);
        let r = self.pieces(Rook);
        let q = self.pieces(Queen);

        let checking_p = p & bitboard::pawn_attacks(self.side_to_move, king);
        let checking_n = n & bitboard::knight_attacks(king);
        let checking_d = (b | q) & bitboard::bishop_attacks(king, occupied);
        let checking_l = (r | q) & bitboard::rook_attacks(king, occupied);

        self.checkers = (checking_p | checking_n | checking_d | checking_l) & enemies;
        self.check_num = self.checkers.len() as u8;
    }

    /// Computes the position's Zobrist hash from scratch.
    ///
    /// The result always equals the incrementally maintained [`hash`](#method.hash);
    /// move making asserts this in debug builds.
    pub fn zobrist_hash(&self) -> Zobrist {
        let mut hash = Zobrist::NONE;

        if self.side_to_move == Black {
            hash += Zobrist::SIDE_TO_MOVE;
        }
        if let Some(ep) = self.ep_target {
            hash += Zobrist::ep_key(ep);
        }
        hash += Zobrist::castling_key(self.rights);

        for sq in 0..Square::COUNT {
            if let Some(piece) = self.mailbox[sq] {
                hash += Zobrist::piece_key(piece, Square::try_from(sq).expect("INFALLIBLE"));
            }
        }

        hash
    }
}

impl fmt::Display for Position {
    /// Writes the position as an ASCII grid, rank 8 first, with rank labels on the right
    /// and a file legend underneath.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+---+---+---+---+---+---+---+---+")?;

        for rank in (0..Rank::COUNT).rev() {
            write!(f, "| ")?;

            for file in 0..File::COUNT {
                let sq = Square::try_from(rank * File::COUNT + file).expect("INFALLIBLE");
                match self.piece_at(sq) {
                    Some(piece) => write!(f, "{} | ", piece)?,
                    None => write!(f, "- | ")?,
                }
            }

            writeln!(f, "{}", Rank::try_from(rank).expect("INFALLIBLE"))?;
            writeln!(f, "+---+---+---+---+---+---+---+---+")?;
        }

        writeln!(f, "  a   b   c   d   e   f   g   h")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square::*;

    const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn position(fen: &str) -> Position {
        Position::from_fen(&fen.parse().expect("valid fen"))
    }

    #[test]
    fn representations_agree_after_construction() {
        let pos = position(STARTPOS);

        assert_eq!(pos.occupied().len(), 32);
        assert_eq!(pos.occupied_by(White).len(), 16);
        assert_eq!(pos.occupied_by(Black).len(), 16);
        assert_eq!(pos.pieces(Pawn).len(), 16);
        assert_eq!(pos.pieces(King).len(), 2);

        for sq in 0..Square::COUNT {
            let sq = Square::try_from(sq).unwrap();
            match pos.piece_at(sq) {
                Some(piece) => {
                    assert!(pos.pieces(piece.piece()).contains(sq));
                    assert!(pos.occupied_by(piece.color()).contains(sq));
                }
                None => assert!(!pos.occupied().contains(sq)),
            }
        }
    }

    #[test]
    fn incremental_hash_matches_full_recompute() {
        for fen in &[
            STARTPOS,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            let pos = position(fen);
            assert_eq!(pos.hash(), pos.zobrist_hash());
        }
    }

    #[test]
    fn hash_depends_on_side_ep_and_rights() {
        let base = position("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let black = position("4k3/8/8/8/8/8/8/R3K2R b KQ - 0 1");
        let fewer = position("4k3/8/8/8/8/8/8/R3K2R w K - 0 1");

        assert_ne!(base.hash(), black.hash());
        assert_ne!(base.hash(), fewer.hash());
    }

    #[test]
    fn insert_and_remove_are_inverses() {
        let mut pos = position(STARTPOS);
        let before = pos;

        pos.remove(E2);
        assert_eq!(pos.piece_at(E2), None);
        assert!(!pos.pieces(Pawn).contains(E2));

        pos.insert(E2, ColoredPiece::WhitePawn);
        assert_eq!(pos, before);
    }

    #[test]
    fn attacked_sees_all_piece_types() {
        let pos = position("4k3/8/8/8/1n6/8/6p1/R3K3 w Q - 0 1");
        let occ = pos.occupied();

        assert!(pos.attacked(Black, D3, occ));  // knight on b4
        assert!(pos.attacked(Black, F1, occ));  // pawn on g2
        assert!(pos.attacked(Black, E7, occ));  // king on e8
        assert!(pos.attacked(White, A8, occ));  // rook on a1
        assert!(!pos.attacked(White, H8, occ));
    }

    #[test]
    fn attacked_respects_blockers() {
        let pos = position("4k3/8/8/8/8/8/4p3/R3K3 w Q - 0 1");
        let occ = pos.occupied();

        // the rook's ray along the first rank is blocked by the king
        assert!(pos.attacked(White, C1, occ));
        assert!(!pos.attacked(White, G1, occ));

        // removing the king from the occupancy extends the ray
        let without_king = occ ^ E1.into();
        assert!(pos.attacked(White, G1, without_king));
    }

    #[test]
    fn checkers_are_generated_for_the_side_to_move() {
        let pos = position(STARTPOS);
        assert_eq!(pos.check_num(), 0);
        assert!(!pos.in_check());

        let pos = position("4k3/8/8/8/7b/8/8/4K3 w - - 0 1");
        assert_eq!(pos.check_num(), 1);
        assert_eq!(pos.checkers(), H4.into());

        // double check from a knight and a rook
        let pos = position("4k3/8/8/8/8/5n2/8/4K2r w - - 0 1");
        assert_eq!(pos.check_num(), 2);
    }

    #[test]
    fn display_renders_a_grid_that_reparses() {
        let pos = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let rendered = pos.to_string();

        assert!(rendered.ends_with("  a   b   c   d   e   f   g   h\n"));

        // pull the piece cells back out of the grid and compare the placement
        let mut rank = Rank::COUNT;
        for line in rendered.lines() {
            if !line.starts_with("| ") {
                continue;
            }
            rank -= 1;

            let cells: Vec<&str> = line.split('|').skip(1).take(File::COUNT).collect();
            for (file, cell) in cells.iter().enumerate() {
                let sq = Square::try_from(rank * File::COUNT + file).unwrap();
                let expected = match pos.piece_at(sq) {
                    Some(piece) => piece.to_string(),
                    None => "-".to_string(),
                };
                assert_eq!(cell.trim(), expected, "square {}", sq);
            }
        }
        assert_eq!(rank, 0);
    }
}
