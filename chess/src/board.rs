//! Contains the board: a position history with move making and perft
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use crate::bitboard;
use crate::castling;
use crate::error::ParseFenError;
use crate::fen::Fen;
use crate::movegen;
use crate::moves::{Move, MoveFlag, MoveList};
use crate::position::Position;
use crate::zobrist::Zobrist;
use crate::{ColoredPiece, Direction, Piece};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A playable board: the current [`Position`](struct.Position.html) plus the history that
/// led to it.
///
/// Making a move copies the top of the history stack and mutates the copy, so undoing is
/// nothing more than popping. The stack is allocated once with room for
/// [`Move::MAX_IN_GAME`](struct.Move.html#associatedconstant.MAX_IN_GAME) plies.
///
/// The board also owns the game's castling metadata, which never changes after parsing,
/// and remembers whether the position encoding used Chess960 notation, which only affects
/// how castling moves are rendered.
#[derive(Debug, Clone)]
pub struct Board {
    info: castling::Info,

    history: Vec<Position>,

    // Plies played before the root position; the game ply count of the top of the
    // stack is `initial_plys + history.len() - 1`.
    initial_plys: u16,

    frc: bool,
}

impl Board {
    /// Creates a board from a parsed position encoding.
    pub fn new(fen: &Fen) -> Board {
        let mut history = Vec::with_capacity(Move::MAX_IN_GAME);
        history.push(Position::from_fen(fen));

        Board {
            info: fen.castling_info,
            history,
            initial_plys: fen.plys_count,
            frc: fen.frc,
        }
    }

    /// Returns the current position
    pub fn position(&self) -> &Position {
        self.history.last().expect("INFALLIBLE")
    }

    /// Returns the number of plies played in the game, counting those before the
    /// root position
    pub fn ply_count(&self) -> u16 {
        self.initial_plys + (self.history.len() - 1) as u16
    }

    /// Returns the game's castling metadata
    pub fn castling_info(&self) -> &castling::Info {
        &self.info
    }

    /// Returns `true` if the position encoding used Chess960 castling notation
    pub fn is_chess960(&self) -> bool {
        self.frc
    }

    /// Generates the legal moves of the current position which match the generation
    /// type: `QUIET` selects non-captures other than queen promotions, `NOISY` selects
    /// captures and queen promotions.
    pub fn generate_moves<const QUIET: bool, const NOISY: bool>(&self) -> MoveList {
        movegen::generate::<QUIET, NOISY>(self.position(), &self.info)
    }

    /// Generates all legal moves of the current position
    pub fn moves(&self) -> MoveList {
        self.generate_moves::<true, true>()
    }

    /// Makes a move on the board.
    ///
    /// The move must be legal in the current position, as produced by
    /// [`generate_moves`](#method.generate_moves); the behavior for any other move is
    /// unspecified.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(self.history.len() < Move::MAX_IN_GAME);

        // copy the top of the stack and mutate the copy
        let mut position = *self.position();

        let source = mv.source();
        let target = mv.target();
        let flag = mv.flag();

        let source_piece = position.piece_at(source).expect("no piece on source square");
        let target_piece = position.piece_at(target);

        // Any occupied target is a capture. For castling the "captured" piece is the
        // moving side's own rook, whose removal is exactly what the encoding wants.
        let is_capture = target_piece.is_some();

        let up = Direction::up(position.side_to_move);

        position.draw_clock += 1;

        // the en-passant opportunity expires no matter what is played
        if let Some(ep) = position.ep_target {
            position.hash -= Zobrist::ep_key(ep);
            position.ep_target = None;
        }

        // strip the castling rights attached to the squares this move touches
        let change = self.info.mask(source) + self.info.mask(target);
        position.hash -= Zobrist::castling_key(change & position.rights);
        position.rights -= change;

        position.remove(source);

        if is_capture {
            position.remove(target);
            position.draw_clock = 0;
        } else if source_piece.piece() == Piece::Pawn {
            position.draw_clock = 0;
        }

        match flag {
            MoveFlag::Normal => {
                position.insert(target, source_piece);
            }

            MoveFlag::DoublePush => {
                position.insert(target, source_piece);

                // record the skipped square only if some enemy pawn could actually
                // capture onto it next ply
                let new_ep = source.shift(up);
                let enemy_pawns = position.pieces(Piece::Pawn)
                    & position.occupied_by(!position.side_to_move);

                if bitboard::pawn_attacks(position.side_to_move, new_ep).intersects(enemy_pawns) {
                    position.ep_target = Some(new_ep);
                    position.hash += Zobrist::ep_key(new_ep);
                }
            }

            MoveFlag::CastleHSide => Board::finish_castling(&mut position, castling::Side::H),
            MoveFlag::CastleASide => Board::finish_castling(&mut position, castling::Side::A),

            MoveFlag::EnPassant => {
                position.insert(target, source_piece);
                position.remove(target.shift(-up));
            }

            MoveFlag::NPromotion
            | MoveFlag::BPromotion
            | MoveFlag::RPromotion
            | MoveFlag::QPromotion => {
                position.insert(
                    target,
                    ColoredPiece::new(position.side_to_move, flag.promoted_piece()),
                );
            }
        }

        position.side_to_move = !position.side_to_move;
        position.hash += Zobrist::SIDE_TO_MOVE;

        position.generate_checkers();

        debug_assert_eq!(position.hash, position.zobrist_hash());

        self.history.push(position);
    }

    /// Places the castling king and rook on their destination squares.
    ///
    /// By this point both have already been removed: the king as the move's source and
    /// the rook as the "capture" on the move's target.
    fn finish_castling(position: &mut Position, side: castling::Side) {
        let dim = castling::Dimension::new(position.side_to_move, side);
        let (king_end, rook_end) = castling::end_squares(dim);

        position.insert(king_end, ColoredPiece::new(position.side_to_move, Piece::King));
        position.insert(rook_end, ColoredPiece::new(position.side_to_move, Piece::Rook));
    }

    /// Undoes the most recent move by popping the history stack.
    pub fn undo_move(&mut self) {
        debug_assert!(self.history.len() > 1);
        self.history.pop();
    }

    /// Renders a move the way the current game notates it.
    ///
    /// Castling moves are stored as king-to-rook-square; a standard chess game renders
    /// them with the king's destination square instead, while Chess960 keeps the
    /// internal form.
    pub fn display_move(&self, mv: Move) -> String {
        if !self.frc && mv.flag().is_castling() {
            let side = match mv.flag() {
                MoveFlag::CastleHSide => castling::Side::H,
                _ => castling::Side::A,
            };
            let dim = castling::Dimension::new(self.position().side_to_move(), side);
            let (king_end, _) = castling::end_squares(dim);

            return Move::new(mv.source(), king_end, mv.flag()).to_string();
        }

        mv.to_string()
    }

    /// Counts the leaf nodes of the legal game tree to the given depth.
    ///
    /// With `BULK` set, the count at depth one is the length of the move list rather
    /// than one make-undo pair per move, which is dramatically faster and changes no
    /// totals. With `SPLIT` set, each root move's subtree count is printed on its own
    /// line as `<move>: <count>`.
    pub fn perft<const BULK: bool, const SPLIT: bool>(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves::<true, true>();

        if BULK && !SPLIT && depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;

        for mv in &moves {
            self.make_move(mv);
            let delta = self.perft::<BULK, false>(depth - 1);
            self.undo_move();

            nodes += delta;

            if SPLIT {
                println!("{}: {}", self.display_move(mv), delta);
            }
        }

        nodes
    }
}

impl FromStr for Board {
    type Err = ParseFenError;

    /// Parses a board from a position encoding in Forsyth-Edwards Notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Board::new(&s.parse::<Fen>()?))
    }
}

impl fmt::Display for Board {
    /// Writes the current position as an ASCII grid.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.position().fmt(f)
    }
}
