//! Contains the legal move generator
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! The generator produces only legal moves; there is no generate-then-filter step. Check
//! and pin constraints are folded into two kinds of masks computed once per call:
//!
//! * the *check mask* restricts non-king moves to squares that capture or block a
//!   checker, and
//! * the *pin masks* (one lateral, one diagonal) hold each pinned piece together with the
//!   ray it is pinned along, so a pinned piece simply intersects its targets with the
//!   mask it sits on.
//!
//! King moves and en-passant captures need individual legality probes and get them
//! explicitly. Everything else is plain set arithmetic.
////////////////////////////////////////////////////////////////////////////////////////////////////
use crate::bitboard::{self, Bitboard};
use crate::castling;
use crate::moves::{Move, MoveFlag, MoveList};
use crate::position::Position;
use crate::{Color, Direction, Piece, Rank, Square};

/// Generates the legal moves of the position which match the generation type.
///
/// `QUIET` selects non-capturing moves other than queen promotions; `NOISY` selects
/// captures and queen promotions. Generating with both set yields the full legal move
/// list.
pub(crate) fn generate<const QUIET: bool, const NOISY: bool>(
    position: &Position,
    info: &castling::Info,
) -> MoveList {
    let mut moves = MoveList::new();

    Generator::<QUIET, NOISY>::new(position, info, &mut moves).run();

    moves
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Per-call state of the move generator.
struct Generator<'a, const QUIET: bool, const NOISY: bool> {
    position: &'a Position,
    info: &'a castling::Info,
    moves: &'a mut MoveList,

    stm: Color,

    friends: Bitboard,
    enemies: Bitboard,
    occupied: Bitboard,

    // The occupied set without the side to move's king. Slider attacks computed against
    // this set pass through the king, so a king stepping away along a checking ray is
    // still seen as attacked.
    blockers: Bitboard,

    // Squares a non-pawn, non-promoting piece may land on, as dictated by QUIET and
    // NOISY. The king is restricted by territory but not by the check mask.
    territory: Bitboard,

    // Squares non-king moves are restricted to under check. All squares when not in
    // check; under a single check, the checker plus any blocking squares; empty under
    // double check.
    checkmask: Bitboard,

    king: Square,

    // Pinned friendly pieces together with the rays they are pinned along, split by ray
    // type. A piece on a pin mask may only move within that mask.
    pinmask_l: Bitboard,
    pinmask_d: Bitboard,
}

impl<'a, const QUIET: bool, const NOISY: bool> Generator<'a, QUIET, NOISY> {
    fn new(
        position: &'a Position,
        info: &'a castling::Info,
        moves: &'a mut MoveList,
    ) -> Generator<'a, QUIET, NOISY> {
        let stm = position.side_to_move();

        let friends = position.occupied_by(stm);
        let enemies = position.occupied_by(!stm);
        let occupied = friends | enemies;

        let mut territory = Bitboard::EMPTY;
        if QUIET {
            territory |= !occupied;
        }
        if NOISY {
            territory |= enemies;
        }

        let king_bb = position.pieces(Piece::King) & friends;
        let blockers = occupied ^ king_bb;
        let king = king_bb.lsb().expect("INFALLIBLE");

        let mut generator = Generator {
            position,
            info,
            moves,
            stm,
            friends,
            enemies,
            occupied,
            blockers,
            territory,
            checkmask: Bitboard::EMPTY,
            king,
            pinmask_l: Bitboard::EMPTY,
            pinmask_d: Bitboard::EMPTY,
        };

        generator.generate_pin_masks();
        generator.checkmask = generator.generate_check_mask();

        generator
    }

    /// Computes the check mask from the position's checker set.
    fn generate_check_mask(&self) -> Bitboard {
        match self.position.check_num() {
            // no check, all squares are allowed
            0 => Bitboard::FULL,

            // double check, no non-king move can help
            2 => Bitboard::EMPTY,

            _ => {
                let checker_sq = self.position.checkers().lsb().expect("INFALLIBLE");
                let checker = self.position.piece_at(checker_sq).expect("INFALLIBLE").piece();

                if checker == Piece::Pawn || checker == Piece::Knight {
                    // contact checks cannot be blocked, only the checker's square helps
                    self.position.checkers()
                } else {
                    // slider checks can also be blocked anywhere along the ray
                    bitboard::between2(self.king, checker_sq)
                }
            }
        }
    }

    /// Accumulates the pin rays of the given candidate pinners.
    ///
    /// A candidate pins the single friendly piece on the ray between it and the king, if
    /// there is exactly one. The ray includes the pinner itself, so capturing the pinner
    /// stays legal for the pinned piece.
    fn pin_mask(&self, pinning: Bitboard) -> Bitboard {
        let mut pinmask = Bitboard::EMPTY;

        for piece in pinning {
            let possible_pin = bitboard::between2(self.king, piece);

            if (self.friends & possible_pin).len() == 1 {
                pinmask |= possible_pin;
            }
        }

        pinmask
    }

    /// Computes the lateral and diagonal pin masks.
    fn generate_pin_masks(&mut self) {
        let b = self.enemies & self.position.pieces(Piece::Bishop);
        let r = self.enemies & self.position.pieces(Piece::Rook);
        let q = self.enemies & self.position.pieces(Piece::Queen);

        // candidate pinners are the sliders whose rays reach the king when only enemy
        // pieces block
        let lateral = (r | q) & bitboard::rook_attacks(self.king, self.enemies);
        let diagonal = (b | q) & bitboard::bishop_attacks(self.king, self.enemies);

        self.pinmask_l = self.pin_mask(lateral);
        self.pinmask_d = self.pin_mask(diagonal);
    }

    /// Emits normal moves from `source` to each square of `targets`.
    fn serialize(&mut self, source: Square, targets: Bitboard) {
        let targets = targets & self.checkmask & self.territory;

        for target in targets {
            self.moves.push(Move::new(source, target, MoveFlag::Normal));
        }
    }

    /// Emits moves onto each square of `targets`, deriving the source by stepping back
    /// against `offset`.
    fn serialize_shift(&mut self, targets: Bitboard, offset: Direction, flag: MoveFlag) {
        let targets = targets & self.checkmask & self.territory;

        for target in targets {
            self.moves.push(Move::new(target.shift(-offset), target, flag));
        }
    }

    /// Emits the promotion moves onto each square of `targets`.
    ///
    /// Queen promotions count as noisy no matter what; under-promotions are noisy
    /// exactly when they capture. The territory mask is not applied since a quiet-only
    /// territory would wrongly drop non-capturing queen promotions.
    fn serialize_promotions(&mut self, targets: Bitboard, offset: Direction, capture: bool) {
        let targets = targets & self.checkmask & !self.friends;

        for target in targets {
            let source = target.shift(-offset);

            if NOISY {
                self.moves.push(Move::new(source, target, MoveFlag::QPromotion));
            }

            if (QUIET && !capture) || (NOISY && capture) {
                self.moves.push(Move::new(source, target, MoveFlag::NPromotion));
                self.moves.push(Move::new(source, target, MoveFlag::BPromotion));
                self.moves.push(Move::new(source, target, MoveFlag::RPromotion));
            }
        }
    }

    /// Generates pawn captures, en-passant, pushes and promotions.
    fn pawn_moves(&mut self) {
        let up = Direction::up(self.stm);
        let ue = up + Direction::EAST;
        let uw = up + Direction::WEST;

        // the rank a single push must reach for a double push to follow, and the
        // promotion rank
        let dp_rank = Bitboard::from(match self.stm {
            Color::White => Rank::R3,
            Color::Black => Rank::R6,
        });
        let pr_rank = Bitboard::from(match self.stm {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        });

        let pawns = self.position.pieces(Piece::Pawn) & self.friends;

        if NOISY {
            // captures are diagonal, so laterally pinned pawns cannot capture at all,
            // and diagonally pinned pawns only within their pin ray
            let attackers = pawns - self.pinmask_l;
            let pinned = attackers & self.pinmask_d;
            let unpinned = attackers ^ pinned;

            let attacks_e = (pinned.shift(ue) & self.pinmask_d) | unpinned.shift(ue);
            let attacks_w = (pinned.shift(uw) & self.pinmask_d) | unpinned.shift(uw);

            self.serialize_shift((attacks_e - pr_rank) & self.enemies, ue, MoveFlag::Normal);
            self.serialize_shift((attacks_w - pr_rank) & self.enemies, uw, MoveFlag::Normal);

            self.serialize_promotions(attacks_e & pr_rank & self.enemies, ue, true);
            self.serialize_promotions(attacks_w & pr_rank & self.enemies, uw, true);

            if let Some(target) = self.position.ep_target() {
                self.en_passant(target, attackers);
            }
        }

        if QUIET || NOISY {
            // pushes are straight, so diagonally pinned pawns cannot push at all, and
            // laterally pinned pawns only within their pin ray
            let pushers = pawns - self.pinmask_d;
            let pinned = pushers & self.pinmask_l;
            let unpinned = pushers ^ pinned;

            let pinned_single = pinned.shift(up) - self.occupied;
            let unpinned_single = unpinned.shift(up) - self.occupied;
            let single = (pinned_single & self.pinmask_l) | unpinned_single;

            if QUIET {
                let double = (single & dp_rank).shift(up) - self.occupied;

                self.serialize_shift(single - pr_rank, up, MoveFlag::Normal);
                self.serialize_shift(double, up + up, MoveFlag::DoublePush);
            }

            // the queen promotion among these is a noisy move despite not
            // capturing, so push promotions are emitted for both generation types
            self.serialize_promotions(single & pr_rank, up, false);
        }
    }

    /// Generates the legal en-passant captures onto `target`.
    ///
    /// `attackers` are the friendly pawns that are not laterally pinned.
    fn en_passant(&mut self, target: Square, attackers: Bitboard) {
        let up = Direction::up(self.stm);
        let target_bb = Bitboard::from(target);

        // friendly pawns positioned to capture onto the target square
        let passanters = bitboard::pawn_attacks(!self.stm, target) & attackers;

        match passanters.len() {
            1 => {
                let captured = target.shift(-up);

                // the capture must resolve any check, either by landing on a blocking
                // square or by removing a checking pawn
                if (target_bb | captured.into()).is_disjoint(self.checkmask) {
                    return;
                }

                // with king and both vanishing pawns on one rank, the capture can
                // uncover a lateral ray that no ordinary pin detects
                if self.king.rank() == captured.rank() {
                    let pinners = (self.position.pieces(Piece::Rook)
                        | self.position.pieces(Piece::Queen)) & self.enemies;
                    let vanishers = passanters | captured.into();

                    if bitboard::rook_attacks(self.king, self.occupied ^ vanishers)
                        .intersects(pinners)
                    {
                        return;
                    }
                }

                if self.pinmask_d.is_disjoint(passanters) || self.pinmask_d.intersects(target_bb) {
                    let source = passanters.lsb().expect("INFALLIBLE");
                    self.moves.push(Move::new(source, target, MoveFlag::EnPassant));
                }
            }

            // with two passanters the vanishing-rank ray is always blocked by the other
            // pawn, so only the diagonal pin test applies
            2 => {
                for passanter in passanters {
                    if !self.pinmask_d.contains(passanter) || self.pinmask_d.intersects(target_bb) {
                        self.moves.push(Move::new(passanter, target, MoveFlag::EnPassant));
                    }
                }
            }

            _ => {}
        }
    }

    /// Generates knight moves. A pinned knight can never move.
    fn knight_moves(&mut self) {
        let knights = (self.position.pieces(Piece::Knight) & self.friends)
            - (self.pinmask_l | self.pinmask_d);

        for knight in knights {
            self.serialize(knight, bitboard::knight_attacks(knight));
        }
    }

    /// Generates diagonal moves of bishops and queens.
    fn bishop_moves(&mut self) {
        let bishops = ((self.position.pieces(Piece::Bishop) | self.position.pieces(Piece::Queen))
            & self.friends) - self.pinmask_l;

        let pinned = bishops & self.pinmask_d;
        for bishop in pinned {
            self.serialize(bishop, bitboard::bishop_attacks(bishop, self.occupied) & self.pinmask_d);
        }

        let unpinned = bishops ^ pinned;
        for bishop in unpinned {
            self.serialize(bishop, bitboard::bishop_attacks(bishop, self.occupied));
        }
    }

    /// Generates lateral moves of rooks and queens.
    fn rook_moves(&mut self) {
        let rooks = ((self.position.pieces(Piece::Rook) | self.position.pieces(Piece::Queen))
            & self.friends) - self.pinmask_d;

        let pinned = rooks & self.pinmask_l;
        for rook in pinned {
            self.serialize(rook, bitboard::rook_attacks(rook, self.occupied) & self.pinmask_l);
        }

        let unpinned = rooks ^ pinned;
        for rook in unpinned {
            self.serialize(rook, bitboard::rook_attacks(rook, self.occupied));
        }
    }

    /// Generates king moves, excluding castling. Each target gets an attack probe
    /// against the king-removed occupancy.
    fn king_moves(&mut self) {
        let targets = bitboard::king_attacks(self.king) & self.territory;

        for target in targets {
            if !self.position.attacked(!self.stm, target, self.blockers) {
                self.moves.push(Move::new(self.king, target, MoveFlag::Normal));
            }
        }
    }

    /// Generates the castling move for one side, if it is legal.
    fn castling_move(&mut self, side: castling::Side) {
        let dim = castling::Dimension::new(self.stm, side);
        let rook = self.info.rook(dim);

        // A rook pinned to its own king can never legally castle; this only arises in
        // Chess960. The path must be clear and every square the king crosses safe,
        // probed with the king-removed occupancy.
        if !self.pinmask_l.contains(rook)
            && self.position.rights().has(dim)
            && self.occupied.is_disjoint(self.info.blocker_mask(dim))
            && !self.position.attacked_any(!self.stm, self.info.attack_mask(dim), self.blockers)
        {
            self.moves.push(Move::new(self.king, rook, MoveFlag::castle(side)));
        }
    }

    /// Generates castling toward both sides. Castling is a quiet move.
    fn castling_moves(&mut self) {
        if !QUIET {
            return;
        }

        self.castling_move(castling::Side::H);
        self.castling_move(castling::Side::A);
    }

    /// Runs the generation passes appropriate for the current check count.
    fn run(&mut self) {
        let check_num = self.position.check_num();

        // castling only with the king out of check
        if check_num == 0 {
            self.castling_moves();
        }

        // non-king moves only when not in double check
        if check_num <= 1 {
            self.rook_moves();
            self.bishop_moves();
            self.knight_moves();
            self.pawn_moves();
        }

        // king moves are always available
        self.king_moves();
    }
}
