//! Tests the legality rules the move generator must enforce
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use chess::{Board, Move, MoveFlag};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn board(fen: &str) -> Board {
    fen.parse().expect("valid fen")
}

fn move_strings(board: &Board) -> Vec<String> {
    board.moves().into_iter().map(|m| m.to_string()).collect()
}

fn has_move(board: &Board, text: &str) -> bool {
    move_strings(board).iter().any(|m| m == text)
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod en_passant {
    use super::*;

    #[test]
    fn horizontal_discovered_check_forbids_the_capture() {
        // removing both the b5 pawn and the c5 pawn would expose the a5 king to the
        // h5 rook along the fifth rank
        let board = board("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
        assert!(!has_move(&board, "b5c6"));
    }

    #[test]
    fn the_capture_is_generated_without_the_pinning_rook() {
        let board = board("8/8/8/KPp5/8/8/8/7k w - c6 0 1");
        assert!(has_move(&board, "b5c6"));
    }

    #[test]
    fn two_passanters_block_the_rank_for_each_other() {
        // either capture leaves the other pawn between the king and the rook, so
        // both are legal
        let board = board("8/8/8/KPpP3r/8/8/8/7k w - c6 0 1");
        assert!(has_move(&board, "b5c6"));
        assert!(has_move(&board, "d5c6"));
    }

    #[test]
    fn diagonally_pinned_pawn_cannot_capture_off_its_ray() {
        // the e5 pawn is pinned along b2-h8; d6 is not on that diagonal
        let board = board("7K/8/8/3pP3/8/8/1b6/7k w - d6 0 1");
        assert!(!has_move(&board, "e5d6"));
        assert!(!has_move(&board, "e5e6"));
    }

    #[test]
    fn diagonally_pinned_pawn_may_capture_along_its_ray() {
        // the e5 pawn is pinned along c7-f4 and the en-passant target lies on the ray
        let board = board("7k/2b5/8/3pP3/5K2/8/8/8 w - d6 0 1");
        assert!(has_move(&board, "e5d6"));
    }

    #[test]
    fn capturing_the_checking_pawn_en_passant_is_legal() {
        let mut board = board("8/8/8/4k3/2p5/8/3P4/4K3 w - - 0 1");

        // the double push checks the e5 king and leaves d3 capturable en passant
        let mv = board.moves().into_iter()
            .find(|m| m.to_string() == "d2d4")
            .expect("double push available");
        board.make_move(mv);

        assert_eq!(board.position().check_num(), 1);
        assert_eq!(board.position().ep_target(), Some(chess::Square::D3));
        assert!(has_move(&board, "c4d3"));
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod castling {
    use super::*;

    fn castling_moves(board: &Board) -> Vec<Move> {
        board.moves().into_iter().filter(|m| m.flag().is_castling()).collect()
    }

    #[test]
    fn possible_with_a_clear_and_safe_path() {
        let board = board("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(castling_moves(&board).len(), 1);
        assert_eq!(castling_moves(&board)[0].flag(), MoveFlag::CastleHSide);
    }

    #[test]
    fn forbidden_through_an_attacked_square() {
        // the g2 pawn attacks f1, which the king must cross
        let board = board("4k3/8/8/8/8/8/6p1/4K2R w K - 0 1");
        assert!(castling_moves(&board).is_empty());
    }

    #[test]
    fn forbidden_into_an_attacked_square() {
        // the a7 bishop attacks g1, where the king would land
        let board = board("4k3/b7/8/8/8/8/8/4K2R w K - 0 1");
        assert!(castling_moves(&board).is_empty());
    }

    #[test]
    fn forbidden_with_a_blocked_path() {
        let board = board("4k3/8/8/8/8/8/8/4K1NR w K - 0 1");
        assert!(castling_moves(&board).is_empty());
    }

    #[test]
    fn forbidden_while_in_check() {
        let board = board("4k3/8/8/8/8/8/4r3/4K2R w K - 0 1");
        assert!(castling_moves(&board).is_empty());
    }

    #[test]
    fn the_rook_may_pass_through_attacked_squares() {
        // the b8 rook attacks b1, but only the castling rook crosses b1, so the
        // a-side castle stays legal
        let board = board("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(castling_moves(&board).len(), 1);
        assert_eq!(castling_moves(&board)[0].flag(), MoveFlag::CastleASide);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod promotions {
    use super::*;

    #[test]
    fn a_push_to_the_last_rank_yields_all_four_promotions() {
        let board = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");

        let promotions: Vec<Move> = board.moves().into_iter()
            .filter(|m| m.flag().is_promotion())
            .collect();

        assert_eq!(promotions.len(), 4);

        let mut flags: Vec<MoveFlag> = promotions.iter().map(|m| m.flag()).collect();
        flags.sort_by_key(|f| *f as u8);
        assert_eq!(flags, vec![
            MoveFlag::NPromotion,
            MoveFlag::BPromotion,
            MoveFlag::RPromotion,
            MoveFlag::QPromotion,
        ]);
    }

    #[test]
    fn capture_promotions_are_generated_separately() {
        // the a7 pawn can push to a8 or capture on b8, four flag variants each
        let board = board("1r5k/P7/8/8/8/8/8/K7 w - - 0 1");

        let promotions: Vec<Move> = board.moves().into_iter()
            .filter(|m| m.flag().is_promotion())
            .collect();

        assert_eq!(promotions.len(), 8);
        assert!(has_move(&board, "a7a8q"));
        assert!(has_move(&board, "a7b8q"));
        assert!(has_move(&board, "a7b8n"));
    }

    #[test]
    fn noisy_generation_emits_only_queen_promotions_for_pushes() {
        let board = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");

        let noisy = board.generate_moves::<false, true>();
        let promotions: Vec<Move> = noisy.into_iter()
            .filter(|m| m.flag().is_promotion())
            .collect();

        assert_eq!(promotions.len(), 1);
        assert_eq!(promotions[0].flag(), MoveFlag::QPromotion);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod generation_filters {
    use super::*;

    #[test]
    fn quiet_and_noisy_partition_the_move_list() {
        for fen in &[
            KIWIPETE,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1",
        ] {
            let board = board(fen);

            let all = board.generate_moves::<true, true>();
            let quiet = board.generate_moves::<true, false>();
            let noisy = board.generate_moves::<false, true>();

            assert_eq!(all.len(), quiet.len() + noisy.len(), "{}", fen);

            for mv in &noisy {
                let is_capture = board.position().piece_at(mv.target()).is_some()
                    && !mv.flag().is_castling();
                let is_ep = mv.flag() == MoveFlag::EnPassant;
                let is_queen_promotion = mv.flag() == MoveFlag::QPromotion;

                assert!(is_capture || is_ep || is_queen_promotion, "{} in {}", mv, fen);
            }
        }
    }

    #[test]
    fn move_counts_stay_within_the_position_bound() {
        // a constructed position famous for its large move count
        let board = board("R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1");

        let moves = board.moves();
        assert_eq!(moves.len(), 218);
        assert!(moves.len() <= Move::MAX_IN_POSITION);
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        // knight on f3 and rook on h1 both give check
        let board = board("4k3/8/8/8/8/5n2/8/4K2r w - - 0 1");

        assert_eq!(board.position().check_num(), 2);
        let moves = board.moves();
        assert!(!moves.is_empty());
        for mv in &moves {
            assert_eq!(mv.source(), board.position().king(chess::Color::White));
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod make_undo {
    use super::*;

    #[test]
    fn every_move_round_trips_bitwise() {
        for fen in &[
            KIWIPETE,
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            let mut board = board(fen);
            let before = *board.position();

            let moves = board.moves();
            for mv in &moves {
                board.make_move(mv);
                board.undo_move();
                assert_eq!(*board.position(), before, "{} in {}", mv, fen);
            }
        }
    }

    #[test]
    fn no_generated_move_leaves_the_mover_in_check() {
        for fen in &[
            KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ] {
            let mut board = board(fen);
            let mover = board.position().side_to_move();

            let moves = board.moves();
            for mv in &moves {
                board.make_move(mv);

                let pos = board.position();
                let king = pos.king(mover);
                assert!(
                    !pos.attacked(pos.side_to_move(), king, pos.occupied()),
                    "{} leaves the king attacked in {}", mv, fen
                );

                board.undo_move();
            }
        }
    }

    #[test]
    fn incremental_hash_survives_a_long_random_walk() {
        let mut board = board(KIWIPETE);

        // a deterministic walk: always pick the middle move
        for _ in 0..40 {
            let moves = board.moves();
            if moves.is_empty() {
                break;
            }
            board.make_move(moves[moves.len() / 2]);
        }

        assert_eq!(board.position().hash(), board.position().zobrist_hash());
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod perft_modes {
    use super::*;

    #[test]
    fn bulk_counting_changes_no_totals() {
        for fen in &[
            KIWIPETE,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        ] {
            let mut board = board(fen);

            for depth in 0..4 {
                let bulk = board.perft::<true, false>(depth);
                let plain = board.perft::<false, false>(depth);
                assert_eq!(bulk, plain, "depth {} of {}", depth, fen);
            }
        }
    }
}
