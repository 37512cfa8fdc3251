//! Tests the move generator against known perft node counts
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////

mod move_gen {
    use chess::Board;

    fn count(fen: &str, depth: u32) -> u64 {
        println!("\n{}", fen);
        let mut board: Board = fen.parse().unwrap();

        let count = board.perft::<true, false>(depth);
        println!("Depth {} total:\t{:12}", depth, count);

        count
    }

    mod startpos {
        use super::count;

        const FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

        #[test]
        fn depth_1() { assert_eq!(count(FEN, 1), 20); }

        #[test]
        fn depth_2() { assert_eq!(count(FEN, 2), 400); }

        #[test]
        fn depth_3() { assert_eq!(count(FEN, 3), 8902); }

        #[test]
        fn depth_4() { assert_eq!(count(FEN, 4), 197281); }

        #[test]
        fn depth_5() { assert_eq!(count(FEN, 5), 4865609); }

        #[test]
        #[ignore]
        fn depth_6() { assert_eq!(count(FEN, 6), 119060324); }
    }

    mod position_002 {
        use super::count;

        const FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

        #[test]
        fn depth_1() { assert_eq!(count(FEN, 1), 48); }

        #[test]
        fn depth_2() { assert_eq!(count(FEN, 2), 2039); }

        #[test]
        fn depth_3() { assert_eq!(count(FEN, 3), 97862); }

        #[test]
        fn depth_4() { assert_eq!(count(FEN, 4), 4085603); }

        #[test]
        fn depth_5() { assert_eq!(count(FEN, 5), 193690690); }

        #[test]
        #[ignore]
        fn depth_6() { assert_eq!(count(FEN, 6), 8031647685); }
    }

    mod position_003 {
        use super::count;

        const FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

        #[test]
        fn depth_4() { assert_eq!(count(FEN, 4), 43238); }

        #[test]
        fn depth_5() { assert_eq!(count(FEN, 5), 674624); }

        #[test]
        fn depth_6() { assert_eq!(count(FEN, 6), 11030083); }
    }

    mod position_004 {
        use super::count;

        const FEN: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1";

        #[test]
        fn depth_3() { assert_eq!(count(FEN, 3), 9467); }

        #[test]
        fn depth_4() { assert_eq!(count(FEN, 4), 422333); }

        #[test]
        fn depth_5() { assert_eq!(count(FEN, 5), 15833292); }
    }

    mod position_005 {
        use super::count;

        const FEN: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

        #[test]
        fn depth_3() { assert_eq!(count(FEN, 3), 62379); }

        #[test]
        fn depth_4() { assert_eq!(count(FEN, 4), 2103487); }

        #[test]
        fn depth_5() { assert_eq!(count(FEN, 5), 89941194); }
    }

    mod chess960 {
        use super::count;

        // the standard start expressed in Shredder notation must match the
        // standard counts exactly
        #[test]
        fn shredder_startpos_depth_4() {
            assert_eq!(
                count("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w HAha - 0 1", 4),
                197281
            );
        }

        #[test]
        fn frc_position_depth_4() {
            assert_eq!(
                count("1rkr2nq/pbppbpp1/4pn1p/8/4P1P1/4PN1P/PBPPBP1R/1RKN2NQ w BDbd - 0 1", 4),
                1003853
            );
        }
    }

    // smaller endgame positions with published counts

    #[test]
    fn position_101() { assert_eq!(count("4k3/8/8/8/8/8/8/4K2R w K - 0 1", 6), 764643); }

    #[test]
    fn position_102() { assert_eq!(count("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1", 6), 846648); }

    #[test]
    fn position_103() { assert_eq!(count("4k2r/8/8/8/8/8/8/4K3 w k - 0 1", 6), 899442); }

    #[test]
    fn position_104() { assert_eq!(count("r3k3/8/8/8/8/8/8/4K3 w q - 0 1", 6), 1001523); }

    #[test]
    fn position_105() { assert_eq!(count("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", 6), 2788982); }

    #[test]
    fn position_106() { assert_eq!(count("r3k2r/8/8/8/8/8/8/4K3 w kq - 0 1", 6), 3517770); }

    #[test]
    fn position_107() { assert_eq!(count("8/8/8/8/8/8/6k1/4K2R w K - 0 1", 6), 185867); }

    #[test]
    fn position_108() { assert_eq!(count("8/8/8/8/8/8/1k6/R3K3 w Q - 0 1", 6), 413018); }

    #[test]
    fn position_109() { assert_eq!(count("4k2r/6K1/8/8/8/8/8/8 w k - 0 1", 6), 179869); }

    #[test]
    fn position_110() { assert_eq!(count("r3k3/1K6/8/8/8/8/8/8 w q - 0 1", 6), 367724); }

    #[test]
    fn position_111() { assert_eq!(count("8/1n4N1/2k5/8/8/5K2/1N4n1/8 w - - 0 1", 6), 8107539); }

    #[test]
    fn position_112() { assert_eq!(count("8/1k6/8/5N2/8/4n3/8/2K5 w - - 0 1", 6), 2594412); }

    #[test]
    fn position_113() { assert_eq!(count("8/Pk6/8/8/8/8/6Kp/8 w - - 0 1", 6), 1030499); }

    #[test]
    fn position_114() { assert_eq!(count("8/2k1p3/3pP3/3P2K1/8/8/8/8 w - - 0 1", 6), 34834); }

    #[test]
    fn position_115() { assert_eq!(count("3k4/3pp3/8/8/8/8/3PP3/3K4 w - - 0 1", 6), 199002); }

    #[test]
    fn position_116() { assert_eq!(count("8/8/3k4/3p4/3P4/3K4/8/8 w - - 0 1", 6), 53138); }
}
