//! Contains the parsed form of the textual position encoding
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::str::FromStr;
use crate::castling;
use crate::error::ParseFenError;
use crate::{Color, ColoredPiece, File, Rank, Square};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A parsed [Forsyth-Edwards Notation](https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation)
/// string: the six fields of the position encoding in their decoded form.
///
/// Parsing also resolves the castling field into a full
/// [`castling::Info`](castling/struct.Info.html), which requires knowing both king
/// squares, and converts the full-move number into a game ply count. A `Fen` is the input
/// to [`Board`](struct.Board.html) construction.
///
/// ```rust
/// use chess::Fen;
///
/// let fen: Fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
///     .parse().unwrap();
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Fen {
    pub(crate) mailbox: [Option<ColoredPiece>; Square::COUNT],
    pub(crate) side_to_move: Color,
    pub(crate) castling_info: castling::Info,
    pub(crate) castling_rights: castling::Rights,
    pub(crate) ep_target: Option<Square>,
    pub(crate) draw_clock: u16,
    pub(crate) plys_count: u16,
    pub(crate) frc: bool,
}

impl Fen {
    /// Converts a full-move number into the number of plys played before the position
    fn ply_count(move_number: u16, side_to_move: Color) -> u16 {
        move_number * 2 - match side_to_move {
            Color::White => 2,
            Color::Black => 1,
        }
    }
}

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::error::ParseFenError::*;

        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FieldCount);
        }

        // the board field: eight rank strings, top rank first
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != Rank::COUNT {
            return Err(ParseBoard);
        }

        let mut mailbox = [None; Square::COUNT];
        let mut white_king = None;
        let mut black_king = None;

        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = Rank::COUNT - 1 - i;
            let mut file = 0;

            for c in rank_str.chars() {
                match c {
                    '1'..='8' => {
                        file += c.to_digit(10).expect("INFALLIBLE") as usize;
                    }
                    _ => {
                        if file >= File::COUNT {
                            return Err(ParseBoard);
                        }

                        let piece: ColoredPiece = c.to_string().parse()?;
                        let sq = Square::try_from(rank * File::COUNT + file)
                            .expect("INFALLIBLE");

                        match piece {
                            ColoredPiece::WhiteKing => {
                                if white_king.replace(sq).is_some() {
                                    return Err(KingCount);
                                }
                            }
                            ColoredPiece::BlackKing => {
                                if black_king.replace(sq).is_some() {
                                    return Err(KingCount);
                                }
                            }
                            _ => {}
                        }

                        mailbox[sq as usize] = Some(piece);
                        file += 1;
                    }
                }

                if file > File::COUNT {
                    return Err(ParseBoard);
                }
            }

            if file != File::COUNT {
                return Err(ParseBoard);
            }
        }

        let white_king = white_king.ok_or(KingCount)?;
        let black_king = black_king.ok_or(KingCount)?;

        let side_to_move: Color = fields[1].parse()?;

        let (castling_info, castling_rights) =
            castling::Info::parse(fields[2], white_king, black_king)?;

        let ep_target = match fields[3] {
            "-" => None,
            sq => Some(sq.parse()?),
        };

        let draw_clock = fields[4].parse().map_err(|_| ParseHalfMoveClock)?;

        let move_number: u16 = fields[5].parse().map_err(|_| ParseMoveNumber)?;
        if move_number == 0 {
            return Err(ParseMoveNumber);
        }

        Ok(Fen {
            mailbox,
            side_to_move,
            frc: castling_info.is_chess960(),
            castling_info,
            castling_rights,
            ep_target,
            draw_clock,
            plys_count: Fen::ply_count(move_number, side_to_move),
        })
    }
}
