//! SFEN 文字列から盤面図の中間表現を作る
//!
//! `<placement> <active> <mochi> <count>` の 4 フィールドを受け付ける。
//! 盤面は 2 パスで読む。
//!
//! 1. 元の文字列を走査し、マス番号ごとに成り / 後手の印を記録する
//!    （駒記号の大文字小文字は漢字に置き換えると失われるため）。
//! 2. 駒記号を漢字に置き換えた段ごとの文字列からマスを作り、
//!    1 で記録した印をマス番号で引き当てる。

use log::{debug, warn};

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::glyph::{promoted_glyph, substitute};
use crate::types::{
    BOARD_CELLS, BOARD_FILES, Board, Cell, Diagram, Hands, MochiEntry, PositionMeta, Side,
};

/// 持ち駒なしを表すフィールド
const NO_MOCHI: &str = "-";

/// 先手番を表す手番フィールド
const SENTE_TO_MOVE: &str = "b";

/// SFEN の 4 フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SfenFields<'a> {
    pub placement: &'a str,
    pub active: &'a str,
    pub mochi: &'a str,
    pub count: &'a str,
}

impl<'a> SfenFields<'a> {
    /// 空白区切りでちょうど 4 フィールドのときだけ `Some`
    pub fn split(text: &'a str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let fields = SfenFields {
            placement: tokens.next()?,
            active: tokens.next()?,
            mochi: tokens.next()?,
            count: tokens.next()?,
        };
        if tokens.next().is_some() {
            return None;
        }
        Some(fields)
    }
}

/// マス番号ごとの成り / 後手の印
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFlags {
    promoted: [bool; BOARD_CELLS],
    reversed: [bool; BOARD_CELLS],
}

impl CellFlags {
    /// 盤面フィールドを走査して印を集める。
    ///
    /// 数字はその数だけマス番号を進め、`/` は数えない。
    /// `+` は現在のマスに成りの印を付けて番号は進めない。
    /// 小文字は現在のマスに後手の印を付けてから 1 進める。
    /// 盤外を指す印は捨てる（マス数の検査で弾かれる）。
    pub fn scan(placement: &str) -> Self {
        let mut flags = CellFlags {
            promoted: [false; BOARD_CELLS],
            reversed: [false; BOARD_CELLS],
        };
        let mut index = 0usize;
        for c in placement.chars() {
            if let Some(n) = c.to_digit(10) {
                index += n as usize;
                continue;
            }
            match c {
                '/' => {}
                '+' => {
                    if let Some(flag) = flags.promoted.get_mut(index) {
                        *flag = true;
                    }
                }
                _ => {
                    if c.is_lowercase() {
                        if let Some(flag) = flags.reversed.get_mut(index) {
                            *flag = true;
                        }
                    }
                    index += 1;
                }
            }
        }
        flags
    }

    #[inline]
    pub fn promoted(&self, index: usize) -> bool {
        self.promoted.get(index).copied().unwrap_or(false)
    }

    #[inline]
    pub fn side(&self, index: usize) -> Side {
        Side::from_reversed(self.reversed.get(index).copied().unwrap_or(false))
    }
}

/// 1〜2 桁の数字を同じ数の空白に展開する
fn expand_empty_squares(row: &str) -> String {
    let mut out = String::with_capacity(row.len() + BOARD_FILES);
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c.to_digit(10) {
            Some(n) if n > 0 => {
                let mut count = n as usize;
                if let Some(d) = chars.peek().and_then(|next| next.to_digit(10)) {
                    count = count * 10 + d as usize;
                    chars.next();
                }
                out.extend(std::iter::repeat_n(' ', count));
            }
            _ => out.push(c),
        }
    }
    out
}

/// 盤面フィールドから 81 マスの盤面を作る
pub fn parse_placement(placement: &str) -> RenderResult<Board> {
    let flags = CellFlags::scan(placement);
    let mut cells = Vec::with_capacity(BOARD_CELLS);

    for (row_idx, row) in placement.split('/').enumerate() {
        if cells.len() % BOARD_FILES != 0 {
            return Err(RenderError::MisalignedRow { row: row_idx + 1, index: cells.len() });
        }
        let substituted: String = row.chars().map(substitute).collect();
        let mut pending_promote = false;
        for c in expand_empty_squares(&substituted).chars() {
            if c == '+' {
                pending_promote = true;
                continue;
            }
            let glyph = if pending_promote { promoted_glyph(c).unwrap_or(c) } else { c };
            pending_promote = false;

            let index = cells.len();
            let side = flags.side(index);
            let cell = if glyph == ' ' {
                Cell::blank(side)
            } else {
                Cell::new(glyph, side, flags.promoted(index))
            };
            cells.push(cell);
        }
    }

    if cells.len() != BOARD_CELLS {
        return Err(RenderError::BoardSize { cells: cells.len() });
    }
    Ok(Board::from_cells(cells))
}

/// 持ち駒フィールドを読む（例: `"2Pb"`、持ち駒なしは `"-"`）。
///
/// 数字が前置されていなければ 1 枚。大文字は先手、小文字は後手。
pub fn parse_mochi(field: &str) -> Hands {
    let mut hands = Hands::default();
    if field == NO_MOCHI {
        return hands;
    }
    let mut count: Option<u32> = None;
    for c in field.chars() {
        if let Some(d) = c.to_digit(10) {
            count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(d));
            continue;
        }
        let entry = MochiEntry::new(c.to_ascii_lowercase(), count.take().unwrap_or(1));
        if c.is_lowercase() {
            hands.gote.push(entry);
        } else {
            hands.sente.push(entry);
        }
    }
    hands
}

/// SFEN を読んで盤面図の中間表現を返す。
///
/// フィールド数が 4 でなければ `Ok(None)`（呼び出し側は元の文字列を残す）。
pub fn parse_sfen(text: &str, config: &RenderConfig) -> RenderResult<Option<Diagram>> {
    let Some(fields) = SfenFields::split(text) else {
        warn!("sfen block does not have 4 fields, leaving it as is: {:?}", text.trim());
        return Ok(None);
    };

    let board = parse_placement(fields.placement)?;
    let hands = parse_mochi(fields.mochi);
    let active = if fields.active == SENTE_TO_MOVE {
        config.sente_to_move.clone()
    } else {
        config.gote_to_move.clone()
    };
    debug!(
        "parsed sfen: placement={} active={} mochi={} count={}",
        fields.placement, fields.active, fields.mochi, fields.count
    );

    Ok(Some(Diagram {
        board,
        hands,
        meta: PositionMeta {
            move_count: fields.count.to_string(),
            active,
            comment: String::new(),
        },
    }))
}
