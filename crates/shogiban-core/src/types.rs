//! パーサと描画の間で受け渡す中間表現

use serde::Serialize;

use crate::glyph::piece_glyph;

/// 盤の一辺のマス数
pub const BOARD_FILES: usize = 9;

/// 盤面のマス数
pub const BOARD_CELLS: usize = BOARD_FILES * BOARD_FILES;

/// 駒の向き（通常 / 上下反転）
///
/// 反転は後手の駒で、図では逆さに描く。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Normal,
    Reversed,
}

impl Side {
    #[inline]
    pub const fn from_reversed(reversed: bool) -> Side {
        if reversed { Side::Reversed } else { Side::Normal }
    }

    /// CSS クラス名
    #[inline]
    pub const fn css_class(self) -> &'static str {
        match self {
            Side::Normal => "def",
            Side::Reversed => "rev",
        }
    }
}

/// 盤面の1マス
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Cell {
    /// 表示文字列（空きマスは空文字列）
    pub text: String,
    pub side: Side,
    pub promoted: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>, side: Side, promoted: bool) -> Self {
        Self { text: text.into(), side, promoted }
    }

    /// 空きマス
    pub fn blank(side: Side) -> Self {
        Self { text: String::new(), side, promoted: false }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// 盤面（上の段から順に、各段は左のマスから順に並ぶ）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Board {
    pub rows: Vec<Vec<Cell>>,
}

impl Board {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// 81 マスを 9 マスずつの段に分けて盤面にする
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut rows = Vec::with_capacity(BOARD_FILES);
        let mut iter = cells.into_iter().peekable();
        while iter.peek().is_some() {
            rows.push(iter.by_ref().take(BOARD_FILES).collect());
        }
        Self { rows }
    }

    /// 行優先で全マスを走査する
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }
}

/// 持ち駒 1 種類分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MochiEntry {
    /// SFEN なら小文字の駒記号、KIF なら駒の漢字
    pub symbol: char,
    pub count: u32,
}

impl MochiEntry {
    pub const fn new(symbol: char, count: u32) -> Self {
        Self { symbol, count }
    }

    /// 表示用の漢字（変換できない記号はそのまま）
    pub fn glyph(&self) -> char {
        piece_glyph(self.symbol).unwrap_or(self.symbol)
    }
}

/// 両者の持ち駒（入力に現れた順）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Hands {
    pub sente: Vec<MochiEntry>,
    pub gote: Vec<MochiEntry>,
}

impl Hands {
    /// 先手と後手を入れ替える
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.sente, &mut self.gote);
    }
}

/// 図の見出しに出す付帯情報
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PositionMeta {
    /// 手数（不明なら空）
    pub move_count: String,
    /// 手番の表示文字列（不明なら空）
    pub active: String,
    /// 自由記述の注記
    pub comment: String,
}

/// パーサの出力であり描画の入力
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Diagram {
    pub board: Board,
    pub hands: Hands,
    pub meta: PositionMeta,
}
