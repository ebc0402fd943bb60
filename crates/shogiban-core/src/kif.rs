//! KIF 形式の局面図（BOD）から盤面図の中間表現を作る
//!
//! カードの本文は HTML なので、行は `<div>` か `<br>` で区切られている。
//! 罫線 `+-----` に挟まれた部分を盤面として読み、
//! `先手の持駒：` / `後手の持駒：` の行から持ち駒を読む。
//! 手数・手番は読まない。

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::config::RenderConfig;
use crate::types::{Board, Cell, Diagram, Hands, MochiEntry, PositionMeta, Side};

const GOTE_MOCHI_LABEL: &str = "後手の持駒";
const SENTE_MOCHI_LABEL: &str = "先手の持駒";
const NONE_MARKER: &str = "なし";
const MOVE_COUNT_LABEL: &str = "手数＝";
const SENTE_MOVE_MARKER: &str = "▲";
const BORDER: &str = "+-----";
const EMPTY_SQUARE: char = '・';
const GOTE_PIECE_MARKER: char = 'v';
const COLUMN_SEPARATOR: char = '|';
const LABEL_SEPARATOR: char = '：';
const MOCHI_SEPARATOR: char = '　';

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("invalid BR_RE pattern"));
static DIV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?div>").expect("invalid DIV_RE pattern"));

/// 行の区切り方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDelimiter {
    Div,
    Br,
    /// HTML を含まないテキスト（改行区切り）
    Newline,
}

impl LineDelimiter {
    /// `div` より `br` が多ければ `<br>` 区切りとみなす。
    ///
    /// 本文全体を `<div>` で包んだ状態で数える。
    pub fn detect(fragment: &str) -> Self {
        let lower = fragment.to_ascii_lowercase();
        if !lower.contains("<div") && !lower.contains("<br") {
            return LineDelimiter::Newline;
        }
        let divs = lower.matches("div").count() + 2;
        let brs = lower.matches("br").count();
        if divs < brs { LineDelimiter::Br } else { LineDelimiter::Div }
    }
}

/// 本文を論理行に分ける。
///
/// 区切りタグ以外のタグを含む行は読み飛ばす。
pub fn split_lines(fragment: &str) -> Vec<String> {
    let delimiter = LineDelimiter::detect(fragment);
    let normalized = BR_RE.replace_all(fragment, "<br>");
    let segments: Vec<&str> = match delimiter {
        LineDelimiter::Newline => normalized.lines().collect(),
        LineDelimiter::Div => DIV_RE.split(&normalized).collect(),
        LineDelimiter::Br => {
            return DIV_RE
                .replace_all(&normalized, "")
                .split("<br>")
                .filter_map(clean_line)
                .collect();
        }
    };
    segments.into_iter().filter_map(clean_line).collect()
}

fn clean_line(segment: &str) -> Option<String> {
    if segment.contains('<') {
        return None;
    }
    let line = segment.trim_end_matches(['\r', '\n']).replace("&nbsp;", " ");
    if line.trim().is_empty() { None } else { Some(line) }
}

/// 漢数字 1 文字の値（一〜十）。それ以外は 0。
pub fn kanji_num(c: char) -> u32 {
    match c {
        '一' => 1,
        '二' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        '十' => 10,
        _ => 0,
    }
}

/// 持駒の行（例: `後手の持駒：角　歩三`）を読む。
///
/// 各項目の枚数は漢数字の値の合計で、数字がなければ 1 枚。
pub fn parse_mochi_line(line: &str) -> Vec<MochiEntry> {
    let body = match line.find(LABEL_SEPARATOR) {
        Some(pos) => &line[pos + LABEL_SEPARATOR.len_utf8()..],
        None => line,
    };
    body.split(MOCHI_SEPARATOR)
        .filter_map(|item| {
            let symbol = item.chars().next()?;
            let count = match item.chars().map(kanji_num).sum::<u32>() {
                0 => 1,
                n => n,
            };
            Some(MochiEntry::new(symbol, count))
        })
        .collect()
}

/// 盤面の 1 段を読む。
///
/// 最初と 2 番目の `|` の間だけがマスで、`v` は次の駒が後手であることを表す。
fn parse_board_row(line: &str, board_reversed: bool) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(9);
    let mut separators = 0;
    let mut gote_piece = false;
    for c in line.chars() {
        if c == COLUMN_SEPARATOR {
            separators += 1;
            continue;
        }
        if separators != 1 {
            continue;
        }
        match c {
            GOTE_PIECE_MARKER => gote_piece = true,
            ' ' => {}
            _ => {
                let side = Side::from_reversed(gote_piece != board_reversed);
                gote_piece = false;
                let cell = if c == EMPTY_SQUARE {
                    Cell::blank(side)
                } else {
                    Cell::new(c, side, false)
                };
                cells.push(cell);
            }
        }
    }
    if board_reversed {
        cells.reverse();
    }
    cells
}

/// 手数の行に ▲ があれば、先手を上にした（先後反転の）図とみなす。
fn is_reversed_record(lines: &[String]) -> bool {
    lines
        .iter()
        .any(|line| line.contains(MOVE_COUNT_LABEL) && line.contains(SENTE_MOVE_MARKER))
}

/// KIF の局面図を読んで盤面図の中間表現を返す。
///
/// 読めない行は読み飛ばすだけで、失敗はしない。
pub fn parse_kif(fragment: &str, config: &RenderConfig) -> Diagram {
    let lines = split_lines(fragment);
    let reversed = is_reversed_record(&lines);

    let mut hands = Hands::default();
    let mut rows = Vec::new();
    let mut borders = 0;
    for line in &lines {
        if line.contains(GOTE_MOCHI_LABEL) && !line.contains(NONE_MARKER) {
            hands.gote.extend(parse_mochi_line(line));
        }
        if line.contains(SENTE_MOCHI_LABEL) && !line.contains(NONE_MARKER) {
            hands.sente.extend(parse_mochi_line(line));
        }
        if line.contains(BORDER) {
            borders += 1;
            continue;
        }
        if borders == 1 {
            rows.push(parse_board_row(line, reversed));
        }
    }

    let mut comment = String::new();
    if reversed {
        rows.reverse();
        hands.swap();
        comment.push_str(&config.reversed_comment);
    }
    debug!(
        "parsed kif: {} lines, {} rows, reversed={reversed}",
        lines.len(),
        rows.len()
    );

    Diagram {
        board: Board::new(rows),
        hands,
        meta: PositionMeta { move_count: String::new(), active: String::new(), comment },
    }
}
