//! 盤面図の中間表現を HTML にする
//!
//! 出力の見た目は外部の CSS（`shogi_diagram`, `shogi_board`, `def`, `rev` など）に任せる。
//! 持ち駒がなくても表は省略しない。

use std::fmt::Write;

use crate::config::RenderConfig;
use crate::types::{Cell, Diagram, MochiEntry};

/// HTML の特殊文字をエスケープする
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// マスの CSS クラス
///
/// 向き（`def` / `rev`）に、成駒なら `promote`、2 文字の表示なら `press` を足す。
pub fn cell_classes(cell: &Cell) -> String {
    let mut classes = cell.side.css_class().to_string();
    if cell.promoted {
        classes.push_str(" promote");
    }
    if cell.text.chars().count() == 2 {
        classes.push_str(" press");
    }
    classes
}

fn write_cell(out: &mut String, cell: &Cell) {
    let text = if cell.text.is_empty() { " ".to_string() } else { escape_html(&cell.text) };
    let _ = write!(out, "<td class=\"{}\">{}</td>", cell_classes(cell), text);
}

fn write_mochi(out: &mut String, entries: &[MochiEntry]) {
    for entry in entries {
        let glyph = escape_html(&entry.glyph().to_string());
        let _ = write!(out, "<tr><td>{glyph}<span class=\"num\">{}</span></td></tr>", entry.count);
    }
}

/// 盤面図を HTML 断片にする
pub fn render_diagram(diagram: &Diagram, config: &RenderConfig) -> String {
    let mut gote = String::new();
    write_mochi(&mut gote, &diagram.hands.gote);
    let mut sente = String::new();
    write_mochi(&mut sente, &diagram.hands.sente);

    let mut rows = String::new();
    for row in &diagram.board.rows {
        rows.push_str("<tr>");
        for cell in row {
            write_cell(&mut rows, cell);
        }
        rows.push_str("</tr>\n");
    }

    let meta = &diagram.meta;
    format!(
        "\n\n<figure class=\"shogi_diagram\">\n\
         <table class=\"shogi_mochi_gote\">{gote}</table>\n\
         <table class=\"shogi_board\">{rows}</table>\n\
         <table class=\"shogi_mochi_sente\">{sente}</table>\n\
         <figcaption>\n\n\
         <span class=\"fen_extra count\">{count}{suffix}、{active}</span>\n\
         <br/>\n\
         <span class=\"fen_extra comment\"> {comment}</span>\n\
         </figcaption>\n\
         </figure>\n",
        count = escape_html(&meta.move_count),
        suffix = escape_html(&config.move_count_suffix),
        active = escape_html(&meta.active),
        comment = escape_html(&meta.comment),
    )
}
