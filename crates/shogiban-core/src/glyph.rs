//! 駒文字と表示用漢字の対応表

/// SFEN の駒記号（小文字）と表示用漢字
const PIECE_GLYPHS: [(char, char); 8] = [
    ('k', '玉'),
    ('g', '金'),
    ('s', '銀'),
    ('n', '桂'),
    ('l', '香'),
    ('b', '角'),
    ('r', '飛'),
    ('p', '歩'),
];

/// 成る前の漢字と成駒の漢字
const PROMOTED_GLYPHS: [(char, char); 6] = [
    ('銀', '全'),
    ('桂', '圭'),
    ('香', '杏'),
    ('角', '馬'),
    ('飛', '龍'),
    ('歩', 'と'),
];

/// 駒記号を表示用漢字に変換する（大文字小文字は区別しない）。
///
/// 未知の文字は `None`。
#[inline]
pub fn piece_glyph(symbol: char) -> Option<char> {
    let lower = symbol.to_ascii_lowercase();
    PIECE_GLYPHS.iter().find(|(s, _)| *s == lower).map(|(_, g)| *g)
}

/// 成駒の漢字を返す。成れない駒や未知の文字は `None`。
#[inline]
pub fn promoted_glyph(glyph: char) -> Option<char> {
    PROMOTED_GLYPHS.iter().find(|(g, _)| *g == glyph).map(|(_, p)| *p)
}

/// 駒記号を表示用の文字に置き換える。
///
/// 英字は小文字化してから変換し、表にない英字は小文字のまま残す。
/// 英字以外はそのまま返す。
pub fn substitute(c: char) -> char {
    if c.is_ascii_alphabetic() {
        piece_glyph(c).unwrap_or(c.to_ascii_lowercase())
    } else {
        c
    }
}
