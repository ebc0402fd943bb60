//! カード本文中の `[sfen]...[/sfen]` / `[kif]...[/kif]` を盤面図に置き換える

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use log::{debug, error};
use regex::Regex;
use serde::Serialize;

use crate::config::RenderConfig;
use crate::diagnostics::{DiagnosticsSink, LogDiagnostics};
use crate::error::{RenderError, RenderResult};
use crate::kif::parse_kif;
use crate::render::render_diagram;
use crate::sfen::parse_sfen;

static SFEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\[sfen\](.+?)\[/sfen\]").expect("invalid SFEN_BLOCK_RE pattern")
});
static KIF_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\[kif\](.+?)\[/kif\]").expect("invalid KIF_BLOCK_RE pattern")
});

/// 置き換え対象の記法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    Sfen,
    Kif,
}

impl Notation {
    /// カードに適用する順
    pub const ALL: [Notation; 2] = [Notation::Sfen, Notation::Kif];

    pub const fn tag(self) -> &'static str {
        match self {
            Notation::Sfen => "sfen",
            Notation::Kif => "kif",
        }
    }

    fn block_re(self) -> &'static Regex {
        match self {
            Notation::Sfen => &SFEN_BLOCK_RE,
            Notation::Kif => &KIF_BLOCK_RE,
        }
    }

    /// ブロックの中身を HTML にする。`None` なら元の文字列を残す。
    fn render_block(self, inner: &str, config: &RenderConfig) -> RenderResult<Option<String>> {
        let diagram = match self {
            Notation::Sfen => match parse_sfen(inner, config)? {
                Some(diagram) => diagram,
                None => return Ok(None),
            },
            Notation::Kif => parse_kif(inner, config),
        };
        Ok(Some(render_diagram(&diagram, config)))
    }
}

/// 本文中の `notation` のブロックをすべて置き換える。
///
/// 1 つでも失敗すれば置換結果は捨ててエラーを返す。
pub fn substitute_blocks(
    text: &str,
    notation: Notation,
    config: &RenderConfig,
) -> RenderResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut blocks = 0usize;
    for caps in notation.block_re().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        match notation.render_block(inner.as_str(), config)? {
            Some(html) => out.push_str(&html),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
        blocks += 1;
    }
    out.push_str(&text[last..]);
    if blocks > 0 {
        debug!("rendered {blocks} [{}] block(s)", notation.tag());
    }
    Ok(out)
}

/// `[sfen]` ブロックを既定の文言で置き換える
pub fn render_sfen_blocks(text: &str) -> RenderResult<String> {
    render_sfen_blocks_with(text, &RenderConfig::default())
}

pub fn render_sfen_blocks_with(text: &str, config: &RenderConfig) -> RenderResult<String> {
    substitute_blocks(text, Notation::Sfen, config)
}

/// `[kif]` ブロックを既定の文言で置き換える
pub fn render_kif_blocks(text: &str) -> RenderResult<String> {
    render_kif_blocks_with(text, &RenderConfig::default())
}

pub fn render_kif_blocks_with(text: &str, config: &RenderConfig) -> RenderResult<String> {
    substitute_blocks(text, Notation::Kif, config)
}

/// カードの表面（問題）と裏面（解答）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CardFaces {
    pub question: String,
    pub answer: String,
}

impl CardFaces {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// カード描画のたびに呼ばれる置換処理。
///
/// 記法ごとに 1 段ずつ（SFEN → KIF）置き換える。各段は両面まとめて
/// 成功したときだけ反映し、失敗したら診断先に段の開始時点の本文を渡して
/// その段を取りやめる。
pub struct CardRenderer<S = LogDiagnostics> {
    config: RenderConfig,
    sink: S,
    notations: Vec<Notation>,
}

impl Default for CardRenderer<LogDiagnostics> {
    fn default() -> Self {
        Self::new(RenderConfig::default(), LogDiagnostics)
    }
}

impl<S: DiagnosticsSink> CardRenderer<S> {
    pub fn new(config: RenderConfig, sink: S) -> Self {
        Self { config, sink, notations: Notation::ALL.to_vec() }
    }

    /// 適用する記法を絞る
    pub fn with_notations(mut self, notations: &[Notation]) -> Self {
        self.notations = notations.to_vec();
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn render(&self, faces: CardFaces) -> CardFaces {
        self.notations.iter().fold(faces, |faces, &notation| self.render_stage(notation, faces))
    }

    fn render_stage(&self, notation: Notation, faces: CardFaces) -> CardFaces {
        let result = catch_unwind(AssertUnwindSafe(|| -> RenderResult<CardFaces> {
            Ok(CardFaces {
                question: substitute_blocks(&faces.question, notation, &self.config)?,
                answer: substitute_blocks(&faces.answer, notation, &self.config)?,
            })
        }))
        .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(rendered) => rendered,
            Err(err) => {
                error!("failed to render [{}] blocks: {err}", notation.tag());
                self.sink.report(&faces.question, &faces.answer, &err);
                faces
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;

    const EMPTY_BOARD: &str = "[sfen]9/9/9/9/9/9/9/9/9 b - 1[/sfen]";

    #[test]
    fn test_text_without_blocks_is_unchanged() {
        let text = "<div>no diagrams here [sfen] but unclosed</div>";
        assert_eq!(render_sfen_blocks(text).unwrap(), text);
        assert_eq!(render_kif_blocks(text).unwrap(), text);
    }

    #[test]
    fn test_surrounding_text_is_kept() {
        let out = render_sfen_blocks(&format!("before {EMPTY_BOARD} after")).unwrap();
        assert!(out.starts_with("before \n\n<figure class=\"shogi_diagram\">"));
        assert!(out.ends_with("</figure>\n after"));
    }

    #[test]
    fn test_tags_are_case_insensitive_and_multiline() {
        let out = render_sfen_blocks("[SFEN]9/9/9/9/9/9/9/9/9\nb - 1[/Sfen]").unwrap();
        assert!(out.contains("shogi_board"));
        assert!(!out.contains("[SFEN]"));
    }

    #[test]
    fn test_non_greedy_match() {
        let text = format!("{EMPTY_BOARD} middle {EMPTY_BOARD}");
        let out = render_sfen_blocks(&text).unwrap();
        assert_eq!(out.matches("<figure").count(), 2);
        assert!(out.contains(" middle "));
    }

    #[test]
    fn test_passthrough_keeps_original_block() {
        let text = "x [sfen]9/9/9/9/9/9/9/9/9 b -[/sfen] y";
        assert_eq!(render_sfen_blocks(text).unwrap(), text);
    }

    #[test]
    fn test_stage_failure_leaves_both_faces_untouched() {
        let sink = RecordingDiagnostics::new();
        let renderer = CardRenderer::new(RenderConfig::default(), &sink);
        let faces = CardFaces::new(EMPTY_BOARD, "[sfen]8/9/9/9/9/9/9/9/9 b - 1[/sfen]");

        let out = renderer.render(faces.clone());
        assert_eq!(out, faces);

        let reports = sink.take();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].question, faces.question);
        assert_eq!(reports[0].answer, faces.answer);
    }

    #[test]
    fn test_with_notations_limits_stages() {
        let renderer = CardRenderer::<LogDiagnostics>::default().with_notations(&[Notation::Kif]);
        let faces = CardFaces::new(EMPTY_BOARD, "");
        assert_eq!(renderer.render(faces.clone()), faces);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }
}
