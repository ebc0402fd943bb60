//! カード本文に埋め込まれた将棋の局面（SFEN / KIF）を HTML の盤面図にする。
//!
//! ```
//! use shogiban_core::render_sfen_blocks;
//!
//! let html = render_sfen_blocks("[sfen]9/9/9/9/9/9/9/9/9 b - 1[/sfen]").unwrap();
//! assert!(html.contains("shogi_board"));
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod glyph;
pub mod kif;
pub mod render;
pub mod sfen;
pub mod substitute;
pub mod types;

pub use config::RenderConfig;
pub use diagnostics::{DiagnosticReport, DiagnosticsSink, LogDiagnostics, RecordingDiagnostics};
pub use error::{RenderError, RenderResult};
pub use kif::parse_kif;
pub use render::render_diagram;
pub use sfen::parse_sfen;
pub use substitute::{
    CardFaces, CardRenderer, Notation, render_kif_blocks, render_kif_blocks_with,
    render_sfen_blocks, render_sfen_blocks_with, substitute_blocks,
};
pub use types::{Board, Cell, Diagram, Hands, MochiEntry, PositionMeta, Side};
