//! 描画エラー
//!
//! 置換処理を中断させる致命的なエラーのみを表す。
//! フィールド数の不一致や未知の駒文字は、エラーではなく素通しで扱う。

/// 盤面図の生成に失敗したときのエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// 段の先頭が 9 の倍数のマスから始まっていない
    #[error("rank {row} starts at cell {index}, expected a multiple of 9")]
    MisalignedRow { row: usize, index: usize },

    /// 盤面のマス数が 81 ではない
    #[error("board has {cells} cells, expected 81")]
    BoardSize { cells: usize },

    /// 置換処理の途中で panic した
    #[error("render panicked: {0}")]
    Panicked(String),
}

/// 描画処理の Result 型
pub type RenderResult<T> = Result<T, RenderError>;
