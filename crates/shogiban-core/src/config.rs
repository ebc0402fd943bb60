//! 図に出す文言の設定

use serde::{Deserialize, Serialize};

/// 描画時の表示文言
///
/// 省略したキーは既定値（日本語）になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// 先手番のときの手番表示
    pub sente_to_move: String,
    /// 後手番のときの手番表示
    pub gote_to_move: String,
    /// 手数の後ろに付ける文字列
    pub move_count_suffix: String,
    /// KIF の盤面が先後反転していたときの注記
    pub reversed_comment: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sente_to_move: "先手番です".to_string(),
            gote_to_move: "後手番です".to_string(),
            move_count_suffix: "手目".to_string(),
            reversed_comment: "(先後反転)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let cfg: RenderConfig = toml::from_str("sente_to_move = \"Black to move\"\n").unwrap();
        assert_eq!(cfg.sente_to_move, "Black to move");
        assert_eq!(cfg.gote_to_move, "後手番です");
        assert_eq!(cfg.reversed_comment, "(先後反転)");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let cfg: RenderConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, RenderConfig::default());
    }
}
