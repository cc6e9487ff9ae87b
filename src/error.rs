use std::path::PathBuf;

use thiserror::Error;

/// 設定エラー
///
/// 解析を始める前に検出されるもの。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 不明なモックスタイル（"old" / "new" 以外）
    #[error("Unknown style '{0}'")]
    UnknownStyle(String),
    /// 設定ファイルの読み込み失敗
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML のパースエラー
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 生成処理のエラー
#[derive(Debug, Error)]
pub enum GenError {
    /// 指定行に宣言が見つからない
    #[error("Failed to parseCode with startTag \"{start_tag}\"")]
    Locate { start_tag: String },
    /// モックコードが空になった
    #[error("Failed to translate gmock code")]
    MockCode,
    /// クラス名を復元できなかった
    #[error("Failed to translate gmock className")]
    MockClassName,
    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 出力ファイルの書き込みエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// 宣言の位置特定に失敗したエラーを作成
    pub fn locate(start_tag: &str) -> Self {
        GenError::Locate {
            start_tag: start_tag.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, GenError>;
