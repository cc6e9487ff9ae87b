//! 生成設定
//!
//! 既定値、TOML 設定ファイル、コマンドライン引数の順に上書きする。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::style::MockStyle;

/// モックの既定出力先
pub const DEFAULT_MOCK_DIR: &str = "test/test/mock";
/// 比較関数の既定出力先
pub const DEFAULT_EQ_DIR: &str = "test/test/compare";
/// 既定の設定ファイル名
pub const DEFAULT_CONFIG_FILE: &str = "gmockgen.toml";

/// 生成の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// モックマクロのスタイル
    pub style: MockStyle,
    /// モックの出力ディレクトリ（ルートからの相対）
    pub mock_dir: PathBuf,
    /// 比較関数の出力ディレクトリ（ルートからの相対）
    pub eq_dir: PathBuf,
    /// モックファイル名の接頭辞
    pub mock_prefix: String,
    /// 比較関数ファイル名の接頭辞
    pub eq_prefix: String,
    /// ファイル先頭のコメントに入れる作成者
    pub user: Option<String>,
    /// ファイル先頭のコメントに入れる組織名
    pub organization: Option<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            style: MockStyle::Old,
            mock_dir: PathBuf::from(DEFAULT_MOCK_DIR),
            eq_dir: PathBuf::from(DEFAULT_EQ_DIR),
            mock_prefix: "mock_".to_string(),
            eq_prefix: "eq_".to_string(),
            user: None,
            organization: None,
        }
    }
}

/// 設定ファイルの内容（すべて省略可）
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    style: Option<String>,
    mock_dir: Option<PathBuf>,
    eq_dir: Option<PathBuf>,
    mock_prefix: Option<String>,
    eq_prefix: Option<String>,
    user: Option<String>,
    organization: Option<String>,
}

impl GenConfig {
    /// TOML 文字列から読み込む
    ///
    /// スタイルはここで検証する。
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::default();
        if let Some(style) = file.style {
            config.style = style.parse()?;
        }
        if let Some(dir) = file.mock_dir {
            config.mock_dir = dir;
        }
        if let Some(dir) = file.eq_dir {
            config.eq_dir = dir;
        }
        if let Some(prefix) = file.mock_prefix {
            config.mock_prefix = prefix;
        }
        if let Some(prefix) = file.eq_prefix {
            config.eq_prefix = prefix;
        }
        config.user = file.user;
        config.organization = file.organization;
        Ok(config)
    }

    /// 設定ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Self::from_toml(&text)
    }

    /// `root` 直下の既定ファイルがあれば読み込み、無ければ既定値
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// モックの出力先
    ///
    /// 相対パスは `root` 基準で解決する。
    pub fn mock_out_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.mock_dir)
    }

    /// 比較関数の出力先
    pub fn eq_out_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.eq_dir)
    }
}

/// GenConfigのビルダー
pub struct GenConfigBuilder {
    config: GenConfig,
}

impl GenConfigBuilder {
    /// 既定値からビルダーを作成
    pub fn new() -> Self {
        Self {
            config: GenConfig::default(),
        }
    }

    /// 既存の設定から作成
    pub fn from_config(config: GenConfig) -> Self {
        Self { config }
    }

    /// スタイルを設定
    pub fn style(mut self, style: MockStyle) -> Self {
        self.config.style = style;
        self
    }

    /// スタイルを文字列で設定（不明な値はエラー）
    pub fn style_str(self, style: &str) -> Result<Self, ConfigError> {
        Ok(self.style(style.parse()?))
    }

    /// モックの出力先
    pub fn mock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.mock_dir = dir.into();
        self
    }

    /// 比較関数の出力先
    pub fn eq_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.eq_dir = dir.into();
        self
    }

    /// 作成者
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = Some(user.into());
        self
    }

    /// 組織名
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.config.organization = Some(organization.into());
        self
    }

    /// 設定を構築
    pub fn build(self) -> GenConfig {
        self.config
    }
}

impl Default for GenConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
