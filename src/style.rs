//! モックマクロの書式

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// モックマクロのスタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MockStyle {
    /// `MOCK_METHOD<n>` / `MOCK_CONST_METHOD<n>`
    #[default]
    Old,
    /// `MOCK_METHOD(ret, name, (args), (quals))`
    New,
}

impl FromStr for MockStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old" => Ok(MockStyle::Old),
            "new" => Ok(MockStyle::New),
            other => Err(ConfigError::UnknownStyle(other.to_string())),
        }
    }
}

impl fmt::Display for MockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockStyle::Old => write!(f, "old"),
            MockStyle::New => write!(f, "new"),
        }
    }
}

impl MockStyle {
    /// マクロ呼び出し部分を組み立てる（前置テキストと後続テキストは含まない）
    ///
    /// `args` は括弧込みの引数リスト。
    pub fn mock_macro(
        self,
        name: &str,
        return_type: &str,
        args: &str,
        arity: usize,
        is_const: bool,
    ) -> String {
        match self {
            MockStyle::Old => {
                let qualifier = if is_const { "_CONST" } else { "" };
                format!("MOCK{qualifier}_METHOD{arity}({name}, {return_type}{args});")
            }
            MockStyle::New => {
                let quals = if is_const { "(const, override)" } else { "(override)" };
                format!(
                    "MOCK_METHOD({}, {name}, {args}, {quals});",
                    protect_commas(return_type)
                )
            }
        }
    }
}

/// 丸括弧で守られていないカンマを含む型を括弧で囲む
///
/// プリプロセッサは `<>` の中のカンマもマクロ引数の区切りとみなす。
fn protect_commas(ty: &str) -> String {
    let mut depth = 0i32;
    for c in ty.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => return format!("({ty})"),
            _ => {}
        }
    }
    ty.to_string()
}
