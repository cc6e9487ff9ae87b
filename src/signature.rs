//! 仮想関数宣言の解析
//!
//! 複数行にまたがる `virtual` 宣言を、モックマクロに必要な部品に分解する。

use std::sync::OnceLock;

use regex::Regex;

use crate::style::MockStyle;

const VIRTUAL_TAG: &str = "virtual ";

/// 仮想関数のシグネチャ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualSignature {
    /// `virtual` より前のテキスト（インデント等）
    pub prefix: String,
    /// 戻り値の型
    pub return_type: String,
    /// 関数名
    pub name: String,
    /// 括弧込みの引数リスト（デフォルト引数は除去済み）
    pub args: String,
    /// 閉じ括弧から `;` までの修飾（`const`, `override`, `= 0` 等）
    pub qualifiers: String,
    /// `;` より後のテキスト
    pub suffix: String,
    /// 引数の数
    pub arity: usize,
}

fn function_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)$").expect("function name pattern"))
}

impl VirtualSignature {
    /// `virtual` 宣言をパース
    ///
    /// 戻り値の型と関数名に分けられない場合は `None`。
    pub fn parse(text: &str) -> Option<Self> {
        let start = text.find(VIRTUAL_TAG)?;
        let after_tag = start + VIRTUAL_TAG.len();
        let open = text[after_tag..].find('(')? + after_tag;
        let semi = text[open + 1..].find(';')? + open + 1;

        let type_and_name = text[after_tag..open].trim_end();
        let m = function_name_regex().find(type_and_name)?;
        let return_type = type_and_name[..m.start()].trim();
        if return_type.is_empty() || return_type.ends_with('~') {
            return None;
        }

        let mut args = &text[open..semi];
        let mut qualifiers = "";
        if let Some(close) = args.rfind(')') {
            if close > 0 {
                qualifiers = &args[close + 1..];
                args = &args[..=close];
            }
        }
        let args = strip_defaults(args);
        let arity = arity(&args);

        Some(Self {
            prefix: text[..start].to_string(),
            return_type: return_type.to_string(),
            name: m.as_str().to_string(),
            args,
            qualifiers: qualifiers.to_string(),
            suffix: text[semi + 1..].to_string(),
            arity,
        })
    }

    /// const メンバ関数か
    pub fn is_const(&self) -> bool {
        self.qualifiers.contains("const")
    }

    /// モックマクロ行に変換
    pub fn to_mock(&self, style: MockStyle) -> String {
        let call = style.mock_macro(
            &self.name,
            &self.return_type,
            &self.args,
            self.arity,
            self.is_const(),
        );
        format!("{}{}{}", self.prefix, call, self.suffix)
    }
}

/// デフォルト引数を取り除く
///
/// `(int a = 0, const char* s = "x")` -> `(int a, const char* s)`
pub fn strip_defaults(args: &str) -> String {
    let mut out = String::with_capacity(args.len());
    let mut depth = 0i32;
    let mut skip_at: Option<i32> = None;
    let mut in_str = false;

    for c in args.chars() {
        if in_str {
            if c == '"' {
                in_str = false;
            }
            if skip_at.is_none() {
                out.push(c);
            }
            continue;
        }
        match c {
            '"' => in_str = true,
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            _ => {}
        }
        if let Some(level) = skip_at {
            if (c == ',' && depth == level) || depth < level {
                skip_at = None;
                out.push(c);
            }
            continue;
        }
        if c == '=' && depth == 1 {
            out.truncate(out.trim_end().len());
            skip_at = Some(depth);
            continue;
        }
        out.push(c);
    }
    out
}

/// 引数の数を数える
///
/// 空リストと `(void)` は 0。テンプレート引数や入れ子の括弧の中のカンマは数えない。
pub fn arity(args: &str) -> usize {
    let inner = match (args.find('('), args.rfind(')')) {
        (Some(open), Some(close)) if open < close => &args[open + 1..close],
        _ => args,
    };
    let trimmed = inner.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return 0;
    }

    let mut depth = 0i32;
    let mut count = 1;
    for c in inner.chars() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}
