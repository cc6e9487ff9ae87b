//! 宣言の位置特定
//!
//! ソース全体と開始行から、対象の class / struct 宣言の範囲を切り出す。
//! 開始行より前の行からは名前空間とインクルードガードを復元する。

use tracing::{debug, trace};

/// インクルードガードの識別子
pub const HEADER_GUARD_TAG: &str = "_H_";

const NAMESPACE_TAG: &str = "namespace ";

/// 切り出された宣言
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSpan {
    /// 開始行（0始まり）
    pub start_line: usize,
    /// 宣言のテキスト（波括弧が閉じるまで）
    pub code: Option<String>,
    /// 囲んでいる名前空間
    pub namespace: Option<String>,
    /// インクルードガード（`_H_` で終わる形に正規化済み）
    pub header_guard: Option<String>,
    /// 宣言された型名
    pub name: Option<String>,
}

/// 宣言範囲を切り出す
///
/// `start_tag` は `"class "` または `"struct "`。開始行に `start_tag` が無い場合や、
/// 波括弧が開かない・閉じない場合は `code` が `None` になる。
pub fn locate(full_text: &str, start_tag: &str, start_line: usize) -> SourceSpan {
    let mut span = SourceSpan {
        start_line,
        ..Default::default()
    };
    let lines: Vec<&str> = full_text.split('\n').collect();

    for line in lines.iter().take(start_line) {
        if span.namespace.is_none() {
            span.namespace = parse_namespace(line);
        }
        if span.header_guard.is_none() {
            span.header_guard = parse_header_guard(line);
        }
    }

    let Some(first) = lines.get(start_line) else {
        debug!(start_line, "start line is past the end of input");
        return span;
    };
    if !first.contains(start_tag) {
        debug!(start_line, start_tag, "no declaration on start line");
        return span;
    }
    span.name = parse_declared_name(first, start_tag);

    let mut code = String::new();
    let mut depth: i32 = 0;
    let mut entered = false;
    let mut closed = false;
    for line in &lines[start_line..] {
        if line.contains('{') {
            depth += 1;
            entered = true;
        }
        if line.contains('}') {
            depth -= 1;
        }
        if entered && depth <= 0 {
            code.push_str(line);
            closed = true;
            break;
        }
        code.push_str(line);
        code.push('\n');
    }

    if closed {
        trace!(lines = code.lines().count(), name = ?span.name, "declaration located");
        span.code = Some(code);
    } else {
        debug!(start_line, entered, "declaration braces not balanced");
    }
    span
}

/// `namespace foo {` から名前を取り出す
///
/// 無名名前空間は `None` になり、走査は次の名前空間へ進む。
fn parse_namespace(line: &str) -> Option<String> {
    let start = line.find(NAMESPACE_TAG)? + NAMESPACE_TAG.len();
    let end = line[start..].find('{')? + start;
    non_empty(&line[start..end])
}

/// `#ifndef FOO_BAR_H_` からガードを取り出す
///
/// `_H_` の直前の空白からガード末尾までを切り出し、`_H_` を付け直す。
fn parse_header_guard(line: &str) -> Option<String> {
    let tag = line.find(HEADER_GUARD_TAG)?;
    let space = line[..=tag].rfind(' ')?;
    Some(format!("{}{}", line[space..tag].trim(), HEADER_GUARD_TAG))
}

/// 開始行から型名を取り出す
///
/// 継承リストの `:` があればそこまで、無ければ `{` まで。
pub fn parse_declared_name(line: &str, start_tag: &str) -> Option<String> {
    let start = line.find(start_tag)? + start_tag.len();
    let rest = &line[start..];
    let end = rest.find(':').or_else(|| rest.find('{'))?;
    non_empty(&rest[..end])
}

/// 無名（空白のみ）は名前なしとみなす
fn non_empty(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
