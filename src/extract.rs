//! 新規ファイルへの切り出し
//!
//! 宣言の位置特定、モック変換、比較関数生成をつなぎ、
//! ヘッダ本体とソース本体のテキストを返す。ファイル書き込みは `scaffold` が行う。

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::equality;
use crate::error::{GenError, Result};
use crate::fields::struct_fields;
use crate::locator::{HEADER_GUARD_TAG, locate};
use crate::mock::to_mock;
use crate::style::MockStyle;

/// `class ` 宣言の開始タグ
pub const CLASS_START_TAG: &str = "class ";
/// `struct ` 宣言の開始タグ
pub const STRUCT_START_TAG: &str = "struct ";

/// 切り出し結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractData {
    /// 出力ファイルのベース名（`MyStruct` -> `my_struct`）
    pub file_name: String,
    /// ヘッダ本体
    pub header_body: String,
    /// ソース本体
    pub source_body: String,
}

/// 切り出しの結果（成功またはエラー）
pub type ExtractResult = Result<ExtractData>;

/// モックヘッダに常に含めるヘッダ
const MOCK_BASE_HEADERS: &[&str] = &["<gmock/gmock.h>", "<cstring>"];

/// 本文に現れる語と、必要な標準ヘッダ
const STD_HEADER_HINTS: &[(&str, &str)] = &[
    ("list<", "<list>"),
    ("map<", "<map>"),
    ("_ptr", "<memory>"),
    ("queue<", "<queue>"),
    ("string", "<string>"),
    ("unordered_map<", "<unordered_map>"),
    ("vector<", "<vector>"),
];

fn camel_boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\S)([A-Z])").expect("camel boundary pattern"))
}

/// 型名からファイル名を作る
///
/// 語中の大文字の前に `_` を入れて小文字化する。
pub fn file_base_name(type_name: &str) -> String {
    camel_boundary_regex()
        .replace_all(type_name, "${1}_${2}")
        .to_lowercase()
}

/// インクルードガードからインクルードパスを作る
///
/// `EXAMPLE_CPP_FOO_H_` -> `example/cpp/foo.h`
pub fn header_include(header_guard: &str) -> String {
    header_guard
        .replacen(HEADER_GUARD_TAG, ".h", 1)
        .replace('_', "/")
        .to_lowercase()
}

/// 名前空間で囲む
pub fn wrap_namespace(code: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("namespace {ns} {{\n\n{code}\n\n}}  // namespace {ns}"),
        None => code.to_string(),
    }
}

/// モックヘッダに必要な `#include` 対象を列挙
pub fn mock_headers(mock_code: &str, header_guard: Option<&str>) -> Vec<String> {
    let mut headers: Vec<String> = MOCK_BASE_HEADERS.iter().map(|h| h.to_string()).collect();
    for (hint, header) in STD_HEADER_HINTS {
        if mock_code.contains(hint) {
            headers.push(header.to_string());
        }
    }
    if let Some(guard) = header_guard {
        headers.push(format!("\"{}\"", header_include(guard)));
    }
    headers
}

fn merge_code(headers: &[String], code: &str, namespace: Option<&str>) -> String {
    let includes: Vec<String> = headers.iter().map(|h| format!("#include {h}")).collect();
    format!("{}\n\n{}", includes.join("\n"), wrap_namespace(code, namespace))
}

/// 構造体の `operator==` と `PrintTo` を切り出す
pub fn extract_eq_class(full_text: &str, start_tag: &str, start_line: usize) -> ExtractResult {
    let span = locate(full_text, start_tag, start_line);
    let (Some(code), Some(struct_name)) = (span.code.as_deref(), span.name.as_deref()) else {
        return Err(GenError::locate(start_tag));
    };

    let fields = struct_fields(code);
    debug!(struct_name, fields = fields.len(), "generating equality helpers");
    let generated = equality::generate(struct_name, &fields);

    let namespace = span.namespace.as_deref();
    let mut header_body = wrap_namespace(&generated.declarations, namespace);
    let source_body = wrap_namespace(&generated.definitions, namespace);
    if let Some(guard) = span.header_guard.as_deref() {
        header_body = format!("#include \"{}\"\n\n{header_body}", header_include(guard));
    }
    header_body = format!("#include <sstream>\n\n{header_body}");

    Ok(ExtractData {
        file_name: file_base_name(struct_name),
        header_body,
        source_body,
    })
}

/// モッククラスを切り出す
pub fn extract_mock_class(
    full_text: &str,
    start_tag: &str,
    start_line: usize,
    style: MockStyle,
) -> ExtractResult {
    let span = locate(full_text, start_tag, start_line);
    let Some(code) = span.code.as_deref() else {
        return Err(GenError::locate(start_tag));
    };

    let mock = to_mock(code, style);
    if mock.code.is_empty() {
        return Err(GenError::MockCode);
    }
    let Some(class_name) = mock.class_name.as_deref() else {
        return Err(GenError::MockClassName);
    };
    debug!(class_name, constructors = mock.constructors.len(), "mock class generated");

    let namespace = span.namespace.as_deref();
    let headers = mock_headers(&mock.code, span.header_guard.as_deref());
    let header_body = merge_code(&headers, &mock.code, namespace);

    let mut impls = mock.constructors.clone();
    impls.push(format!("Mock{class_name}::~Mock{class_name}() {{}}"));
    let source_body = wrap_namespace(&impls.join("\n"), namespace);

    Ok(ExtractData {
        file_name: file_base_name(class_name),
        header_body,
        source_body,
    })
}

/// 選択範囲をモックに置き換える
///
/// 変換結果が空の場合のみエラー。クラス名が取れなくてもテキストは返す。
pub fn replace_mock(selection: &str, style: MockStyle) -> Result<String> {
    let mock = to_mock(selection, style);
    if mock.code.is_empty() {
        return Err(GenError::MockCode);
    }
    Ok(mock.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_base_name() {
        assert_eq!(file_base_name("MyStruct"), "my_struct");
        assert_eq!(file_base_name("Foo"), "foo");
        assert_eq!(file_base_name("HTTPServer"), "h_tt_pserver");
    }

    #[test]
    fn test_header_include() {
        assert_eq!(header_include("EXAMPLE_CPP_MY_STRUCT_H_"), "example/cpp/my/struct.h");
        assert_eq!(header_include("BASE_FOO_H_"), "base/foo.h");
    }

    #[test]
    fn test_wrap_namespace() {
        assert_eq!(wrap_namespace("x", None), "x");
        assert_eq!(wrap_namespace("x", Some("wq")), "namespace wq {\n\nx\n\n}  // namespace wq");
    }

    #[test]
    fn test_mock_headers() {
        let h = mock_headers("std::unordered_map<std::string, int> m;", Some("A_B_H_"));
        assert_eq!(
            h,
            vec![
                "<gmock/gmock.h>",
                "<cstring>",
                "<map>",
                "<string>",
                "<unordered_map>",
                "\"a/b.h\"",
            ]
        );
    }

    #[test]
    fn test_extract_eq_requires_name() {
        let err = extract_eq_class("int x;\n", STRUCT_START_TAG, 0).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parseCode with startTag \"struct \"");
    }

    #[test]
    fn test_extract_mock_without_class_header() {
        let err = extract_mock_class("struct Foo {\n  virtual void A();\n};", "struct ", 0, MockStyle::Old)
            .unwrap_err();
        assert!(matches!(err, GenError::MockClassName));
    }

    #[test]
    fn test_replace_mock_empty() {
        assert!(matches!(replace_mock("", MockStyle::Old), Err(GenError::MockCode)));
    }
}
