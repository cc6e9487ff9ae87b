//! C++ gmock generator
//!
//! C++ のクラス宣言からモッククラス（gmock）を、構造体宣言から
//! `operator==` と `PrintTo` を生成するツール。
//! 構文解析は行わず、行単位の走査と正規表現で宣言を読む。

pub mod config;
pub mod equality;
pub mod error;
pub mod extract;
pub mod fields;
pub mod locator;
pub mod mock;
pub mod scaffold;
pub mod signature;
pub mod style;

// 主要な型を再エクスポート
pub use config::{GenConfig, GenConfigBuilder};
pub use error::{ConfigError, GenError, Result};
pub use extract::{
    CLASS_START_TAG, ExtractData, ExtractResult, STRUCT_START_TAG, extract_eq_class,
    extract_mock_class, replace_mock,
};
pub use fields::{Field, FieldKind, fields};
pub use locator::{SourceSpan, locate};
pub use mock::{ConstructorRewrite, MockResult, to_mock};
pub use scaffold::{Banner, WrittenFiles, write_files};
pub use signature::VirtualSignature;
pub use style::MockStyle;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_then_mock() {
        let source = "class Foo {\n public:\n  virtual void Bar(int x) = 0;\n};";

        let span = locate(source, CLASS_START_TAG, 0);
        assert_eq!(span.name.as_deref(), Some("Foo"));

        let mock = to_mock(span.code.as_deref().unwrap(), MockStyle::Old);
        assert!(mock.code.contains("class MockFoo : public Foo {"));
        assert!(mock.code.contains("MOCK_METHOD1(Bar, void(int x));"));
    }

    #[test]
    fn test_locate_then_equality() {
        let source = "struct S {\n  int a;\n  char b[4];\n  MyType* c;\n};";
        let data = extract_eq_class(source, STRUCT_START_TAG, 0).unwrap();
        assert_eq!(data.file_name, "s");
        // ポインタは指す先ではなくアドレスで比較される
        assert!(data.source_body.contains("a.c == b.c"));
        assert!(data.source_body.contains("strcmp(a.b, b.b) == 0"));
    }
}
