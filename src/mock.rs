//! モッククラスへの変換
//!
//! クラス宣言を1行ずつ走査し、以下を書き換える。
//!
//! - クラスヘッダ: `class Foo : public Base {` -> `class MockFoo : public Foo {`
//! - コンストラクタ: `MockFoo(args);` と、基底へ転送する実装
//! - 仮想関数: `MOCK_METHODn(...)` マクロ
//!
//! private / protected 領域、デストラクタ、入れ子の型は出力しない。
//! 形が想定外の構文は書き換えずにそのまま出す。

use std::mem;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::fields::arg_names;
use crate::signature::{VirtualSignature, strip_defaults};
use crate::style::MockStyle;

const CLASS_TAG: &str = "class ";
const VIRTUAL_TAG: &str = "virtual ";

/// 変換結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockResult {
    /// 変換後のテキスト
    pub code: String,
    /// 元のクラス名（`Mock` 接頭辞なし）
    pub class_name: Option<String>,
    /// コンストラクタの転送実装（出現順）
    pub constructors: Vec<String>,
}

/// 書き換えたクラスヘッダ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub text: String,
    pub name: Option<String>,
}

fn export_macro_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class [A-Z_|]+\s+(\w)").expect("export macro pattern"))
}

impl ClassHeader {
    /// クラスヘッダをモックのヘッダに書き換える
    ///
    /// `class EXPORT_API Foo` のようなエクスポートマクロは取り除く。
    pub fn rewrite(text: &str) -> Self {
        let text = export_macro_regex().replacen(text, 1, "class ${1}");
        let unchanged = || ClassHeader {
            text: text.to_string(),
            name: None,
        };

        let Some(start) = text.find(CLASS_TAG) else {
            return unchanged();
        };
        let name_start = start + CLASS_TAG.len();
        let Some(brace) = text[name_start..].find('{').map(|i| i + name_start) else {
            return unchanged();
        };
        let name_end = text[name_start..brace]
            .find(':')
            .map_or(brace, |i| i + name_start);
        let name = text[name_start..name_end].trim().to_string();
        if name.is_empty() {
            return unchanged();
        }

        let head = &text[..start];
        let tail = &text[brace + 1..];
        ClassHeader {
            text: format!("{head}class Mock{name} : public {name} {{{tail}"),
            name: Some(name),
        }
    }
}

/// 書き換えたコンストラクタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorRewrite {
    /// `MockFoo(int a);`
    pub declaration: String,
    /// `MockFoo::MockFoo(int a) : Foo(a) {}`
    pub implementation: String,
}

impl ConstructorRewrite {
    /// コンストラクタ宣言を書き換える
    pub fn parse(code: &str, class_name: &str) -> Option<Self> {
        let start = find_constructor(code, class_name)?;
        let args_start = start + class_name.len() + 1;
        let close = code[args_start..].find(')')? + args_start;
        let args = code[args_start..close].trim();

        let mock = format!("Mock{class_name}");
        let declaration = format!("{}{mock}({args});", &code[..start]);
        let forwarded = arg_names(args).join(", ");
        // 定義側ではデフォルト引数を書けない
        let stripped = strip_defaults(&format!("({args})"));
        let params = stripped
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(&stripped);
        let implementation = format!("{mock}::{mock}({params}) : {class_name}({forwarded}) {{}}");
        Some(Self {
            declaration,
            implementation,
        })
    }
}

/// `ClassName(` の出現位置を探す（識別子の一部としての出現は除く）
fn find_constructor(line: &str, class_name: &str) -> Option<usize> {
    let tag = format!("{class_name}(");
    let mut from = 0;
    while let Some(pos) = line[from..].find(&tag) {
        let at = from + pos;
        let boundary = line[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if boundary {
            return Some(at);
        }
        from = at + tag.len();
    }
    None
}

/// 走査中の状態
///
/// 呼び出しごとに新しく作る。
#[derive(Debug)]
struct MockState {
    style: MockStyle,
    out: String,
    class_name: Option<String>,
    constructors: Vec<String>,

    /// private / protected 領域の中
    not_public: bool,
    /// `class ` を含む行の数
    class_count: usize,
    class_code: String,
    class_start: bool,
    class_end: bool,
    virtual_code: String,
    virtual_start: bool,
    virtual_end: bool,
    ctor_code: String,
    ctor_start: bool,
    /// 最初のコンストラクタでのみデストラクタ宣言を出す
    first_ctor: bool,
    /// 入れ子の型の中
    in_nested: bool,
}

impl MockState {
    fn new(style: MockStyle) -> Self {
        Self {
            style,
            out: String::new(),
            class_name: None,
            constructors: Vec::new(),
            not_public: false,
            class_count: 0,
            class_code: String::new(),
            class_start: false,
            class_end: false,
            virtual_code: String::new(),
            virtual_start: false,
            virtual_end: false,
            ctor_code: String::new(),
            ctor_start: false,
            first_ctor: true,
            in_nested: false,
        }
    }

    fn feed(&mut self, line: &str, sep: &str) {
        // デストラクタはモックしない（合成したものを出す）
        if line.contains('~') {
            return;
        }
        if line.contains("protected:") || line.contains("private:") {
            self.not_public = true;
        } else if line.contains("public:") || line.contains("};") {
            self.not_public = false;
        }
        if self.not_public {
            return;
        }

        let opens_class = line.contains(CLASS_TAG);
        if opens_class {
            self.class_count += 1;
        }

        if self.class_name.is_some()
            && (line.contains("enum ")
                || (opens_class && self.class_count > 1)
                || line.contains("struct "))
        {
            self.in_nested = true;
        }
        if self.in_nested {
            if line.contains('}') {
                self.in_nested = false;
            }
            return;
        }

        if opens_class && self.class_count == 1 {
            self.class_start = true;
        }
        if self.class_start && line.contains('{') {
            self.class_end = true;
        }
        if self.class_start {
            self.class_code.push_str(line);
            self.class_code.push_str(sep);
        }

        if line.contains(VIRTUAL_TAG) {
            self.virtual_start = true;
        }
        if self.virtual_start && line.contains(';') {
            self.virtual_end = true;
        }
        if self.virtual_start {
            self.virtual_code.push_str(line);
            self.virtual_code.push_str(sep);
        }

        let mut emitted = false;
        if let Some(class_name) = self.class_name.clone() {
            if !self.virtual_start
                && !line.contains("static")
                && find_constructor(line, &class_name).is_some()
            {
                self.ctor_start = true;
            }
            if self.ctor_start {
                self.ctor_code.push_str(line);
                self.ctor_code.push_str(sep);
                if line.contains(';') || line.contains('}') {
                    self.ctor_start = false;
                    let code = mem::take(&mut self.ctor_code);
                    match ConstructorRewrite::parse(&code, &class_name) {
                        Some(ctor) => {
                            trace!(declaration = %ctor.declaration, "constructor rewritten");
                            self.out.push_str(&ctor.declaration);
                            if self.first_ctor {
                                self.first_ctor = false;
                                self.out.push('\n');
                                self.out.push_str(&format!("  ~Mock{class_name}();"));
                            }
                            self.out.push_str(sep);
                            self.constructors.push(ctor.implementation);
                            return;
                        }
                        None => {
                            debug!(code = %code.trim(), "constructor not rewritten, passing through");
                            self.out.push_str(&code);
                            emitted = true;
                        }
                    }
                }
            }
        }

        if !self.virtual_start && !self.class_start && !self.ctor_start && !emitted {
            self.out.push_str(line);
            self.out.push_str(sep);
        }

        if self.class_end {
            let header = ClassHeader::rewrite(&mem::take(&mut self.class_code));
            trace!(name = ?header.name, "class header rewritten");
            self.class_name = header.name;
            self.out.push_str(&header.text);
            self.class_start = false;
            self.class_end = false;
        }

        if self.virtual_end {
            let code = mem::take(&mut self.virtual_code);
            match VirtualSignature::parse(&code) {
                Some(sig) => {
                    trace!(name = %sig.name, arity = sig.arity, "virtual method rewritten");
                    self.out.push_str(&sig.to_mock(self.style));
                }
                None => {
                    debug!(code = %code.trim(), "virtual signature not recognized, passing through");
                    self.out.push_str(&code);
                }
            }
            self.virtual_start = false;
            self.virtual_end = false;
        }
    }

    /// 閉じていない領域はそのまま出力する
    fn finish(mut self) -> MockResult {
        if self.class_start {
            debug!("unterminated class header flushed");
            self.out.push_str(&self.class_code);
        }
        if self.virtual_start {
            debug!("unterminated virtual signature flushed");
            self.out.push_str(&self.virtual_code);
        }
        if self.ctor_start {
            debug!("unterminated constructor flushed");
            self.out.push_str(&self.ctor_code);
        }
        MockResult {
            code: self.out,
            class_name: self.class_name,
            constructors: self.constructors,
        }
    }
}

/// クラス宣言をモッククラスに変換
pub fn to_mock(text: &str, style: MockStyle) -> MockResult {
    let mut state = MockState::new(style);
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let sep = if i == last { "" } else { "\n" };
        state.feed(line, sep);
    }
    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_header_rewrite() {
        let h = ClassHeader::rewrite("class Application : public a\n                  , public b {\n");
        assert_eq!(h.name.as_deref(), Some("Application"));
        assert_eq!(h.text, "class MockApplication : public Application {\n");
    }

    #[test]
    fn test_class_header_strips_export_macro() {
        let h = ClassHeader::rewrite("class BASE_EXPORT Foo {");
        assert_eq!(h.name.as_deref(), Some("Foo"));
        assert_eq!(h.text, "class MockFoo : public Foo {");
    }

    #[test]
    fn test_class_header_keeps_head() {
        let h = ClassHeader::rewrite("template <typename T> class Foo { // x\n");
        assert_eq!(h.text, "template <typename T> class MockFoo : public Foo { // x\n");
    }

    #[test]
    fn test_constructor_rewrite() {
        let c = ConstructorRewrite::parse("  Foo(int a, int b) : Base(a) {}", "Foo").unwrap();
        assert_eq!(c.declaration, "  MockFoo(int a, int b);");
        assert_eq!(c.implementation, "MockFoo::MockFoo(int a, int b) : Foo(a, b) {}");
    }

    #[test]
    fn test_constructor_rewrite_defaults_and_refs() {
        let c = ConstructorRewrite::parse(
            "  explicit Foo(const std::string& name, int n = 0);",
            "Foo",
        )
        .unwrap();
        assert_eq!(c.declaration, "  explicit MockFoo(const std::string& name, int n = 0);");
        assert_eq!(
            c.implementation,
            "MockFoo::MockFoo(const std::string& name, int n) : Foo(name, n) {}"
        );
    }

    #[test]
    fn test_constructor_default() {
        let c = ConstructorRewrite::parse("  Foo();", "Foo").unwrap();
        assert_eq!(c.declaration, "  MockFoo();");
        assert_eq!(c.implementation, "MockFoo::MockFoo() : Foo() {}");
    }

    #[test]
    fn test_find_constructor_boundary() {
        assert_eq!(find_constructor("  Foo(int a);", "Foo"), Some(2));
        assert_eq!(find_constructor("  Bar* MakeFoo(int a);", "Foo"), None);
        assert_eq!(find_constructor("MakeFoo(); Foo(1)", "Foo"), Some(11));
    }

    #[test]
    fn test_to_mock_minimal() {
        let src = "class Foo {\n public:\n  virtual void Bar(int x) = 0;\n};";
        let mock = to_mock(src, MockStyle::Old);
        assert_eq!(
            mock.code,
            "class MockFoo : public Foo {\n public:\n  MOCK_METHOD1(Bar, void(int x));\n};"
        );
        assert_eq!(mock.class_name.as_deref(), Some("Foo"));
        assert!(mock.constructors.is_empty());
    }

    #[test]
    fn test_unterminated_virtual_flushed() {
        let src = "class Foo {\n public:\n  virtual void Bar(int x)\n  int y";
        let mock = to_mock(src, MockStyle::Old);
        assert_eq!(
            mock.code,
            "class MockFoo : public Foo {\n public:\n  virtual void Bar(int x)\n  int y"
        );
    }

    #[test]
    fn test_unterminated_constructor_flushed() {
        let src = "class Foo {\n public:\n  Foo(int a,\n      int b";
        let mock = to_mock(src, MockStyle::Old);
        assert_eq!(mock.code, "class MockFoo : public Foo {\n public:\n  Foo(int a,\n      int b");
        assert!(mock.constructors.is_empty());
    }

    #[test]
    fn test_unterminated_class_header_flushed() {
        let src = "class Foo : public Base\n  , public Other";
        let mock = to_mock(src, MockStyle::Old);
        assert_eq!(mock.code, src);
        assert_eq!(mock.class_name, None);
    }
}
