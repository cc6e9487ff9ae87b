//! メンバ宣言の抽出
//!
//! 構造体本体（またはコンストラクタ引数リスト）から、単純なメンバ宣言を
//! ソース順に取り出す。`#ifdef` / `#endif` は位置を保ったまま制御マーカーとして残す。

use regex::Regex;

/// フィールドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 通常のオブジェクト `T name;`
    Object,
    /// 固定長文字配列 `char name[N];`
    CharArray,
    /// 生ポインタ `T* name;`
    Pointer,
    /// `#ifdef ...` 行
    IfDef,
    /// `#endif` 行
    EndIf,
}

impl FieldKind {
    /// プリプロセッサマーカーか
    pub fn is_marker(self) -> bool {
        matches!(self, FieldKind::IfDef | FieldKind::EndIf)
    }
}

/// 抽出されたフィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub kind: FieldKind,
    /// メンバ名（マーカーの場合は行そのもの）
    pub name: String,
}

impl Field {
    pub fn new(kind: FieldKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// 行ごとの照合パターン
struct FieldPatterns {
    object: Regex,
    char_array: Regex,
    pointer: Regex,
}

impl FieldPatterns {
    fn new(terminator: &str) -> Self {
        let term = regex::escape(terminator);
        // 型部分には識別子、`::`、テンプレート引数、空白を許す
        let object = format!(r"([\w|:<>,\s]+)\s+(\w+)\s*{term}");
        let pointer = format!(r"([\w|:<>,\s]+)\s*\*\s*(\w+)\s*{term}");
        Self {
            object: Regex::new(&object).expect("object field pattern"),
            char_array: Regex::new(r"char\s+(\w+)\s*\[").expect("char array pattern"),
            pointer: Regex::new(&pointer).expect("pointer field pattern"),
        }
    }

    fn classify(&self, line: &str) -> Option<Field> {
        if let Some(caps) = self.object.captures(line) {
            return Some(Field::new(FieldKind::Object, &caps[2]));
        }
        if let Some(caps) = self.char_array.captures(line) {
            return Some(Field::new(FieldKind::CharArray, &caps[1]));
        }
        if let Some(caps) = self.pointer.captures(line) {
            return Some(Field::new(FieldKind::Pointer, &caps[2]));
        }
        if line.contains("#ifdef") {
            return Some(Field::new(FieldKind::IfDef, line));
        }
        if line.contains("#endif") {
            return Some(Field::new(FieldKind::EndIf, line));
        }
        None
    }
}

/// フィールドを抽出
///
/// `body` を `separator` で区切り、各断片を `terminator` で終わる宣言として照合する。
/// 波括弧の深さが 2 以上（メソッド本体など）の断片は読み飛ばす。
pub fn fields(body: &str, separator: &str, terminator: &str) -> Vec<Field> {
    let patterns = FieldPatterns::new(terminator);
    let mut result = Vec::new();
    let mut depth: i32 = 0;

    for line in body.split(separator) {
        if line.contains('{') {
            depth += 1;
        }
        if line.contains('}') {
            depth -= 1;
        }
        if depth >= 2 {
            continue;
        }
        if let Some(field) = patterns.classify(line) {
            result.push(field);
        }
    }
    result
}

/// 構造体本体からメンバを抽出（改行区切り・`;` 終端）
pub fn struct_fields(body: &str) -> Vec<Field> {
    fields(body, "\n", ";")
}

/// 引数リストから引数名だけを取り出す
///
/// `int a, const std::string& b = ""` -> `["a", "b"]`
pub fn arg_names(args: &str) -> Vec<String> {
    // 参照の `&` は型の一部として空白扱い
    let args = args.replace('&', " ");
    fields(&args, ",", "")
        .into_iter()
        .filter(|f| !f.kind.is_marker())
        .map(|f| f.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_fields_kinds() {
        let body = "struct S {\n  int a;\n  char b[4];\n  MyType* c;\n  char *d;\n  std::string s;\n};";
        let got = struct_fields(body);
        assert_eq!(
            got,
            vec![
                Field::new(FieldKind::Object, "a"),
                Field::new(FieldKind::CharArray, "b"),
                Field::new(FieldKind::Pointer, "c"),
                Field::new(FieldKind::Pointer, "d"),
                Field::new(FieldKind::Object, "s"),
            ]
        );
    }

    #[test]
    fn test_template_member() {
        let body = "  std::unique_ptr<std::map<std::string, std::string>> x;";
        assert_eq!(struct_fields(body), vec![Field::new(FieldKind::Object, "x")]);
    }

    #[test]
    fn test_method_bodies_skipped() {
        let body = "struct S {\n  int a;\n  void f() {\n    int local;\n  }\n  int b;\n};";
        let names: Vec<_> = struct_fields(body).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_preprocessor_markers_kept_in_order() {
        let body = "  int a;\n#ifdef _WIN32\n  HMODULE dll;\n#endif\n  int b;";
        let got = struct_fields(body);
        assert_eq!(got.len(), 5);
        assert_eq!(got[1], Field::new(FieldKind::IfDef, "#ifdef _WIN32"));
        assert_eq!(got[2], Field::new(FieldKind::Object, "dll"));
        assert_eq!(got[3], Field::new(FieldKind::EndIf, "#endif"));
    }

    #[test]
    fn test_methods_and_usings_ignored() {
        let body = "  void Run();\n  int Get() const;\n  using Base::Base;";
        assert!(struct_fields(body).is_empty());
    }

    #[test]
    fn test_arg_names() {
        assert_eq!(arg_names("int a, int b"), vec!["a", "b"]);
        assert_eq!(arg_names("int arg1, char *arg2"), vec!["arg1", "arg2"]);
        assert_eq!(arg_names("int a = 0, const std::string& name"), vec!["a", "name"]);
        assert!(arg_names("").is_empty());
    }
}
