//! 比較関数生成のテスト

use pretty_assertions::assert_eq;

use cpp_gmockgen::{STRUCT_START_TAG, extract_eq_class};

const MY_STRUCT: &str = include_str!("fixtures/my_struct.h");
const MY_STRUCT_LINE: usize = 7;

#[test]
fn test_fixture_equality() {
    let data = extract_eq_class(MY_STRUCT, STRUCT_START_TAG, MY_STRUCT_LINE).unwrap();

    assert_eq!(data.file_name, "my_struct");
    assert_eq!(
        data.header_body,
        "#include <sstream>

#include \"demo/cpp/my/struct.h\"

namespace demo {

bool operator==(const MyStruct& a, const MyStruct& b);
void PrintTo(const MyStruct& a, ::std::ostream* os);

}  // namespace demo"
    );
    assert_eq!(
        data.source_body,
        "namespace demo {

bool operator==(const MyStruct& a, const MyStruct& b) {
  return a.count == b.count
      && strcmp(a.label, b.label) == 0
      && a.ratio == b.ratio
#ifdef _WIN32
      && a.module == b.module
#endif
      && a.name == b.name
      && a.next == b.next;
}
void PrintTo(const MyStruct& a, ::std::ostream* os) {
  *os << \"{\"
      << \"count: \" << a.count
      << \", label: \" << a.label
      << \", ratio: \" << a.ratio
#ifdef _WIN32
      << \", module: \" << a.module
#endif
      << \", name: \" << a.name
      << \", next: \" << a.next
      << \"}\";
}

}  // namespace demo"
    );
}

#[test]
fn test_trailing_conditional_block() {
    let src = "struct Handle {
  int id;
#ifdef _WIN32
  HMODULE dll;
#endif
};";
    let data = extract_eq_class(src, STRUCT_START_TAG, 0).unwrap();
    assert!(data.source_body.contains(
        "  return a.id == b.id
#ifdef _WIN32
      && a.dll == b.dll
#endif
      && true;"
    ));
}

#[test]
fn test_without_namespace_or_guard() {
    let data = extract_eq_class("struct P {\n  int x;\n};", STRUCT_START_TAG, 0).unwrap();
    assert_eq!(
        data.header_body,
        "#include <sstream>

bool operator==(const P& a, const P& b);
void PrintTo(const P& a, ::std::ostream* os);"
    );
    assert!(data.source_body.starts_with("bool operator==(const P& a, const P& b) {"));
}

#[test]
fn test_inherited_struct_name() {
    let src = "struct Derived : public Base {\n  int x;\n};";
    let data = extract_eq_class(src, STRUCT_START_TAG, 0).unwrap();
    assert_eq!(data.file_name, "derived");
    assert!(data.header_body.contains("const Derived& a"));
}

#[test]
fn test_unbalanced_struct_fails() {
    let src = "struct Open {\n  int x;\n";
    assert!(extract_eq_class(src, STRUCT_START_TAG, 0).is_err());
}

#[test]
fn test_unnamed_struct_rejected() {
    let src = "typedef struct {\n  int a;\n} Foo;";
    let err = extract_eq_class(src, STRUCT_START_TAG, 0).unwrap_err();
    assert_eq!(err.to_string(), "Failed to parseCode with startTag \"struct \"");
}

#[test]
fn test_anonymous_namespace_not_wrapped() {
    let src = "namespace {\nnamespace wq {\nstruct S {\n  int a;\n};";
    let data = extract_eq_class(src, STRUCT_START_TAG, 2).unwrap();
    assert!(data.header_body.contains("namespace wq {\n"));
    assert!(!data.header_body.contains("namespace  {"));
    assert!(data.source_body.ends_with("}  // namespace wq"));
}
