//! 比較演算子と PrintTo 関数の生成
//!
//! 構造体のフィールド一覧から `operator==` と gtest 用の `PrintTo` を組み立てる。

use crate::fields::{Field, FieldKind};

/// 生成された宣言と定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityCode {
    /// ヘッダに置く宣言
    pub declarations: String,
    /// ソースに置く定義
    pub definitions: String,
}

/// `bool operator==(const S& a, const S& b)`
pub fn equal_signature(struct_name: &str) -> String {
    format!("bool operator==(const {struct_name}& a, const {struct_name}& b)")
}

/// `void PrintTo(const S& a, ::std::ostream* os)`
pub fn print_signature(struct_name: &str) -> String {
    format!("void PrintTo(const {struct_name}& a, ::std::ostream* os)")
}

/// 比較と出力の関数を生成
pub fn generate(struct_name: &str, fields: &[Field]) -> EqualityCode {
    let equal = equal_signature(struct_name);
    let print = print_signature(struct_name);

    let declarations = format!("{equal};\n{print};");
    let definitions = format!(
        "{equal} {{\n  return {};\n}}\n{print} {{\n  *os << \"{{\"\n{}\n      << \"}}\";\n}}",
        equal_body(fields),
        print_body(fields)
    );
    EqualityCode {
        declarations,
        definitions,
    }
}

/// 比較式
///
/// `char[]` は `strcmp`、それ以外（ポインタも）は `==` で比べる。
/// 最後の要素が `#endif` の場合は式が途切れないよう `&& true` を足す。
fn equal_body(fields: &[Field]) -> String {
    let mut first = true;
    let mut parts = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        let part = match field.kind {
            FieldKind::IfDef => field.name.clone(),
            FieldKind::EndIf if i == fields.len() - 1 => format!("{}\n      && true", field.name),
            FieldKind::EndIf => field.name.clone(),
            kind => {
                let sep = if first { "" } else { "      && " };
                first = false;
                let name = &field.name;
                if kind == FieldKind::CharArray {
                    format!("{sep}strcmp(a.{name}, b.{name}) == 0")
                } else {
                    format!("{sep}a.{name} == b.{name}")
                }
            }
        };
        parts.push(part);
    }
    parts.join("\n")
}

/// `os` へのストリーム出力
fn print_body(fields: &[Field]) -> String {
    let mut first = true;
    let parts: Vec<String> = fields
        .iter()
        .map(|field| {
            if field.kind.is_marker() {
                return field.name.clone();
            }
            let name = &field.name;
            if first {
                first = false;
                format!("      << \"{name}: \" << a.{name}")
            } else {
                format!("      << \", {name}: \" << a.{name}")
            }
        })
        .collect();
    parts.join("\n")
}
