//! 生成ファイルの書き出し
//!
//! 切り出したヘッダ本体・ソース本体に、作成者コメントとインクルードガードを付けて
//! `<prefix><name>.h` と `<prefix><name>.cc` に書き込む。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use tracing::info;

use crate::config::GenConfig;
use crate::error::Result;
use crate::extract::ExtractData;

/// ヘッダパスから取り除くソースルート
const SOURCE_ROOTS: &[&str] = &["src/", "cpp/"];

const UNKNOWN: &str = "Unknown";

/// ファイル先頭のコメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub user: String,
    pub organization: String,
    pub date: NaiveDate,
}

impl Banner {
    /// 今日の日付で作成
    pub fn today(config: &GenConfig) -> Self {
        Self::new(config, Local::now().date_naive())
    }

    pub fn new(config: &GenConfig, date: NaiveDate) -> Self {
        Self {
            user: config.user.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            organization: config
                .organization
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            date,
        }
    }

    fn render(&self) -> String {
        format!(
            "//\n// Created by {} on {}.\n// Copyright (c) {} {}. All rights reserved.\n//\n",
            self.user,
            self.date.format("%Y/%m/%d"),
            self.date.year(),
            self.organization
        )
    }
}

/// インクルードに使うヘッダのパス
///
/// `root` からの相対ディレクトリのうち、最後の `src/`、`cpp/` より後ろを使う。
pub fn header_path(root: &Path, dir: &Path, header_file: &str) -> String {
    let folder = match dir.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => dir
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let mut folder = folder.replace('\\', "/").replace('-', "_");
    for src_root in SOURCE_ROOTS {
        if let Some(i) = folder.rfind(src_root) {
            folder = folder[i + src_root.len()..].to_string();
        }
    }
    if folder.is_empty() {
        header_file.to_string()
    } else {
        format!("{}/{header_file}", folder.trim_end_matches('/'))
    }
}

/// ヘッダパスからインクルードガードを作る
///
/// `test/mock/mock_foo.h` -> `TEST_MOCK_MOCK_FOO_H_`
pub fn header_guard(header_path: &str) -> String {
    header_path
        .replacen(".h", "_H_", 1)
        .replace('/', "_")
        .to_uppercase()
}

/// ヘッダファイルの内容
pub fn render_header(banner: &Banner, guard: &str, body: &str) -> String {
    format!(
        "{}\n#ifndef {guard}\n#define {guard}\n\n{body}\n\n#endif  // {guard}\n",
        banner.render()
    )
}

/// ソースファイルの内容
pub fn render_source(banner: &Banner, header_path: &str, body: &str) -> String {
    format!("{}\n#include \"{header_path}\"\n\n{body}\n", banner.render())
}

/// 書き出したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub header: PathBuf,
    pub source: PathBuf,
}

/// ヘッダとソースを書き出す
///
/// `out_dir` が無ければ作る。ディレクトリ以外が存在する場合はエラー。
pub fn write_files(
    data: &ExtractData,
    root: &Path,
    out_dir: &Path,
    prefix: &str,
    banner: &Banner,
) -> Result<WrittenFiles> {
    if out_dir.exists() {
        if !out_dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is not a directory", out_dir.display()),
            )
            .into());
        }
    } else {
        fs::create_dir_all(out_dir)?;
    }

    let base = format!("{prefix}{}", data.file_name);
    let header_file = format!("{base}.h");
    let include = header_path(root, out_dir, &header_file);
    let guard = header_guard(&include);

    let header = out_dir.join(&header_file);
    let source = out_dir.join(format!("{base}.cc"));
    fs::write(&header, render_header(banner, &guard, &data.header_body))?;
    fs::write(&source, render_source(banner, &include, &data.source_body))?;
    info!(header = %header.display(), source = %source.display(), "files written");

    Ok(WrittenFiles { header, source })
}
