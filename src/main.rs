//! C++ gmock generator CLI
//!
//! ヘッダファイル中のクラス／構造体からモックや比較関数を生成する

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cpp_gmockgen::{
    Banner, CLASS_START_TAG, ExtractData, GenConfig, GenConfigBuilder, STRUCT_START_TAG,
    extract_eq_class, extract_mock_class, replace_mock, write_files,
};

/// コマンドライン引数
#[derive(Parser)]
#[command(name = "cpp-gmockgen")]
#[command(version, about = "Generate gmock classes and equality helpers from C++ headers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 設定ファイル（省略時は <root>/gmockgen.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// モックマクロのスタイル (old / new)
    #[arg(long, global = true)]
    style: Option<String>,

    /// 結果を JSON で出力
    #[arg(long, global = true)]
    json: bool,

    /// デバッグログを出力
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 選択範囲のテキストをモックに置き換えて出力
    Replace {
        /// 入力ファイル（省略時は標準入力）
        input: Option<PathBuf>,
    },
    /// クラス宣言からモッククラスのファイルを生成
    Mock(ExtractArgs),
    /// 構造体宣言から operator== と PrintTo のファイルを生成
    Eq(ExtractArgs),
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// 入力ヘッダファイル
    file: PathBuf,

    /// 宣言の開始行（0始まり）
    #[arg(short, long)]
    line: usize,

    /// プロジェクトルート（省略時はカレントディレクトリ）
    #[arg(long)]
    root: Option<PathBuf>,

    /// 出力ディレクトリ（相対パスはルート基準。省略時は設定の mock_dir / eq_dir）
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// ファイルを書かずに結果を表示
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cpp_gmockgen=debug" } else { "cpp_gmockgen=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Replace { input } => {
            // スタイルは解析前に検証する
            let config = config_builder(&cli, &std::env::current_dir()?)?.build();
            let selection = match input {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let code = replace_mock(&selection, config.style)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "code": code }))?);
            } else {
                print!("{}", code);
            }
        }
        Commands::Mock(args) => {
            let root = resolve_root(args.root.as_deref())?;
            let mut builder = config_builder(&cli, &root)?;
            if let Some(out) = &args.out {
                builder = builder.mock_dir(out);
            }
            let config = builder.build();
            let text = fs::read_to_string(&args.file)?;
            let data = extract_mock_class(&text, CLASS_START_TAG, args.line, config.style)?;
            let out_dir = config.mock_out_dir(&root);
            emit(&cli, args, &config, &root, &out_dir, &config.mock_prefix, &data)?;
        }
        Commands::Eq(args) => {
            let root = resolve_root(args.root.as_deref())?;
            let mut builder = config_builder(&cli, &root)?;
            if let Some(out) = &args.out {
                builder = builder.eq_dir(out);
            }
            let config = builder.build();
            let text = fs::read_to_string(&args.file)?;
            let data = extract_eq_class(&text, STRUCT_START_TAG, args.line)?;
            let out_dir = config.eq_out_dir(&root);
            emit(&cli, args, &config, &root, &out_dir, &config.eq_prefix, &data)?;
        }
    }
    Ok(())
}

/// 設定ファイルを読み、コマンドラインの指定で上書きする
fn config_builder(cli: &Cli, root: &Path) -> Result<GenConfigBuilder, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => GenConfig::load(path)?,
        None => GenConfig::discover(root)?,
    };
    let mut builder = GenConfigBuilder::from_config(config);
    if let Some(style) = &cli.style {
        builder = builder.style_str(style)?;
    }
    Ok(builder)
}

fn resolve_root(root: Option<&Path>) -> io::Result<PathBuf> {
    match root {
        Some(p) => p.canonicalize(),
        None => std::env::current_dir(),
    }
}

/// 結果を表示するか、ファイルに書き出す
fn emit(
    cli: &Cli,
    args: &ExtractArgs,
    config: &GenConfig,
    root: &Path,
    out_dir: &Path,
    prefix: &str,
    data: &ExtractData,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.dry_run {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(data)?);
        } else {
            println!("// {}{}.h", prefix, data.file_name);
            println!("{}", data.header_body);
            println!();
            println!("// {}{}.cc", prefix, data.file_name);
            println!("{}", data.source_body);
        }
        return Ok(());
    }

    let written = write_files(data, root, out_dir, prefix, &Banner::today(config))?;
    if cli.json {
        let output = serde_json::json!({
            "header": written.header.display().to_string(),
            "source": written.source.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("{}{} has been created! (@{})", prefix, data.file_name, out_dir.display());
    }
    Ok(())
}
