//! カード本文の `[sfen]` / `[kif]` ブロックを盤面図に置き換えて出力する
//!
//! 問題面・解答面をファイル（`-` で標準入力）から読み、
//! カード描画と同じ手順で置き換えた結果を書き出す。

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;
use shogiban_core::{
    CardFaces, CardRenderer, DiagnosticReport, LogDiagnostics, Notation, RecordingDiagnostics,
    RenderConfig,
};

/// 問題面と解答面の区切り
const ANSWER_SEPARATOR: &str = "<hr id=answer>";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NotationArg {
    Sfen,
    Kif,
}

impl From<NotationArg> for Notation {
    fn from(arg: NotationArg) -> Self {
        match arg {
            NotationArg::Sfen => Notation::Sfen,
            NotationArg::Kif => Notation::Kif,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Render [sfen]/[kif] blocks in card text as shogi diagrams")]
struct Cli {
    /// 問題面の本文（`-` で標準入力）
    #[arg(short, long)]
    question: PathBuf,

    /// 解答面の本文（`-` で標準入力）
    #[arg(short, long)]
    answer: Option<PathBuf>,

    /// 表示文言の設定ファイル（TOML）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 出力形式
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// 指定した記法だけ置き換える
    #[arg(long, value_enum)]
    only: Option<NotationArg>,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    question: &'a str,
    answer: &'a str,
    errors: usize,
    reports: &'a [DiagnosticReport],
}

fn is_stdin(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn read_text(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to open config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if cli.answer.as_deref().is_some_and(is_stdin) && is_stdin(&cli.question) {
        bail!("--question and --answer cannot both read from stdin");
    }

    let config = load_config(cli.config.as_deref())?;
    let question = read_text(&cli.question)?;
    let answer = match cli.answer.as_deref() {
        Some(path) => read_text(path)?,
        None => String::new(),
    };

    let recorder = RecordingDiagnostics::new();
    let mut renderer = CardRenderer::new(config, (LogDiagnostics, &recorder));
    if let Some(only) = cli.only {
        renderer = renderer.with_notations(&[only.into()]);
    }
    let faces = renderer.render(CardFaces::new(question, answer));
    let reports = recorder.take();
    if !reports.is_empty() {
        info!("{} render error(s) reported, original text kept", reports.len());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => {
            write!(out, "{}", faces.question)?;
            if cli.answer.is_some() {
                write!(out, "\n{ANSWER_SEPARATOR}\n{}", faces.answer)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Json => {
            let json = JsonOutput {
                question: &faces.question,
                answer: &faces.answer,
                errors: reports.len(),
                reports: &reports,
            };
            serde_json::to_writer_pretty(&mut out, &json)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
