// src/main.rs

use clap::Parser;
use crudc::diagnostics::codes;
use crudc::{run_analysis_bytes, AnalysisError, AnalysisResult};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// 一个小型语言的编译器前端：词法、语法和语义分析
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要分析的源文件路径；省略或为 `-` 时从标准输入读取
    input_file: Option<PathBuf>,

    /// 分析成功时同时打印符号表
    #[arg(long)]
    symbols: bool,

    /// 输出诊断时不使用颜色
    #[arg(long)]
    no_color: bool,

    /// 打印某个错误码（例如 E0201）的详细解释后退出
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Some(code) = &cli.explain {
        return explain(code);
    }

    // 1. 读取源代码并运行分析管道（只调用一次）
    let (source_name, bytes) = match &cli.input_file {
        Some(path) if path.as_os_str() != "-" => {
            let bytes = fs::read(path).map_err(|source| AnalysisError::Io {
                path: path.clone(),
                source,
            })?;
            (path.display().to_string(), bytes)
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            ("<stdin>".to_string(), bytes)
        }
    };
    let result = run_analysis_bytes(&bytes)?;

    // 2. 成功：打印 token 列表
    if result.is_clean() {
        print_tokens(&result);
        if cli.symbols {
            print_symbols(&result);
        }
        return Ok(());
    }

    // 3. 失败：渲染全部诊断，并列出需要高亮的行
    // 字节已经通过了 run_analysis_bytes 的 UTF-8 校验
    let source = std::str::from_utf8(&bytes)?;
    result.diagnostics.print(&source_name, source, !cli.no_color)?;

    let lines = result
        .error_lines()
        .into_iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    eprintln!(
        "analysis failed with {} error(s); offending lines: {}",
        result.diagnostics.len(),
        lines
    );
    process::exit(1);
}

fn print_tokens(result: &AnalysisResult) {
    for token in &result.tokens {
        println!("{}", token);
    }
}

fn print_symbols(result: &AnalysisResult) {
    println!();
    println!("Symbols:");
    for symbol in result.symbols.symbols() {
        let scope = result.symbols.scope(symbol.scope);
        println!(
            "  {} ({}) in scope #{} [{:?}], line {}",
            symbol.name,
            symbol.kind,
            scope.id().index(),
            scope.kind(),
            symbol.declared_at_line
        );
    }
}

fn explain(code: &str) -> Result<(), Box<dyn std::error::Error>> {
    match codes::lookup(code) {
        Some(error_code) => {
            println!("{}: {}\n\n{}", error_code.code, error_code.title, error_code.explanation);
            Ok(())
        }
        None => Err(format!("unknown error code '{}'", code).into()),
    }
}
