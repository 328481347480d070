pub mod analyzer;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod utils;

#[cfg(test)]
mod test;

use analyzer::symbols::SymbolTable;
use diagnostics::DiagnosticBag;
use lexer::Token;
use std::collections::BTreeSet;
use std::path::Path;
use utils::LineIndex;

pub use error::AnalysisError;

/// 一次完整分析的结果。
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// 词法分析得到的全部 token，按源代码顺序。
    pub tokens: Vec<Token>,
    /// 三个阶段按检测顺序报告的全部诊断。
    pub diagnostics: DiagnosticBag,
    /// 语义分析填充的符号表；语义阶段被跳过时只有空的全局作用域。
    pub symbols: SymbolTable,
}

impl AnalysisResult {
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// 需要高亮的行，去重且升序。
    pub fn error_lines(&self) -> BTreeSet<usize> {
        self.diagnostics.error_lines()
    }
}

// 顶层的公共 API
/// 对一段源代码运行完整的前端分析：词法、语法、语义。
///
/// 词法错误不会中止流程，出错的字符被跳过后其余 token 照常交给语法分析。
/// 只有语法分析没有报告任何错误时才进行语义分析，
/// 否则部分恢复出来的语法树只会带来一连串虚假的“未声明”错误。
pub fn run_analysis(source: &str) -> AnalysisResult {
    let lines = LineIndex::new(source);
    let mut diagnostics = DiagnosticBag::new();
    let mut symbols = SymbolTable::new();

    // 1. 词法分析
    let tokens = lexer::analyze(source, &lines, &mut diagnostics);

    // 2. 语法分析
    let before_parse = diagnostics.len();
    let ast = parser::parse(&tokens, &lines, &mut diagnostics);
    let syntax_clean = diagnostics.len() == before_parse;

    // 3. 语义分析
    match ast {
        Some(program) if syntax_clean => {
            analyzer::Analyzer::new(&lines, &mut symbols, &mut diagnostics).analyze(&program);
        }
        _ => tracing::debug!("semantic analysis skipped because of syntax errors"),
    }

    tracing::debug!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        "analysis finished"
    );
    AnalysisResult {
        tokens,
        diagnostics,
        symbols,
    }
}

/// 与 `run_analysis` 相同，但接收原始字节；不是合法 UTF-8 时直接失败。
pub fn run_analysis_bytes(bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    let source = std::str::from_utf8(bytes)?;
    Ok(run_analysis(source))
}

/// 读取并分析一个源文件。
pub fn run_analysis_file(path: impl AsRef<Path>) -> Result<AnalysisResult, AnalysisError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    run_analysis_bytes(&bytes)
}
