// src/error.rs

use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;
use thiserror::Error;

/// 分析开始之前的硬性失败：源文本无法读取或不是合法的 UTF-8。
///
/// 与源代码内容里的问题（那些是 `Diagnostic`）不同，出现这类错误时不会产生任何 token。
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read source file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("source text is not valid UTF-8")]
    InvalidEncoding(#[from] Utf8Error),
}
