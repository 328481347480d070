//! 诊断信息与错误管理器。
//!
//! 三个分析阶段都把发现的问题追加到同一个 `DiagnosticBag` 中，顺序即检测顺序。
//! 打印时使用 `ariadne` 渲染带源码片段的报告。

pub mod codes;

#[cfg(test)]
mod test;

use crate::utils::Span;
use ariadne::{Color, Config, Label as AriadneLabel, Report, ReportKind, Source};
use codes::ErrorCode;
use std::collections::BTreeSet;
use std::fmt;
use std::io;

/// 诊断的分类，每一类对应一个固定的错误码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnrecognizedLexeme,
    UnexpectedToken,
    UndeclaredIdentifier,
    RedeclaredIdentifier,
    KindMismatch,
}

impl DiagnosticKind {
    pub fn error_code(self) -> &'static ErrorCode {
        match self {
            DiagnosticKind::UnrecognizedLexeme => &codes::E0001_UNRECOGNIZED_LEXEME,
            DiagnosticKind::UnexpectedToken => &codes::E0100_UNEXPECTED_TOKEN,
            DiagnosticKind::UndeclaredIdentifier => &codes::E0200_UNDECLARED_IDENTIFIER,
            DiagnosticKind::RedeclaredIdentifier => &codes::E0201_REDECLARED_IDENTIFIER,
            DiagnosticKind::KindMismatch => &codes::E0202_KIND_MISMATCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// 一条诊断：消息加上它所针对的源代码行。创建后不可修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    line: usize,
    // 第一个标签是主标签，指向出错的位置
    labels: Vec<Label>,
    notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        line: usize,
        primary_label: Label,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            labels: vec![primary_label],
            notes: Vec::new(),
        }
    }

    pub fn with_secondary_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.error_code().code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn span(&self) -> Span {
        self.labels[0].span
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}] on line {}: {}", self.code(), self.line, self.message)
    }
}

/// 错误管理器：按检测顺序收集所有阶段的诊断。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// 某一类诊断的数量。
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// 需要高亮的行：去重并升序，同一行出现多条诊断时只标记一次。
    pub fn error_lines(&self) -> BTreeSet<usize> {
        self.diagnostics.iter().map(|d| d.line).collect()
    }

    /// 把全部诊断渲染成 ariadne 报告文本。
    pub fn render(&self, file_name: &str, source: &str, color: bool) -> io::Result<String> {
        let mut out = Vec::new();
        write_all(&mut out, file_name, source, &self.diagnostics, color)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn print(&self, file_name: &str, source: &str, color: bool) -> io::Result<()> {
        write_all(io::stderr(), file_name, source, &self.diagnostics, color)
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// --- Printer 打印逻辑 ---

fn write_all<W: io::Write>(
    mut out: W,
    file_name: &str,
    source_code: &str,
    diagnostics: &[Diagnostic],
    color: bool,
) -> io::Result<()> {
    let cache = (file_name, Source::from(source_code));
    // 标签范围不能越过源码末尾
    let clamp = |span: Span| span.start.min(source_code.len())..span.end.min(source_code.len());

    for diag in diagnostics {
        let primary_span = clamp(diag.span());

        let mut report = Report::build(ReportKind::Error, (file_name, primary_span))
            .with_config(Config::default().with_color(color))
            .with_code(diag.code())
            .with_message(&diag.message);

        for (i, label_info) in diag.labels.iter().enumerate() {
            let label = AriadneLabel::new((file_name, clamp(label_info.span)))
                .with_message(&label_info.message);

            let final_label = if i == 0 {
                label.with_color(Color::Red)
            } else {
                label.with_color(Color::Blue)
            };
            report.add_label(final_label);
        }

        for note in &diag.notes {
            report = report.with_note(note);
        }

        report.finish().write(cache.clone(), &mut out)?;
    }
    Ok(())
}
