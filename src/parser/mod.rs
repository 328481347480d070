//! src/parser/mod.rs
//!
//! 语法分析阶段的公共接口。
//! 接收词法分析得到的 token 序列，构建 AST，并把所有语法错误报告给错误管理器。

// `pub mod ast` 使 AST 定义可以被语义分析阶段访问。
pub mod ast;
mod parsers;

use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, Label};
use crate::lexer::{Token, TokenKind};
use crate::parser::ast::Program;
use crate::utils::{LineIndex, Span};
use chumsky::error::RichPattern;
use chumsky::input::{Input, Stream};
use chumsky::prelude::*;
// 从内部实现模块中导入解析器构建函数
use parsers::program_parser;

/// parser 模块唯一的公共入口函数。
///
/// - 输入: 词法分析得到的 token 序列，以及用来把位置换算成行号的 `LineIndex`。
/// - 输出: 恢复后得到的 AST（完全无法恢复时为 `None`）。
///
/// 每个语法错误都会以 `UnexpectedToken` 诊断的形式追加到 `diagnostics`，
/// 解析器会在错误之后重新同步并继续，所以一次调用可能报告多个错误。
pub fn parse(tokens: &[Token], lines: &LineIndex, diagnostics: &mut DiagnosticBag) -> Option<Program> {
    // --- 1. 创建 Token 流 ---
    // 输入意外结束时，错误位置落在最后一个 token 的末尾，这样行号仍然指向最后一行代码
    let eoi = tokens.last().map_or(0, |token| token.span().end);
    let pairs = tokens
        .iter()
        .map(|token| (token.kind().clone(), SimpleSpan::from(token.span())))
        .collect::<Vec<_>>();
    let token_stream = Stream::from_iter(pairs)
        .map(SimpleSpan::from(eoi..eoi), |(kind, span): (_, _)| (kind, span));

    // --- 2. 运行解析器 ---
    let (ast, parse_errors) = program_parser().parse(token_stream).into_output_errors();

    // --- 3. 将 chumsky 的错误转换为诊断 ---
    let error_count = parse_errors.len();
    for error in parse_errors {
        let found = error
            .found()
            .map_or("end of input".to_string(), |tok| format!("`{}`", tok));

        let mut expected = Vec::new();
        for description in error.expected().filter_map(describe_pattern) {
            if !expected.contains(&description) {
                expected.push(description);
            }
        }
        let message = if expected.is_empty() {
            format!("unexpected token: found {}", found)
        } else {
            format!("unexpected token: expected {}, found {}", expected.join(" or "), found)
        };

        let span = Span::from(*error.span());
        let line = lines.line_of(span.start);
        diagnostics.report(Diagnostic::new(
            DiagnosticKind::UnexpectedToken,
            message,
            line,
            Label::new(span, format!("unexpected {}", found)),
        ));
    }

    tracing::debug!(errors = error_count, recovered = ast.is_some(), "syntax analysis finished");
    ast
}

/// 期望项的可读形式。token 用源代码写法并加反引号，与 `found` 的写法一致；
/// `SomethingElse` 不提供任何信息，直接丢弃。
fn describe_pattern(pattern: &RichPattern<'_, TokenKind>) -> Option<String> {
    match pattern {
        RichPattern::Token(token) => Some(format!("`{}`", &**token)),
        RichPattern::Label(label) => Some(label.to_string()),
        RichPattern::EndOfInput => Some("end of input".to_string()),
        RichPattern::SomethingElse => None,
        other => Some(other.to_string()),
    }
}
