// 导入logos分词库
use logos::Logos;
use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, Label};
use crate::utils::{LineIndex, Span};
use std::fmt;

pub mod token;

pub use token::{Category, Keyword, Token, RESERVED_WORDS};

// 声明单元测试模块
#[cfg(test)]
mod test;

// logos 解析时需要使用的错误类型
#[derive(Debug, Default, Clone, PartialEq)]
pub enum LexingError {
    /// 没有任何规则能接受的字符。
    #[default]
    InvalidToken,
    /// 数字后面紧跟着标识符字符，例如 `12abc`。
    MalformedNumber,
}

/// 词素定义
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexingError)]
// 跳过空白
#[logos(skip r"[ \t\r\n\f]+")]
// 跳过单行注释
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    /// 关键字不由 logos 直接产生，而是在 `analyze` 中查保留字表得到。
    Keyword(Keyword),

    // 标识符
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // 数字字面量，整数或小数，保留原始文本
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    // 形如 `12abc` 的畸形数字，总是报错
    #[regex(r"[0-9]+(\.[0-9]+)?[a-zA-Z_][a-zA-Z0-9_]*", malformed_number)]
    MalformedNumber,

    // 字符串字面量
    #[regex(r#""([^"\\\n]|\\.)*""#, lex_string_literal)]
    Str(String),

    // 算术运算符
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,

    // 比较与逻辑运算符
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // 分割符号
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
}

impl TokenKind {
    /// 词素分类是词素本身的纯函数。
    pub fn category(&self) -> Category {
        match self {
            TokenKind::Keyword(keyword) => keyword.category(),
            TokenKind::Ident(_) => Category::Variable,
            TokenKind::Number(_) | TokenKind::Str(_) | TokenKind::MalformedNumber => {
                Category::Constant
            }
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Assign => Category::MathExpression,
            TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::Bang => Category::LogicalExpression,
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Comma
            | TokenKind::Semicolon => Category::Delimiter,
        }
    }
}

// 语法错误信息里用源代码中的写法来显示 token
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "{}", keyword),
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Number(value) => write!(f, "{}", value),
            TokenKind::MalformedNumber => write!(f, "<malformed number>"),
            TokenKind::Str(value) => write!(f, "{:?}", value),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::AndAnd => write!(f, "&&"),
            TokenKind::OrOr => write!(f, "||"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
        }
    }
}

fn malformed_number(_lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexingError> {
    Err(LexingError::MalformedNumber)
}

/// 字符串字面量的辅助解析函数
// 去除首尾引号并处理转义字符。
fn lex_string_literal(lex: &mut logos::Lexer<TokenKind>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut s = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some('r') => s.push('\r'),
                Some('\\') => s.push('\\'),
                Some('"') => s.push('"'),
                // 无法识别的转义序列按原样保留
                Some(other) => {
                    s.push('\\');
                    s.push(other);
                }
                None => return None,
            }
        } else {
            s.push(c);
        }
    }
    Some(s)
}

impl LexingError {
    fn into_diagnostic(self, lexeme: &str, line: usize, span: Span) -> Diagnostic {
        let (message, label) = match self {
            LexingError::InvalidToken => (
                format!("unrecognized lexeme '{}'", lexeme),
                "this lexeme is not part of the language",
            ),
            LexingError::MalformedNumber => (
                format!("malformed numeric literal '{}'", lexeme),
                "a number cannot be followed by letters",
            ),
        };
        Diagnostic::new(
            DiagnosticKind::UnrecognizedLexeme,
            message,
            line,
            Label::new(span, label),
        )
    }
}

/// 对源代码进行词法分析。
///
/// 总是返回识别出的全部 token；无法识别的词素会被报告给 `diagnostics` 并跳过，
/// 扫描从它之后继续。
pub fn analyze(source: &str, lines: &LineIndex, diagnostics: &mut DiagnosticBag) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut error_count = 0;

    for (result, range) in TokenKind::lexer(source).spanned() {
        let span = Span::from(range);
        let lexeme = &source[span.range()];
        let line = lines.line_of_span(span);

        match result {
            // 标识符需要再查一次保留字表
            Ok(TokenKind::Ident(name)) => {
                let kind = Keyword::lookup(&name).map_or(TokenKind::Ident(name), TokenKind::Keyword);
                tokens.push(Token::new(kind, lexeme, line, span));
            }
            Ok(kind) => tokens.push(Token::new(kind, lexeme, line, span)),
            Err(error) => {
                tracing::trace!("skipping bad lexeme {lexeme:?} on line {line}");
                error_count += 1;
                diagnostics.report(error.into_diagnostic(lexeme, line, span));
            }
        }
    }

    tracing::debug!(tokens = tokens.len(), errors = error_count, "lexical analysis finished");
    tokens
}
