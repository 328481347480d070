use super::TokenKind;
use crate::utils::Span;
use std::fmt::{Display, Formatter, Result};

/// 词素的分类。
///
/// 保留字按照它所引出的语法结构被细分为 `Function`、`Class`、`Loop`、`Conditional`
/// 以及 `CrudKeyword`，其余关键字统一归为 `ReservedWord`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ReservedWord,
    LogicalExpression,
    MathExpression,
    Variable,
    Constant,
    Function,
    Class,
    Loop,
    Conditional,
    CrudKeyword,
    /// 标点：`( ) { } , ;`
    Delimiter,
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            Category::ReservedWord => "ReservedWord",
            Category::LogicalExpression => "LogicalExpression",
            Category::MathExpression => "MathExpression",
            Category::Variable => "Variable",
            Category::Constant => "Constant",
            Category::Function => "Function",
            Category::Class => "Class",
            Category::Loop => "Loop",
            Category::Conditional => "Conditional",
            Category::CrudKeyword => "CrudKeyword",
            Category::Delimiter => "Delimiter",
        };
        write!(f, "{}", s)
    }
}

/// 语言中的关键字。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    // 声明
    Var,
    Const,
    Func,
    Class,
    New,
    Return,

    // 控制流
    If,
    Else,
    Loop,
    While,

    // CRUD 语句
    Create,
    Read,
    Update,
    Delete,

    // 单词形式的逻辑运算符
    And,
    Or,
    Not,

    // 布尔字面量
    True,
    False,
}

/// 保留字表：文本 -> (关键字, 分类)。
pub const RESERVED_WORDS: &[(&str, Keyword, Category)] = &[
    ("var", Keyword::Var, Category::ReservedWord),
    ("const", Keyword::Const, Category::ReservedWord),
    ("new", Keyword::New, Category::ReservedWord),
    ("return", Keyword::Return, Category::ReservedWord),
    ("func", Keyword::Func, Category::Function),
    ("class", Keyword::Class, Category::Class),
    ("loop", Keyword::Loop, Category::Loop),
    ("while", Keyword::While, Category::Loop),
    ("if", Keyword::If, Category::Conditional),
    ("else", Keyword::Else, Category::Conditional),
    ("create", Keyword::Create, Category::CrudKeyword),
    ("read", Keyword::Read, Category::CrudKeyword),
    ("update", Keyword::Update, Category::CrudKeyword),
    ("delete", Keyword::Delete, Category::CrudKeyword),
    ("and", Keyword::And, Category::LogicalExpression),
    ("or", Keyword::Or, Category::LogicalExpression),
    ("not", Keyword::Not, Category::LogicalExpression),
    ("true", Keyword::True, Category::Constant),
    ("false", Keyword::False, Category::Constant),
];

impl Keyword {
    /// 尝试将一个字符串切片转换为一个关键字。
    pub fn lookup(s: &str) -> Option<Keyword> {
        RESERVED_WORDS
            .iter()
            .find(|(text, _, _)| *text == s)
            .map(|&(_, keyword, _)| keyword)
    }

    pub fn as_str(self) -> &'static str {
        RESERVED_WORDS
            .iter()
            .find(|(_, keyword, _)| *keyword == self)
            .map_or("", |&(text, _, _)| text)
    }

    pub fn category(self) -> Category {
        RESERVED_WORDS
            .iter()
            .find(|(_, keyword, _)| *keyword == self)
            .map_or(Category::ReservedWord, |&(_, _, category)| category)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一个已分类的词素：词法分析阶段的产物，创建后不可修改。
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    category: Category,
    line: usize,
    span: Span,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, lexeme: &str, line: usize, span: Span) -> Self {
        Self {
            category: kind.category(),
            kind,
            lexeme: lexeme.to_string(),
            line,
            span,
        }
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// 所在源代码行（从 1 开始）。
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "Lexeme: {}, Category: {}, Line: {}",
            self.lexeme, self.category, self.line
        )
    }
}
