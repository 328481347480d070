/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all analysis diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorCode {
    pub code: &'static str,
    pub title: &'static str,
    pub explanation: &'static str,
}

/*
E00xx: 词法分析 (Lexical Analysis) 错误。

E01xx: 语法分析 (Parsing / Syntax) 错误。

E02xx: 语义分析 (Semantic Analysis) 错误。
*/
// --- E00xx: Lexical Analysis Errors ---

pub const E0001_UNRECOGNIZED_LEXEME: ErrorCode = ErrorCode {
    code: "E0001",
    title: "Unrecognized lexeme",
    explanation: "The lexer found a character sequence that matches no rule of the language, such as \
                  a stray symbol, an unterminated string literal or a number directly followed by \
                  letters. The sequence is skipped and scanning resumes right after it.",
};

// --- E01xx: Syntax Analysis (Parsing) Errors ---

pub const E0100_UNEXPECTED_TOKEN: ErrorCode = ErrorCode {
    code: "E0100",
    title: "Unexpected token",
    explanation: "The arrangement of tokens does not match any grammar rule. Check for missing \
                  identifiers after `var`, `const`, `func` or `class`, unbalanced braces and \
                  parentheses, or an operator with a missing operand.",
};

// --- E02xx: Semantic Analysis Errors ---

pub const E0200_UNDECLARED_IDENTIFIER: ErrorCode = ErrorCode {
    code: "E0200",
    title: "Undeclared identifier",
    explanation: "The name is used, called, assigned or targeted by a CRUD statement, but no \
                  declaration for it is visible from here. Names must be declared before use, \
                  in the current scope or an enclosing one.",
};

pub const E0201_REDECLARED_IDENTIFIER: ErrorCode = ErrorCode {
    code: "E0201",
    title: "Redeclared identifier",
    explanation: "A variable, constant, function, class or parameter with this name was already \
                  declared in the same scope. Declaring the same name inside a nested block is \
                  allowed and shadows the outer declaration.",
};

pub const E0202_KIND_MISMATCH: ErrorCode = ErrorCode {
    code: "E0202",
    title: "Kind mismatch",
    explanation: "The name refers to the wrong kind of symbol for this use: only variables can be \
                  assigned, only functions can be called, only classes can be instantiated with \
                  `new`, and CRUD statements need a class or a variable as their target.",
};

pub const ALL_CODES: &[&ErrorCode] = &[
    &E0001_UNRECOGNIZED_LEXEME,
    &E0100_UNEXPECTED_TOKEN,
    &E0200_UNDECLARED_IDENTIFIER,
    &E0201_REDECLARED_IDENTIFIER,
    &E0202_KIND_MISMATCH,
];

/// 按代码（不区分大小写）查找错误码。
pub fn lookup(code: &str) -> Option<&'static ErrorCode> {
    ALL_CODES
        .iter()
        .copied()
        .find(|error_code| error_code.code.eq_ignore_ascii_case(code))
}
