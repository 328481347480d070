// 导入父模块（也就是 lexer 模块）的所有内容
use super::*;
use crate::diagnostics::DiagnosticKind;

/// 辅助函数：运行词法分析，同时返回 token 和诊断。
fn lex(source: &str) -> (Vec<Token>, DiagnosticBag) {
    let lines = LineIndex::new(source);
    let mut diagnostics = DiagnosticBag::new();
    let tokens = analyze(source, &lines, &mut diagnostics);
    (tokens, diagnostics)
}

/// 只关心 token 类型和顺序的测试用这个。
fn lex_just_kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, diagnostics) = lex(source);
    assert!(diagnostics.is_empty(), "Lexer failed unexpectedly for source: {}", source);
    tokens.into_iter().map(|token| token.kind().clone()).collect()
}

fn categories(source: &str) -> Vec<(String, Category)> {
    let (tokens, _) = lex(source);
    tokens
        .iter()
        .map(|token| (token.lexeme().to_string(), token.category()))
        .collect()
}

// --- 成功案例 (Happy Path) ---

#[test]
fn test_keywords_and_identifiers() {
    let source = "var counter = 10;";
    let expected = vec![
        TokenKind::Keyword(Keyword::Var),
        TokenKind::Ident("counter".to_string()),
        TokenKind::Assign,
        TokenKind::Number("10".to_string()),
        TokenKind::Semicolon,
    ];
    assert_eq!(lex_just_kinds(source), expected);
}

#[test]
fn test_all_operators() {
    let source = "+ - * / % = == != < > <= >= && || !";
    let expected = vec![
        TokenKind::Plus, TokenKind::Minus, TokenKind::Star, TokenKind::Slash, TokenKind::Percent,
        TokenKind::Assign, TokenKind::EqEq, TokenKind::NotEq, TokenKind::Lt, TokenKind::Gt,
        TokenKind::LtEq, TokenKind::GtEq, TokenKind::AndAnd, TokenKind::OrOr, TokenKind::Bang,
    ];
    assert_eq!(lex_just_kinds(source), expected);
}

#[test]
fn test_reserved_word_categories() {
    // 保留字表里的每个词都按表中的分类输出
    for &(text, keyword, category) in RESERVED_WORDS {
        let (tokens, diagnostics) = lex(text);
        assert!(diagnostics.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), &TokenKind::Keyword(keyword));
        assert_eq!(tokens[0].category(), category, "wrong category for `{}`", text);
    }
}

#[test]
fn test_operator_and_literal_categories() {
    let got = categories("x = 3.14 + \"hi\" >= true and (y) ;");
    let expected = vec![
        ("x".to_string(), Category::Variable),
        ("=".to_string(), Category::MathExpression),
        ("3.14".to_string(), Category::Constant),
        ("+".to_string(), Category::MathExpression),
        ("\"hi\"".to_string(), Category::Constant),
        (">=".to_string(), Category::LogicalExpression),
        ("true".to_string(), Category::Constant),
        ("and".to_string(), Category::LogicalExpression),
        ("(".to_string(), Category::Delimiter),
        ("y".to_string(), Category::Variable),
        (")".to_string(), Category::Delimiter),
        (";".to_string(), Category::Delimiter),
    ];
    assert_eq!(got, expected);
}

#[test]
fn test_identifier_that_starts_with_keyword() {
    // `variable` 和 `iffy` 不是关键字
    let kinds = lex_just_kinds("variable iffy _tmp");
    assert!(kinds.iter().all(|kind| matches!(kind, TokenKind::Ident(_))));
}

#[test]
fn test_example_program_tokens() {
    let source = "var x = 5\nif x > 10 { loop { } }";
    let (tokens, diagnostics) = lex(source);
    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 13);

    let find = |lexeme: &str| tokens.iter().find(|t| t.lexeme() == lexeme).unwrap();
    assert_eq!(find("x").category(), Category::Variable);
    assert_eq!(find("5").category(), Category::Constant);
    assert_eq!(find(">").category(), Category::LogicalExpression);
    assert_eq!(find("if").category(), Category::Conditional);
    assert_eq!(find("loop").category(), Category::Loop);
    assert_eq!(find("if").line(), 2);
    assert_eq!(find("var").line(), 1);
}

#[test]
fn test_token_display() {
    let (tokens, _) = lex("count");
    assert_eq!(tokens[0].to_string(), "Lexeme: count, Category: Variable, Line: 1");
}

#[test]
fn test_string_escapes() {
    let kinds = lex_just_kinds(r#""a\n\"b\"\\""#);
    assert_eq!(kinds, vec![TokenKind::Str("a\n\"b\"\\".to_string())]);
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    let source = r#"
        // 这是一个单行注释
        var x // 行尾注释
        x
    "#;
    let (tokens, diagnostics) = lex(source);
    assert!(diagnostics.is_empty());
    let lines: Vec<usize> = tokens.iter().map(|t| t.line()).collect();
    assert_eq!(lines, vec![3, 3, 4]);
}

#[test]
fn test_whitespace_only_source() {
    let (tokens, diagnostics) = lex("  \n\t\r\n   ");
    assert!(tokens.is_empty());
    assert!(diagnostics.is_empty());
}

// --- 失败案例 (Sad Path) ---

#[test]
fn test_unrecognized_character() {
    let source = "var a = #;";
    let (tokens, diagnostics) = lex(source);

    assert_eq!(diagnostics.len(), 1, "Expected exactly one error.");
    let error = &diagnostics.as_slice()[0];
    assert_eq!(error.kind(), DiagnosticKind::UnrecognizedLexeme);
    assert_eq!(error.line(), 1);
    assert_eq!(error.span(), Span::new(8, 9));
    assert!(error.message().contains("'#'"));

    // 出错字符两侧的 token 保持完整
    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme()).collect();
    assert_eq!(lexemes, vec!["var", "a", "=", ";"]);
}

#[test]
fn test_multiple_unrecognized_characters() {
    let source = "var x = @\nx + $";
    let (tokens, diagnostics) = lex(source);

    assert_eq!(diagnostics.count(DiagnosticKind::UnrecognizedLexeme), 2);
    let lines: Vec<usize> = diagnostics.iter().map(|d| d.line()).collect();
    assert_eq!(lines, vec![1, 2]);
    assert!(diagnostics.as_slice()[0].message().contains("'@'"));
    assert!(diagnostics.as_slice()[1].message().contains("'$'"));
    assert_eq!(tokens.len(), 5);
}

#[test]
fn test_malformed_number_is_one_error() {
    let (tokens, diagnostics) = lex("var n = 12abc");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.as_slice()[0].message().contains("malformed numeric literal '12abc'"));
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_unterminated_string() {
    let (_tokens, diagnostics) = lex("var s = \"abc");
    assert!(diagnostics.has_errors());
    assert!(diagnostics
        .iter()
        .all(|d| d.kind() == DiagnosticKind::UnrecognizedLexeme));
}

#[test]
fn test_lexing_is_deterministic() {
    let source = "class User { var name }\ncreate User(\"ada\") # 9x";
    let (first_tokens, first_errors) = lex(source);
    let (second_tokens, second_errors) = lex(source);
    assert_eq!(first_tokens, second_tokens);
    assert_eq!(first_errors, second_errors);
}
