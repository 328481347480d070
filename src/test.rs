// src/test.rs
// 整条分析管道的端到端测试

use super::*;
use crate::analyzer::symbols::SymbolKind;
use crate::diagnostics::DiagnosticKind;
use crate::lexer::Category;

fn kinds_and_lines(result: &AnalysisResult) -> Vec<(DiagnosticKind, usize)> {
    result.diagnostics.iter().map(|d| (d.kind(), d.line())).collect()
}

// --- 成功路径 ---

#[test]
fn test_whitespace_only_source() {
    for source in ["", "   ", "\n\n\t  \r\n"] {
        let result = run_analysis(source);
        assert!(result.tokens.is_empty());
        assert!(result.is_clean());
        assert!(result.error_lines().is_empty());
    }
}

#[test]
fn test_example_program_is_clean() {
    let result = run_analysis("var x = 5\nif x > 10 { loop { } }");
    assert!(result.is_clean(), "{:?}", result.diagnostics);

    let category_of = |lexeme: &str| {
        result
            .tokens
            .iter()
            .find(|t| t.lexeme() == lexeme)
            .map(|t| t.category())
    };
    assert_eq!(category_of("x"), Some(Category::Variable));
    assert_eq!(category_of("5"), Some(Category::Constant));
    assert_eq!(category_of(">"), Some(Category::LogicalExpression));

    let x = result.symbols.lookup("x").expect("x should be declared");
    assert_eq!(x.kind, SymbolKind::Variable);
    assert_eq!(x.declared_at_line, 1);
}

#[test]
fn test_one_token_per_lexeme() {
    let source = r#"
        class Account {
            var balance = 0
            func deposit(amount) { balance = balance + amount; }
        }
        const FEE = 2.5
        var acct = new Account()
        create Account(100)
        while acct != 0 and not false { read Account; }
    "#;
    let result = run_analysis(source);
    assert!(result.is_clean(), "{:?}", result.diagnostics);
    assert_eq!(result.tokens.len(), 49);
    assert!(result.tokens.iter().all(|t| !t.lexeme().trim().is_empty()));
}

// --- 失败路径 ---

#[test]
fn test_redeclaration_example() {
    let result = run_analysis("var x = 5\nvar x = 6");
    assert_eq!(kinds_and_lines(&result), vec![(DiagnosticKind::RedeclaredIdentifier, 2)]);
    assert_eq!(result.error_lines().into_iter().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_undeclared_example() {
    let result = run_analysis("y = 5");
    assert_eq!(kinds_and_lines(&result), vec![(DiagnosticKind::UndeclaredIdentifier, 1)]);
}

#[test]
fn test_shadowing_has_no_errors() {
    let result = run_analysis("var x = 5\n{ var x = 6 }");
    assert!(result.is_clean());
}

#[test]
fn test_lexical_error_does_not_stop_the_pipeline() {
    // `#` 被跳过，剩下的 token 可以正常解析，语义分析照样进行
    let result = run_analysis("var x = 5 #\ny = x");
    assert_eq!(
        kinds_and_lines(&result),
        vec![
            (DiagnosticKind::UnrecognizedLexeme, 1),
            (DiagnosticKind::UndeclaredIdentifier, 2),
        ]
    );
    assert_eq!(result.tokens.len(), 7);
}

#[test]
fn test_syntax_error_skips_semantic_stage() {
    // 第 2 行的 y 未声明，但语法错误存在时不做语义分析
    let result = run_analysis("var = 1\ny = 2");
    assert!(result.diagnostics.has_errors());
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.kind() == DiagnosticKind::UnexpectedToken));
    assert!(result.symbols.is_empty());
}

#[test]
fn test_stray_closing_brace_keeps_later_syntax_errors() {
    let result = run_analysis("}\nvar = 1\nconst = 2");
    assert_eq!(
        kinds_and_lines(&result),
        vec![
            (DiagnosticKind::UnexpectedToken, 1),
            (DiagnosticKind::UnexpectedToken, 2),
            (DiagnosticKind::UnexpectedToken, 3),
        ]
    );
    assert_eq!(result.error_lines().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_error_lines_are_deduplicated() {
    let result = run_analysis("a = b + c\nd = 1");
    assert_eq!(result.diagnostics.len(), 4);
    assert_eq!(result.error_lines().into_iter().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn test_analysis_is_deterministic() {
    let source = "var a = 1\nvar a = 2 @\nb(a)\nconst c = 3\nc = 4";
    let first = run_analysis(source);
    let second = run_analysis(source);
    assert_eq!(first.tokens, second.tokens);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.symbols, second.symbols);
}

#[test]
fn test_concurrent_runs_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let source = format!("var x{i} = {i}\nx{i} = undefined{i}");
                run_analysis(&source)
            })
        })
        .collect();
    for handle in handles {
        let result = handle.join().expect("analysis thread panicked");
        assert_eq!(kinds_and_lines(&result), vec![(DiagnosticKind::UndeclaredIdentifier, 2)]);
        assert_eq!(result.symbols.len(), 1);
    }
}

// --- 输入层面的硬性失败 ---

#[test]
fn test_invalid_utf8_is_rejected() {
    let result = run_analysis_bytes(&[b'v', b'a', b'r', b' ', 0xff, 0xfe]);
    assert!(matches!(result, Err(AnalysisError::InvalidEncoding(_))));
}

#[test]
fn test_valid_bytes_are_analyzed() {
    let result = run_analysis_bytes(b"var x = 1").expect("valid UTF-8");
    assert!(result.is_clean());
    assert_eq!(result.tokens.len(), 4);
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("crudc-test-this-file-does-not-exist.crud");
    let error = run_analysis_file(&path).expect_err("reading a missing file must fail");
    assert!(matches!(&error, AnalysisError::Io { path: p, .. } if p == &path));
    assert!(error.to_string().contains("failed to read source file"));
}

#[test]
fn test_file_round_trip() {
    let path = std::env::temp_dir().join(format!("crudc-test-{}.crud", std::process::id()));
    std::fs::write(&path, "const LIMIT = 3\nLIMIT = 4\n").expect("write temp file");
    let result = run_analysis_file(&path);
    let _ = std::fs::remove_file(&path);

    let result = result.expect("file should be readable");
    assert_eq!(kinds_and_lines(&result), vec![(DiagnosticKind::KindMismatch, 2)]);
}
