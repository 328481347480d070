use super::*;

fn diag(kind: DiagnosticKind, line: usize, span: Span) -> Diagnostic {
    Diagnostic::new(kind, "something went wrong", line, Label::new(span, "here"))
}

#[test]
fn test_bag_keeps_detection_order() {
    let mut bag = DiagnosticBag::new();
    assert!(!bag.has_errors());

    bag.report(diag(DiagnosticKind::UnexpectedToken, 3, Span::new(10, 11)));
    bag.report(diag(DiagnosticKind::UnrecognizedLexeme, 1, Span::new(0, 1)));
    bag.report(diag(DiagnosticKind::UnexpectedToken, 2, Span::new(5, 6)));

    assert!(bag.has_errors());
    assert_eq!(bag.len(), 3);
    let lines: Vec<usize> = bag.iter().map(|d| d.line()).collect();
    assert_eq!(lines, vec![3, 1, 2]);
    assert_eq!(bag.count(DiagnosticKind::UnexpectedToken), 2);
}

#[test]
fn test_error_lines_are_unique_and_sorted() {
    let mut bag = DiagnosticBag::new();
    for line in [4, 2, 4, 4, 1] {
        bag.report(diag(DiagnosticKind::UndeclaredIdentifier, line, Span::new(0, 1)));
    }
    assert_eq!(bag.error_lines().into_iter().collect::<Vec<_>>(), vec![1, 2, 4]);
}

#[test]
fn test_diagnostic_display_and_code() {
    let d = Diagnostic::new(
        DiagnosticKind::RedeclaredIdentifier,
        "'x' is already declared in this scope",
        2,
        Label::new(Span::new(14, 15), "redeclared here"),
    );
    assert_eq!(d.code(), "E0201");
    assert_eq!(d.to_string(), "error[E0201] on line 2: 'x' is already declared in this scope");
}

#[test]
fn test_every_kind_has_a_distinct_code() {
    let kinds = [
        DiagnosticKind::UnrecognizedLexeme,
        DiagnosticKind::UnexpectedToken,
        DiagnosticKind::UndeclaredIdentifier,
        DiagnosticKind::RedeclaredIdentifier,
        DiagnosticKind::KindMismatch,
    ];
    let codes: BTreeSet<&str> = kinds.iter().map(|k| k.error_code().code).collect();
    assert_eq!(codes.len(), kinds.len());
    assert_eq!(codes.len(), codes::ALL_CODES.len());
}

#[test]
fn test_lookup_is_case_insensitive() {
    assert_eq!(codes::lookup("e0202").map(|c| c.code), Some("E0202"));
    assert!(codes::lookup("E9999").is_none());
}

#[test]
fn test_render_plain_report() {
    let source = "var x = 5\nvar x = 6";
    let mut bag = DiagnosticBag::new();
    bag.report(
        Diagnostic::new(
            DiagnosticKind::RedeclaredIdentifier,
            "'x' is already declared in this scope",
            2,
            Label::new(Span::new(14, 15), "redeclared here"),
        )
        .with_secondary_label(Label::new(Span::new(4, 5), "previously declared here"))
        .with_note("first declaration is on line 1"),
    );

    let rendered = bag.render("main.crud", source, false).expect("render into memory");
    assert!(rendered.contains("E0201"));
    assert!(rendered.contains("'x' is already declared in this scope"));
    assert!(rendered.contains("previously declared here"));
    assert!(rendered.contains("main.crud"));
}

#[test]
fn test_render_clamps_end_of_input_span() {
    let source = "var x =";
    let mut bag = DiagnosticBag::new();
    bag.report(diag(DiagnosticKind::UnexpectedToken, 1, Span::new(7, 40)));
    assert!(bag.render("eoi.crud", source, false).is_ok());
}
