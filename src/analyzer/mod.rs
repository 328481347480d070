// In src/analyzer/mod.rs

// 1. 声明所有模块
pub mod symbols;
mod expression;
mod statement;


// 2. 导入依赖
use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, Label};
use crate::parser::ast;
use crate::utils::LineIndex;
use symbols::{Symbol, SymbolError, SymbolKind, SymbolTable};

pub use symbols::{ScopeId, ScopeKind, SymbolId};

// --- 核心抽象：上下文与 Trait ---
pub struct AnalysisContext<'a> {
    pub symbols: &'a mut SymbolTable,
    pub diagnostics: &'a mut DiagnosticBag,
    pub lines: &'a LineIndex,
}

/// 语义检查：AST 节点在上下文中检查自己，发现的问题写入 `ctx.diagnostics`。
pub trait Check {
    fn check(&self, ctx: &mut AnalysisContext<'_>);
}

impl AnalysisContext<'_> {
    /// 在当前作用域声明 `name`；重名时报告 `RedeclaredIdentifier`。
    fn declare(&mut self, name: &ast::Ident, kind: SymbolKind) {
        let line = self.lines.line_of(name.span.start);
        match self.symbols.declare(&name.name, kind, line, name.span) {
            Ok(_) => {}
            Err(SymbolError::AlreadyDeclared { previous, previous_line, .. }) => {
                let previous_span = self.symbols.symbol(previous).span;
                self.diagnostics.report(
                    Diagnostic::new(
                        DiagnosticKind::RedeclaredIdentifier,
                        format!("'{}' is already declared in this scope", name.name),
                        line,
                        Label::new(name.span, "redeclared here"),
                    )
                    .with_secondary_label(Label::new(previous_span, "previously declared here"))
                    .with_note(format!("first declaration is on line {}", previous_line)),
                );
            }
        }
    }

    /// 沿作用域链解析一个名字的使用；找不到时报告 `UndeclaredIdentifier`。
    fn resolve(&mut self, name: &ast::Ident) -> Option<Symbol> {
        let found = self.symbols.lookup(&name.name).cloned();
        if found.is_none() {
            self.diagnostics.report(Diagnostic::new(
                DiagnosticKind::UndeclaredIdentifier,
                format!("use of undeclared identifier '{}'", name.name),
                self.lines.line_of(name.span.start),
                Label::new(name.span, "not found in this scope"),
            ));
        }
        found
    }

    fn kind_mismatch(&mut self, name: &ast::Ident, symbol: &Symbol, message: String) {
        self.diagnostics.report(
            Diagnostic::new(
                DiagnosticKind::KindMismatch,
                message,
                self.lines.line_of(name.span.start),
                Label::new(name.span, format!("this is a {}", symbol.kind)),
            )
            .with_secondary_label(Label::new(
                symbol.span,
                format!("'{}' declared as a {} here", symbol.name, symbol.kind),
            )),
        );
    }
}

// --- Analyzer 结构体与实现 ---
pub struct Analyzer<'a> {
    lines: &'a LineIndex,
    symbols: &'a mut SymbolTable,
    // Analyzer 需要持有 diagnostics 的可变借用
    diagnostics: &'a mut DiagnosticBag,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        lines: &'a LineIndex,
        symbols: &'a mut SymbolTable,
        diagnostics: &'a mut DiagnosticBag,
    ) -> Self {
        Self {
            lines,
            symbols,
            diagnostics,
        }
    }

    fn create_ctx(&mut self) -> AnalysisContext<'_> {
        AnalysisContext {
            symbols: &mut *self.symbols,
            diagnostics: &mut *self.diagnostics,
            lines: self.lines,
        }
    }

    /// 自上而下遍历整个程序，结果只通过符号表和诊断体现。
    pub fn analyze(&mut self, program: &ast::Program) {
        let before = self.diagnostics.len();
        let mut ctx = self.create_ctx();
        for stmt in &program.stmts {
            stmt.check(&mut ctx);
        }
        tracing::debug!(
            symbols = self.symbols.len(),
            scopes = self.symbols.scopes().len(),
            errors = self.diagnostics.len() - before,
            "semantic analysis finished"
        );
    }
}
