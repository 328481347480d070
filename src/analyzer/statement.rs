// In src/analyzer/statement.rs

use super::symbols::{ScopeKind, SymbolKind};
use super::{AnalysisContext, Check}; // 从父模块导入核心抽象
use crate::parser::ast;

impl Check for ast::Stmt {
    fn check(&self, ctx: &mut AnalysisContext<'_>) {
        match &self.kind {
            ast::StmtKind::Var(decl) => {
                // 先检查初始化表达式，`var x = x` 中右边的 x 指向外层
                if let Some(init) = &decl.init {
                    init.check(ctx);
                }
                ctx.declare(&decl.name, SymbolKind::Variable);
            }
            ast::StmtKind::Const(decl) => {
                decl.value.check(ctx);
                ctx.declare(&decl.name, SymbolKind::Constant);
            }
            ast::StmtKind::Func(func) => check_function(func, ctx),
            ast::StmtKind::Class(class) => check_class(class, ctx),
            ast::StmtKind::If(if_stmt) => check_if(if_stmt, ctx),
            ast::StmtKind::Loop(body) => check_block(body, ScopeKind::Loop, ctx),
            ast::StmtKind::While(while_stmt) => {
                while_stmt.condition.check(ctx);
                check_block(&while_stmt.body, ScopeKind::Loop, ctx);
            }
            ast::StmtKind::Crud(crud) => check_crud(crud, ctx),
            ast::StmtKind::Return(value) => {
                if let Some(value) = value {
                    value.check(ctx);
                }
            }
            ast::StmtKind::Block(block) => check_block(block, ScopeKind::Block, ctx),
            ast::StmtKind::Expr(expr) => expr.check(ctx),
            // 只有语法分析无错时才会进入语义分析，正常情况下不会遇到
            ast::StmtKind::Error => {}
        }
    }
}

// === 辅助函数 ===

/// 在新的嵌套作用域中检查一个语句块。
pub(super) fn check_block(block: &ast::Block, kind: ScopeKind, ctx: &mut AnalysisContext<'_>) {
    ctx.symbols.enter_scope(kind);
    for stmt in &block.stmts {
        stmt.check(ctx);
    }
    ctx.symbols.exit_scope();
}

/// 函数名先声明在外层（允许递归），参数和函数体共享同一个函数作用域。
fn check_function(func: &ast::FuncDef, ctx: &mut AnalysisContext<'_>) {
    ctx.declare(&func.name, SymbolKind::Function);

    ctx.symbols.enter_scope(ScopeKind::Function);
    for param in &func.params {
        ctx.declare(param, SymbolKind::Variable);
    }
    for stmt in &func.body.stmts {
        stmt.check(ctx);
    }
    ctx.symbols.exit_scope();
}

fn check_class(class: &ast::ClassDef, ctx: &mut AnalysisContext<'_>) {
    ctx.declare(&class.name, SymbolKind::Class);

    ctx.symbols.enter_scope(ScopeKind::Class);
    for member in &class.members {
        member.check(ctx);
    }
    ctx.symbols.exit_scope();
}

fn check_if(if_stmt: &ast::IfStmt, ctx: &mut AnalysisContext<'_>) {
    if_stmt.condition.check(ctx);
    check_block(&if_stmt.then_block, ScopeKind::Conditional, ctx);

    match if_stmt.else_branch.as_deref() {
        Some(ast::Stmt { kind: ast::StmtKind::Block(block), .. }) => {
            check_block(block, ScopeKind::Conditional, ctx);
        }
        // `else if`
        Some(other) => other.check(ctx),
        None => {}
    }
}

/// CRUD 语句的目标必须是类或变量，参数在目标之后检查。
fn check_crud(crud: &ast::CrudStmt, ctx: &mut AnalysisContext<'_>) {
    if let Some(symbol) = ctx.resolve(&crud.target) {
        if !matches!(symbol.kind, SymbolKind::Class | SymbolKind::Variable) {
            ctx.kind_mismatch(
                &crud.target,
                &symbol,
                format!(
                    "'{}' is a {}, but `{}` needs a class or a variable",
                    crud.target.name, symbol.kind, crud.op
                ),
            );
        }
    }
    for arg in &crud.args {
        arg.check(ctx);
    }
}
