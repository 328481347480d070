// In src/analyzer/expression.rs

use super::symbols::SymbolKind;
use super::{AnalysisContext, Check};
use crate::parser::ast;

impl Check for ast::Expr {
    fn check(&self, ctx: &mut AnalysisContext<'_>) {
        match &self.kind {
            ast::ExprKind::Number(_) | ast::ExprKind::Str(_) | ast::ExprKind::Bool(_) => {}
            ast::ExprKind::Name(ident) => {
                ctx.resolve(ident);
            }
            ast::ExprKind::Unary { operand, .. } => operand.check(ctx),
            ast::ExprKind::Binary { left, right, .. } => {
                left.check(ctx);
                right.check(ctx);
            }
            ast::ExprKind::Assign { target, value } => {
                check_assignment_target(target, ctx);
                value.check(ctx);
            }
            ast::ExprKind::Call { callee, args } => {
                if let Some(symbol) = ctx.resolve(callee) {
                    if symbol.kind != SymbolKind::Function {
                        ctx.kind_mismatch(
                            callee,
                            &symbol,
                            format!("'{}' is a {}, not a function", callee.name, symbol.kind),
                        );
                    }
                }
                check_all(args, ctx);
            }
            ast::ExprKind::New { class, args } => {
                if let Some(symbol) = ctx.resolve(class) {
                    if symbol.kind != SymbolKind::Class {
                        ctx.kind_mismatch(
                            class,
                            &symbol,
                            format!("'{}' is a {}, not a class", class.name, symbol.kind),
                        );
                    }
                }
                check_all(args, ctx);
            }
        }
    }
}

/// 只有变量可以被赋值。
fn check_assignment_target(target: &ast::Ident, ctx: &mut AnalysisContext<'_>) {
    let Some(symbol) = ctx.resolve(target) else {
        return;
    };
    if symbol.kind != SymbolKind::Variable {
        ctx.kind_mismatch(
            target,
            &symbol,
            format!("cannot assign to {} '{}'", symbol.kind, target.name),
        );
    }
}

fn check_all(exprs: &[ast::Expr], ctx: &mut AnalysisContext<'_>) {
    for expr in exprs {
        expr.check(ctx);
    }
}
