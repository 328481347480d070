// src/parser/parsers.rs

use crate::lexer::{Keyword, TokenKind};
use crate::parser::ast::*;
use crate::utils::Span;
use chumsky::input::ValueInput;
use chumsky::prelude::*;
use chumsky::recovery::{nested_delimiters, via_parser};

pub(super) type ParseError<'a> = extra::Err<Rich<'a, TokenKind>>;

/// 构建完整的 chumsky 解析器。
/// 此函数为内部实现细节，仅对父模块 `mod.rs` 可见。
pub(super) fn program_parser<'a, I>() -> impl Parser<'a, I, Program, ParseError<'a>>
where
    I: ValueInput<'a, Token = TokenKind, Span = SimpleSpan>,
{
    // --- 基础解析器 ---
    let ident = select! { TokenKind::Ident(name) = e => Ident { name, span: Span::from(e.span()) } }
        .labelled("identifier");
    let kw = |keyword: Keyword| just(TokenKind::Keyword(keyword));

    // 二元运算的左结合折叠，所有优先级层共用
    let binary = |left: Expr, (op, right): (BinaryOp, Expr)| {
        let span = left.span.to(right.span);
        Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        }
    };

    // --- 表达式解析器 ---
    let expr = recursive(|expr| {
        let args = expr
            .clone()
            .separated_by(just(TokenKind::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen))
            .labelled("argument list");

        let literal = select! {
            TokenKind::Number(value) => ExprKind::Number(value),
            TokenKind::Str(value) => ExprKind::Str(value),
            TokenKind::Keyword(Keyword::True) => ExprKind::Bool(true),
            TokenKind::Keyword(Keyword::False) => ExprKind::Bool(false),
        }
        .map_with(|kind, e| Expr { kind, span: Span::from(e.span()) });

        let instantiation = kw(Keyword::New)
            .ignore_then(ident.clone())
            .then(args.clone().or_not())
            .map_with(|(class, args), e| Expr {
                kind: ExprKind::New { class, args: args.unwrap_or_default() },
                span: Span::from(e.span()),
            });

        let call = ident
            .clone()
            .then(args)
            .map_with(|(callee, args), e| Expr {
                kind: ExprKind::Call { callee, args },
                span: Span::from(e.span()),
            });

        let name = ident.clone().map(|ident| Expr {
            span: ident.span,
            kind: ExprKind::Name(ident),
        });

        let atom = choice((
            literal,
            instantiation,
            call,
            name,
            expr.clone()
                .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen)),
        ))
        .boxed();

        // --- 运算符优先级金字塔 ---
        let unary_op = choice((
            just(TokenKind::Minus).to(UnaryOp::Neg),
            just(TokenKind::Bang).to(UnaryOp::Not),
            kw(Keyword::Not).to(UnaryOp::Not),
        ))
        .map_with(|op, e| (op, Span::from(e.span())));

        let unary = unary_op
            .repeated()
            .foldr(atom, |(op, op_span): (UnaryOp, Span), operand: Expr| {
                let span = op_span.to(operand.span);
                Expr {
                    kind: ExprKind::Unary { op, operand: Box::new(operand) },
                    span,
                }
            })
            .boxed();

        let product_op = choice((
            just(TokenKind::Star).to(BinaryOp::Mul),
            just(TokenKind::Slash).to(BinaryOp::Div),
            just(TokenKind::Percent).to(BinaryOp::Rem),
        ));
        let product = unary
            .clone()
            .foldl(product_op.then(unary).repeated(), binary)
            .boxed();

        let sum_op = choice((
            just(TokenKind::Plus).to(BinaryOp::Add),
            just(TokenKind::Minus).to(BinaryOp::Sub),
        ));
        let sum = product
            .clone()
            .foldl(sum_op.then(product).repeated(), binary)
            .boxed();

        let comparison_op = choice((
            just(TokenKind::LtEq).to(BinaryOp::LtEq),
            just(TokenKind::GtEq).to(BinaryOp::GtEq),
            just(TokenKind::Lt).to(BinaryOp::Lt),
            just(TokenKind::Gt).to(BinaryOp::Gt),
        ));
        let comparison = sum
            .clone()
            .foldl(comparison_op.then(sum).repeated(), binary)
            .boxed();

        let equality_op = choice((
            just(TokenKind::EqEq).to(BinaryOp::Eq),
            just(TokenKind::NotEq).to(BinaryOp::NotEq),
        ));
        let equality = comparison
            .clone()
            .foldl(equality_op.then(comparison).repeated(), binary)
            .boxed();

        let and_op = choice((just(TokenKind::AndAnd), kw(Keyword::And))).to(BinaryOp::And);
        let logical_and = equality
            .clone()
            .foldl(and_op.then(equality).repeated(), binary)
            .boxed();

        let or_op = choice((just(TokenKind::OrOr), kw(Keyword::Or))).to(BinaryOp::Or);
        let logical_or = logical_and
            .clone()
            .foldl(or_op.then(logical_and).repeated(), binary)
            .boxed();

        // 赋值是右结合的，目标只能是标识符
        let assignment = ident
            .clone()
            .then_ignore(just(TokenKind::Assign))
            .then(expr.clone())
            .map_with(|(target, value), e| Expr {
                kind: ExprKind::Assign { target, value: Box::new(value) },
                span: Span::from(e.span()),
            });

        choice((assignment, logical_or)).labelled("expression").boxed()
    });

    let args = expr
        .clone()
        .separated_by(just(TokenKind::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen))
        .labelled("argument list");

    // --- 语句和代码块解析器 ---
    let mut stmt = Recursive::declare();
    let mut if_stmt = Recursive::declare();

    // 内容无法解析的代码块会被整体跳过，直到匹配的右大括号
    let block = stmt
        .clone()
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(TokenKind::LBrace), just(TokenKind::RBrace))
        .map_with(|stmts, e| Block { stmts, span: Span::from(e.span()) })
        .recover_with(via_parser(nested_delimiters(
            TokenKind::LBrace,
            TokenKind::RBrace,
            [(TokenKind::LParen, TokenKind::RParen)],
            |span: SimpleSpan| Block { stmts: Vec::new(), span: span.into() },
        )))
        .labelled("block")
        .boxed();

    let var_decl = kw(Keyword::Var)
        .ignore_then(ident.clone())
        .then(just(TokenKind::Assign).ignore_then(expr.clone()).or_not())
        .map(|(name, init)| StmtKind::Var(VarDecl { name, init }));

    let const_decl = kw(Keyword::Const)
        .ignore_then(ident.clone())
        .then_ignore(just(TokenKind::Assign))
        .then(expr.clone())
        .map(|(name, value)| StmtKind::Const(ConstDecl { name, value }));

    let params = ident
        .clone()
        .separated_by(just(TokenKind::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(TokenKind::LParen), just(TokenKind::RParen))
        .labelled("parameter list");

    let func_def = kw(Keyword::Func)
        .ignore_then(ident.clone())
        .then(params)
        .then(block.clone())
        .map(|((name, params), body)| StmtKind::Func(FuncDef { name, params, body }))
        .labelled("function definition");

    let member = choice((var_decl.clone(), const_decl.clone(), func_def.clone()))
        .map_with(|kind, e| Stmt { kind, span: Span::from(e.span()) })
        .then_ignore(just(TokenKind::Semicolon).or_not())
        .labelled("class member");

    let class_def = kw(Keyword::Class)
        .ignore_then(ident.clone())
        .then(
            member
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(TokenKind::LBrace), just(TokenKind::RBrace)),
        )
        .map(|(name, members)| StmtKind::Class(ClassDef { name, members }))
        .labelled("class definition");

    if_stmt.define(
        kw(Keyword::If)
            .ignore_then(expr.clone())
            .then(block.clone())
            .then(
                kw(Keyword::Else)
                    .ignore_then(choice((
                        if_stmt.clone(),
                        block.clone().map_with(|block, e| Stmt {
                            kind: StmtKind::Block(block),
                            span: Span::from(e.span()),
                        }),
                    )))
                    .or_not(),
            )
            .map_with(|((condition, then_block), else_branch), e| Stmt {
                kind: StmtKind::If(IfStmt {
                    condition,
                    then_block,
                    else_branch: else_branch.map(Box::new),
                }),
                span: Span::from(e.span()),
            })
            .boxed(),
    );

    let loop_stmt = kw(Keyword::Loop).ignore_then(block.clone()).map(StmtKind::Loop);

    let while_stmt = kw(Keyword::While)
        .ignore_then(expr.clone())
        .then(block.clone())
        .map(|(condition, body)| StmtKind::While(WhileStmt { condition, body }));

    let crud_op = select! {
        TokenKind::Keyword(Keyword::Create) => CrudOp::Create,
        TokenKind::Keyword(Keyword::Read) => CrudOp::Read,
        TokenKind::Keyword(Keyword::Update) => CrudOp::Update,
        TokenKind::Keyword(Keyword::Delete) => CrudOp::Delete,
    };
    let crud_stmt = crud_op
        .then(ident.clone())
        .then(args.or_not())
        .map(|((op, target), args)| {
            StmtKind::Crud(CrudStmt { op, target, args: args.unwrap_or_default() })
        })
        .labelled("CRUD statement");

    let return_stmt = kw(Keyword::Return)
        .ignore_then(expr.clone().or_not())
        .map(StmtKind::Return);

    // --- 错误恢复 ---
    // 平衡的 `{ ... }` 组，恢复时整体跳过，这样组里的 `}` 不会被当成新的错误
    let brace_group = recursive(|group| {
        group
            .or(none_of([TokenKind::LBrace, TokenKind::RBrace]).ignored())
            .repeated()
            .delimited_by(just(TokenKind::LBrace), just(TokenKind::RBrace))
    });
    let skip_group = choice((
        brace_group.ignored(),
        // 没有闭合的 `{`：一直跳到输入末尾
        just(TokenKind::LBrace).then(any().repeated()).ignored(),
    ));

    // 出错的语句：至少吃掉一个单位（但不吃 `}`），然后跳到 `;`、`}` 或下一个语句关键字
    let statement_error = choice((skip_group.clone(), none_of([TokenKind::RBrace]).ignored()))
        .ignore_then(
            choice((
                skip_group,
                none_of([
                    TokenKind::LBrace,
                    TokenKind::Semicolon,
                    TokenKind::RBrace,
                    TokenKind::Keyword(Keyword::Var),
                    TokenKind::Keyword(Keyword::Const),
                    TokenKind::Keyword(Keyword::Func),
                    TokenKind::Keyword(Keyword::Class),
                    TokenKind::Keyword(Keyword::If),
                    TokenKind::Keyword(Keyword::Loop),
                    TokenKind::Keyword(Keyword::While),
                    TokenKind::Keyword(Keyword::Return),
                    TokenKind::Keyword(Keyword::Create),
                    TokenKind::Keyword(Keyword::Read),
                    TokenKind::Keyword(Keyword::Update),
                    TokenKind::Keyword(Keyword::Delete),
                ])
                .ignored(),
            ))
            .repeated(),
        )
        .ignore_then(just(TokenKind::Semicolon).or_not())
        .map_with(|_, e| Stmt { kind: StmtKind::Error, span: Span::from(e.span()) });

    // 顶层多出来的 `}` 没有代码块可以结束：报告后吃掉它，继续解析后面的语句
    let stray_brace = just(TokenKind::RBrace)
        .map_with(|_, e| Stmt { kind: StmtKind::Error, span: Span::from(e.span()) });

    stmt.define(
        choice((
            if_stmt.clone(),
            choice((
                var_decl,
                const_decl,
                func_def,
                class_def,
                loop_stmt,
                while_stmt,
                crud_stmt,
                return_stmt,
                block.clone().map(StmtKind::Block),
                expr.clone().map(StmtKind::Expr),
            ))
            .map_with(|kind, e| Stmt { kind, span: Span::from(e.span()) }),
        ))
        .then_ignore(just(TokenKind::Semicolon).or_not())
        .labelled("statement")
        .recover_with(via_parser(statement_error))
        .boxed(),
    );

    // --- 顶层解析器 ---
    stmt.recover_with(via_parser(stray_brace))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map_with(|stmts, e| Program { stmts, span: Span::from(e.span()) })
}
