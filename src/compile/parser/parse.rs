use chumsky::input::ValueInput;
use chumsky::prelude::*;

use crate::compile::ast::SourcePos;
use crate::compile::ast::parsed::{
    BinaryOp, Block, Expr, FunctionDecl, Param, Program, Stmt, TypeTag, UnaryOp,
};
use crate::compile::parser::lex::Token;

type ErrorParserExtra<'src> = extra::Err<Rich<'src, Token<'src>, SourcePos>>;

fn type_parser<'src, I>() -> impl Parser<'src, I, TypeTag, ErrorParserExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
{
    // Type names are checked against the alias table later on.
    select! {Token::IDENT(x) => x.to_string()}
}

pub fn expr_parser<'src, I, B>(
    block: B,
) -> impl Parser<'src, I, Expr, ErrorParserExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
    B: Parser<'src, I, Block, ErrorParserExtra<'src>> + Clone + 'src,
{
    let num = select! {Token::NUM {value, base} => (value, base)};
    let float = select! {Token::FLOAT(value) => value};
    let string = select! {Token::STR(value) => value};
    let ident = select! {Token::IDENT(ident) => ident};

    recursive(|expr| {
        let literal = choice((
            num.map_with(|(value, base), ctx| {
                let text = match base {
                    16 => format!("0x{value}"),
                    _ => value.to_string(),
                };

                Expr::Int(text, ctx.span())
            }),
            float.map_with(|value, ctx| Expr::Float(value.to_string(), ctx.span())),
            string.map_with(|value, ctx| Expr::Str(value.to_string(), ctx.span())),
            just(Token::TRUE).map_with(|_, ctx| Expr::Bool(true, ctx.span())),
            just(Token::FALSE).map_with(|_, ctx| Expr::Bool(false, ctx.span())),
        ));

        let if_expr = recursive(|if_expr| {
            just(Token::IF)
                .ignore_then(expr.clone())
                .then(block.clone())
                .then(
                    just(Token::ELSE)
                        .ignore_then(choice((if_expr, block.clone().map(Expr::Block))))
                        .or_not(),
                )
                .map(|((cond, then), otherwise): ((Expr, Block), Option<Expr>)| {
                    Expr::If(cond.boxed(), then, otherwise.map(Expr::boxed))
                })
        });

        let while_expr = just(Token::WHILE)
            .ignore_then(expr.clone())
            .then(block.clone())
            .map(|(cond, body)| Expr::While(cond.boxed(), body));

        let atomic_expr = choice((
            literal,
            ident.map_with(|ident, ctx| Expr::Path(ident.to_string(), ctx.span())),
            if_expr,
            while_expr,
            block.clone().map(Expr::Block),
            expr.clone()
                .delimited_by(just(Token::L_ROUND), just(Token::R_ROUND)),
        ))
        .boxed();

        let unary_op = just(Token::MINUS)
            .to(UnaryOp::Neg)
            .or(just(Token::BANG).to(UnaryOp::Not));

        let unary = unary_op
            .repeated()
            .foldr(atomic_expr, |op, rhs| Expr::Unary(op, rhs.boxed()))
            .boxed();

        let mult_op = just(Token::STAR)
            .to(BinaryOp::Mul)
            .or(just(Token::SLASH).to(BinaryOp::Div))
            .or(just(Token::PERCENT).to(BinaryOp::Mod));

        let mult = unary
            .clone()
            .foldl(mult_op.then(unary).repeated(), |a, (op, b)| {
                Expr::Binary(op, a.boxed(), b.boxed())
            })
            .boxed();

        let sum_op = just(Token::PLUS)
            .to(BinaryOp::Add)
            .or(just(Token::MINUS).to(BinaryOp::Sub));

        let sum = mult
            .clone()
            .foldl(sum_op.then(mult).repeated(), |a, (op, b)| {
                Expr::Binary(op, a.boxed(), b.boxed())
            })
            .boxed();

        let cmp_op = choice((
            just(Token::EQ_EQ).to(BinaryOp::Eq),
            just(Token::NOT_EQ).to(BinaryOp::NotEq),
            just(Token::LESS_EQ).to(BinaryOp::LessEq),
            just(Token::LESS).to(BinaryOp::Less),
            just(Token::GREATER_EQ).to(BinaryOp::GreaterEq),
            just(Token::GREATER).to(BinaryOp::Greater),
        ));

        // Comparisons do not chain.
        let cmp = sum
            .clone()
            .then(cmp_op.then(sum).or_not())
            .map(|(a, rhs)| match rhs {
                Some((op, b)) => Expr::Binary(op, a.boxed(), b.boxed()),
                None => a,
            })
            .boxed();

        let and = cmp
            .clone()
            .foldl(
                just(Token::AND_AND)
                    .to(BinaryOp::LogicalAnd)
                    .then(cmp)
                    .repeated(),
                |a, (op, b)| Expr::Binary(op, a.boxed(), b.boxed()),
            )
            .boxed();

        let or = and
            .clone()
            .foldl(
                just(Token::OR_OR)
                    .to(BinaryOp::LogicalOr)
                    .then(and)
                    .repeated(),
                |a, (op, b)| Expr::Binary(op, a.boxed(), b.boxed()),
            )
            .boxed();

        // Assignment binds loosest and groups to the right.
        or.then(just(Token::EQ).ignore_then(expr).or_not())
            .map(|(target, value)| match value {
                Some(value) => Expr::Assign(target.boxed(), value.boxed()),
                None => target,
            })
    })
}

pub fn decl_parser<'src, I, E>(expr: E) -> impl Parser<'src, I, Stmt, ErrorParserExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
    E: Parser<'src, I, Expr, ErrorParserExtra<'src>> + Clone,
{
    let ident = select! {Token::IDENT(x) => x};

    just(Token::LET)
        .ignore_then(just(Token::MUT).or_not().map(|m| m.is_some()))
        .then(ident)
        .then(just(Token::COLON).ignore_then(type_parser()).or_not())
        .then(just(Token::EQ).ignore_then(expr).or_not())
        .then_ignore(just(Token::SEMICOLON))
        .map_with(|(((mutable, name), ty), init), ctx| Stmt::Let {
            name: name.to_string(),
            mutable,
            ty,
            init,
            span: ctx.span(),
        })
}

pub fn expr_stmt_parser<'src, I, E>(
    expr: E,
) -> impl Parser<'src, I, Stmt, ErrorParserExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
    E: Parser<'src, I, Expr, ErrorParserExtra<'src>> + Clone,
{
    expr.then(just(Token::SEMICOLON).or_not())
        .try_map(|(expr, semicolon), span| {
            if semicolon.is_some() || expr.is_block_like() {
                Ok(Stmt::Expr(expr))
            } else {
                Err(Rich::custom(span, "expected `;` after expression"))
            }
        })
}

pub fn block_parser<'src, I>() -> impl Parser<'src, I, Block, ErrorParserExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
{
    recursive(|block| {
        let expr = expr_parser(block.clone());

        let stmt = choice((
            decl_parser(expr.clone()),
            function_parser(block).map(Stmt::Item),
            expr_stmt_parser(expr),
        ));

        stmt.repeated()
            .collect()
            .delimited_by(just(Token::L_CURLY), just(Token::R_CURLY))
            .map(|stmts| Block { stmts })
    })
}

pub fn function_parser<'src, I, B>(
    block: B,
) -> impl Parser<'src, I, FunctionDecl, ErrorParserExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
    B: Parser<'src, I, Block, ErrorParserExtra<'src>> + Clone,
{
    let ident = select! {Token::IDENT(x) => x};

    let param = ident
        .then_ignore(just(Token::COLON))
        .then(type_parser())
        .map(|(name, ty)| Param {
            name: name.to_string(),
            ty,
        });

    just(Token::FN)
        .ignore_then(ident)
        .then(
            param
                .separated_by(just(Token::COMMA))
                .allow_trailing()
                .collect()
                .delimited_by(just(Token::L_ROUND), just(Token::R_ROUND)),
        )
        .then(just(Token::ARROW).ignore_then(type_parser()).or_not())
        .then(block)
        .map_with(|(((name, params), ret), body), ctx| FunctionDecl {
            name: name.to_string(),
            params,
            ret,
            body,
            span: ctx.span(),
        })
}

pub fn program_parser<'src, I>() -> impl Parser<'src, I, Program, ErrorParserExtra<'src>>
where
    I: ValueInput<'src, Token = Token<'src>, Span = SourcePos>,
{
    function_parser(block_parser())
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|items| Program { items })
}
