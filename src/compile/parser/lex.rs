use std::fmt::Display;

use chumsky::prelude::*;

use super::Spanned;

#[derive(Clone, Debug, PartialEq)]
#[allow(non_camel_case_types)]
pub enum Token<'src> {
    IDENT(&'src str),
    FN,
    LET,
    MUT,
    IF,
    ELSE,
    WHILE,
    TRUE,
    FALSE,
    NUM { value: &'src str, base: u32 },
    FLOAT(&'src str),
    STR(&'src str),
    L_ROUND,
    R_ROUND,
    L_CURLY,
    R_CURLY,
    SEMICOLON,
    COLON,
    COMMA,
    ARROW,
    EQ,
    EQ_EQ,
    NOT_EQ,
    LESS,
    LESS_EQ,
    GREATER,
    GREATER_EQ,
    AND_AND,
    OR_OR,
    BANG,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::IDENT(ident) => *ident,
            Self::NUM { value, .. } => *value,
            Self::FLOAT(value) => *value,
            Self::STR(value) => return write!(f, "\"{value}\""),
            Self::FN => "fn",
            Self::LET => "let",
            Self::MUT => "mut",
            Self::IF => "if",
            Self::ELSE => "else",
            Self::WHILE => "while",
            Self::TRUE => "true",
            Self::FALSE => "false",
            Self::L_ROUND => "(",
            Self::R_ROUND => ")",
            Self::L_CURLY => "{",
            Self::R_CURLY => "}",
            Self::SEMICOLON => ";",
            Self::COLON => ":",
            Self::COMMA => ",",
            Self::ARROW => "->",
            Self::EQ => "=",
            Self::EQ_EQ => "==",
            Self::NOT_EQ => "!=",
            Self::LESS => "<",
            Self::LESS_EQ => "<=",
            Self::GREATER => ">",
            Self::GREATER_EQ => ">=",
            Self::AND_AND => "&&",
            Self::OR_OR => "||",
            Self::BANG => "!",
            Self::PLUS => "+",
            Self::MINUS => "-",
            Self::STAR => "*",
            Self::SLASH => "/",
            Self::PERCENT => "%",
        };

        write!(f, "{text}")
    }
}

type ErrorParserExtra<'src> = extra::Err<Rich<'src, char, SimpleSpan>>;

fn decimal<'src>() -> impl Parser<'src, &'src str, Token<'src>, ErrorParserExtra<'src>> {
    text::int(10).map(|value: &'src str| Token::NUM { value, base: 10 })
}

fn hexadecimal<'src>() -> impl Parser<'src, &'src str, Token<'src>, ErrorParserExtra<'src>> {
    just("0x")
        .ignore_then(text::int(16))
        .map(|value: &'src str| Token::NUM { value, base: 16 })
}

fn float<'src>() -> impl Parser<'src, &'src str, Token<'src>, ErrorParserExtra<'src>> {
    text::int(10)
        .then(just('.'))
        .then(text::digits(10))
        .to_slice()
        .map(Token::FLOAT)
}

fn string<'src>() -> impl Parser<'src, &'src str, Token<'src>, ErrorParserExtra<'src>> {
    none_of("\"")
        .repeated()
        .to_slice()
        .delimited_by(just('"'), just('"'))
        .map(Token::STR)
}

pub fn lexer<'src>()
-> impl Parser<'src, &'src str, Vec<Spanned<Token<'src>>>, ErrorParserExtra<'src>> {
    let ident = text::ascii::ident().map(|ident| match ident {
        "fn" => Token::FN,
        "let" => Token::LET,
        "mut" => Token::MUT,
        "if" => Token::IF,
        "else" => Token::ELSE,
        "while" => Token::WHILE,
        "true" => Token::TRUE,
        "false" => Token::FALSE,
        _ => Token::IDENT(ident),
    });

    // Two-character operators must be tried before their prefixes.
    let operator = choice((
        just("->").to(Token::ARROW),
        just("==").to(Token::EQ_EQ),
        just("!=").to(Token::NOT_EQ),
        just("<=").to(Token::LESS_EQ),
        just(">=").to(Token::GREATER_EQ),
        just("&&").to(Token::AND_AND),
        just("||").to(Token::OR_OR),
        just("=").to(Token::EQ),
        just("<").to(Token::LESS),
        just(">").to(Token::GREATER),
        just("!").to(Token::BANG),
        just("+").to(Token::PLUS),
        just("-").to(Token::MINUS),
        just("*").to(Token::STAR),
        just("/").to(Token::SLASH),
        just("%").to(Token::PERCENT),
    ));

    let punctuation = choice((
        just("(").to(Token::L_ROUND),
        just(")").to(Token::R_ROUND),
        just("{").to(Token::L_CURLY),
        just("}").to(Token::R_CURLY),
        just(";").to(Token::SEMICOLON),
        just(":").to(Token::COLON),
        just(",").to(Token::COMMA),
    ));

    let comment_single_line = just("//")
        .then(any().and_is(text::newline().not()).repeated())
        .padded()
        .to(())
        .boxed();

    let comment_multi_line = recursive(|comment| {
        just("/*")
            .then(comment.or(any().and_is(just("*/").not()).to(())).repeated())
            .then(just("*/"))
            .padded()
            .to(())
    });

    let comment = choice((comment_single_line, comment_multi_line)).boxed();

    choice((
        hexadecimal(),
        float(),
        decimal(),
        string(),
        ident,
        operator,
        punctuation,
    ))
    .map_with(|token, ctx| (token, ctx.span().into()))
    .padded_by(comment.repeated())
    .padded()
    .repeated()
    .collect()
    .then_ignore(end())
}
