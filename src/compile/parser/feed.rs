use crate::datstructures::pushback::Pushback;

use super::{Spanned, lex::Token};

pub const PUSHBACK_LEN: usize = 4;

/// Hands out lexed tokens one at a time, serving pushed-back tokens first.
///
/// A block whose last statement lacks its terminator (`{ x = 5 }`) is read
/// as if the `;` were there: the closing brace is pushed back and a
/// semicolon is produced in its place.
pub struct TokenFeed<'src> {
    tokens: std::vec::IntoIter<Spanned<Token<'src>>>,
    pushback: Pushback<Spanned<Token<'src>>, PUSHBACK_LEN>,
    last: Option<Token<'src>>,
}

impl<'src> TokenFeed<'src> {
    pub fn new(tokens: Vec<Spanned<Token<'src>>>) -> Self {
        TokenFeed {
            tokens: tokens.into_iter(),
            pushback: Pushback::new(),
            last: None,
        }
    }

    pub fn push_back(&mut self, token: Spanned<Token<'src>>) -> bool {
        self.pushback.push(token)
    }

    fn next_raw(&mut self) -> Option<Spanned<Token<'src>>> {
        match self.pushback.pop() {
            Some(token) => Some(token),
            None => self.tokens.next(),
        }
    }

    fn needs_terminator(&self) -> bool {
        !matches!(
            self.last,
            None | Some(Token::SEMICOLON) | Some(Token::L_CURLY) | Some(Token::R_CURLY)
        )
    }
}

impl<'src> Iterator for TokenFeed<'src> {
    type Item = Spanned<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (token, span) = self.next_raw()?;

        let token = if token == Token::R_CURLY && self.needs_terminator() {
            let semicolon = (Token::SEMICOLON, span.start..span.start);
            self.push_back((token, span));
            semicolon
        } else {
            (token, span)
        };

        self.last = Some(token.0.clone());
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tokens: Vec<Token<'static>>) -> Vec<Token<'static>> {
        let spanned = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| (token, i..i + 1))
            .collect();

        TokenFeed::new(spanned).map(|(token, _)| token).collect()
    }

    #[test]
    fn passes_terminated_blocks_through() {
        let tokens = vec![
            Token::L_CURLY,
            Token::IDENT("x"),
            Token::SEMICOLON,
            Token::R_CURLY,
        ];

        assert_eq!(feed(tokens.clone()), tokens);
    }

    #[test]
    fn terminates_last_statement_of_block() {
        let tokens = vec![
            Token::L_CURLY,
            Token::IDENT("x"),
            Token::EQ,
            Token::NUM {
                value: "5",
                base: 10,
            },
            Token::R_CURLY,
        ];

        assert_eq!(
            feed(tokens),
            vec![
                Token::L_CURLY,
                Token::IDENT("x"),
                Token::EQ,
                Token::NUM {
                    value: "5",
                    base: 10,
                },
                Token::SEMICOLON,
                Token::R_CURLY,
            ]
        );
    }

    #[test]
    fn nested_block_ends_are_left_alone() {
        let tokens = vec![Token::L_CURLY, Token::L_CURLY, Token::R_CURLY, Token::R_CURLY];

        assert_eq!(feed(tokens.clone()), tokens);
    }

    #[test]
    fn pushed_back_tokens_come_first() {
        let mut feed = TokenFeed::new(vec![(Token::IDENT("b"), 1..2)]);
        assert!(feed.push_back((Token::IDENT("a"), 0..1)));

        let tokens: Vec<_> = feed.map(|(token, _)| token).collect();
        assert_eq!(tokens, vec![Token::IDENT("a"), Token::IDENT("b")]);
    }
}
