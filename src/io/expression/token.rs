//! # Tokens
//!
//! Splitting expression text into numbers, names, operators and comparison signs.
use std::iter::Peekable;
use std::str::CharIndices;

use crate::data::linear_program::elements::ConstraintType;
use crate::data::number_types::rational::Rational;
use crate::io::error::{Parse as ParseError, ParseResult};
use crate::io::number::parse_rational;

/// Smallest meaningful unit of an expression.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    Number(Rational),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LeftParenthesis,
    RightParenthesis,
    Comparison(ConstraintType),
}

/// A token together with the byte offset at which it starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Spanned {
    /// What was read.
    pub token: Token,
    /// Byte offset into the tokenized text.
    pub position: usize,
}

/// Split a text into tokens.
///
/// # Errors
///
/// On characters that can't start a token, on malformed numbers and on strict inequalities.
pub fn tokenize(text: &str) -> ParseResult<Vec<Spanned>> {
    let mut characters = text.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some(&(position, character)) = characters.peek() {
        let token = match character {
            c if c.is_whitespace() => {
                characters.next();
                continue;
            },
            c if c.is_ascii_digit() || c == '.' => number(text, &mut characters)?,
            c if c.is_alphabetic() || c == '_' => identifier(&mut characters),
            _ => {
                characters.next();
                match character {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '*' | '·' | '×' => Token::Star,
                    '/' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LeftParenthesis,
                    ')' => Token::RightParenthesis,
                    '≤' => Token::Comparison(ConstraintType::Less),
                    '≥' => Token::Comparison(ConstraintType::Greater),
                    '<' | '>' => {
                        if characters.next_if(|&(_, c)| c == '=').is_none() {
                            return Err(ParseError::with_position(
                                "Strict inequalities are not supported, use \"<=\" or \">=\"",
                                position, text,
                            ));
                        }
                        Token::Comparison(if character == '<' { ConstraintType::Less } else { ConstraintType::Greater })
                    },
                    '=' => {
                        characters.next_if(|&(_, c)| c == '=');
                        Token::Comparison(ConstraintType::Equal)
                    },
                    other => return Err(ParseError::with_position(
                        format!("Unexpected character '{}'", other),
                        position, text,
                    )),
                }
            },
        };

        tokens.push(Spanned { token, position });
    }

    Ok(tokens)
}

fn number(text: &str, characters: &mut Peekable<CharIndices>) -> ParseResult<Token> {
    let mut literal = String::new();
    let mut start = None;
    while let Some((position, character)) = characters.next_if(|&(_, c)| c.is_ascii_digit() || c == '.') {
        start.get_or_insert(position);
        literal.push(character);
    }

    parse_rational(&literal)
        .map(Token::Number)
        .map_err(|error| ParseError::wrap(
            format!("Invalid number at position {} in \"{}\"", start.unwrap_or(0), text),
            error,
        ))
}

fn identifier(characters: &mut Peekable<CharIndices>) -> Token {
    let mut name = String::new();
    while let Some((_, character)) = characters.next_if(|&(_, c)| c.is_alphanumeric() || c == '_') {
        name.push(character);
    }

    Token::Identifier(name)
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::ConstraintType;
    use crate::io::expression::token::{tokenize, Token};
    use crate::R;

    fn tokens(text: &str) -> Vec<Token> {
        tokenize(text).unwrap().into_iter().map(|spanned| spanned.token).collect()
    }

    #[test]
    fn linear() {
        assert_eq!(tokens("2x1 + 0.5*x2"), vec![
            Token::Number(R!(2)),
            Token::Identifier("x1".to_string()),
            Token::Plus,
            Token::Number(R!(1, 2)),
            Token::Star,
            Token::Identifier("x2".to_string()),
        ]);
    }

    #[test]
    fn comparisons() {
        assert_eq!(tokens("<= >= = == ≤ ≥"), vec![
            Token::Comparison(ConstraintType::Less),
            Token::Comparison(ConstraintType::Greater),
            Token::Comparison(ConstraintType::Equal),
            Token::Comparison(ConstraintType::Equal),
            Token::Comparison(ConstraintType::Less),
            Token::Comparison(ConstraintType::Greater),
        ]);
        assert!(tokenize("x < 3").is_err());
    }

    #[test]
    fn positions() {
        let spanned = tokenize("a ^ (b)").unwrap();
        let positions = spanned.iter().map(|s| s.position).collect::<Vec<_>>();
        assert_eq!(positions, vec![0, 2, 4, 5, 6]);
    }

    #[test]
    fn errors() {
        assert!(tokenize("2 $ 3").is_err());
        assert!(tokenize("1.2.3").is_err());
    }
}
