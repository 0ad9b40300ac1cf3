//! # Recursive descent
//!
//! Grammar, from lowest to highest precedence:
//!
//! ```text
//! relation := expr (comparison expr)?
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | '/') unary | implicit)*
//! unary    := ('-' | '+') unary | power
//! power    := atom ('^' unary)?
//! atom     := number | identifier | '(' expr ')'
//! ```
//!
//! Implicit multiplication applies when a factor is directly followed by an identifier or an
//! opening parenthesis, as in `2x1` or `3(x + y)`.
use crate::data::linear_program::elements::ConstraintType;
use crate::io::error::{Parse as ParseError, ParseResult};
use crate::io::expression::{Expression, Operator, Relation};
use crate::io::expression::token::{Spanned, Token, tokenize};

pub(super) struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Spanned>,
    index: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(text: &'a str) -> ParseResult<Self> {
        Ok(Self { text, tokens: tokenize(text)?, index: 0 })
    }

    /// Parse the entire text as a single expression.
    pub(super) fn expression_only(mut self) -> ParseResult<Expression> {
        let expression = self.expression()?;
        self.expect_end()?;
        Ok(expression)
    }

    /// Parse the entire text as two expressions separated by a comparison.
    pub(super) fn relation_only(mut self) -> ParseResult<Relation> {
        let left = self.expression()?;
        let relation = match self.next() {
            Some(Spanned { token: Token::Comparison(relation), .. }) => relation,
            Some(Spanned { position, .. }) => return Err(self.error_at("Expected a comparison", position)),
            None => return Err(self.error_at("Expected a comparison", self.text.len())),
        };
        let right = self.expression()?;
        self.expect_end()?;

        Ok(Relation { left, relation, right })
    }

    fn expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.term()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Plus) => Operator::Add,
                Some(Token::Minus) => Operator::Subtract,
                _ => break Ok(left),
            };
            self.index += 1;
            let right = self.term()?;
            left = Expression::binary(operator, left, right);
        }
    }

    fn term(&mut self) -> ParseResult<Expression> {
        let mut left = self.unary()?;
        loop {
            let operator = match self.peek() {
                Some(Token::Star) => {
                    self.index += 1;
                    Operator::Multiply
                },
                Some(Token::Slash) => {
                    self.index += 1;
                    Operator::Divide
                },
                // Implicit, no token consumed
                Some(Token::Identifier(_) | Token::LeftParenthesis) => Operator::Multiply,
                _ => break Ok(left),
            };
            let right = self.unary()?;
            left = Expression::binary(operator, left, right);
        }
    }

    fn unary(&mut self) -> ParseResult<Expression> {
        match self.peek() {
            Some(Token::Minus) => {
                self.index += 1;
                Ok(Expression::Negation(Box::new(self.unary()?)))
            },
            Some(Token::Plus) => {
                self.index += 1;
                self.unary()
            },
            _ => self.power(),
        }
    }

    fn power(&mut self) -> ParseResult<Expression> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.index += 1;
            // Right associative: 2^3^2 = 2^(3^2)
            let exponent = self.unary()?;
            Ok(Expression::binary(Operator::Power, base, exponent))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> ParseResult<Expression> {
        match self.next() {
            Some(Spanned { token: Token::Number(value), .. }) => Ok(Expression::Constant(value)),
            Some(Spanned { token: Token::Identifier(name), .. }) => Ok(Expression::Variable(name)),
            Some(Spanned { token: Token::LeftParenthesis, position }) => {
                let inner = self.expression()?;
                match self.next() {
                    Some(Spanned { token: Token::RightParenthesis, .. }) => Ok(inner),
                    _ => Err(self.error_at("Unbalanced parenthesis", position)),
                }
            },
            Some(Spanned { token, position }) => Err(self.error_at(format!("Unexpected {:?}", token), position)),
            None => Err(self.error_at("Unexpected end of expression", self.text.len())),
        }
    }

    fn expect_end(&self) -> ParseResult<()> {
        match self.tokens.get(self.index) {
            None => Ok(()),
            Some(Spanned { token: Token::RightParenthesis, position }) => {
                Err(self.error_at("Unbalanced parenthesis", *position))
            },
            Some(Spanned { token: Token::Comparison(_), position }) => {
                Err(self.error_at("Unexpected comparison", *position))
            },
            Some(Spanned { position, .. }) => Err(self.error_at("Unexpected trailing input", *position)),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|spanned| &spanned.token)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.index).cloned();
        if spanned.is_some() {
            self.index += 1;
        }
        spanned
    }

    fn error_at(&self, description: impl Into<String>, position: usize) -> ParseError {
        ParseError::with_position(description, position, self.text)
    }
}

/// Used by the tests and by the relation display.
pub(super) fn comparison_symbol(relation: ConstraintType) -> &'static str {
    match relation {
        ConstraintType::Less => "<=",
        ConstraintType::Greater => ">=",
        ConstraintType::Equal => "=",
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::ConstraintType;
    use crate::io::expression::{Expression, Operator, parse, parse_relation};
    use crate::R;

    #[test]
    fn precedence() {
        let expression = parse("1 + 2 * 3").unwrap();
        assert_eq!(expression, Expression::binary(
            Operator::Add,
            Expression::Constant(R!(1)),
            Expression::binary(Operator::Multiply, Expression::Constant(R!(2)), Expression::Constant(R!(3))),
        ));
    }

    #[test]
    fn negation_binds_weaker_than_power() {
        let expression = parse("-x^2").unwrap();
        assert_eq!(expression, Expression::Negation(Box::new(Expression::binary(
            Operator::Power,
            Expression::Variable("x".to_string()),
            Expression::Constant(R!(2)),
        ))));
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(parse("2x1").unwrap(), parse("2 * x1").unwrap());
        assert_eq!(parse("3(x + y)").unwrap(), parse("3 * (x + y)").unwrap());
    }

    #[test]
    fn parentheses() {
        assert!(parse("(1 + 2").is_err());
        assert!(parse("1 + 2)").is_err());
        assert!(parse("((x))").is_ok());
        assert!(parse("").is_err());
        assert!(parse("1 +").is_err());
    }

    #[test]
    fn relation() {
        let relation = parse_relation("2x1 + 3x2 <= 12").unwrap();
        assert_eq!(relation.relation, ConstraintType::Less);
        assert!(parse_relation("2x1 + 3x2").is_err());
        assert!(parse_relation("x <= 1 <= 2").is_err());
        assert!(parse("x <= 1").is_err());
    }
}
