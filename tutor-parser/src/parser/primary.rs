//! Parsing of the expressions that bind the tightest: numbers, fractions, mixed numbers,
//! variables, and grouped expressions.

use crate::{
    ast::{number::Number, AstNode},
    tokenizer::{Token, TokenKind},
};
use rug::Integer;
use std::ops::Range;
use super::{
    error::{kind, Error},
    expr::parse_expr,
    token::{self, CloseCurly, CloseParen, Frac, OpenCurly},
    Parser,
    Precedence,
};

/// Parses a primary expression.
pub fn parse_primary(input: &mut Parser) -> Result<AstNode, Error> {
    let token = input.next_token()?;
    match token.kind {
        TokenKind::Number => parse_number(input, &token),
        TokenKind::OpenParen => parse_group(input, token.span, TokenKind::CloseParen),
        TokenKind::OpenCurly => parse_group(input, token.span, TokenKind::CloseCurly),
        TokenKind::Frac => {
            let (numerator, denominator) = parse_frac_arguments(input, token.span)?;
            Ok(AstNode::fraction(numerator, denominator))
        },
        TokenKind::Name => Ok(AstNode::Variable(token.lexeme.to_owned())),
        TokenKind::Command => Err(Error::new_fatal(vec![token.span], kind::UnknownCommand {
            name: token.lexeme.to_owned(),
        })),
        _ => Err(Error::new(vec![token.span], kind::UnexpectedToken {
            expected: &[
                TokenKind::Number,
                TokenKind::Name,
                TokenKind::OpenParen,
                TokenKind::OpenCurly,
                TokenKind::Frac,
                TokenKind::Sub,
                TokenKind::Add,
            ],
            found: token.kind,
        })),
    }
}

/// Converts a number token into a [`Number`].
fn number_from_lexeme(lexeme: &str, span: Range<usize>) -> Result<Number, Error> {
    lexeme.parse::<Number>().map_err(|_| Error::new(vec![span], kind::UnexpectedToken {
        expected: &[TokenKind::Number],
        found: TokenKind::Number,
    }))
}

/// Parses the rest of an expression starting with a number: a plain number, a fraction literal
/// like `1/7`, or a mixed number like `2\frac{1}{3}`.
fn parse_number(input: &mut Parser, token: &Token) -> Result<AstNode, Error> {
    let number = number_from_lexeme(token.lexeme, token.span.clone())?;
    if !token.is_integer() {
        return Ok(AstNode::Number(number));
    }

    // an integer, a slash, and an integer, with no whitespace in between, form a fraction; with
    // whitespace around the slash, it is a division instead
    if let (Some(slash), Some(den)) = (input.peek_raw(0), input.peek_raw(1)) {
        if slash.kind == TokenKind::Slash && den.is_integer() {
            let denominator = number_from_lexeme(den.lexeme, den.span.clone())?;
            input.advance(2);
            return Ok(AstNode::fraction(AstNode::Number(number), AstNode::Number(denominator)));
        }
    }

    if let Ok((numerator, denominator)) = input.try_parse_with_fn(parse_mixed_parts) {
        return Ok(AstNode::MixedNumber {
            whole: number.digits,
            numerator,
            denominator,
        });
    }

    Ok(AstNode::Number(number))
}

/// Parses the `\frac{a}{b}` part of a mixed number, where `a` and `b` are integer literals.
fn parse_mixed_parts(input: &mut Parser) -> Result<(Integer, Integer), Error> {
    input.try_parse::<Frac>()?;
    let numerator = parse_braced_integer(input)?;
    let denominator = parse_braced_integer(input)?;
    Ok((numerator, denominator))
}

/// Parses an integer literal surrounded by curly braces.
fn parse_braced_integer(input: &mut Parser) -> Result<Integer, Error> {
    input.try_parse::<OpenCurly>()?;
    let literal = input.try_parse::<token::Number>()?;
    if literal.lexeme.contains('.') {
        return Err(Error::new(vec![literal.span], kind::NonFatal));
    }
    input.try_parse::<CloseCurly>()?;

    literal.lexeme
        .parse::<Integer>()
        .map_err(|_| Error::new(vec![literal.span], kind::NonFatal))
}

/// Parses the two `{...}` arguments of a `\frac` command.
fn parse_frac_arguments(input: &mut Parser, frac_span: Range<usize>) -> Result<(AstNode, AstNode), Error> {
    let argument = |input: &mut Parser| -> Result<AstNode, Error> {
        let open = input.try_parse::<OpenCurly>()
            .map_err(|_| Error::new_fatal(vec![frac_span.clone()], kind::IncompleteFraction))?;
        parse_group(input, open.span, TokenKind::CloseCurly)
    };

    let numerator = argument(input)?;
    let denominator = argument(input)?;
    Ok((numerator, denominator))
}

/// Parses the expression inside a pair of parentheses or curly braces, after the opening token
/// has been consumed.
fn parse_group(input: &mut Parser, open_span: Range<usize>, close: TokenKind) -> Result<AstNode, Error> {
    if input.peek_kind() == Some(close) {
        let close_token = input.next_token()?;
        return Err(Error::new_fatal(
            vec![open_span.start..close_token.span.end],
            kind::EmptyParenthesis,
        ));
    }

    let inner = parse_expr(input, Precedence::Any)?;
    let closed = match close {
        TokenKind::CloseParen => input.try_parse::<CloseParen>().is_ok(),
        _ => input.try_parse::<CloseCurly>().is_ok(),
    };

    if closed {
        Ok(inner)
    } else {
        Err(Error::new_fatal(vec![open_span], kind::UnclosedParenthesis { opening: true }))
    }
}
