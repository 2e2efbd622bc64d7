use crate::ast::AstNode;
use super::{
    error::{kind, Error},
    primary::parse_primary,
    token::op::{BinOp, UnaryOp},
    Parse,
    Parser,
    Precedence,
};

impl Parse for AstNode {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        parse_expr(input, Precedence::Any)
    }
}

/// Parses an expression made of operations whose operators bind at least as tightly as `min`.
pub fn parse_expr(input: &mut Parser, min: Precedence) -> Result<AstNode, Error> {
    let mut lhs = parse_unary(input)?;

    while let Ok(op) = input.try_parse_then::<BinOp, _>(|op, input| {
        if op.precedence() >= min {
            Ok(())
        } else {
            Err(input.error(kind::NonFatal))
        }
    }) {
        // every binary operator is left-associative, so the right-hand side can only contain
        // operators that bind more tightly: `1 - 2 - 3` is `(1 - 2) - 3`
        let rhs = parse_expr(input, op.precedence().tighter())?;
        lhs = AstNode::binary(op.kind, lhs, rhs);
    }

    Ok(lhs)
}

/// Parses a unary operation, or a primary expression if there is no unary operator.
pub fn parse_unary(input: &mut Parser) -> Result<AstNode, Error> {
    match input.try_parse::<UnaryOp>() {
        Ok(op) => {
            let argument = parse_unary(input)?;
            Ok(AstNode::unary(op.kind, argument))
        },
        Err(_) => parse_primary(input),
    }
}
