use crate::parser::token::op::Operator;
use super::{path::{Path, PathStep}, AstNode};

/// An operator of an expression, as found by [`AstNode::operators`].
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRef<'a> {
    /// The position of the operator in left-to-right visual order, starting at zero.
    pub index: usize,

    /// The path of the operation node.
    pub path: Path,

    /// The operator itself.
    pub operator: Operator,

    /// The operation node.
    pub node: &'a AstNode,
}

impl AstNode {
    /// Returns every binary and unary operator of the expression, in left-to-right visual order.
    ///
    /// Binary operators are visited between their operands, and unary operators before their
    /// argument. The parts of fractions are searched too. Numbers, fractions, and mixed numbers
    /// are never counted as operators.
    pub fn operators(&self) -> Vec<OperatorRef<'_>> {
        let mut found = Vec::new();
        collect_operators(self, Path::root(), &mut found);
        found
    }

    /// Returns the path of the `n`th operator of the expression, counting from zero in the order
    /// of [`AstNode::operators`].
    pub fn nth_operator(&self, n: usize) -> Option<Path> {
        self.operators()
            .into_iter()
            .nth(n)
            .map(|op| op.path)
    }
}

/// In-order traversal collecting operators.
fn collect_operators<'a>(node: &'a AstNode, path: Path, found: &mut Vec<OperatorRef<'a>>) {
    let push = |found: &mut Vec<OperatorRef<'a>>, path: Path, operator| {
        found.push(OperatorRef { index: found.len(), path, operator, node });
    };

    match node {
        AstNode::BinaryOp { op, left, right } => {
            collect_operators(left, path.child(PathStep::Left), found);
            push(found, path.clone(), Operator::Binary(*op));
            collect_operators(right, path.child(PathStep::Right), found);
        },
        AstNode::UnaryOp { op, argument } => {
            push(found, path.clone(), Operator::Unary(*op));
            collect_operators(argument, path.child(PathStep::Argument), found);
        },
        AstNode::Fraction { numerator, denominator } => {
            collect_operators(numerator, path.child(PathStep::Num), found);
            collect_operators(denominator, path.child(PathStep::Den), found);
        },
        AstNode::Number(_) | AstNode::MixedNumber { .. } | AstNode::Variable(_) => (),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{parse, parser::token::op::{BinOpKind, UnaryOpKind}};
    use super::*;

    #[test]
    fn visual_order() {
        let ast = parse("1 - -2 \\cdot 3/4 + \\frac{5 - 1}{2}").unwrap();
        let ops = ast.operators()
            .into_iter()
            .map(|op| (op.index, op.path.to_string(), op.operator))
            .collect::<Vec<_>>();

        assert_eq!(ops, vec![
            (0, "term[0]".to_string(), Operator::Binary(BinOpKind::Sub)),
            (1, "term[0].term[1].term[0]".to_string(), Operator::Unary(UnaryOpKind::Neg)),
            (2, "term[0].term[1]".to_string(), Operator::Binary(BinOpKind::Mul)),
            (3, "root".to_string(), Operator::Binary(BinOpKind::Add)),
            (4, "term[1].num".to_string(), Operator::Binary(BinOpKind::Sub)),
        ]);
    }

    #[test]
    fn nth_operator() {
        let ast = parse("1/2 + 3").unwrap();
        assert_eq!(ast.nth_operator(0), Some(Path::root()));
        assert_eq!(ast.nth_operator(1), None);
        assert_eq!(parse("5").unwrap().nth_operator(0), None);
    }
}
