//! Parser, printer, and path-addressable syntax tree for the arithmetic expressions handled by
//! the step tutor.
//!
//! ```
//! use tutor_parser::{parse, ast::path::Path};
//!
//! let ast = parse("1/7 + 3/7").unwrap();
//! let path: Path = "term[1].den".parse().unwrap();
//! assert_eq!(ast.navigate(&path).unwrap().to_string(), "7");
//! assert_eq!(ast.to_string(), "1/7 + 3/7");
//! ```

pub mod ast;
pub mod parser;
pub mod tokenizer;

pub use ast::{fmt::Latex, number::Number, path::{Path, PathStep}, AstNode};
pub use parser::{
    error::Error,
    token::op::{BinOpKind, Operator, UnaryOpKind},
    Parser,
};

/// Parses an expression from the given source text.
pub fn parse(source: &str) -> Result<AstNode, Error> {
    Parser::new(source).try_parse_full::<AstNode>()
}
