//! The primitive registry: a static table describing every atomic rewrite the tutor knows.
//!
//! The table is compiled into the binary and validated once, the first time [`REGISTRY`] is used.
//! Rows are never added or changed at runtime.

use crate::{error::ApplyError, primitive::PrimitiveId};
use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use std::{collections::HashMap, fmt, str::FromStr};
use tutor_parser::{BinOpKind, Operator, UnaryOpKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A boolean fact about the clicked part of an expression, used to gate which rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum Guard {
    DenominatorsEqual,
    DenominatorsDifferent,
    DivisorZero,
    DivisorNonzero,
    RemainderZero,
    RemainderNonzero,
    IsDecimal,
    OperandDecimal,
    OperandFraction,
    OperandVariable,
    RightNegative,
    RightSum,
    RightProduct,
    ArgumentNegative,
    ArgumentSum,
    IsInteger,
    IsOne,
    IsMixedNumber,
    SiblingHasDenominator,
    FractionReducible,
    FractionWhole,
    FractionImproper,
    DenominatorOne,
    DenominatorZero,
    DenominatorNegative,
    NumeratorZero,
    NestedFraction,
    BracketRedundant,
}

impl Guard {
    /// Returns the name of the guard, such as `denominators-equal`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DenominatorsEqual => "denominators-equal",
            Self::DenominatorsDifferent => "denominators-different",
            Self::DivisorZero => "divisor-zero",
            Self::DivisorNonzero => "divisor-nonzero",
            Self::RemainderZero => "remainder-zero",
            Self::RemainderNonzero => "remainder-nonzero",
            Self::IsDecimal => "is-decimal",
            Self::OperandDecimal => "operand-decimal",
            Self::OperandFraction => "operand-fraction",
            Self::OperandVariable => "operand-variable",
            Self::RightNegative => "right-negative",
            Self::RightSum => "right-sum",
            Self::RightProduct => "right-product",
            Self::ArgumentNegative => "argument-negative",
            Self::ArgumentSum => "argument-sum",
            Self::IsInteger => "is-integer",
            Self::IsOne => "is-one",
            Self::IsMixedNumber => "is-mixed-number",
            Self::SiblingHasDenominator => "sibling-has-denominator",
            Self::FractionReducible => "fraction-reducible",
            Self::FractionWhole => "fraction-whole",
            Self::FractionImproper => "fraction-improper",
            Self::DenominatorOne => "denominator-one",
            Self::DenominatorZero => "denominator-zero",
            Self::DenominatorNegative => "denominator-negative",
            Self::NumeratorZero => "numerator-zero",
            Self::NestedFraction => "nested-fraction",
            Self::BracketRedundant => "bracket-redundant",
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The coarse kind of thing the user clicked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub enum ClickKind {
    Operator,
    Number,
    FractionBar,
    Bracket,
    Other,
}

impl ClickKind {
    /// Returns the wire name of the click kind, such as `fractionBar`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Number => "number",
            Self::FractionBar => "fractionBar",
            Self::Bracket => "bracket",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ClickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when a string is not a click kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClickKindError;

impl fmt::Display for ParseClickKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of `operator`, `number`, `fractionBar`, `bracket`, `other`")
    }
}

impl std::error::Error for ParseClickKindError {}

impl FromStr for ClickKind {
    type Err = ParseClickKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Self::Operator),
            "number" => Ok(Self::Number),
            "fractionBar" => Ok(Self::FractionBar),
            "bracket" => Ok(Self::Bracket),
            "other" => Ok(Self::Other),
            _ => Err(ParseClickKindError),
        }
    }
}

/// The classification of an operand of the action node.
///
/// Contexts report the narrowest type of an operand, while rules name the type they accept; see
/// [`OperandType::accepts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum OperandType {
    /// A number literal (integer or decimal), possibly negated.
    Int,

    /// A number literal that is not zero.
    NonzeroInt,

    /// A fraction with integer literal parts, possibly negated.
    Fraction,

    /// A fraction whose numerator is not zero.
    NonzeroFraction,

    /// A mixed number, possibly negated.
    MixedNumber,

    /// Anything else.
    Any,
}

impl OperandType {
    /// Returns true if a rule declaring this type accepts an operand classified as `actual`.
    pub fn accepts(&self, actual: OperandType) -> bool {
        match self {
            Self::Int => matches!(actual, Self::Int | Self::NonzeroInt),
            Self::Fraction => matches!(actual, Self::Fraction | Self::NonzeroFraction),
            Self::Any => true,
            narrow => *narrow == actual,
        }
    }

    /// Returns the name of the type, such as `nonzero-int`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::NonzeroInt => "nonzero-int",
            Self::Fraction => "fraction",
            Self::NonzeroFraction => "nonzero-fraction",
            Self::MixedNumber => "mixed-number",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The presentation tag of a rule, which also decides how it is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum Color {
    /// Applied automatically.
    Green,

    /// Applied automatically, as the first step of a longer scenario.
    Yellow,

    /// A diagnostic that explains why nothing can be applied.
    Red,

    /// Offered as a choice that the user must confirm.
    Blue,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which node a matched rule rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "kebab-case"))]
pub enum Scope {
    /// The action node: the operation the click resolved to.
    Action,

    /// The clicked node itself.
    Clicked,
}

/// A row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveRule {
    /// The stable identifier of the rule, such as `INT_ADD`.
    pub id: &'static str,

    /// The executor that performs the rewrite.
    pub primitive: PrimitiveId,

    /// The kind of click the rule responds to.
    pub click: ClickKind,

    /// The operator the action node must have. [`None`] accepts any operator, or none.
    pub operator: Option<Operator>,

    /// The type the left operand must have. [`None`] places no constraint, not even that a left
    /// operand exists.
    pub left: Option<OperandType>,

    /// The type the right operand (or the argument of a unary operation) must have.
    pub right: Option<OperandType>,

    /// Guards that must be true.
    pub required: &'static [Guard],

    /// Guards that must not be true.
    pub forbidden: &'static [Guard],

    pub color: Color,
    pub scope: Scope,
}

const ADD: Option<Operator> = Some(Operator::Binary(BinOpKind::Add));
const SUB: Option<Operator> = Some(Operator::Binary(BinOpKind::Sub));
const MUL: Option<Operator> = Some(Operator::Binary(BinOpKind::Mul));
const DIV: Option<Operator> = Some(Operator::Binary(BinOpKind::Div));
const NEG: Option<Operator> = Some(Operator::Unary(UnaryOpKind::Neg));
const POS: Option<Operator> = Some(Operator::Unary(UnaryOpKind::Pos));

const INT: Option<OperandType> = Some(OperandType::Int);
const NONZERO_INT: Option<OperandType> = Some(OperandType::NonzeroInt);
const FRAC: Option<OperandType> = Some(OperandType::Fraction);
const NONZERO_FRAC: Option<OperandType> = Some(OperandType::NonzeroFraction);
const MIXED: Option<OperandType> = Some(OperandType::MixedNumber);
const ANY: Option<OperandType> = Some(OperandType::Any);

/// Template for rows responding to a click on a binary operator.
const BINARY: PrimitiveRule = PrimitiveRule {
    id: "",
    primitive: PrimitiveId::BracketRemove,
    click: ClickKind::Operator,
    operator: None,
    left: ANY,
    right: ANY,
    required: &[],
    forbidden: &[],
    color: Color::Green,
    scope: Scope::Action,
};

/// Template for rows responding to a click on a unary operator.
const UNARY: PrimitiveRule = PrimitiveRule { left: None, ..BINARY };

/// Template for rows that rewrite the clicked node itself.
const CLICKED: PrimitiveRule = PrimitiveRule {
    left: None,
    right: None,
    scope: Scope::Clicked,
    ..BINARY
};

use Guard::*;
use PrimitiveId as P;

/// The table of rules, in tie-breaking order.
pub const RULES: &[PrimitiveRule] = &[
    // integer arithmetic
    PrimitiveRule { id: "INT_ADD", primitive: P::IntAdd, operator: ADD, left: INT, right: INT, forbidden: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "INT_SUB", primitive: P::IntSub, operator: SUB, left: INT, right: INT, forbidden: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "INT_MUL", primitive: P::IntMul, operator: MUL, left: INT, right: INT, ..BINARY },
    PrimitiveRule { id: "INT_DIV_EXACT", primitive: P::IntDivExact, operator: DIV, left: INT, right: NONZERO_INT, required: &[DivisorNonzero, RemainderZero], ..BINARY },
    PrimitiveRule { id: "INT_DIV_TO_FRAC", primitive: P::IntDivToFrac, operator: DIV, left: INT, right: NONZERO_INT, required: &[DivisorNonzero, RemainderNonzero], ..BINARY },
    PrimitiveRule { id: "INT_DIV_BY_ZERO", primitive: P::DivisionByZero, operator: DIV, left: INT, right: INT, required: &[DivisorZero], color: Color::Red, ..BINARY },
    PrimitiveRule { id: "DECIMAL_DIV", primitive: P::Diagnostic, operator: DIV, left: INT, right: INT, required: &[OperandDecimal, DivisorNonzero], color: Color::Red, ..BINARY },

    // fraction arithmetic
    PrimitiveRule { id: "FRAC_ADD_SAME_DEN", primitive: P::FracAddSameDen, operator: ADD, left: FRAC, right: FRAC, required: &[DenominatorsEqual], forbidden: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "FRAC_SUB_SAME_DEN", primitive: P::FracSubSameDen, operator: SUB, left: FRAC, right: FRAC, required: &[DenominatorsEqual], forbidden: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "FRAC_ADD_DIFF_DEN", primitive: P::FracCommonDenominator, operator: ADD, left: FRAC, right: FRAC, required: &[DenominatorsDifferent], forbidden: &[RightNegative], color: Color::Yellow, ..BINARY },
    PrimitiveRule { id: "FRAC_SUB_DIFF_DEN", primitive: P::FracCommonDenominator, operator: SUB, left: FRAC, right: FRAC, required: &[DenominatorsDifferent], forbidden: &[RightNegative], color: Color::Yellow, ..BINARY },
    PrimitiveRule { id: "FRAC_MUL", primitive: P::FracMul, operator: MUL, left: FRAC, right: FRAC, ..BINARY },
    PrimitiveRule { id: "FRAC_DIV", primitive: P::FracDiv, operator: DIV, left: FRAC, right: NONZERO_FRAC, required: &[DivisorNonzero], ..BINARY },
    PrimitiveRule { id: "FRAC_DIV_BY_ZERO", primitive: P::DivisionByZero, operator: DIV, left: FRAC, right: FRAC, required: &[DivisorZero], color: Color::Red, ..BINARY },

    // mixed fraction and integer arithmetic
    PrimitiveRule { id: "FRAC_INT_ADD", primitive: P::FracIntAdd, operator: ADD, left: FRAC, right: INT, forbidden: &[OperandDecimal, RightNegative], ..BINARY },
    PrimitiveRule { id: "INT_FRAC_ADD", primitive: P::IntFracAdd, operator: ADD, left: INT, right: FRAC, forbidden: &[OperandDecimal, RightNegative], ..BINARY },
    PrimitiveRule { id: "FRAC_INT_SUB", primitive: P::FracIntSub, operator: SUB, left: FRAC, right: INT, forbidden: &[OperandDecimal, RightNegative], ..BINARY },
    PrimitiveRule { id: "INT_FRAC_SUB", primitive: P::IntFracSub, operator: SUB, left: INT, right: FRAC, forbidden: &[OperandDecimal, RightNegative], ..BINARY },
    PrimitiveRule { id: "FRAC_INT_MUL", primitive: P::FracIntMul, operator: MUL, left: FRAC, right: INT, forbidden: &[OperandDecimal], ..BINARY },
    PrimitiveRule { id: "INT_FRAC_MUL", primitive: P::IntFracMul, operator: MUL, left: INT, right: FRAC, forbidden: &[OperandDecimal], ..BINARY },
    PrimitiveRule { id: "FRAC_INT_DIV", primitive: P::FracIntDiv, operator: DIV, left: FRAC, right: NONZERO_INT, required: &[DivisorNonzero], forbidden: &[OperandDecimal], ..BINARY },
    PrimitiveRule { id: "INT_FRAC_DIV", primitive: P::IntFracDiv, operator: DIV, left: INT, right: NONZERO_FRAC, required: &[DivisorNonzero], forbidden: &[OperandDecimal], ..BINARY },
    PrimitiveRule { id: "FRAC_INT_DIV_BY_ZERO", primitive: P::DivisionByZero, operator: DIV, left: FRAC, right: INT, required: &[DivisorZero], color: Color::Red, ..BINARY },
    PrimitiveRule { id: "INT_FRAC_DIV_BY_ZERO", primitive: P::DivisionByZero, operator: DIV, left: INT, right: FRAC, required: &[DivisorZero], color: Color::Red, ..BINARY },

    // operands that cannot be combined
    PrimitiveRule { id: "DECIMAL_WITH_FRACTION", primitive: P::Diagnostic, required: &[OperandDecimal, OperandFraction], color: Color::Red, ..BINARY },
    PrimitiveRule { id: "MIXED_OPERAND_LEFT", primitive: P::Diagnostic, left: MIXED, color: Color::Red, ..BINARY },
    PrimitiveRule { id: "MIXED_OPERAND_RIGHT", primitive: P::Diagnostic, right: MIXED, color: Color::Red, ..BINARY },
    PrimitiveRule { id: "SYMBOLIC_OPERAND", primitive: P::Diagnostic, required: &[OperandVariable], color: Color::Red, ..BINARY },

    // signs
    PrimitiveRule { id: "SUB_NEGATIVE", primitive: P::SubNegToAdd, operator: SUB, required: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "ADD_NEGATIVE", primitive: P::AddNegToSub, operator: ADD, required: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "SUB_DISTRIBUTE", primitive: P::SubDistribute, operator: SUB, required: &[RightSum], ..BINARY },
    PrimitiveRule { id: "NEG_NEG", primitive: P::NegNeg, operator: NEG, required: &[ArgumentNegative], ..UNARY },
    PrimitiveRule { id: "NEG_DISTRIBUTE", primitive: P::NegDistribute, operator: NEG, required: &[ArgumentSum], ..UNARY },
    PrimitiveRule { id: "POS_DROP", primitive: P::UnaryPlusDrop, operator: POS, ..UNARY },

    // brackets
    PrimitiveRule { id: "BRACKET_SUB_DISTRIBUTE", primitive: P::SubDistribute, click: ClickKind::Bracket, operator: SUB, required: &[RightSum], ..BINARY },
    PrimitiveRule { id: "BRACKET_SUB_NEGATIVE", primitive: P::SubNegToAdd, click: ClickKind::Bracket, operator: SUB, required: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "BRACKET_ADD_NEGATIVE", primitive: P::AddNegToSub, click: ClickKind::Bracket, operator: ADD, required: &[RightNegative], ..BINARY },
    PrimitiveRule { id: "BRACKET_ADD_REGROUP", primitive: P::Regroup, click: ClickKind::Bracket, operator: ADD, required: &[RightSum], ..BINARY },
    PrimitiveRule { id: "BRACKET_MUL_REGROUP", primitive: P::Regroup, click: ClickKind::Bracket, operator: MUL, required: &[RightProduct], ..BINARY },
    PrimitiveRule { id: "BRACKET_NEG_DISTRIBUTE", primitive: P::NegDistribute, click: ClickKind::Bracket, operator: NEG, required: &[ArgumentSum], ..UNARY },
    PrimitiveRule { id: "BRACKET_NEG_NEG", primitive: P::NegNeg, click: ClickKind::Bracket, operator: NEG, required: &[ArgumentNegative], ..UNARY },
    PrimitiveRule { id: "BRACKET_REMOVE", primitive: P::BracketRemove, click: ClickKind::Bracket, required: &[BracketRedundant], ..CLICKED },

    // numbers
    PrimitiveRule { id: "DECIMAL_TO_FRAC", primitive: P::DecimalToFrac, click: ClickKind::Number, required: &[IsDecimal], ..CLICKED },
    PrimitiveRule { id: "INT_TO_FRAC", primitive: P::IntToFrac, click: ClickKind::Number, required: &[IsInteger, SiblingHasDenominator], color: Color::Blue, ..CLICKED },
    PrimitiveRule { id: "ONE_TO_UNIT_FRAC", primitive: P::OneToUnitFrac, click: ClickKind::Number, required: &[IsOne, SiblingHasDenominator], color: Color::Blue, ..CLICKED },
    PrimitiveRule { id: "MIXED_TO_SUM", primitive: P::MixedToSum, click: ClickKind::Number, required: &[IsMixedNumber], color: Color::Blue, ..CLICKED },
    PrimitiveRule { id: "MIXED_TO_IMPROPER", primitive: P::MixedToImproper, click: ClickKind::Number, required: &[IsMixedNumber], color: Color::Blue, ..CLICKED },

    // fraction bars
    PrimitiveRule { id: "FRAC_DEN_ZERO", primitive: P::DivisionByZero, click: ClickKind::FractionBar, required: &[DenominatorZero], color: Color::Red, ..CLICKED },
    PrimitiveRule { id: "FRAC_ZERO_NUM", primitive: P::FracZeroNumerator, click: ClickKind::FractionBar, required: &[NumeratorZero], forbidden: &[DenominatorZero], ..CLICKED },
    PrimitiveRule { id: "FRAC_DIVIDE_EXACT", primitive: P::FracDivideExact, click: ClickKind::FractionBar, required: &[FractionWhole], forbidden: &[NumeratorZero], ..CLICKED },
    PrimitiveRule { id: "FRAC_SIMPLIFY", primitive: P::FracSimplify, click: ClickKind::FractionBar, required: &[FractionReducible], forbidden: &[DenominatorZero, NumeratorZero, FractionWhole], ..CLICKED },
    PrimitiveRule { id: "FRAC_TO_INT", primitive: P::FracToInt, click: ClickKind::FractionBar, required: &[DenominatorOne], ..CLICKED },
    PrimitiveRule { id: "FRAC_NORMALIZE_SIGN", primitive: P::FracNormalizeSign, click: ClickKind::FractionBar, required: &[DenominatorNegative], ..CLICKED },
    PrimitiveRule { id: "NESTED_FRAC_DIV", primitive: P::NestedFracDiv, click: ClickKind::FractionBar, required: &[NestedFraction], ..CLICKED },
    PrimitiveRule { id: "FRAC_TO_MIXED", primitive: P::FracToMixed, click: ClickKind::FractionBar, required: &[FractionImproper], forbidden: &[FractionReducible], color: Color::Blue, ..CLICKED },
    PrimitiveRule { id: "FRAC_EXPAND", primitive: P::FracExpand, click: ClickKind::FractionBar, required: &[DenominatorsDifferent], forbidden: &[FractionReducible], color: Color::Blue, ..CLICKED },
];

/// The validated registry, with an index from rule id to row.
#[derive(Debug)]
pub struct Registry {
    rules: &'static [PrimitiveRule],
    by_id: HashMap<&'static str, usize>,
}

impl Registry {
    /// Validates the rows and builds the registry.
    ///
    /// Panics if a row requires and forbids the same guard, or if two rows share an id. Both are
    /// defects in the compiled-in table.
    fn new(rules: &'static [PrimitiveRule]) -> Self {
        let mut by_id = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if let Some(guard) = rule.required.iter().find(|g| rule.forbidden.contains(g)) {
                panic!("rule `{}` both requires and forbids `{}`", rule.id, guard);
            }
            if by_id.insert(rule.id, i).is_some() {
                panic!("rule id `{}` appears more than once", rule.id);
            }
        }
        Self { rules, by_id }
    }

    /// Returns every row, in table order.
    pub fn rules(&self) -> &'static [PrimitiveRule] {
        self.rules
    }

    /// Returns the row with the given id.
    ///
    /// If there is no such row, the error suggests up to three ids that are close to the given
    /// one.
    pub fn lookup(&self, id: &str) -> Result<&'static PrimitiveRule, ApplyError> {
        match self.by_id.get(id) {
            Some(&i) => Ok(&self.rules[i]),
            None => {
                let mut close = self.rules.iter()
                    .map(|rule| (levenshtein(rule.id, id), rule.id))
                    .filter(|(distance, _)| *distance <= 2)
                    .collect::<Vec<_>>();
                close.sort();

                Err(ApplyError::UnknownRule {
                    rule_id: id.to_string(),
                    suggestions: close.into_iter().take(3).map(|(_, id)| id).collect(),
                })
            },
        }
    }
}

/// The registry of every rule, validated on first use.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::new(RULES));

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn table_is_valid() {
        assert_eq!(REGISTRY.rules().len(), RULES.len());
        for rule in REGISTRY.rules() {
            assert!(rule.required.iter().all(|g| !rule.forbidden.contains(g)), "{}", rule.id);
        }
    }

    #[test]
    #[should_panic(expected = "both requires and forbids")]
    fn overlapping_guards_are_rejected() {
        static BAD: &[PrimitiveRule] = &[
            PrimitiveRule { id: "BAD", required: &[IsOne], forbidden: &[IsOne], ..CLICKED },
        ];
        Registry::new(BAD);
    }

    #[test]
    #[should_panic(expected = "appears more than once")]
    fn duplicate_ids_are_rejected() {
        static BAD: &[PrimitiveRule] = &[
            PrimitiveRule { id: "DUP", ..CLICKED },
            PrimitiveRule { id: "DUP", ..BINARY },
        ];
        Registry::new(BAD);
    }

    #[test]
    fn lookup_suggests_close_ids() {
        assert_eq!(REGISTRY.lookup("INT_ADD").map(|rule| rule.primitive), Ok(P::IntAdd));

        let err = REGISTRY.lookup("INT_AD").unwrap_err();
        match err {
            ApplyError::UnknownRule { suggestions, .. } => {
                assert_eq!(suggestions.first(), Some(&"INT_ADD"));
                assert!(suggestions.len() <= 3);
            },
            other => panic!("unexpected error {:?}", other),
        }

        match REGISTRY.lookup("SOMETHING_ELSE").unwrap_err() {
            ApplyError::UnknownRule { suggestions, .. } => assert!(suggestions.is_empty()),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn operand_types() {
        assert!(OperandType::Int.accepts(OperandType::NonzeroInt));
        assert!(!OperandType::NonzeroInt.accepts(OperandType::Int));
        assert!(OperandType::Fraction.accepts(OperandType::NonzeroFraction));
        assert!(!OperandType::Fraction.accepts(OperandType::Int));
        assert!(OperandType::Any.accepts(OperandType::MixedNumber));
    }

    #[test]
    fn click_kinds() {
        assert_eq!("fractionBar".parse(), Ok(ClickKind::FractionBar));
        assert_eq!(ClickKind::Bracket.to_string(), "bracket");
        assert!("bar".parse::<ClickKind>().is_err());
    }
}
