//! The ambiguous parse tree.
//!
//! One line may have several valid derivations; each becomes a
//! separate [`Node`] tree in the candidate set. Trees are immutable
//! and shared (`Rc`) because derivations frequently agree on
//! subtrees. Every node carries its source span.

use std::rc::Rc;

use tally_util::Span;

/// Shared reference to a parse-tree node.
pub type NodeRef = Rc<Node>;

/// A parse-tree node: kind plus source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    /// Allocate a node.
    pub fn new(kind: NodeKind, span: Span) -> NodeRef {
        Rc::new(Self { kind, span })
    }
}

/// Conversion operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvOp {
    To,
    In,
    As,
    Arrow,
}

/// Binary operators, all precedence levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    BitNot,
}

/// Postfix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostOp {
    Factorial,
    Percent,
    Permille,
}

/// How a unit was spelled in the source.
#[derive(Clone, Debug, PartialEq)]
pub enum UnitSpelling {
    /// One or more words: `km`, `pound force`
    Words(Vec<String>),
    /// `°` alone or fused with a word: `°C`
    Degree(Option<String>),
    /// `′` - arc-minute or foot, decided by context
    Prime,
    /// `″` - arc-second or inch, decided by context
    DoublePrime,
}

impl UnitSpelling {
    /// The source text of the spelling.
    pub fn text(&self) -> String {
        match self {
            UnitSpelling::Words(words) => words.join(" "),
            UnitSpelling::Degree(None) => "°".to_string(),
            UnitSpelling::Degree(Some(word)) => format!("°{word}"),
            UnitSpelling::Prime => "′".to_string(),
            UnitSpelling::DoublePrime => "″".to_string(),
        }
    }
}

/// One unit factor with its (signed) exponent.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitFactor {
    pub spelling: UnitSpelling,
    pub exponent: i32,
    pub span: Span,
}

/// A product of unit factors, as written after a number.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitExpr {
    pub factors: Vec<UnitFactor>,
    pub span: Span,
}

/// One `number unit` component of a composite value.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositePart {
    pub number: f64,
    pub factor: UnitFactor,
    pub span: Span,
}

/// Presentation-format conversion targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatTarget {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
    Scientific,
    Fraction,
    Ordinal,
    /// `to value` - strip unit and formatting
    Plain,
    /// `to base N`
    Base(u32),
    /// `to N decimals`
    Decimals(u32),
    /// `to N sigFigs`
    SigFigs(u32),
}

/// The right-hand side of a conversion.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    /// `to km`, `to km/h`, `to m²`
    Unit(UnitExpr),
    /// `to ft in` - distribute into components
    Composite(Vec<UnitFactor>),
    /// `to UTC`, `to New York`
    Timezone(String),
    /// `to hex`, `to base 7`, `to 2 decimals`
    Format(FormatTarget),
}

/// Parse-tree node kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// `name = expr`
    Assignment { name: String, value: NodeRef },
    /// `if c then a else b`
    Conditional {
        cond: NodeRef,
        then: NodeRef,
        otherwise: NodeRef,
    },
    /// `expr to target` (and `in`/`as`/`→`)
    Conversion {
        expr: NodeRef,
        op: ConvOp,
        target: Target,
    },
    /// Binary operation
    Binary {
        op: BinOp,
        lhs: NodeRef,
        rhs: NodeRef,
    },
    /// Prefix operation
    Unary { op: UnOp, expr: NodeRef },
    /// Postfix operation
    Postfix { op: PostOp, expr: NodeRef },
    /// Number with an optional unit expression
    Value { number: f64, unit: Option<UnitExpr> },
    /// Currency-prefixed amount: `$100`, `US$100`, `USD 100`
    CurrencyValue { prefix: String, number: f64 },
    /// `5 ft 7 in`, `5° 30′`
    Composite { parts: Vec<CompositePart> },
    /// `sqrt(2)`, `min(a, b)`
    FunctionCall { name: String, args: Vec<NodeRef> },
    /// `true` / `false`
    Boolean(bool),
    /// Identifier used as a variable
    Variable(String),
    /// Identifier naming a mathematical constant
    Constant(String),
    /// `2038-01-19`
    Date { year: i32, month: u8, day: u8 },
    /// `03:14:07`
    Time { hour: u8, minute: u8, second: u8 },
    /// `2038-01-19 03:14:07 UTC`
    DateTime {
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        zone: Option<String>,
    },
    /// `now`
    Now,
    /// `today`
    Today,
    /// `yesterday`
    Yesterday,
    /// `tomorrow`
    Tomorrow,
    /// `2 days ago`
    Ago { value: NodeRef },
    /// `2 days from now`
    FromNow { value: NodeRef },
    /// `1700000000 unix`
    Unix { value: NodeRef },
}

impl Node {
    /// Apply `f` to this node and every descendant node, pre-order.
    ///
    /// Unit factors and targets are not nodes; callers that need them
    /// match on the kinds directly.
    pub fn visit(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        match &self.kind {
            NodeKind::Assignment { value, .. } => value.visit(f),
            NodeKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                cond.visit(f);
                then.visit(f);
                otherwise.visit(f);
            }
            NodeKind::Conversion { expr, .. } => expr.visit(f),
            NodeKind::Binary { lhs, rhs, .. } => {
                lhs.visit(f);
                rhs.visit(f);
            }
            NodeKind::Unary { expr, .. } | NodeKind::Postfix { expr, .. } => expr.visit(f),
            NodeKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.visit(f);
                }
            }
            NodeKind::Ago { value } | NodeKind::FromNow { value } | NodeKind::Unix { value } => {
                value.visit(f)
            }
            NodeKind::Value { .. }
            | NodeKind::CurrencyValue { .. }
            | NodeKind::Composite { .. }
            | NodeKind::Boolean(_)
            | NodeKind::Variable(_)
            | NodeKind::Constant(_)
            | NodeKind::Date { .. }
            | NodeKind::Time { .. }
            | NodeKind::DateTime { .. }
            | NodeKind::Now
            | NodeKind::Today
            | NodeKind::Yesterday
            | NodeKind::Tomorrow => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(x: f64) -> NodeRef {
        Node::new(
            NodeKind::Value {
                number: x,
                unit: None,
            },
            Span::DUMMY,
        )
    }

    #[test]
    fn test_visit_counts_nodes() {
        let tree = Node::new(
            NodeKind::Binary {
                op: BinOp::Add,
                lhs: num(1.0),
                rhs: Node::new(
                    NodeKind::Unary {
                        op: UnOp::Neg,
                        expr: num(2.0),
                    },
                    Span::DUMMY,
                ),
            },
            Span::DUMMY,
        );
        let mut count = 0;
        tree.visit(&mut |_| count += 1);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_spelling_text() {
        assert_eq!(
            UnitSpelling::Words(vec!["pound".into(), "force".into()]).text(),
            "pound force"
        );
        assert_eq!(UnitSpelling::Degree(Some("C".into())).text(), "°C");
        assert_eq!(UnitSpelling::Prime.text(), "′");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(num(1.0), num(1.0));
        assert_ne!(num(1.0), num(2.0));
    }
}
