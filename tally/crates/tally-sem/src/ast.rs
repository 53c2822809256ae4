//! The evaluation AST.
//!
//! Unambiguous, fully resolved form of one line: unit names are
//! canonical references, currency prefixes are expanded, prime marks
//! are committed to arc or length units, and keyword temporals are
//! lowered to explicit forms.

use tally_data::UnitId;
use tally_util::Span;

/// Binary operators.
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

/// A resolved unit reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitRef {
    /// A unit from the reference index
    Known(UnitId),
    /// An unambiguous currency, by ISO code
    Currency(String),
    /// An ambiguous currency symbol; its synthetic dimension is
    /// non-convertible
    AmbiguousCurrency(String),
    /// An identifier used as a unit that the index does not know; the
    /// name itself is the dimension
    UserDefined(String),
}

/// One `(unit, signed exponent)` term of a derived unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitPow {
    pub unit: UnitRef,
    pub exponent: i32,
}

impl UnitPow {
    pub fn new(unit: UnitRef, exponent: i32) -> Self {
        Self { unit, exponent }
    }
}

/// Temporal property extracted by `to year`-style conversions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemporalField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TemporalField {
    /// Match the singular spelling of a field.
    pub fn from_word(word: &str) -> Option<Self> {
        let field = match word.to_ascii_lowercase().as_str() {
            "year" => TemporalField::Year,
            "month" => TemporalField::Month,
            "day" => TemporalField::Day,
            "hour" => TemporalField::Hour,
            "minute" => TemporalField::Minute,
            "second" => TemporalField::Second,
            _ => return None,
        };
        Some(field)
    }
}

/// Presentation-format conversion targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatSpec {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
    Scientific,
    Fraction,
    Ordinal,
    Plain,
    Base(u32),
    Decimals(u32),
    SigFigs(u32),
}

/// A resolved conversion target.
#[derive(Clone, Debug, PartialEq)]
pub enum ConvTarget {
    /// Convert to a (possibly derived) unit
    Unit(Vec<UnitPow>),
    /// A single time unit spelled in the singular: a unit conversion
    /// on dimensional values, a property extraction on temporal ones
    TimeField { unit: UnitPow, field: TemporalField },
    /// Distribute into components, largest first
    Composite(Vec<UnitPow>),
    /// Move to another zone, by IANA id
    Timezone(String),
    /// Attach a presentation format
    Format(FormatSpec),
}

/// An evaluation-AST expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// A number with zero or more unit terms (empty = dimensionless)
    Quantity { value: f64, units: Vec<UnitPow> },
    /// Same-dimension components: `5 ft 7 in`
    Composite { parts: Vec<(f64, UnitPow)> },
    Assignment {
        name: String,
        value: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Convert {
        expr: Box<Expr>,
        target: ConvTarget,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },
    Factorial(Box<Expr>),
    /// `x%` - divides by 100
    Percent(Box<Expr>),
    /// `x‰` - divides by 1000
    Permille(Box<Expr>),
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Bool(bool),
    Var(String),
    Date {
        year: i32,
        month: u8,
        day: u8,
    },
    Time {
        hour: u8,
        minute: u8,
        second: u8,
    },
    DateTime {
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        /// Resolved IANA id, if the literal named a zone
        zone: Option<String>,
    },
    /// The current instant
    Now,
    /// `value ago` - now minus a duration
    Ago(Box<Expr>),
    /// `value from now` - now plus a duration
    FromNow(Box<Expr>),
    /// `value unix` - instant from an epoch count
    UnixEpoch(Box<Expr>),
}
