//! The expression grammar as data.
//!
//! Productions encode the precedence ladder (assignment → conversion →
//! conditional → logical → bitwise → comparison → shift → additive →
//! multiplicative → unary → power → postfix → primary) as a chain of
//! nonterminals, so the chart parser can surface *every* derivation
//! instead of committing to one the way a binding-power loop would.

use std::sync::OnceLock;

use tally_lex::{Keyword, Token};

use crate::tree::{BinOp, ConvOp, FormatTarget, PostOp, UnOp};

/// Terminal classes matched against tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Term {
    /// Decimal or radix-prefixed number
    Number,
    /// Identifier, or the `in` keyword doubling as the inch symbol
    Word,
    /// Identifier only
    Ident,
    CurrencySym,
    Date,
    Time,
    Superscript,
    Degree,
    Prime,
    DoublePrime,
    Kw(Keyword),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    Tilde,
    Amp,
    PipeChar,
    AmpAmp,
    PipePipe,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    Shl,
    Shr,
    Eq,
    Arrow,
    LParen,
    RParen,
    Comma,
    Percent,
    Permille,
}

impl Term {
    /// Does this terminal class accept the token?
    pub(crate) fn matches(self, token: &Token) -> bool {
        match self {
            Term::Number => matches!(token, Token::Number(_) | Token::BasedNumber { .. }),
            Term::Word => token.word().is_some(),
            Term::Ident => matches!(token, Token::Ident(_)),
            Term::CurrencySym => matches!(token, Token::CurrencySymbol(_)),
            Term::Date => matches!(token, Token::Date { .. }),
            Term::Time => matches!(token, Token::Time { .. }),
            Term::Superscript => matches!(token, Token::Superscript(_)),
            Term::Degree => matches!(token, Token::Degree),
            Term::Prime => matches!(token, Token::Prime),
            Term::DoublePrime => matches!(token, Token::DoublePrime),
            Term::Kw(kw) => matches!(token, Token::Keyword(k) if *k == kw),
            Term::Plus => matches!(token, Token::Plus),
            Term::Minus => matches!(token, Token::Minus),
            Term::Star => matches!(token, Token::Star),
            Term::Slash => matches!(token, Token::Slash),
            Term::Caret => matches!(token, Token::Caret),
            Term::Bang => matches!(token, Token::Bang),
            Term::Tilde => matches!(token, Token::Tilde),
            Term::Amp => matches!(token, Token::Amp),
            Term::PipeChar => matches!(token, Token::PipeChar),
            Term::AmpAmp => matches!(token, Token::AmpAmp),
            Term::PipePipe => matches!(token, Token::PipePipe),
            Term::Lt => matches!(token, Token::Lt),
            Term::Le => matches!(token, Token::Le),
            Term::Gt => matches!(token, Token::Gt),
            Term::Ge => matches!(token, Token::Ge),
            Term::EqEq => matches!(token, Token::EqEq),
            Term::NotEq => matches!(token, Token::NotEq),
            Term::Shl => matches!(token, Token::Shl),
            Term::Shr => matches!(token, Token::Shr),
            Term::Eq => matches!(token, Token::Eq),
            Term::Arrow => matches!(token, Token::Arrow),
            Term::LParen => matches!(token, Token::LParen),
            Term::RParen => matches!(token, Token::RParen),
            Term::Comma => matches!(token, Token::Comma),
            Term::Percent => matches!(token, Token::Percent),
            Term::Permille => matches!(token, Token::Permille),
        }
    }
}

/// Nonterminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Nt {
    Line,
    Expr,
    Conv,
    Cond,
    LogOr,
    LogAnd,
    BitOr,
    BitXor,
    BitAnd,
    Cmp,
    Shift,
    Add,
    Mul,
    Unary,
    Power,
    Postfix,
    Primary,
    Value,
    Composite,
    CompPair,
    FnCall,
    Args,
    UnitProduct,
    UnitFactor,
    UnitTerm,
    UnitWords,
    TzWords,
    DateTime,
    Target,
    TargetUnits,
}

/// A grammar symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sym {
    T(Term),
    N(Nt),
}

/// Semantic build rule attached to a production; the forest walker
/// dispatches on it when assembling parse trees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    /// Chain production `A → B`: the child passes through unchanged
    PassThrough,
    Assignment,
    Conversion(ConvOp),
    Conditional,
    Binary(BinOp),
    Unary(UnOp),
    Postfix(PostOp),
    PowerCaret,
    PowerSuperscript,
    Paren,
    ValueNumber,
    ValueWithUnit,
    CurrencySymValue,
    /// `USD 100` - word validated as a currency prefix
    CurrencyWordValue,
    CompositeBase,
    CompositeExtend,
    CompositePair,
    FnCallArgs,
    FnCallEmpty,
    ArgsBase,
    ArgsExtend,
    Boolean(bool),
    KwNow,
    KwToday,
    KwYesterday,
    KwTomorrow,
    Ago,
    FromNow,
    Unix,
    VariableRef,
    /// Identifier validated against the constant table
    ConstantRef,
    DateLit,
    DateTimeLit,
    DateTimeZoned,
    DateZoned,
    TimeLit,
    TargetUnit,
    TargetComposite,
    /// Words validated against the timezone table
    TargetTimezone,
    TargetFormat(FormatTarget),
    TargetBase,
    TargetDecimals,
    TargetSigFigs,
    UnitProductSingle,
    UnitProductAdjacent,
    UnitProductMul,
    UnitProductDiv,
    UnitFactorPlain,
    UnitFactorSuperscript,
    UnitFactorCaret,
    /// `square X` / `X squared` (exponent 2), `cubic X` / `X cubed`
    /// (exponent 3)
    UnitFactorNamedPow(i32),
    UnitTermWords,
    UnitTermDegree,
    /// `°` fused with a word, validated against the unit tables
    UnitTermDegreeWord,
    UnitTermPrime,
    UnitTermDoublePrime,
    /// Single word; always admissible (user-defined unit fallback)
    UnitWords1,
    /// Multi-word runs validated against the unit/currency tables
    UnitWordsN,
    /// Word runs validated against the timezone table
    TzWords,
    TargetUnitsBase,
    TargetUnitsExtend,
}

/// One production.
#[derive(Clone, Debug)]
pub(crate) struct Production {
    pub lhs: Nt,
    pub rhs: Vec<Sym>,
    pub action: Action,
}

/// The grammar: production table plus an index by left-hand side.
pub(crate) struct Grammar {
    pub productions: Vec<Production>,
    by_lhs: rustc_hash::FxHashMap<Nt, Vec<usize>>,
}

impl Grammar {
    /// The process-wide grammar instance.
    pub(crate) fn get() -> &'static Grammar {
        static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
        GRAMMAR.get_or_init(Grammar::build)
    }

    /// Productions with the given left-hand side, in table order.
    pub(crate) fn for_lhs(&self, nt: Nt) -> &[usize] {
        self.by_lhs.get(&nt).map(Vec::as_slice).unwrap_or(&[])
    }

    fn build() -> Grammar {
        use Action as A;
        use Keyword as K;
        use Nt::*;
        use Sym::{N, T};
        use Term::*;

        let mut productions = Vec::new();
        let mut push = |lhs: Nt, rhs: Vec<Sym>, action: Action| {
            productions.push(Production { lhs, rhs, action });
        };

        // Line level: assignment binds loosest.
        push(Line, vec![T(Ident), T(Eq), N(Expr)], A::Assignment);
        push(Line, vec![N(Expr)], A::PassThrough);
        push(Expr, vec![N(Conv)], A::PassThrough);

        // Conversion, left-associative chains.
        push(Conv, vec![N(Cond)], A::PassThrough);
        push(
            Conv,
            vec![N(Conv), T(Kw(K::To)), N(Target)],
            A::Conversion(ConvOp::To),
        );
        push(
            Conv,
            vec![N(Conv), T(Kw(K::In)), N(Target)],
            A::Conversion(ConvOp::In),
        );
        push(
            Conv,
            vec![N(Conv), T(Kw(K::As)), N(Target)],
            A::Conversion(ConvOp::As),
        );
        push(
            Conv,
            vec![N(Conv), T(Arrow), N(Target)],
            A::Conversion(ConvOp::Arrow),
        );

        // Conditional.
        push(Cond, vec![N(LogOr)], A::PassThrough);
        push(
            Cond,
            vec![
                T(Kw(K::If)),
                N(Expr),
                T(Kw(K::Then)),
                N(Expr),
                T(Kw(K::Else)),
                N(Expr),
            ],
            A::Conditional,
        );

        // Binary ladder.
        push(LogOr, vec![N(LogAnd)], A::PassThrough);
        push(
            LogOr,
            vec![N(LogOr), T(PipePipe), N(LogAnd)],
            A::Binary(BinOp::LogicalOr),
        );
        push(LogAnd, vec![N(BitOr)], A::PassThrough);
        push(
            LogAnd,
            vec![N(LogAnd), T(AmpAmp), N(BitOr)],
            A::Binary(BinOp::LogicalAnd),
        );
        push(BitOr, vec![N(BitXor)], A::PassThrough);
        push(
            BitOr,
            vec![N(BitOr), T(PipeChar), N(BitXor)],
            A::Binary(BinOp::BitOr),
        );
        push(BitXor, vec![N(BitAnd)], A::PassThrough);
        push(
            BitXor,
            vec![N(BitXor), T(Kw(K::Xor)), N(BitAnd)],
            A::Binary(BinOp::BitXor),
        );
        push(BitAnd, vec![N(Cmp)], A::PassThrough);
        push(
            BitAnd,
            vec![N(BitAnd), T(Amp), N(Cmp)],
            A::Binary(BinOp::BitAnd),
        );
        push(Cmp, vec![N(Shift)], A::PassThrough);
        for (term, op) in [
            (Lt, BinOp::Lt),
            (Le, BinOp::Le),
            (Gt, BinOp::Gt),
            (Ge, BinOp::Ge),
            (EqEq, BinOp::Eq),
            (NotEq, BinOp::Ne),
        ] {
            push(Cmp, vec![N(Cmp), T(term), N(Shift)], A::Binary(op));
        }
        push(Shift, vec![N(Add)], A::PassThrough);
        push(Shift, vec![N(Shift), T(Shl), N(Add)], A::Binary(BinOp::Shl));
        push(Shift, vec![N(Shift), T(Shr), N(Add)], A::Binary(BinOp::Shr));
        push(Add, vec![N(Mul)], A::PassThrough);
        push(Add, vec![N(Add), T(Plus), N(Mul)], A::Binary(BinOp::Add));
        push(Add, vec![N(Add), T(Minus), N(Mul)], A::Binary(BinOp::Sub));
        push(Mul, vec![N(Unary)], A::PassThrough);
        push(Mul, vec![N(Mul), T(Star), N(Unary)], A::Binary(BinOp::Mul));
        push(Mul, vec![N(Mul), T(Slash), N(Unary)], A::Binary(BinOp::Div));
        push(
            Mul,
            vec![N(Mul), T(Kw(K::Per)), N(Unary)],
            A::Binary(BinOp::Div),
        );
        push(
            Mul,
            vec![N(Mul), T(Kw(K::Mod)), N(Unary)],
            A::Binary(BinOp::Mod),
        );
        push(Mul, vec![N(Mul), T(Percent), N(Unary)], A::Binary(BinOp::Mod));

        // Prefix, power, postfix.
        push(Unary, vec![N(Power)], A::PassThrough);
        push(Unary, vec![T(Minus), N(Unary)], A::Unary(UnOp::Neg));
        push(Unary, vec![T(Bang), N(Unary)], A::Unary(UnOp::Not));
        push(Unary, vec![T(Tilde), N(Unary)], A::Unary(UnOp::BitNot));
        push(Power, vec![N(Postfix)], A::PassThrough);
        push(Power, vec![N(Postfix), T(Caret), N(Unary)], A::PowerCaret);
        push(Power, vec![N(Postfix), T(Superscript)], A::PowerSuperscript);
        push(Postfix, vec![N(Primary)], A::PassThrough);
        push(
            Postfix,
            vec![N(Postfix), T(Bang)],
            A::Postfix(PostOp::Factorial),
        );
        push(
            Postfix,
            vec![N(Postfix), T(Percent)],
            A::Postfix(PostOp::Percent),
        );
        push(
            Postfix,
            vec![N(Postfix), T(Permille)],
            A::Postfix(PostOp::Permille),
        );

        // Primaries.
        push(Primary, vec![T(LParen), N(Expr), T(RParen)], A::Paren);
        push(Primary, vec![N(Value)], A::PassThrough);
        push(Primary, vec![N(Composite)], A::PassThrough);
        push(Primary, vec![N(FnCall)], A::PassThrough);
        push(Primary, vec![N(DateTime)], A::PassThrough);
        push(Primary, vec![T(Kw(K::True))], A::Boolean(true));
        push(Primary, vec![T(Kw(K::False))], A::Boolean(false));
        push(Primary, vec![T(Kw(K::Now))], A::KwNow);
        push(Primary, vec![T(Kw(K::Today))], A::KwToday);
        push(Primary, vec![T(Kw(K::Yesterday))], A::KwYesterday);
        push(Primary, vec![T(Kw(K::Tomorrow))], A::KwTomorrow);
        push(Primary, vec![N(Value), T(Kw(K::Ago))], A::Ago);
        push(
            Primary,
            vec![N(Value), T(Kw(K::From)), T(Kw(K::Now))],
            A::FromNow,
        );
        push(Primary, vec![N(Value), T(Kw(K::Unix))], A::Unix);
        push(Primary, vec![T(Ident)], A::VariableRef);
        push(Primary, vec![T(Ident)], A::ConstantRef);

        // Values.
        push(Value, vec![T(Number)], A::ValueNumber);
        push(Value, vec![T(Number), N(UnitProduct)], A::ValueWithUnit);
        push(Value, vec![T(CurrencySym), T(Number)], A::CurrencySymValue);
        push(Value, vec![T(Ident), T(Number)], A::CurrencyWordValue);

        // Composite values need at least two pairs.
        push(Composite, vec![N(CompPair), N(CompPair)], A::CompositeBase);
        push(Composite, vec![N(Composite), N(CompPair)], A::CompositeExtend);
        push(CompPair, vec![T(Number), N(UnitFactor)], A::CompositePair);

        // Function calls.
        push(
            FnCall,
            vec![T(Ident), T(LParen), N(Args), T(RParen)],
            A::FnCallArgs,
        );
        push(FnCall, vec![T(Ident), T(LParen), T(RParen)], A::FnCallEmpty);
        push(Args, vec![N(Expr)], A::ArgsBase);
        push(Args, vec![N(Args), T(Comma), N(Expr)], A::ArgsExtend);

        // Unit expressions.
        push(UnitProduct, vec![N(UnitFactor)], A::UnitProductSingle);
        push(
            UnitProduct,
            vec![N(UnitProduct), N(UnitFactor)],
            A::UnitProductAdjacent,
        );
        push(
            UnitProduct,
            vec![N(UnitProduct), T(Star), N(UnitFactor)],
            A::UnitProductMul,
        );
        push(
            UnitProduct,
            vec![N(UnitProduct), T(Slash), N(UnitFactor)],
            A::UnitProductDiv,
        );
        push(
            UnitProduct,
            vec![N(UnitProduct), T(Kw(K::Per)), N(UnitFactor)],
            A::UnitProductDiv,
        );
        push(UnitFactor, vec![N(UnitTerm)], A::UnitFactorPlain);
        push(
            UnitFactor,
            vec![N(UnitTerm), T(Superscript)],
            A::UnitFactorSuperscript,
        );
        push(
            UnitFactor,
            vec![N(UnitTerm), T(Caret), T(Number)],
            A::UnitFactorCaret,
        );
        push(
            UnitFactor,
            vec![T(Kw(K::Square)), N(UnitTerm)],
            A::UnitFactorNamedPow(2),
        );
        push(
            UnitFactor,
            vec![T(Kw(K::Cubic)), N(UnitTerm)],
            A::UnitFactorNamedPow(3),
        );
        push(
            UnitFactor,
            vec![N(UnitTerm), T(Kw(K::Squared))],
            A::UnitFactorNamedPow(2),
        );
        push(
            UnitFactor,
            vec![N(UnitTerm), T(Kw(K::Cubed))],
            A::UnitFactorNamedPow(3),
        );
        push(UnitTerm, vec![N(UnitWords)], A::UnitTermWords);
        push(UnitTerm, vec![T(Degree)], A::UnitTermDegree);
        push(UnitTerm, vec![T(Degree), T(Word)], A::UnitTermDegreeWord);
        push(UnitTerm, vec![T(Prime)], A::UnitTermPrime);
        push(UnitTerm, vec![T(DoublePrime)], A::UnitTermDoublePrime);
        push(UnitWords, vec![T(Word)], A::UnitWords1);
        push(UnitWords, vec![T(Word), T(Word)], A::UnitWordsN);
        push(UnitWords, vec![T(Word), T(Word), T(Word)], A::UnitWordsN);

        // Timezone word runs.
        push(TzWords, vec![T(Word)], A::TzWords);
        push(TzWords, vec![T(Word), T(Word)], A::TzWords);
        push(TzWords, vec![T(Word), T(Word), T(Word)], A::TzWords);

        // Date/time literals.
        push(DateTime, vec![T(Date)], A::DateLit);
        push(DateTime, vec![T(Date), T(Time)], A::DateTimeLit);
        push(
            DateTime,
            vec![T(Date), T(Time), N(TzWords)],
            A::DateTimeZoned,
        );
        push(DateTime, vec![T(Date), N(TzWords)], A::DateZoned);
        push(DateTime, vec![T(Time)], A::TimeLit);

        // Conversion targets. Composite lists come before plain unit
        // products so `to ft in` resolves as a distribution target on
        // an otherwise tied score.
        push(Target, vec![N(TargetUnits)], A::TargetComposite);
        push(Target, vec![N(UnitProduct)], A::TargetUnit);
        push(Target, vec![N(TzWords)], A::TargetTimezone);
        for (kw, fmt) in [
            (K::Binary, FormatTarget::Binary),
            (K::Octal, FormatTarget::Octal),
            (K::Decimal, FormatTarget::Decimal),
            (K::Hexadecimal, FormatTarget::Hexadecimal),
            (K::Scientific, FormatTarget::Scientific),
            (K::Fraction, FormatTarget::Fraction),
            (K::Ordinal, FormatTarget::Ordinal),
            (K::Value, FormatTarget::Plain),
        ] {
            push(Target, vec![T(Kw(kw))], A::TargetFormat(fmt));
        }
        push(Target, vec![T(Kw(K::Base)), T(Number)], A::TargetBase);
        push(Target, vec![T(Number), T(Kw(K::Decimals))], A::TargetDecimals);
        push(Target, vec![T(Number), T(Kw(K::SigFigs))], A::TargetSigFigs);
        push(
            TargetUnits,
            vec![N(UnitFactor), N(UnitFactor)],
            A::TargetUnitsBase,
        );
        push(
            TargetUnits,
            vec![N(TargetUnits), N(UnitFactor)],
            A::TargetUnitsExtend,
        );

        let mut by_lhs: rustc_hash::FxHashMap<Nt, Vec<usize>> = rustc_hash::FxHashMap::default();
        for (idx, prod) in productions.iter().enumerate() {
            by_lhs.entry(prod.lhs).or_default().push(idx);
        }
        Grammar {
            productions,
            by_lhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_builds() {
        let g = Grammar::get();
        assert!(g.productions.len() > 60);
        assert!(!g.for_lhs(Nt::Line).is_empty());
        assert!(!g.for_lhs(Nt::Target).is_empty());
    }

    #[test]
    fn test_no_empty_rhs() {
        // The chart parser relies on every production consuming at
        // least one token.
        for prod in &Grammar::get().productions {
            assert!(!prod.rhs.is_empty(), "{:?} has an empty rhs", prod.lhs);
        }
    }

    #[test]
    fn test_composite_target_precedes_unit_target() {
        let g = Grammar::get();
        let targets = g.for_lhs(Nt::Target);
        let composite = targets
            .iter()
            .position(|&i| g.productions[i].action == Action::TargetComposite)
            .unwrap();
        let unit = targets
            .iter()
            .position(|&i| g.productions[i].action == Action::TargetUnit)
            .unwrap();
        assert!(composite < unit);
    }

    #[test]
    fn test_term_matches() {
        assert!(Term::Number.matches(&Token::Number(1.0)));
        assert!(Term::Number.matches(&Token::BasedNumber { value: 3, radix: 2 }));
        assert!(Term::Word.matches(&Token::Ident("km".into())));
        assert!(Term::Word.matches(&Token::Keyword(Keyword::In)));
        assert!(!Term::Ident.matches(&Token::Keyword(Keyword::In)));
        assert!(Term::Kw(Keyword::To).matches(&Token::Keyword(Keyword::To)));
        assert!(!Term::Kw(Keyword::To).matches(&Token::Keyword(Keyword::As)));
    }
}
