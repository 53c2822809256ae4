//! Main lexer struct and dispatch.

use tally_util::{Diagnostics, Phase, Span};

use crate::cursor::Cursor;
use crate::token::{SpannedToken, Token};

/// The per-line lexer.
///
/// One lexer tokenizes one expression line. Spans refer to the
/// original document: the caller provides the line number and the byte
/// offset where the line starts.
///
/// # Example
///
/// ```
/// use tally_lex::Lexer;
///
/// let (tokens, diags) = Lexer::new("2 + 2", 1, 0).tokenize();
/// assert_eq!(tokens.len(), 3);
/// assert!(!diags.has_errors());
/// ```
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    line: u32,
    line_offset: usize,
    pub(crate) diags: Diagnostics,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for one line.
    pub fn new(source: &'a str, line: u32, line_offset: usize) -> Self {
        Self {
            cursor: Cursor::new(source),
            line,
            line_offset,
            diags: Diagnostics::new(),
        }
    }

    /// Tokenize the whole line.
    ///
    /// Never fails: unrecognized characters are recorded as lexer
    /// diagnostics and skipped.
    pub fn tokenize(mut self) -> (Vec<SpannedToken>, Diagnostics) {
        let mut tokens = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() {
                break;
            }
            let start = self.cursor.position();
            let column = self.cursor.column();
            match self.next_token() {
                Some(token) => {
                    let span = self.span_from(start, column);
                    tokens.push(SpannedToken::new(token, span));
                }
                None => {
                    // The dispatch reported the problem; make sure we
                    // always make progress.
                    if self.cursor.position() == start {
                        self.cursor.advance();
                    }
                }
            }
        }
        (tokens, self.diags)
    }

    /// Dispatch on the current character.
    fn next_token(&mut self) -> Option<Token> {
        let c = self.cursor.current_char();
        match c {
            '0'..='9' => self
                .lex_date()
                .or_else(|| self.lex_time())
                .or_else(|| self.lex_number()),
            c if is_ident_start(c) => Some(self.lex_identifier()),
            c if is_currency_symbol(c) => Some(self.lex_currency_symbol()),
            _ => self.lex_operator(),
        }
    }

    /// Build a document span from a line-local start position.
    pub(crate) fn span_from(&self, start: usize, column: u32) -> Span {
        Span::new(
            self.line_offset + start,
            self.line_offset + self.cursor.position(),
            self.line,
            column,
        )
    }

    /// Record a lexer diagnostic covering the current position.
    pub(crate) fn report_error(&mut self, message: String, start: usize, column: u32) {
        let span = self.span_from(start, column);
        self.diags.error(Phase::Lexer, message, span);
    }
}

/// True for characters that may start an identifier.
pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || (c.is_alphabetic() && !is_currency_symbol(c))
}

/// True for characters that may continue an identifier.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric() && !is_currency_symbol(c)
}

/// Single-character adjacent currency symbols.
pub(crate) fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '€' | '£' | '¥' | '₹' | '₩' | '₽' | '₺')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Keyword, Token};

    fn lex(source: &str) -> Vec<Token> {
        let (tokens, diags) = Lexer::new(source, 1, 0).tokenize();
        assert!(!diags.has_errors(), "unexpected lexer errors: {diags:?}");
        tokens.into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_simple_arithmetic() {
        assert_eq!(
            lex("2 + 2"),
            vec![Token::Number(2.0), Token::Plus, Token::Number(2.0)]
        );
    }

    #[test]
    fn test_value_with_unit() {
        assert_eq!(
            lex("5 km"),
            vec![Token::Number(5.0), Token::Ident("km".into())]
        );
    }

    #[test]
    fn test_keywords_and_units() {
        assert_eq!(
            lex("10 in in cm"),
            vec![
                Token::Number(10.0),
                Token::Keyword(Keyword::In),
                Token::Keyword(Keyword::In),
                Token::Ident("cm".into()),
            ]
        );
    }

    #[test]
    fn test_degree_units() {
        assert_eq!(
            lex("100 °F"),
            vec![Token::Number(100.0), Token::Degree, Token::Ident("F".into())]
        );
    }

    #[test]
    fn test_primes() {
        assert_eq!(
            lex("5′ 7″"),
            vec![
                Token::Number(5.0),
                Token::Prime,
                Token::Number(7.0),
                Token::DoublePrime,
            ]
        );
    }

    #[test]
    fn test_superscript() {
        assert_eq!(
            lex("10 m²"),
            vec![
                Token::Number(10.0),
                Token::Ident("m".into()),
                Token::Superscript(2),
            ]
        );
        assert_eq!(
            lex("s⁻¹"),
            vec![Token::Ident("s".into()), Token::Superscript(-1)]
        );
    }

    #[test]
    fn test_date_time_literals() {
        assert_eq!(
            lex("2038-01-19 03:14:07"),
            vec![
                Token::Date {
                    year: 2038,
                    month: 1,
                    day: 19
                },
                Token::Time {
                    hour: 3,
                    minute: 14,
                    second: 7
                },
            ]
        );
    }

    #[test]
    fn test_subtraction_is_not_a_date() {
        assert_eq!(
            lex("2038 - 1 - 19"),
            vec![
                Token::Number(2038.0),
                Token::Minus,
                Token::Number(1.0),
                Token::Minus,
                Token::Number(19.0),
            ]
        );
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(
            lex("$100"),
            vec![Token::CurrencySymbol("$".into()), Token::Number(100.0)]
        );
        assert_eq!(
            lex("US$100"),
            vec![Token::CurrencySymbol("US$".into()), Token::Number(100.0)]
        );
        assert_eq!(
            lex("€9.99"),
            vec![Token::CurrencySymbol("€".into()), Token::Number(9.99)]
        );
    }

    #[test]
    fn test_unicode_operators() {
        assert_eq!(
            lex("6 × 7 ÷ 2"),
            vec![
                Token::Number(6.0),
                Token::Star,
                Token::Number(7.0),
                Token::Slash,
                Token::Number(2.0),
            ]
        );
        assert_eq!(
            lex("5 km → mi"),
            vec![
                Token::Number(5.0),
                Token::Ident("km".into()),
                Token::Arrow,
                Token::Ident("mi".into()),
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            lex("1 <= 2 == 3 != 4 >> 1"),
            vec![
                Token::Number(1.0),
                Token::Le,
                Token::Number(2.0),
                Token::EqEq,
                Token::Number(3.0),
                Token::NotEq,
                Token::Number(4.0),
                Token::Shr,
                Token::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_percent() {
        assert_eq!(lex("20%"), vec![Token::Number(20.0), Token::Percent]);
        assert_eq!(lex("5‰"), vec![Token::Number(5.0), Token::Permille]);
    }

    #[test]
    fn test_based_numbers() {
        assert_eq!(
            lex("0xFF + 0b101 + 0o77"),
            vec![
                Token::BasedNumber {
                    value: 255,
                    radix: 16
                },
                Token::Plus,
                Token::BasedNumber { value: 5, radix: 2 },
                Token::Plus,
                Token::BasedNumber {
                    value: 63,
                    radix: 8
                },
            ]
        );
    }

    #[test]
    fn test_unrecognized_character_is_reported() {
        let (tokens, diags) = Lexer::new("2 ☃ 2", 3, 10).tokenize();
        assert!(diags.has_errors());
        assert_eq!(tokens.len(), 2);
        let entry = &diags.entries()[0];
        assert_eq!(entry.span.line, 3);
        assert!(entry.message.contains('☃'));
    }

    #[test]
    fn test_spans_are_document_relative() {
        let (tokens, _) = Lexer::new("1 + 2", 2, 100).tokenize();
        assert_eq!(tokens[0].span.start, 100);
        assert_eq!(tokens[2].span.start, 104);
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 5);
    }

    #[test]
    fn test_empty_line() {
        let (tokens, diags) = Lexer::new("   ", 1, 0).tokenize();
        assert!(tokens.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            lex("width = 10 m"),
            vec![
                Token::Ident("width".into()),
                Token::Eq,
                Token::Number(10.0),
                Token::Ident("m".into()),
            ]
        );
    }
}
