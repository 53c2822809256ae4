//! Lexing is total: any input produces a token list whose spans stay
//! inside the line, and unrecognized input is reported, never dropped
//! silently alongside a clean result.

use proptest::prelude::*;
use tally_lex::{Lexer, Token};

proptest! {
    #[test]
    fn lexing_never_panics(line in "\\PC*") {
        let _ = Lexer::new(&line, 1, 0).tokenize();
    }

    #[test]
    fn spans_are_ordered_and_in_bounds(line in "\\PC*") {
        let (tokens, _) = Lexer::new(&line, 1, 0).tokenize();
        let mut last_end = 0usize;
        for t in &tokens {
            prop_assert!(t.span.start >= last_end);
            prop_assert!(t.span.end <= line.len());
            prop_assert!(t.span.start <= t.span.end);
            last_end = t.span.end;
        }
    }

    #[test]
    fn ascii_expression_lines_lex_clean(line in "[0-9 +*/()]{0,40}") {
        // Lines built from the plain expression alphabet never produce
        // lexer diagnostics.
        let (_, diags) = Lexer::new(&line, 1, 0).tokenize();
        prop_assert!(!diags.has_errors());
    }
}

#[test]
fn every_number_token_covers_its_text() {
    let line = "12 + 3.5 * 0x1F";
    let (tokens, diags) = Lexer::new(line, 1, 0).tokenize();
    assert!(!diags.has_errors());
    let numbers: Vec<_> = tokens
        .iter()
        .filter(|t| matches!(t.token, Token::Number(_) | Token::BasedNumber { .. }))
        .collect();
    assert_eq!(numbers.len(), 3);
    assert_eq!(&line[numbers[0].span.start..numbers[0].span.end], "12");
    assert_eq!(&line[numbers[1].span.start..numbers[1].span.end], "3.5");
    assert_eq!(&line[numbers[2].span.start..numbers[2].span.end], "0x1F");
}
