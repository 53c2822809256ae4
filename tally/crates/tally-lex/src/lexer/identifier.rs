//! Identifier, keyword, and currency-symbol lexing.

use crate::lexer::core::{is_currency_symbol, is_ident_continue};
use crate::token::{Keyword, Token};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier, producing a keyword token when the word is
    /// reserved and a currency symbol when the word sits flush against
    /// `$` or `¥` (`US$`, `CN¥`).
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let word = self.cursor.slice_from(start);

        let next = self.cursor.current_char();
        if next == '$' || next == '¥' {
            self.cursor.advance();
            return Token::CurrencySymbol(self.cursor.slice_from(start).to_string());
        }

        match Keyword::from_word(word) {
            Some(kw) => Token::Keyword(kw),
            None => Token::Ident(word.to_string()),
        }
    }

    /// Lexes a standalone currency-symbol character.
    pub(crate) fn lex_currency_symbol(&mut self) -> Token {
        let start = self.cursor.position();
        debug_assert!(is_currency_symbol(self.cursor.current_char()));
        self.cursor.advance();
        Token::CurrencySymbol(self.cursor.slice_from(start).to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::token::{Keyword, Token};
    use crate::Lexer;

    fn lex(source: &str) -> Vec<Token> {
        let (tokens, diags) = Lexer::new(source, 1, 0).tokenize();
        assert!(!diags.has_errors());
        tokens.into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_plain_identifier() {
        assert_eq!(lex("width"), vec![Token::Ident("width".into())]);
        assert_eq!(lex("foo_bar2"), vec![Token::Ident("foo_bar2".into())]);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(lex("To"), vec![Token::Keyword(Keyword::To)]);
        assert_eq!(lex("MOD"), vec![Token::Keyword(Keyword::Mod)]);
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(lex("π"), vec![Token::Ident("π".into())]);
        assert_eq!(lex("µs"), vec![Token::Ident("µs".into())]);
    }

    #[test]
    fn test_adjacent_currency_symbol() {
        assert_eq!(lex("US$"), vec![Token::CurrencySymbol("US$".into())]);
        assert_eq!(lex("HK$"), vec![Token::CurrencySymbol("HK$".into())]);
        assert_eq!(lex("CN¥"), vec![Token::CurrencySymbol("CN¥".into())]);
    }

    #[test]
    fn test_word_not_swallowed_by_spaced_symbol() {
        // A space keeps the word an identifier.
        assert_eq!(
            lex("US $"),
            vec![
                Token::Ident("US".into()),
                Token::CurrencySymbol("$".into()),
            ]
        );
    }

    #[test]
    fn test_multi_word_units_stay_separate() {
        assert_eq!(
            lex("pound force"),
            vec![Token::Ident("pound".into()), Token::Ident("force".into())]
        );
    }
}
