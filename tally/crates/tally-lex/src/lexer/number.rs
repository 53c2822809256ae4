//! Number literal lexing.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal.
    ///
    /// Handles decimal (`42`, `3.14`, `2.5e-3`) and radix-prefixed
    /// integer formats (`0xFF`, `0b1010`, `0o777`).
    pub(crate) fn lex_number(&mut self) -> Option<Token> {
        let start = self.cursor.position();
        let column = self.cursor.column();

        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'x' | 'X' => return self.lex_based(16, start, column),
                'b' | 'B' => return self.lex_based(2, start, column),
                'o' | 'O' => return self.lex_based(8, start, column),
                _ => {}
            }
        }

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        // Exponent only when digits actually follow; `2e` stays a
        // number followed by the identifier `e`.
        let c = self.cursor.current_char();
        if c == 'e' || c == 'E' {
            let next = self.cursor.peek_char(1);
            let after_sign = self.cursor.peek_char(2);
            if next.is_ascii_digit() || ((next == '+' || next == '-') && after_sign.is_ascii_digit())
            {
                self.cursor.advance();
                if !self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            }
        }

        let text = self.cursor.slice_from(start);
        match text.parse::<f64>() {
            Ok(value) => Some(Token::Number(value)),
            Err(_) => {
                self.report_error(format!("invalid number literal `{text}`"), start, column);
                None
            }
        }
    }

    /// Lexes a radix-prefixed integer after `0x`/`0b`/`0o`.
    fn lex_based(&mut self, radix: u8, start: usize, column: u32) -> Option<Token> {
        self.cursor.advance();
        self.cursor.advance();
        let digits_start = self.cursor.position();
        while self.cursor.current_char().is_ascii_alphanumeric() {
            self.cursor.advance();
        }
        let digits = self.cursor.slice_from(digits_start);
        if digits.is_empty() {
            self.report_error(
                format!("missing digits after `{}`", &self.cursor.slice_from(start)),
                start,
                column,
            );
            return None;
        }
        match i64::from_str_radix(digits, radix as u32) {
            Ok(value) => Some(Token::BasedNumber { value, radix }),
            Err(_) => {
                let text = self.cursor.slice_from(start);
                self.report_error(
                    format!("invalid base-{radix} literal `{text}`"),
                    start,
                    column,
                );
                None
            }
        }
    }
}
