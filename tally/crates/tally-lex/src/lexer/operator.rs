//! Operator, bracket, and unit-symbol lexing.

use crate::token::Token;
use crate::Lexer;

/// Numeric value of a superscript digit, if the character is one.
fn superscript_digit(c: char) -> Option<i32> {
    let d = match c {
        '⁰' => 0,
        '¹' => 1,
        '²' => 2,
        '³' => 3,
        '⁴' => 4,
        '⁵' => 5,
        '⁶' => 6,
        '⁷' => 7,
        '⁸' => 8,
        '⁹' => 9,
        _ => return None,
    };
    Some(d)
}

impl<'a> Lexer<'a> {
    /// Lexes operators, brackets, unit-symbol specials, and
    /// superscript runs. Reports and skips anything unrecognized.
    pub(crate) fn lex_operator(&mut self) -> Option<Token> {
        let start = self.cursor.position();
        let column = self.cursor.column();
        let c = self.cursor.current_char();

        if superscript_digit(c).is_some() || c == '⁻' || c == '⁺' {
            return self.lex_superscript();
        }

        self.cursor.advance();
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' | '×' | '·' => Token::Star,
            '/' | '÷' => Token::Slash,
            '^' => Token::Caret,
            '~' => Token::Tilde,
            '%' => Token::Percent,
            '‰' => Token::Permille,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '°' => Token::Degree,
            '′' | '\'' => Token::Prime,
            '″' | '"' => Token::DoublePrime,
            '→' => Token::Arrow,
            '!' => {
                if self.cursor.match_char('=') {
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            '=' => {
                if self.cursor.match_char('=') {
                    Token::EqEq
                } else {
                    Token::Eq
                }
            }
            '<' => {
                if self.cursor.match_char('=') {
                    Token::Le
                } else if self.cursor.match_char('<') {
                    Token::Shl
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.cursor.match_char('=') {
                    Token::Ge
                } else if self.cursor.match_char('>') {
                    Token::Shr
                } else {
                    Token::Gt
                }
            }
            '&' => {
                if self.cursor.match_char('&') {
                    Token::AmpAmp
                } else {
                    Token::Amp
                }
            }
            '|' => {
                if self.cursor.match_char('|') {
                    Token::PipePipe
                } else {
                    Token::PipeChar
                }
            }
            _ => {
                self.report_error(format!("unrecognized character `{c}`"), start, column);
                return None;
            }
        };
        Some(token)
    }

    /// Lexes a superscript run: optional superscript sign followed by
    /// superscript digits (`²`, `⁻¹`, `⁺³`).
    fn lex_superscript(&mut self) -> Option<Token> {
        let start = self.cursor.position();
        let column = self.cursor.column();
        let mut negative = false;
        match self.cursor.current_char() {
            '⁻' => {
                negative = true;
                self.cursor.advance();
            }
            '⁺' => {
                self.cursor.advance();
            }
            _ => {}
        }
        let mut value: i32 = 0;
        let mut digits = 0;
        while let Some(d) = superscript_digit(self.cursor.current_char()) {
            value = value.saturating_mul(10).saturating_add(d);
            digits += 1;
            self.cursor.advance();
        }
        if digits == 0 {
            self.report_error("superscript sign without digits".to_string(), start, column);
            return None;
        }
        Some(Token::Superscript(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use crate::Lexer;

    fn lex(source: &str) -> Vec<Token> {
        let (tokens, diags) = Lexer::new(source, 1, 0).tokenize();
        assert!(!diags.has_errors());
        tokens.into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_single_char_operators() {
        assert_eq!(
            lex("+ - * / ^ ~ ( ) ,"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Caret,
                Token::Tilde,
                Token::LParen,
                Token::RParen,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            lex("<< >> <= >= == != && ||"),
            vec![
                Token::Shl,
                Token::Shr,
                Token::Le,
                Token::Ge,
                Token::EqEq,
                Token::NotEq,
                Token::AmpAmp,
                Token::PipePipe,
            ]
        );
    }

    #[test]
    fn test_bang_vs_noteq() {
        assert_eq!(lex("5!"), vec![Token::Number(5.0), Token::Bang]);
        assert_eq!(
            lex("5 != 6"),
            vec![Token::Number(5.0), Token::NotEq, Token::Number(6.0)]
        );
    }

    #[test]
    fn test_ascii_prime_marks() {
        assert_eq!(
            lex("5' 7\""),
            vec![
                Token::Number(5.0),
                Token::Prime,
                Token::Number(7.0),
                Token::DoublePrime,
            ]
        );
    }

    #[test]
    fn test_superscript_run() {
        assert_eq!(lex("¹²"), vec![Token::Superscript(12)]);
        assert_eq!(lex("⁻²"), vec![Token::Superscript(-2)]);
        assert_eq!(lex("⁺³"), vec![Token::Superscript(3)]);
    }

    #[test]
    fn test_dangling_superscript_sign() {
        let (tokens, diags) = Lexer::new("⁻", 1, 0).tokenize();
        assert!(tokens.is_empty());
        assert!(diags.has_errors());
    }
}
