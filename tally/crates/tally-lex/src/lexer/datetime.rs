//! Plain date and time pattern lexing.
//!
//! Both scanners backtrack: on anything short of a full, plausible
//! pattern the cursor is restored and the digits lex as a number, so
//! `2038 - 1` stays a subtraction while `2038-01-19` is a date.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Try to lex `YYYY-MM-DD` at the current position.
    pub(crate) fn lex_date(&mut self) -> Option<Token> {
        let snapshot = self.cursor.snapshot();

        let Some(year) = self.scan_digits(4, 4) else {
            self.cursor.restore(snapshot);
            return None;
        };
        if !self.cursor.match_char('-') {
            self.cursor.restore(snapshot);
            return None;
        }
        let Some(month) = self.scan_digits(2, 2) else {
            self.cursor.restore(snapshot);
            return None;
        };
        if !self.cursor.match_char('-') {
            self.cursor.restore(snapshot);
            return None;
        }
        let Some(day) = self.scan_digits(2, 2) else {
            self.cursor.restore(snapshot);
            return None;
        };

        // A trailing digit means this was never a date.
        if self.cursor.current_char().is_ascii_digit() {
            self.cursor.restore(snapshot);
            return None;
        }
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            self.cursor.restore(snapshot);
            return None;
        }

        Some(Token::Date {
            year: year as i32,
            month: month as u8,
            day: day as u8,
        })
    }

    /// Try to lex `HH:MM(:SS)?` at the current position.
    pub(crate) fn lex_time(&mut self) -> Option<Token> {
        let snapshot = self.cursor.snapshot();

        let Some(hour) = self.scan_digits(1, 2) else {
            self.cursor.restore(snapshot);
            return None;
        };
        if !self.cursor.match_char(':') {
            self.cursor.restore(snapshot);
            return None;
        }
        let Some(minute) = self.scan_digits(2, 2) else {
            self.cursor.restore(snapshot);
            return None;
        };
        let second = if self.cursor.current_char() == ':' {
            self.cursor.advance();
            match self.scan_digits(2, 2) {
                Some(s) => s,
                None => {
                    self.cursor.restore(snapshot);
                    return None;
                }
            }
        } else {
            0
        };

        if self.cursor.current_char().is_ascii_digit()
            || hour > 23
            || minute > 59
            || second > 59
        {
            self.cursor.restore(snapshot);
            return None;
        }

        Some(Token::Time {
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
        })
    }

    /// Scan between `min` and `max` ASCII digits, returning their
    /// value, or `None` when fewer than `min` are present.
    fn scan_digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            let c = self.cursor.current_char();
            let Some(d) = c.to_digit(10) else { break };
            value = value * 10 + d;
            count += 1;
            self.cursor.advance();
        }
        (count >= min).then_some(value)
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
    fn test_date() {
        assert_eq!(
            lex("2024-02-29"),
            vec![Token::Date {
                year: 2024,
                month: 2,
                day: 29
            }]
        );
    }

    #[test]
    fn test_not_a_date_out_of_range() {
        // Month 99 cannot be a date; lexes as arithmetic.
        assert_eq!(
            lex("2024-99-01"),
            vec![
                Token::Number(2024.0),
                Token::Minus,
                Token::Number(99.0),
                Token::Minus,
                Token::Number(1.0),
            ]
        );
    }

    #[test]
    fn test_time_with_seconds() {
        assert_eq!(
            lex("03:14:07"),
            vec![Token::Time {
                hour: 3,
                minute: 14,
                second: 7
            }]
        );
    }

    #[test]
    fn test_time_without_seconds() {
        assert_eq!(
            lex("22:00"),
            vec![Token::Time {
                hour: 22,
                minute: 0,
                second: 0
            }]
        );
    }

    #[test]
    fn test_single_digit_hour() {
        assert_eq!(
            lex("9:30"),
            vec![Token::Time {
                hour: 9,
                minute: 30,
                second: 0
            }]
        );
    }

    #[test]
    fn test_invalid_time_falls_back() {
        // Hour 25 is not a time; the digits lex as a number and the
        // stray `:` is reported.
        let (tokens, diags) = Lexer::new("25:00", 1, 0).tokenize();
        assert_eq!(tokens[0].token, Token::Number(25.0));
        assert!(diags.has_errors());
    }

    #[test]
    fn test_date_followed_by_time() {
        let tokens = lex("2038-01-19 03:14:07");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0], Token::Date { .. }));
        assert!(matches!(tokens[1], Token::Time { .. }));
    }
}
