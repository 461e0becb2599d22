use std::collections::HashMap;
use std::fmt;
use std::result;

use lazy_static::lazy_static;

const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';
const PLUS_CHAR: char = '+';
const MINUS_CHAR: char = '-';
const STAR_CHAR: char = '*';
const SLASH_CHAR: char = '/';
const CARET_CHAR: char = '^';
const DOT_CHAR: char = '.';

lazy_static! {
    /// PUNCTUATION maps every single-character token to its `Token`,
    /// checked ahead of the literal rules.
    static ref PUNCTUATION: HashMap<char, Token> = {
        let mut map = HashMap::new();

        map.insert(OPEN_PAREN, Token::LeftParen);
        map.insert(CLOSE_PAREN, Token::RightParen);
        map.insert(PLUS_CHAR, Token::Plus);
        map.insert(MINUS_CHAR, Token::Minus);
        map.insert(STAR_CHAR, Token::Star);
        map.insert(SLASH_CHAR, Token::Slash);
        map.insert(CARET_CHAR, Token::Caret);

        map
    };
}

/// Result binds the std::result::Result::Err type to this module's error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// MalformedNumber carries the text of a numeric literal that could
    /// not be converted, e.g. one with more than one decimal point.
    MalformedNumber(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedNumber(text) => write!(f, "malformed number literal: {}", text),
        }
    }
}

/// Token represents an atomic component of the language's syntax.
///
/// Numeric literals are converted during lexing: text without a decimal
/// point becomes `Number::Int`, text with one becomes `Number::Float`.
/// `Token::Str` is part of the token set but the lexer never produces it;
/// there is no string-literal syntax yet.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    LeftParen,
    RightParen,
    Number(Number),
    Str(String),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Eof,
}

/// Number is the numeric value type shared by tokens, AST nodes and
/// evaluation results.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(n) => n == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

/// Lexer produces tokens from the input source, one per call to
/// `next_token`. Once the cursor passes the end of the input every further
/// call yields `Token::Eof`.
#[derive(Debug)]
pub struct Lexer {
    source: Vec<char>,
    cursor: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            source: input.chars().collect(),
            cursor: 0,
        }
    }

    /// advance consumes and returns the next character, or `None` once the
    /// cursor has passed the end of the input.
    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.cursor).copied();
        if ch.is_some() {
            self.cursor += 1;
        }
        ch
    }

    /// retreat un-consumes one character. The cursor is clamped so it can
    /// never move before the start of the input.
    fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn next_token(&mut self) -> Result<Token> {
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::Eof),
        };

        if ch.is_whitespace() {
            return self.next_token();
        }

        if let Some(token) = PUNCTUATION.get(&ch) {
            return Ok(token.clone());
        }

        if ch.is_ascii_digit() {
            return self.consume_number(ch);
        }

        // Anything else opens an identifier.
        Ok(self.consume_identifier(ch))
    }

    /// consume_number accumulates digits and decimal points without
    /// counting the latter; text that then fails numeric conversion (e.g.
    /// `1.2.3`) is rejected here instead of being handed to the parser.
    fn consume_number(&mut self, first: char) -> Result<Token> {
        let mut text = String::new();
        text.push(first);

        while let Some(ch) = self.advance() {
            if ch.is_ascii_digit() || ch == DOT_CHAR {
                text.push(ch);
            } else {
                self.retreat();
                break;
            }
        }

        let number = if text.contains(DOT_CHAR) {
            text.parse::<f64>().ok().map(Number::Float)
        } else {
            text.parse::<i64>().ok().map(Number::Int)
        };
        number
            .map(Token::Number)
            .ok_or(Error::MalformedNumber(text))
    }

    fn consume_identifier(&mut self, first: char) -> Token {
        let mut text = String::new();
        text.push(first);

        while let Some(ch) = self.advance() {
            if ch.is_alphanumeric() {
                text.push(ch);
            } else {
                self.retreat();
                break;
            }
        }

        Token::Identifier(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn run_lex_test(input: &str, expected_tokens: Vec<Token>) {
        let tokens = lex_all(input).unwrap();
        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn can_lex_parens_and_operators() {
        run_lex_test(
            "(+ - * / ^)",
            vec![
                Token::LeftParen,
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Caret,
                Token::RightParen,
                Token::Eof,
            ],
        );
    }

    #[test]
    fn can_lex_integers_and_floats() {
        run_lex_test(
            "42 3.25 0",
            vec![
                Token::Number(Number::Int(42)),
                Token::Number(Number::Float(3.25)),
                Token::Number(Number::Int(0)),
                Token::Eof,
            ],
        );
    }

    #[test]
    fn negative_literals_lex_as_minus_then_number() {
        run_lex_test(
            "-5",
            vec![Token::Minus, Token::Number(Number::Int(5)), Token::Eof],
        );
    }

    #[test]
    fn number_stops_at_first_non_numeric_character() {
        run_lex_test(
            "12(",
            vec![
                Token::Number(Number::Int(12)),
                Token::LeftParen,
                Token::Eof,
            ],
        );
    }

    #[test]
    fn rejects_literal_with_multiple_decimal_points() {
        let mut lexer = Lexer::new("1.2.3");
        assert_eq!(
            lexer.next_token(),
            Err(Error::MalformedNumber("1.2.3".into()))
        );
    }

    #[test]
    fn can_lex_identifiers() {
        run_lex_test(
            "def x1 funcall",
            vec![
                Token::Identifier("def".into()),
                Token::Identifier("x1".into()),
                Token::Identifier("funcall".into()),
                Token::Eof,
            ],
        );
    }

    #[test]
    fn unusual_characters_open_identifiers() {
        // There is no dedicated token kind for these; they follow the
        // identifier rule.
        run_lex_test(
            "@abc %",
            vec![
                Token::Identifier("@abc".into()),
                Token::Identifier("%".into()),
                Token::Eof,
            ],
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        run_lex_test(
            "  \n\t (  1 ) ",
            vec![
                Token::LeftParen,
                Token::Number(Number::Int(1)),
                Token::RightParen,
                Token::Eof,
            ],
        );
    }

    #[test]
    fn eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token(), Ok(Token::Identifier("x".into())));
        assert_eq!(lexer.next_token(), Ok(Token::Eof));
        assert_eq!(lexer.next_token(), Ok(Token::Eof));
        assert_eq!(lexer.next_token(), Ok(Token::Eof));
    }

    #[test]
    fn can_lex_whole_expression() {
        run_lex_test(
            "(def x 5)",
            vec![
                Token::LeftParen,
                Token::Identifier("def".into()),
                Token::Identifier("x".into()),
                Token::Number(Number::Int(5)),
                Token::RightParen,
                Token::Eof,
            ],
        );
    }

    #[test]
    fn empty_input_is_just_eof() {
        run_lex_test("", vec![Token::Eof]);
    }
}
