//! Recursive-descent parser for the literal grammar
//!
//! Only constants and displays of constants are accepted. There is no name
//! lookup, no call other than the empty `set()` display, and no operator other
//! than a sign directly in front of a number, so parsing a hostile override can
//! fail but can never do anything.

use thiserror::Error;

use crate::domain::Value;

/// Deepest container nesting accepted
pub const MAX_DEPTH: usize = 64;

/// The input is not a literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct LiteralError {
    /// Character offset into the raw input
    pub position: usize,
    pub message: String,
}

/// Parses `raw` as a literal
///
/// Leading spaces and tabs are ignored, as is trailing whitespace.
///
/// ```rust
/// use envcast::domain::Value;
/// use envcast::literal::parse_literal;
///
/// let value = parse_literal("{'hosts': ['a', 'b'], 'port': 8000}").unwrap();
/// assert!(matches!(value, Value::Map(_)));
/// assert!(parse_literal("__import__('os').system('x')").is_err());
/// ```
pub fn parse_literal(raw: &str) -> Result<Value, LiteralError> {
    let trimmed = raw.trim_start_matches([' ', '\t']);
    let offset = raw.chars().count() - trimmed.chars().count();
    let mut parser = LiteralParser {
        chars: trimmed.chars().collect(),
        pos: 0,
        offset,
    };
    let value = parser.expression(0)?;
    parser.skip_trivia();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    offset: usize,
}

impl LiteralParser {
    fn error(&self, message: impl Into<String>) -> LiteralError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> LiteralError {
        LiteralError {
            position: pos + self.offset,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skips whitespace and `#` comments
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c == '#' {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn expression(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal nesting too deep"));
        }
        self.skip_trivia();
        let start = self.pos;
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('+') | Some('-') => {
                let negative = self.peek() == Some('-');
                self.pos += 1;
                self.skip_trivia();
                match self.peek() {
                    Some(c) if c.is_ascii_digit() || (c == '.' && self.digit_follows()) => {
                        self.number(negative)
                    }
                    _ => Err(self.error_at(start, "sign must be followed by a number")),
                }
            }
            Some(c) if c.is_ascii_digit() => self.number(false),
            Some('.') if self.digit_follows() => self.number(false),
            Some('\'') | Some('"') => self.strings(),
            Some('[') => {
                self.pos += 1;
                let items = self.sequence(']', depth)?;
                Ok(Value::List(items))
            }
            Some('(') => self.parenthesized(depth),
            Some('{') => self.braced(depth),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
        }
    }

    fn digit_follows(&self) -> bool {
        self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
    }

    fn name(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('\'') | Some('"')) {
            return match name.to_ascii_lowercase().as_str() {
                "r" | "u" => {
                    self.pos = start;
                    self.strings()
                }
                _ => Err(self.error_at(start, format!("unsupported string prefix '{name}'"))),
            };
        }

        match name.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::None),
            "set" => {
                self.skip_trivia();
                if self.eat('(') {
                    self.skip_trivia();
                    if self.eat(')') {
                        return Ok(Value::Set(Vec::new()));
                    }
                }
                Err(self.error_at(start, "only the empty 'set()' call is allowed"))
            }
            _ => Err(self.error_at(start, format!("names are not allowed in literals: '{name}'"))),
        }
    }

    /// Comma-separated values up to `close`, trailing comma allowed
    fn sequence(&mut self, close: char, depth: usize) -> Result<Vec<Value>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.expression(depth + 1)?);
            self.skip_trivia();
            if self.eat(',') {
                continue;
            }
            if self.eat(close) {
                return Ok(items);
            }
            return Err(self.error(format!("expected ',' or '{close}'")));
        }
    }

    fn parenthesized(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.pos += 1;
        self.skip_trivia();
        if self.eat(')') {
            return Ok(Value::Tuple(Vec::new()));
        }
        let first = self.expression(depth + 1)?;
        self.skip_trivia();
        if self.eat(')') {
            return Ok(first);
        }
        if !self.eat(',') {
            return Err(self.error("expected ',' or ')'"));
        }
        let mut items = vec![first];
        items.extend(self.sequence(')', depth)?);
        Ok(Value::Tuple(items))
    }

    fn braced(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.pos += 1;
        self.skip_trivia();
        if self.eat('}') {
            return Ok(Value::Map(Vec::new()));
        }
        let first_pos = self.pos;
        let first = self.expression(depth + 1)?;
        self.skip_trivia();

        if self.eat(':') {
            self.hashable(&first, first_pos)?;
            let value = self.expression(depth + 1)?;
            let mut entries = vec![(first, value)];
            loop {
                self.skip_trivia();
                if self.eat('}') {
                    break;
                }
                if !self.eat(',') {
                    return Err(self.error("expected ',' or '}'"));
                }
                self.skip_trivia();
                if self.eat('}') {
                    break;
                }
                let key_pos = self.pos;
                let key = self.expression(depth + 1)?;
                self.hashable(&key, key_pos)?;
                self.skip_trivia();
                if !self.eat(':') {
                    return Err(self.error("expected ':'"));
                }
                let value = self.expression(depth + 1)?;
                entries.push((key, value));
            }
            return Ok(Value::map_from(entries));
        }

        self.hashable(&first, first_pos)?;
        let mut members = vec![first];
        if !self.eat('}') {
            if !self.eat(',') {
                return Err(self.error("expected ',', ':' or '}'"));
            }
            loop {
                self.skip_trivia();
                if self.eat('}') {
                    break;
                }
                let member_pos = self.pos;
                let member = self.expression(depth + 1)?;
                self.hashable(&member, member_pos)?;
                members.push(member);
                self.skip_trivia();
                if self.eat(',') {
                    continue;
                }
                if self.eat('}') {
                    break;
                }
                return Err(self.error("expected ',' or '}'"));
            }
        }
        Ok(Value::set_from(members))
    }

    fn hashable(&self, value: &Value, pos: usize) -> Result<(), LiteralError> {
        if value.is_hashable() {
            Ok(())
        } else {
            Err(self.error_at(pos, format!("unhashable type: '{}'", value.type_name())))
        }
    }

    fn number(&mut self, negative: bool) -> Result<Value, LiteralError> {
        let start = self.pos;
        let radix = match (self.peek(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let value = match radix {
            Some(radix) => {
                self.pos += 2;
                let digits = self.digits(|c| c.is_digit(radix), true)?;
                if digits.is_empty() {
                    return Err(self.error_at(start, "invalid integer literal"));
                }
                let magnitude = i128::from_str_radix(&digits, radix)
                    .map_err(|_| self.error_at(start, "integer literal too large"))?;
                self.signed_int(magnitude, negative, start)?
            }
            None => self.decimal_number(negative, start)?,
        };

        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.') {
            return Err(self.error("invalid number literal"));
        }
        Ok(value)
    }

    fn decimal_number(&mut self, negative: bool, start: usize) -> Result<Value, LiteralError> {
        let integer = self.digits(|c| c.is_ascii_digit(), false)?;
        let mut is_float = false;
        let mut text = integer.clone();

        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            text.push('.');
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                text.push_str(&self.digits(|c| c.is_ascii_digit(), false)?);
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.pos += 1;
            let mut exponent = String::from("e");
            if let Some(sign @ ('+' | '-')) = self.peek() {
                exponent.push(sign);
                self.pos += 1;
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error_at(mark, "invalid float exponent"));
            }
            exponent.push_str(&self.digits(|c| c.is_ascii_digit(), false)?);
            is_float = true;
            text.push_str(&exponent);
        }

        if is_float {
            if text.starts_with('.') {
                text.insert(0, '0');
            }
            let parsed: f64 = text
                .parse()
                .map_err(|_| self.error_at(start, "invalid float literal"))?;
            return Ok(Value::Float(if negative { -parsed } else { parsed }));
        }

        if integer.len() > 1 && integer.starts_with('0') && integer.chars().any(|c| c != '0') {
            return Err(self.error_at(start, "leading zeros in decimal integer literals are not permitted"));
        }
        let magnitude: i128 = integer
            .parse()
            .map_err(|_| self.error_at(start, "integer literal too large"))?;
        self.signed_int(magnitude, negative, start)
    }

    fn signed_int(&self, magnitude: i128, negative: bool, start: usize) -> Result<Value, LiteralError> {
        let signed = if negative { -magnitude } else { magnitude };
        i64::try_from(signed)
            .map(Value::Int)
            .map_err(|_| self.error_at(start, "integer literal too large"))
    }

    /// Reads a digit run with single `_` separators between digits
    fn digits(&mut self, is_digit: impl Fn(char) -> bool, after_prefix: bool) -> Result<String, LiteralError> {
        let mut out = String::new();
        let mut last_was_digit = after_prefix;
        while let Some(c) = self.peek() {
            if is_digit(c) {
                out.push(c);
                last_was_digit = true;
            } else if c == '_' {
                if !last_was_digit || !self.peek_at(1).is_some_and(&is_digit) {
                    return Err(self.error("invalid digit separator"));
                }
                last_was_digit = false;
            } else {
                break;
            }
            self.pos += 1;
        }
        Ok(out)
    }

    /// One or more adjacent string literals, concatenated
    fn strings(&mut self) -> Result<Value, LiteralError> {
        let mut out = self.string()?;
        loop {
            let mark = self.pos;
            self.skip_trivia();
            let next_is_string = match (self.peek(), self.peek_at(1)) {
                (Some('\'' | '"'), _) => true,
                (Some('r' | 'R' | 'u' | 'U'), Some('\'' | '"')) => true,
                _ => false,
            };
            if !next_is_string {
                self.pos = mark;
                return Ok(Value::Str(out));
            }
            out.push_str(&self.string()?);
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let mut raw = false;
        if let Some(prefix @ ('r' | 'R' | 'u' | 'U')) = self.peek() {
            raw = matches!(prefix, 'r' | 'R');
            self.pos += 1;
        }
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a string")),
        };
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut out = String::new();
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => return Err(self.error_at(start, "unterminated string literal")),
            };
            if c == quote {
                if !triple {
                    self.pos += 1;
                    return Ok(out);
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.pos += 3;
                    return Ok(out);
                }
            }
            if c == '\n' && !triple {
                return Err(self.error_at(start, "unterminated string literal"));
            }
            self.pos += 1;
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escaped = match self.peek() {
                Some(e) => e,
                None => return Err(self.error_at(start, "unterminated string literal")),
            };
            self.pos += 1;
            if raw {
                out.push('\\');
                out.push(escaped);
                continue;
            }
            match escaped {
                '\n' => {}
                '\\' => out.push('\\'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'a' => out.push('\u{07}'),
                'b' => out.push('\u{08}'),
                'f' => out.push('\u{0c}'),
                'v' => out.push('\u{0b}'),
                '0'..='7' => {
                    let mut code = escaped.to_digit(8).unwrap_or(0);
                    for _ in 0..2 {
                        match self.peek().and_then(|c| c.to_digit(8)) {
                            Some(d) => {
                                code = code * 8 + d;
                                self.pos += 1;
                            }
                            None => break,
                        }
                    }
                    out.push(self.code_point(code)?);
                }
                'x' => out.push(self.hex_escape(2)?),
                'u' => out.push(self.hex_escape(4)?),
                'U' => out.push(self.hex_escape(8)?),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn hex_escape(&mut self, width: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..width {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("truncated \\x, \\u or \\U escape"))?;
            code = code * 16 + digit;
            self.pos += 1;
        }
        self.code_point(code)
    }

    fn code_point(&self, code: u32) -> Result<char, LiteralError> {
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {code:#x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_literal("42").unwrap(), Value::Int(42));
        assert_eq!(parse_literal("-7").unwrap(), Value::Int(-7));
        assert_eq!(parse_literal("+3.5").unwrap(), Value::Float(3.5));
        assert_eq!(parse_literal(".5").unwrap(), Value::Float(0.5));
        assert_eq!(parse_literal("5.").unwrap(), Value::Float(5.0));
        assert_eq!(parse_literal("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(parse_literal("1_000_000").unwrap(), Value::Int(1_000_000));
        assert_eq!(parse_literal("0xff").unwrap(), Value::Int(255));
        assert_eq!(parse_literal("0o17").unwrap(), Value::Int(15));
        assert_eq!(parse_literal("0b_101").unwrap(), Value::Int(5));
        assert_eq!(parse_literal("True").unwrap(), Value::Bool(true));
        assert_eq!(parse_literal("None").unwrap(), Value::None);
        assert_eq!(
            parse_literal("-9223372036854775808").unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_literal("'a'").unwrap(), Value::from("a"));
        assert_eq!(parse_literal(r#""it's""#).unwrap(), Value::from("it's"));
        assert_eq!(parse_literal(r"'a\nb\t\x41é'").unwrap(), Value::from("a\nb\tAé"));
        assert_eq!(parse_literal(r"r'a\nb'").unwrap(), Value::from("a\\nb"));
        assert_eq!(parse_literal("'a' \"b\" 'c'").unwrap(), Value::from("abc"));
        assert_eq!(parse_literal("'''multi\nline'''").unwrap(), Value::from("multi\nline"));
        assert_eq!(parse_literal(r"'\101'").unwrap(), Value::from("A"));
        assert_eq!(parse_literal(r"'\d'").unwrap(), Value::from("\\d"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            parse_literal("[1, 'a', 2.0, None]").unwrap(),
            list(vec![Value::Int(1), Value::from("a"), Value::Float(2.0), Value::None])
        );
        assert_eq!(parse_literal("[]").unwrap(), list(vec![]));
        assert_eq!(parse_literal("()").unwrap(), Value::Tuple(vec![]));
        assert_eq!(parse_literal("(1,)").unwrap(), Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(parse_literal("(1)").unwrap(), Value::Int(1));
        assert_eq!(parse_literal("{}").unwrap(), Value::Map(vec![]));
        assert_eq!(parse_literal("set()").unwrap(), Value::Set(vec![]));
        assert_eq!(
            parse_literal("{1, 2, 2,}").unwrap(),
            Value::Set(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            parse_literal("{'a': 1, 'b': {'c': [1, 2]}, 'a': 3}").unwrap(),
            Value::map_from([
                (Value::from("a"), Value::Int(3)),
                (
                    Value::from("b"),
                    Value::map_from([(Value::from("c"), Value::from(vec![1_i64, 2]))])
                ),
            ])
        );
        assert_eq!(
            parse_literal("{(1, 2): 'pair'}").unwrap(),
            Value::map_from([(
                Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
                Value::from("pair")
            )])
        );
    }

    #[test]
    fn test_whitespace_and_comments() {
        assert_eq!(parse_literal("  \t[1,\n 2]  \n").unwrap(), Value::from(vec![1_i64, 2]));
        assert_eq!(
            parse_literal("[1, # first\n 2]").unwrap(),
            Value::from(vec![1_i64, 2])
        );
    }

    #[test_case("__import__('os').system('x')" ; "call")]
    #[test_case("os.system" ; "attribute")]
    #[test_case("x" ; "bare name")]
    #[test_case("1 + 2" ; "binary operator")]
    #[test_case("--1" ; "double sign")]
    #[test_case("-'a'" ; "signed string")]
    #[test_case("[1, 2" ; "unclosed list")]
    #[test_case("{1: 2" ; "unclosed dict")]
    #[test_case("{1, 2: 3}" ; "mixed set and dict")]
    #[test_case("{[1]: 2}" ; "unhashable key")]
    #[test_case("{[1], [2]}" ; "unhashable member")]
    #[test_case("[x for x in y]" ; "comprehension")]
    #[test_case("'abc" ; "unterminated string")]
    #[test_case("b'abc'" ; "bytes")]
    #[test_case("f'{x}'" ; "f string")]
    #[test_case("007" ; "leading zeros")]
    #[test_case("1__0" ; "double separator")]
    #[test_case("1j" ; "complex")]
    #[test_case("99999999999999999999" ; "overflow")]
    #[test_case("set([1])" ; "set call with args")]
    #[test_case("" ; "empty")]
    #[test_case("1 2" ; "trailing")]
    fn test_rejects(raw: &str) {
        assert!(parse_literal(raw).is_err(), "{raw} should not parse");
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 2), "]".repeat(MAX_DEPTH + 2));
        let err = parse_literal(&deep).unwrap_err();
        assert!(err.message.contains("too deep"));

        let shallow = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_literal(&shallow).is_ok());
    }

    #[test]
    fn test_error_position_accounts_for_leading_space() {
        let err = parse_literal("  [1, x]").unwrap_err();
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_rendered_values_reparse() {
        for raw in [
            "[1, 'a', 2.5, None, True]",
            "{'a': (1,), 'b': {1, 2}}",
            "('x', ['y', {'z': -3}])",
            "set()",
        ] {
            let value = parse_literal(raw).unwrap();
            assert_eq!(parse_literal(&value.to_string()).unwrap(), value);
        }
    }
}
