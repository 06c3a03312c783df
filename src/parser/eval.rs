//! Safe evaluation of data literals
//!
//! This module evaluates untrusted text as a restricted data-literal grammar:
//! dicts, lists, tuples, quoted strings, numbers, `True`, `False` and `None`.
//! Nothing else parses — identifiers, function calls, attribute access and
//! operators are all rejected — so uploaded schema text can never execute
//! anything. The result is an ordinary `serde_json::Value` (tuples become
//! arrays, `None` becomes null).

use crate::error::{ModelForgeError, Result};
use serde_json::{Map, Value};

/// Recursion limit for nested containers in untrusted input
const MAX_DEPTH: usize = 128;

/// Evaluate a complete data-literal expression.
///
/// The whole input must be one literal; trailing non-whitespace content is an
/// error.
pub(crate) fn evaluate(input: &str) -> Result<Value> {
    let chars: Vec<char> = input.chars().collect();
    let mut parser = LiteralParser { chars, pos: 0 };
    parser.skip_whitespace();
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("trailing characters after literal"));
    }
    Ok(value)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn error(&self, message: &str) -> ModelForgeError {
        ModelForgeError::Literal(format!("{} at offset {}", message, self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal nests too deeply"));
        }
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.parse_dict(depth),
            Some('[') => self.parse_sequence(depth, '[', ']'),
            Some('(') => self.parse_sequence(depth, '(', ')'),
            Some('"') | Some('\'') => Ok(Value::String(self.parse_string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_alphabetic() => self.parse_keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self, depth: usize) -> Result<Value> {
        self.bump(); // {
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Object(map));
        }
        loop {
            let key_value = self.parse_value(depth + 1)?;
            self.skip_whitespace();
            match self.peek() {
                Some(':') => {
                    self.bump();
                }
                // A `{expr, ...}` shape is a set literal, which is outside
                // the supported grammar.
                Some(',') | Some('}') => {
                    return Err(self.error("set literals are not supported"));
                }
                _ => return Err(self.error("expected ':' in dict entry")),
            }
            let key = match key_value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(Value::Object(map));
                    }
                }
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected ',' or '}' in dict")),
            }
        }
    }

    fn parse_sequence(&mut self, depth: usize, open: char, close: char) -> Result<Value> {
        debug_assert_eq!(self.peek(), Some(open));
        self.bump();
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {
                    self.skip_whitespace();
                    if self.peek() == Some(close) {
                        self.bump();
                        return Ok(Value::Array(items));
                    }
                }
                Some(c) if c == close => return Ok(Value::Array(items)),
                _ => return Err(self.error("expected ',' or closing bracket")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let quote = self.bump().expect("caller checked the opening quote");
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let digit = self
                                .bump()
                                .and_then(|c| c.to_digit(16))
                                .ok_or_else(|| self.error("invalid unicode escape"))?;
                            code = code * 16 + digit;
                        }
                        out.push(
                            char::from_u32(code)
                                .ok_or_else(|| self.error("invalid unicode escape"))?,
                        );
                    }
                    // Python leaves unknown escapes in place
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        let mut saw_digit = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    saw_digit = true;
                    self.bump();
                }
                '.' => {
                    self.bump();
                }
                'e' | 'E' => {
                    self.bump();
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
        if !saw_digit {
            return Err(self.error("invalid number"));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        let float: f64 = text
            .parse()
            .map_err(|_| self.error("invalid number"))?;
        serde_json::Number::from_f64(float)
            .map(Value::Number)
            .ok_or_else(|| self.error("non-finite number"))
    }

    fn parse_keyword(&mut self) -> Result<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => Err(self.error("identifiers are not allowed in literals")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(evaluate("42").unwrap(), json!(42));
        assert_eq!(evaluate("-7").unwrap(), json!(-7));
        assert_eq!(evaluate("3.5").unwrap(), json!(3.5));
        assert_eq!(evaluate("True").unwrap(), json!(true));
        assert_eq!(evaluate("False").unwrap(), json!(false));
        assert_eq!(evaluate("None").unwrap(), Value::Null);
        assert_eq!(evaluate("'hi'").unwrap(), json!("hi"));
        assert_eq!(evaluate("\"hi\"").unwrap(), json!("hi"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(evaluate("[1, 2, 3]").unwrap(), json!([1, 2, 3]));
        assert_eq!(evaluate("(1, 'a')").unwrap(), json!([1, "a"]));
        assert_eq!(
            evaluate("{'name': 'user', 'fields': []}").unwrap(),
            json!({"name": "user", "fields": []})
        );
        assert_eq!(evaluate("{}").unwrap(), json!({}));
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(evaluate("[1, 2,]").unwrap(), json!([1, 2]));
        assert_eq!(evaluate("{'a': 1,}").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_nested_and_unicode() {
        let value = evaluate("{'copy_rule': '关闭', 'items': [{'x': (1, 2)}]}").unwrap();
        assert_eq!(value["copy_rule"], json!("关闭"));
        assert_eq!(value["items"][0]["x"], json!([1, 2]));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(evaluate(r#"'a\'b'"#).unwrap(), json!("a'b"));
        assert_eq!(evaluate(r#""line\nbreak""#).unwrap(), json!("line\nbreak"));
        assert_eq!(evaluate(r#""A""#).unwrap(), json!("A"));
    }

    #[test]
    fn test_rejects_executable_constructs() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("datetime.now()").is_err());
        assert!(evaluate("{'a': open('/etc/passwd')}").is_err());
        assert!(evaluate("1 + 2").is_err());
        assert!(evaluate("lambda: 1").is_err());
    }

    #[test]
    fn test_rejects_sets() {
        assert!(evaluate("{'开启'}").is_err());
        assert!(evaluate("{1, 2}").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(evaluate("{'a': }").is_err());
        assert!(evaluate("[1, 2").is_err());
        assert!(evaluate("'unterminated").is_err());
        assert!(evaluate("{'a': 1} extra").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(500) + &"]".repeat(500);
        assert!(evaluate(&deep).is_err());
    }
}
