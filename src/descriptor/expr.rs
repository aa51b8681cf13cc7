//! Type expression parser
//!
//! Annotations are written as type expressions:
//!
//! ```text
//! int
//! list[str]
//! tuple[int, ...]
//! dict[str, int | str]
//! Optional[float]
//! Union[list[int], dict[str, int]]
//! Endpoint                       (a registered type)
//! ```

use thiserror::Error;

use super::registry::TypeRegistry;
use super::types::TypeDescriptor;

/// A type expression could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position} in '{expression}'")]
pub struct TypeExprError {
    pub expression: String,
    pub position: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Open,
    Close,
    Comma,
    Pipe,
    Ellipsis,
    End,
}

enum Argument {
    Type(TypeDescriptor),
    Ellipsis,
}

impl TypeDescriptor {
    /// Parses a type expression, resolving non-builtin names in `registry`
    pub fn parse(expression: &str, registry: &TypeRegistry) -> Result<Self, TypeExprError> {
        let mut parser = ExprParser::new(expression, registry)?;
        let descriptor = parser.union()?;
        match parser.peek() {
            Token::End => Ok(descriptor),
            other => Err(parser.error(format!("unexpected {}", describe(other)))),
        }
    }
}

struct ExprParser<'a> {
    expression: &'a str,
    registry: &'a TypeRegistry,
    tokens: Vec<(usize, Token)>,
    cursor: usize,
}

impl<'a> ExprParser<'a> {
    fn new(expression: &'a str, registry: &'a TypeRegistry) -> Result<Self, TypeExprError> {
        let tokens = tokenize(expression)?;
        Ok(Self {
            expression,
            registry,
            tokens,
            cursor: 0,
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor].1
    }

    fn position(&self) -> usize {
        self.tokens[self.cursor].0
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.cursor].1.clone();
        if token != Token::End {
            self.cursor += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> TypeExprError {
        TypeExprError {
            expression: self.expression.to_string(),
            position: self.position(),
            message: message.into(),
        }
    }

    fn union(&mut self) -> Result<TypeDescriptor, TypeExprError> {
        let mut alternatives = vec![self.term()?];
        while *self.peek() == Token::Pipe {
            self.advance();
            alternatives.push(self.term()?);
        }
        TypeDescriptor::union(alternatives).ok_or_else(|| self.error("empty union"))
    }

    fn term(&mut self) -> Result<TypeDescriptor, TypeExprError> {
        let start = self.position();
        let name = match self.advance() {
            Token::Name(name) => name,
            other => {
                self.cursor = self.cursor.saturating_sub(usize::from(other != Token::End));
                return Err(self.error(format!("expected a type name, found {}", describe(&other))));
            }
        };
        let arguments = if *self.peek() == Token::Open {
            self.advance();
            Some(self.arguments()?)
        } else {
            None
        };
        self.resolve(&name, arguments, start)
    }

    fn arguments(&mut self) -> Result<Vec<Argument>, TypeExprError> {
        let mut arguments = Vec::new();
        loop {
            if *self.peek() == Token::Ellipsis {
                self.advance();
                arguments.push(Argument::Ellipsis);
            } else {
                arguments.push(Argument::Type(self.union()?));
            }
            match self.advance() {
                Token::Comma if *self.peek() == Token::Close => {
                    self.advance();
                    return Ok(arguments);
                }
                Token::Comma => continue,
                Token::Close => return Ok(arguments),
                other => {
                    self.cursor = self.cursor.saturating_sub(usize::from(other != Token::End));
                    return Err(self.error(format!("expected ',' or ']', found {}", describe(&other))));
                }
            }
        }
    }

    fn resolve(
        &self,
        name: &str,
        arguments: Option<Vec<Argument>>,
        start: usize,
    ) -> Result<TypeDescriptor, TypeExprError> {
        let fail = |message: String| TypeExprError {
            expression: self.expression.to_string(),
            position: start,
            message,
        };
        let bare = name.strip_prefix("typing.").unwrap_or(name);

        let scalar = match bare {
            "bool" => Some(TypeDescriptor::bool()),
            "int" => Some(TypeDescriptor::int()),
            "float" => Some(TypeDescriptor::float()),
            "str" => Some(TypeDescriptor::str()),
            "Decimal" | "decimal" | "decimal.Decimal" => Some(TypeDescriptor::decimal()),
            "None" | "NoneType" => Some(TypeDescriptor::none()),
            _ => None,
        };
        if let Some(scalar) = scalar {
            return match arguments {
                None => Ok(scalar),
                Some(_) => Err(fail(format!("'{bare}' does not take type arguments"))),
            };
        }

        match bare {
            "list" | "List" | "set" | "Set" | "tuple" | "Tuple" | "dict" | "Dict" => {
                let arguments = match arguments {
                    None => {
                        return Ok(match bare.to_ascii_lowercase().as_str() {
                            "list" => TypeDescriptor::list(None),
                            "set" => TypeDescriptor::set(None),
                            "tuple" => TypeDescriptor::tuple(None),
                            _ => TypeDescriptor::map(None),
                        })
                    }
                    Some(arguments) => arguments,
                };
                match (bare.to_ascii_lowercase().as_str(), arguments.as_slice()) {
                    ("list", [Argument::Type(element)]) => Ok(TypeDescriptor::list(Some(element.clone()))),
                    ("set", [Argument::Type(element)]) => Ok(TypeDescriptor::set(Some(element.clone()))),
                    ("tuple", [Argument::Type(element)])
                    | ("tuple", [Argument::Type(element), Argument::Ellipsis]) => {
                        Ok(TypeDescriptor::tuple(Some(element.clone())))
                    }
                    ("dict", [Argument::Type(key), Argument::Type(value)]) => {
                        Ok(TypeDescriptor::map(Some((key.clone(), value.clone()))))
                    }
                    ("tuple", _) => Err(fail(
                        "'tuple' takes one element type, optionally followed by '...'".to_string(),
                    )),
                    ("dict", _) => Err(fail("'dict' takes a key type and a value type".to_string())),
                    (shape, _) => Err(fail(format!("'{shape}' takes exactly one element type"))),
                }
            }
            "Union" | "Optional" => {
                let arguments = arguments
                    .ok_or_else(|| fail(format!("'{bare}' requires type arguments")))?;
                let mut alternatives = Vec::with_capacity(arguments.len() + 1);
                for argument in arguments {
                    match argument {
                        Argument::Type(descriptor) => alternatives.push(descriptor),
                        Argument::Ellipsis => {
                            return Err(fail(format!("'...' is not allowed in '{bare}'")))
                        }
                    }
                }
                if bare == "Optional" {
                    if alternatives.len() != 1 {
                        return Err(fail("'Optional' takes exactly one type".to_string()));
                    }
                    alternatives.push(TypeDescriptor::none());
                }
                TypeDescriptor::union(alternatives).ok_or_else(|| fail("empty union".to_string()))
            }
            _ => {
                let descriptor = self
                    .registry
                    .resolve(name)
                    .ok_or_else(|| fail(format!("unknown type '{name}'")))?;
                match arguments {
                    None => Ok(descriptor),
                    Some(_) => Err(fail(format!("'{name}' does not take type arguments"))),
                }
            }
        }
    }
}

fn tokenize(expression: &str) -> Result<Vec<(usize, Token)>, TypeExprError> {
    let mut tokens = Vec::new();
    let chars: Vec<(usize, char)> = expression.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        let (position, c) = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '[' => tokens.push((position, Token::Open)),
            ']' => tokens.push((position, Token::Close)),
            ',' => tokens.push((position, Token::Comma)),
            '|' => tokens.push((position, Token::Pipe)),
            '.' if expression[position..].starts_with("...") => {
                tokens.push((position, Token::Ellipsis));
                i += 3;
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = i;
                while end < chars.len()
                    && (chars[end].1.is_alphanumeric() || chars[end].1 == '_' || chars[end].1 == '.')
                {
                    end += 1;
                }
                let stop = chars.get(end).map_or(expression.len(), |(p, _)| *p);
                tokens.push((position, Token::Name(expression[position..stop].to_string())));
                i = end;
                continue;
            }
            other => {
                return Err(TypeExprError {
                    expression: expression.to_string(),
                    position,
                    message: format!("unexpected character '{other}'"),
                })
            }
        }
        i += 1;
    }
    tokens.push((expression.len(), Token::End));
    Ok(tokens)
}

fn describe(token: &Token) -> String {
    match token {
        Token::Name(name) => format!("'{name}'"),
        Token::Open => "'['".to_string(),
        Token::Close => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Pipe => "'|'".to_string(),
        Token::Ellipsis => "'...'".to_string(),
        Token::End => "end of input".to_string(),
    }
}
