use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{BoxError, BoxResult};

pub const VARIANT: &str = "variant";

/// Parsed type descriptor: `name` or `name<arg, ...>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn with_args(name: &str, args: Vec<TypeExpr>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }

    pub fn parse(descriptor: &str) -> BoxResult<Self> {
        Parser::new(descriptor).parse()
    }

    pub fn is_variant(&self) -> bool {
        self.name == VARIANT
    }
}

impl FromStr for TypeExpr {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeExpr::parse(s)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Name(&'a str),
    Open,
    Close,
    Comma,
}

/// Iterative parser; open `name<` frames wait on an explicit stack.
struct Parser<'a> {
    src: &'a str,
    pos: usize,
    open: SmallVec<[TypeExpr; 4]>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            open: SmallVec::new(),
        }
    }

    fn error(&self, position: usize, reason: &'static str) -> BoxError {
        BoxError::InvalidDescriptor {
            descriptor: self.src.to_string(),
            position,
            reason,
        }
    }

    fn next_token(&mut self) -> BoxResult<Option<(usize, Token<'a>)>> {
        let src = self.src;
        let rest = &src[self.pos..];
        let trimmed = rest.trim_start();
        let start = self.pos + (rest.len() - trimmed.len());
        let Some(c) = trimmed.chars().next() else {
            self.pos = self.src.len();
            return Ok(None);
        };
        let token = match c {
            '<' => Token::Open,
            '>' => Token::Close,
            ',' => Token::Comma,
            '*' => Token::Name("*"),
            c if is_name_char(c) => {
                let len = trimmed
                    .find(|c: char| !is_name_char(c))
                    .unwrap_or(trimmed.len());
                self.pos = start + len;
                return Ok(Some((start, Token::Name(&trimmed[..len]))));
            }
            _ => return Err(self.error(start, "unexpected character")),
        };
        self.pos = start + c.len_utf8();
        Ok(Some((start, token)))
    }

    fn parse(mut self) -> BoxResult<TypeExpr> {
        loop {
            let name = match self.next_token()? {
                Some((_, Token::Name(name))) => name,
                Some((at, _)) => return Err(self.error(at, "expected type name")),
                None => return Err(self.error(self.src.len(), "expected type name")),
            };
            let mut done = TypeExpr::new(name);

            let mut after = self.next_token()?;
            if let Some((_, Token::Open)) = after {
                self.open.push(done);
                continue;
            }

            // close finished expressions until a sibling or the end follows
            loop {
                let Some(mut parent) = self.open.pop() else {
                    return match after {
                        None => Ok(done),
                        Some((at, _)) => Err(self.error(at, "trailing input after descriptor")),
                    };
                };
                match after {
                    Some((_, Token::Comma)) => {
                        parent.args.push(done);
                        self.open.push(parent);
                        break;
                    }
                    Some((_, Token::Close)) => {
                        parent.args.push(done);
                        done = parent;
                        after = self.next_token()?;
                    }
                    Some((at, _)) => return Err(self.error(at, "expected ',' or '>'")),
                    None => return Err(self.error(self.src.len(), "missing '>'")),
                }
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_names() {
        assert_eq!(TypeExpr::parse("int").unwrap(), TypeExpr::new("int"));
        assert_eq!(TypeExpr::parse("  *  ").unwrap(), TypeExpr::new("*"));
    }

    #[test]
    fn parses_nested_arguments() {
        let expr = TypeExpr::parse("TypedValue<variant<int, array<string>>>").unwrap();
        assert_eq!(
            expr,
            TypeExpr::with_args(
                "TypedValue",
                vec![TypeExpr::with_args(
                    "variant",
                    vec![
                        TypeExpr::new("int"),
                        TypeExpr::with_args("array", vec![TypeExpr::new("string")]),
                    ]
                )]
            )
        );
        assert!(expr.args[0].is_variant());
    }

    #[test]
    fn displays_canonically() {
        let expr: TypeExpr = "variant<int,string>".parse().unwrap();
        assert_eq!(expr.to_string(), "variant<int, string>");
    }

    #[test]
    fn rejects_malformed_descriptors() {
        for (descriptor, position) in [
            ("", 0),
            ("int<", 4),
            ("int<>", 4),
            ("int<string", 10),
            ("int string", 4),
            ("int>", 3),
            ("a<b,>", 4),
            ("in-t", 2),
        ] {
            match TypeExpr::parse(descriptor) {
                Err(BoxError::InvalidDescriptor { position: at, .. }) => {
                    assert_eq!(at, position, "descriptor {:?}", descriptor)
                }
                other => panic!("unexpected parse of {:?}: {:?}", descriptor, other),
            }
        }
    }
}
