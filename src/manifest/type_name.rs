//! Type-name parsing.
//!
//! Manifests spell type usages as they appear in declarations: `int`,
//! `System.Collections.Generic.List<string>`, `(int x, int y)`, `Point?`,
//! `double[,]`. Parsing yields a syntactic [`TypeName`]; classifying it into a
//! [`TypeRef`](crate::model::TypeRef) is the builder's job.

use std::fmt;

use thiserror::Error;

/// A type name that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed type '{input}': {message} at offset {offset}")]
pub struct TypeNameError {
    pub input: String,
    pub offset: usize,
    pub message: &'static str,
}

/// Parsed shape of a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNameKind {
    /// A possibly dotted name with generic arguments.
    Named { name: String, arguments: Vec<TypeName> },
    /// A tuple with optionally named elements.
    Tuple(Vec<(TypeName, Option<String>)>),
}

/// A parsed type usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub kind: TypeNameKind,
    pub nullable: bool,
    /// 0 for non-arrays.
    pub array_rank: u8,
}

impl TypeName {
    pub fn parse(input: &str) -> Result<Self, TypeNameError> {
        let mut parser = Parser { input, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    /// The dotted name of a named type, `None` for tuples.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeNameKind::Named { name, .. } => Some(name),
            TypeNameKind::Tuple(_) => None,
        }
    }

    pub fn arguments(&self) -> &[TypeName] {
        match &self.kind {
            TypeNameKind::Named { arguments, .. } => arguments,
            TypeNameKind::Tuple(_) => &[],
        }
    }

    /// Whether the name is a plain identifier with no arguments or suffixes.
    pub fn is_simple(&self) -> bool {
        !self.nullable
            && self.array_rank == 0
            && matches!(
                &self.kind,
                TypeNameKind::Named { name, arguments }
                    if arguments.is_empty() && !name.contains('.')
            )
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeNameKind::Named { name, arguments } => {
                f.write_str(name)?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
            }
            TypeNameKind::Tuple(elements) => {
                f.write_str("(")?;
                for (i, (ty, name)) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", ty)?;
                    if let Some(name) = name {
                        write!(f, " {}", name)?;
                    }
                }
                f.write_str(")")?;
            }
        }
        if self.nullable {
            f.write_str("?")?;
        }
        if self.array_rank > 0 {
            f.write_str("[")?;
            for _ in 1..self.array_rank {
                f.write_str(",")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<TypeName, TypeNameError> {
        self.skip_whitespace();
        let kind = if self.check('(') {
            self.advance();
            self.parse_tuple()?
        } else {
            let name = self.parse_dotted_name()?;
            self.skip_whitespace();
            let arguments = if self.check('<') {
                self.advance();
                self.parse_arguments()?
            } else {
                Vec::new()
            };
            TypeNameKind::Named { name, arguments }
        };

        self.skip_whitespace();
        let nullable = if self.check('?') {
            self.advance();
            true
        } else {
            false
        };

        self.skip_whitespace();
        let mut array_rank = 0u8;
        if self.check('[') {
            self.advance();
            array_rank = 1;
            loop {
                self.skip_whitespace();
                if self.check(',') {
                    self.advance();
                    array_rank = array_rank.saturating_add(1);
                } else {
                    break;
                }
            }
            self.consume(']', "expected ']'")?;
            self.skip_whitespace();
            if self.check('[') {
                return Err(self.error("jagged arrays are not supported"));
            }
        }

        Ok(TypeName {
            kind,
            nullable,
            array_rank,
        })
    }

    fn parse_dotted_name(&mut self) -> Result<String, TypeNameError> {
        let mut name = self.parse_identifier()?.to_string();
        loop {
            self.skip_whitespace();
            if !self.check('.') {
                break;
            }
            self.advance();
            self.skip_whitespace();
            name.push('.');
            name.push_str(self.parse_identifier()?);
        }
        Ok(name)
    }

    fn parse_identifier(&mut self) -> Result<&'a str, TypeNameError> {
        let start = self.pos;
        let rest = &self.input[start..];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_alphabetic() || c == '_' || c == '@' => {}
            _ => return Err(self.error("expected identifier")),
        }
        let len = chars
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        Ok(&self.input[start..start + len])
    }

    /// Arguments after `<`, through the closing `>`.
    fn parse_arguments(&mut self) -> Result<Vec<TypeName>, TypeNameError> {
        let mut arguments = vec![self.parse_type()?];
        loop {
            self.skip_whitespace();
            if self.check(',') {
                self.advance();
                arguments.push(self.parse_type()?);
            } else {
                break;
            }
        }
        self.consume('>', "expected '>'")?;
        Ok(arguments)
    }

    /// Elements after `(`, through the closing `)`.
    fn parse_tuple(&mut self) -> Result<TypeNameKind, TypeNameError> {
        let mut elements = Vec::new();
        loop {
            let ty = self.parse_type()?;
            self.skip_whitespace();
            let name = if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
                Some(self.parse_identifier()?.to_string())
            } else {
                None
            };
            elements.push((ty, name));
            self.skip_whitespace();
            if self.check(',') {
                self.advance();
            } else {
                break;
            }
        }
        self.consume(')', "expected ')'")?;
        if elements.len() < 2 {
            return Err(self.error("tuples need at least two elements"));
        }
        Ok(TypeNameKind::Tuple(elements))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn check(&self, expected: char) -> bool {
        self.peek() == Some(expected)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn consume(&mut self, expected: char, message: &'static str) -> Result<(), TypeNameError> {
        self.skip_whitespace();
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error(&self, message: &'static str) -> TypeNameError {
        TypeNameError {
            input: self.input.to_string(),
            offset: self.pos,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeName {
        TypeName {
            kind: TypeNameKind::Named {
                name: name.to_string(),
                arguments: Vec::new(),
            },
            nullable: false,
            array_rank: 0,
        }
    }

    #[test]
    fn test_simple_and_dotted() {
        assert_eq!(TypeName::parse("int").unwrap(), named("int"));
        assert!(TypeName::parse("int").unwrap().is_simple());

        let dotted = TypeName::parse("System.Collections.Generic.List<string>").unwrap();
        assert_eq!(dotted.name(), Some("System.Collections.Generic.List"));
        assert_eq!(dotted.arguments(), &[named("string")]);
        assert!(!dotted.is_simple());
    }

    #[test]
    fn test_nested_generics() {
        let ty = TypeName::parse("Dictionary<string, List<int?>>").unwrap();
        assert_eq!(ty.arguments().len(), 2);
        let inner = &ty.arguments()[1];
        assert_eq!(inner.name(), Some("List"));
        assert!(inner.arguments()[0].nullable);
        assert_eq!(ty.to_string(), "Dictionary<string, List<int?>>");
    }

    #[test]
    fn test_arrays_and_nullable() {
        let grid = TypeName::parse("double[,]").unwrap();
        assert_eq!(grid.array_rank, 2);
        let nullable_array = TypeName::parse("Point?[]").unwrap();
        assert!(nullable_array.nullable);
        assert_eq!(nullable_array.array_rank, 1);
        assert_eq!(nullable_array.to_string(), "Point?[]");
    }

    #[test]
    fn test_tuples() {
        let ty = TypeName::parse("(int x, string)").unwrap();
        match &ty.kind {
            TypeNameKind::Tuple(elements) => {
                assert_eq!(elements.len(), 2);
                assert_eq!(elements[0].1.as_deref(), Some("x"));
                assert_eq!(elements[1].1, None);
            }
            other => panic!("expected tuple, got {:?}", other),
        }
        assert_eq!(ty.name(), None);
        assert_eq!(ty.to_string(), "(int x, string)");
    }

    #[test]
    fn test_malformed() {
        for input in ["", "List<", "List<int", "(int)", "int[", "3D", "int[][]", "Map<int> x"] {
            assert!(TypeName::parse(input).is_err(), "{input} should fail");
        }
        let err = TypeName::parse("List<int").unwrap_err();
        assert_eq!(err.message, "expected '>'");
        assert_eq!(err.offset, 8);
    }
}
