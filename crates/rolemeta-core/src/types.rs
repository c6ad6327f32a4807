//! Type expressions for declared field types.
//!
//! Catalogs declare each field's value type in a small generic notation:
//!
//! ```text
//! Expression                 named type
//! List<Statement>            parameterized type
//! Map<String, Expression>    multiple arguments
//! ? / ? extends T / ? super T  wildcards
//! T                          type variable (declared in `type_params`)
//! int, boolean, ...          primitives
//! Object                     the universal top type
//! ```

use std::fmt;
use std::ops::Range;

use logos::Logos;

/// Primitive value types. Boxing maps each to its reference-type name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "char" => Self::Char,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Reference-type name of the boxed primitive.
    pub fn boxed_name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Char => "Character",
            Self::Short => "Short",
            Self::Int => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }
}

/// Bound of a wildcard type argument.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

impl WildcardBound {
    pub fn bounding_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Unbounded => None,
            Self::Extends(t) | Self::Super(t) => Some(t),
        }
    }
}

/// A declared type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeRef {
    /// Nominal type, possibly parameterized.
    Named { name: String, args: Vec<TypeRef> },
    Primitive(Primitive),
    /// Unresolved type variable of the declaring node type.
    Variable(String),
    Wildcard(WildcardBound),
    /// Universal top type.
    Top,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    pub fn unbounded_wildcard() -> Self {
        Self::Wildcard(WildcardBound::Unbounded)
    }

    pub fn wildcard_extends(bound: TypeRef) -> Self {
        Self::Wildcard(WildcardBound::Extends(Box::new(bound)))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Type arguments of a parameterized type; empty for everything else.
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            Self::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// Nominal name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Replace a primitive by its reference type. Identity for other types.
    pub fn boxed(self) -> Self {
        match self {
            Self::Primitive(p) => Self::named(p.boxed_name()),
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => {
                f.write_str(name)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Primitive(p) => f.write_str(p.keyword()),
            Self::Variable(name) => f.write_str(name),
            Self::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            Self::Wildcard(WildcardBound::Extends(t)) => write!(f, "? extends {t}"),
            Self::Wildcard(WildcardBound::Super(t)) => write!(f, "? super {t}"),
            Self::Top => f.write_str(TOP_TYPE_NAME),
        }
    }
}

/// Spelling of the top type in type expressions.
pub const TOP_TYPE_NAME: &str = "Object";

/// Malformed type expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {span:?}")]
pub struct TypeSyntaxError {
    pub message: String,
    pub span: Range<usize>,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum Token<'src> {
    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token(",")]
    Comma,

    #[token("?")]
    Question,

    #[token("extends")]
    Extends,

    #[token("super")]
    Super,

    /// Possibly qualified identifier. Defined after keywords so they take precedence.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice())]
    Ident(&'src str),
}

struct Parser<'src, 'p> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    input: &'src str,
    type_params: &'p [String],
}

impl<'src, 'p> Parser<'src, 'p> {
    fn new(input: &'src str, type_params: &'p [String]) -> Result<Self, TypeSyntaxError> {
        let mut tokens = Vec::new();
        for (result, span) in Token::lexer(input).spanned() {
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(_) => {
                    return Err(TypeSyntaxError {
                        message: format!("unexpected character: {:?}", &input[span.clone()]),
                        span,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            input,
            type_params,
        })
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or(self.input.len()..self.input.len())
    }

    fn error(&self, message: impl Into<String>) -> TypeSyntaxError {
        TypeSyntaxError {
            message: message.into(),
            span: self.current_span(),
        }
    }

    fn expect(&mut self, expected: Token<'src>) -> Result<(), TypeSyntaxError> {
        let span = self.current_span();
        match self.advance() {
            Some(t) if std::mem::discriminant(&t) == std::mem::discriminant(&expected) => Ok(()),
            Some(t) => Err(TypeSyntaxError {
                message: format!("expected {expected:?}, got {t:?}"),
                span,
            }),
            None => Err(TypeSyntaxError {
                message: format!("expected {expected:?}, got EOF"),
                span,
            }),
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeSyntaxError> {
        match self.peek() {
            Some(Token::Question) => self.parse_wildcard(),
            Some(Token::Ident(_)) => self.parse_named(),
            _ => Err(self.error("expected type")),
        }
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, TypeSyntaxError> {
        self.expect(Token::Question)?;
        let bound = match self.peek() {
            Some(Token::Extends) => {
                self.advance();
                WildcardBound::Extends(Box::new(self.parse_named()?))
            }
            Some(Token::Super) => {
                self.advance();
                WildcardBound::Super(Box::new(self.parse_named()?))
            }
            _ => WildcardBound::Unbounded,
        };
        Ok(TypeRef::Wildcard(bound))
    }

    fn parse_named(&mut self) -> Result<TypeRef, TypeSyntaxError> {
        let span = self.current_span();
        let Some(Token::Ident(name)) = self.advance() else {
            return Err(TypeSyntaxError {
                message: "expected type name".to_string(),
                span,
            });
        };

        if self.type_params.iter().any(|p| p == name) {
            return Ok(TypeRef::Variable(name.to_string()));
        }
        if let Some(p) = Primitive::from_keyword(name) {
            return Ok(TypeRef::Primitive(p));
        }
        if name == TOP_TYPE_NAME {
            return Ok(TypeRef::Top);
        }

        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::LAngle)) {
            self.advance();
            loop {
                args.push(self.parse_type()?);
                match self.peek() {
                    Some(Token::Comma) => {
                        self.advance();
                    }
                    Some(Token::RAngle) => {
                        self.advance();
                        break;
                    }
                    _ => return Err(self.error("expected ',' or '>'")),
                }
            }
        }

        Ok(TypeRef::Named {
            name: name.to_string(),
            args,
        })
    }
}

/// Parse a type expression.
///
/// Identifiers listed in `type_params` resolve to type variables.
pub fn parse_type(input: &str, type_params: &[String]) -> Result<TypeRef, TypeSyntaxError> {
    let mut parser = Parser::new(input, type_params)?;
    let ty = parser.parse_type()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}
