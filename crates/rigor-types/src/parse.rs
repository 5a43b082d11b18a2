//! Annotation parser
//!
//! Grammar:
//!
//! ```text
//! spec  := term ('|' term)*
//! term  := IDENT ('[' args ']')?
//! args  := spec (',' spec)* (',' '...')?
//! ```
//!
//! Keywords: `int float str bool bytes any None list set dict tuple
//! optional union const final`. Capitalized typing-style spellings
//! (`List`, `Optional`, `Final`, ...) are accepted too. Any other identifier
//! is a class reference.

use crate::error::TypeError;
use crate::lexer::{tokenize, Spanned, Token};
use crate::spec::{ContainerKind, PrimitiveType, TypeSpec};

/// Parse annotation text into a [`TypeSpec`]
pub fn parse_spec(source: &str) -> Result<TypeSpec, TypeError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(TypeError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let spec = parser.parse_union()?;

    if let Some(extra) = parser.peek() {
        return Err(TypeError::UnexpectedToken {
            found: extra.token.to_string(),
            expected: "end of annotation",
            offset: extra.offset,
        });
    }

    Ok(spec)
}

struct Parser<'s> {
    tokens: Vec<Spanned<'s>>,
    pos: usize,
}

/// Parsed bracket arguments
struct TypeArgs {
    specs: Vec<TypeSpec>,
    variadic: bool,
}

impl<'s> Parser<'s> {
    fn peek(&self) -> Option<Spanned<'s>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Spanned<'s>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: Token<'_>) -> bool {
        match self.peek() {
            Some(spanned) if spanned.token == expected => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, expected: Token<'_>, what: &'static str) -> Result<(), TypeError> {
        match self.bump() {
            Some(spanned) if spanned.token == expected => Ok(()),
            Some(spanned) => Err(TypeError::UnexpectedToken {
                found: spanned.token.to_string(),
                expected: what,
                offset: spanned.offset,
            }),
            None => Err(TypeError::UnexpectedEnd { expected: what }),
        }
    }

    fn parse_union(&mut self) -> Result<TypeSpec, TypeError> {
        let mut alternatives = Vec::new();
        loop {
            match self.parse_term()? {
                TypeSpec::Union(nested) => alternatives.extend(nested),
                single => alternatives.push(single),
            }
            if !self.eat(Token::Pipe) {
                break;
            }
        }

        if alternatives.len() == 1 {
            Ok(alternatives.remove(0))
        } else {
            Ok(TypeSpec::Union(alternatives))
        }
    }

    fn parse_term(&mut self) -> Result<TypeSpec, TypeError> {
        let (name, offset) = match self.bump() {
            Some(Spanned {
                token: Token::Ident(name),
                offset,
            }) => (name, offset),
            Some(other) => {
                return Err(TypeError::UnexpectedToken {
                    found: other.token.to_string(),
                    expected: "type name",
                    offset: other.offset,
                })
            }
            None => return Err(TypeError::UnexpectedEnd { expected: "type name" }),
        };

        let args = if self.eat(Token::LBracket) {
            Some(self.parse_args()?)
        } else {
            None
        };

        build_term(name, offset, args)
    }

    fn parse_args(&mut self) -> Result<TypeArgs, TypeError> {
        let mut specs = vec![self.parse_union()?];
        let mut variadic = false;

        while self.eat(Token::Comma) {
            if self.eat(Token::Ellipsis) {
                variadic = true;
                break;
            }
            specs.push(self.parse_union()?);
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(TypeArgs { specs, variadic })
    }
}

fn build_term(name: &str, offset: usize, args: Option<TypeArgs>) -> Result<TypeSpec, TypeError> {
    let primitive = match name {
        "int" | "Int" => Some(PrimitiveType::Int),
        "float" | "Float" => Some(PrimitiveType::Float),
        "str" | "Str" => Some(PrimitiveType::Str),
        "bool" | "Bool" => Some(PrimitiveType::Bool),
        "bytes" | "Bytes" => Some(PrimitiveType::Bytes),
        _ => None,
    };
    if let Some(primitive) = primitive {
        return no_args(name, args).map(|_| TypeSpec::Primitive(primitive));
    }

    let container = match name {
        "list" | "List" => Some(ContainerKind::List),
        "set" | "Set" => Some(ContainerKind::Set),
        "dict" | "Dict" => Some(ContainerKind::Dict),
        "tuple" | "Tuple" => Some(ContainerKind::Tuple),
        _ => None,
    };
    if let Some(base) = container {
        return build_container(name, base, args, offset);
    }

    match name {
        "None" | "NoReturn" => no_args(name, args).map(|_| TypeSpec::NoValue),
        "any" | "Any" => no_args(name, args).map(|_| TypeSpec::Any),
        "optional" | "Optional" => {
            let inner = exactly_one(name, args, offset)?;
            Ok(TypeSpec::optional(inner))
        }
        "const" | "Const" | "final" | "Final" => {
            let inner = exactly_one(name, args, offset)?;
            Ok(TypeSpec::constant(inner))
        }
        "union" | "Union" => {
            let args = plain_args(name, args, offset)?;
            Ok(TypeSpec::Union(args))
        }
        _ => no_args(name, args).map(|_| TypeSpec::Class(name.to_string())),
    }
}

fn no_args(name: &str, args: Option<TypeArgs>) -> Result<(), TypeError> {
    match args {
        None => Ok(()),
        Some(_) => Err(TypeError::NotGeneric {
            name: name.to_string(),
        }),
    }
}

fn plain_args(name: &str, args: Option<TypeArgs>, offset: usize) -> Result<Vec<TypeSpec>, TypeError> {
    match args {
        None => Err(TypeError::InvalidTypeArgCount {
            name: name.to_string(),
            expected: 1,
            actual: 0,
        }),
        Some(TypeArgs { variadic: true, .. }) => Err(TypeError::UnexpectedToken {
            found: "...".to_string(),
            expected: "type name",
            offset,
        }),
        Some(TypeArgs { specs, .. }) => Ok(specs),
    }
}

fn exactly_one(name: &str, args: Option<TypeArgs>, offset: usize) -> Result<TypeSpec, TypeError> {
    let mut specs = plain_args(name, args, offset)?;
    if specs.len() != 1 {
        return Err(TypeError::InvalidTypeArgCount {
            name: name.to_string(),
            expected: 1,
            actual: specs.len(),
        });
    }
    Ok(specs.remove(0))
}

fn build_container(
    name: &str,
    base: ContainerKind,
    args: Option<TypeArgs>,
    offset: usize,
) -> Result<TypeSpec, TypeError> {
    let Some(TypeArgs { specs, variadic }) = args else {
        return Ok(TypeSpec::Generic { base, args: vec![] });
    };

    let base = match (base, variadic) {
        (ContainerKind::Tuple, true) => ContainerKind::VarTuple,
        (_, true) => {
            return Err(TypeError::UnexpectedToken {
                found: "...".to_string(),
                expected: "type name",
                offset,
            })
        }
        (base, false) => base,
    };

    if let Some(expected) = base.arity() {
        if specs.len() != expected {
            return Err(TypeError::InvalidTypeArgCount {
                name: name.to_string(),
                expected,
                actual: specs.len(),
            });
        }
    }

    Ok(TypeSpec::Generic { base, args: specs })
}
