// parse.rs — Tokenizer and recursive-descent parser for matcher text.
//
// Grammar (lowest precedence first):
//
//   expr    := and ( "or" and )*
//   and     := unary ( "and" unary )*
//   unary   := "not" unary | "(" expr ")" | compare
//   compare := field ( "==" | "!=" | "contains" | "starts_with" | "ends_with" ) string
//            | field "in" "[" string ( "," string )* "]"
//   field   := "tool" | "input" "." ident
//
// String literals are double-quoted and support \" \\ \n \t escapes.

use crate::error::ParseError;
use crate::expr::{Cmp, Expr, Field};

/// Parse matcher source into an [`Expr`].
///
/// The whole input must be consumed; trailing tokens are an error rather
/// than being silently ignored.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::TrailingInput {
            found: token.kind.describe(),
            offset: token.offset,
        });
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokKind {
    Ident(String),
    Str(String),
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    EqEq,
    NotEq,
}

impl TokKind {
    fn describe(&self) -> String {
        match self {
            TokKind::Ident(name) => format!("'{}'", name),
            TokKind::Str(_) => "string literal".to_string(),
            TokKind::Dot => "'.'".to_string(),
            TokKind::LParen => "'('".to_string(),
            TokKind::RParen => "')'".to_string(),
            TokKind::LBracket => "'['".to_string(),
            TokKind::RBracket => "']'".to_string(),
            TokKind::Comma => "','".to_string(),
            TokKind::EqEq => "'=='".to_string(),
            TokKind::NotEq => "'!='".to_string(),
        }
    }
}

#[derive(Debug)]
struct Token {
    kind: TokKind,
    offset: usize,
}

fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token { kind: TokKind::LParen, offset });
            }
            ')' => {
                chars.next();
                tokens.push(Token { kind: TokKind::RParen, offset });
            }
            '[' => {
                chars.next();
                tokens.push(Token { kind: TokKind::LBracket, offset });
            }
            ']' => {
                chars.next();
                tokens.push(Token { kind: TokKind::RBracket, offset });
            }
            ',' => {
                chars.next();
                tokens.push(Token { kind: TokKind::Comma, offset });
            }
            '.' => {
                chars.next();
                tokens.push(Token { kind: TokKind::Dot, offset });
            }
            '=' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        tokens.push(Token { kind: TokKind::EqEq, offset });
                    }
                    _ => return Err(ParseError::UnexpectedChar { ch: '=', offset }),
                }
            }
            '!' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        tokens.push(Token { kind: TokKind::NotEq, offset });
                    }
                    _ => return Err(ParseError::UnexpectedChar { ch: '!', offset }),
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((esc_offset, '\\')) => match chars.next() {
                            Some((_, '"')) => value.push('"'),
                            Some((_, '\\')) => value.push('\\'),
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, other)) => {
                                return Err(ParseError::InvalidEscape {
                                    ch: other,
                                    offset: esc_offset,
                                })
                            }
                            None => return Err(ParseError::UnterminatedString { offset }),
                        },
                        Some((_, c)) => value.push(c),
                        None => return Err(ParseError::UnterminatedString { offset }),
                    }
                }
                tokens.push(Token {
                    kind: TokKind::Str(value),
                    offset,
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokKind::Ident(name),
                    offset,
                });
            }
            other => return Err(ParseError::UnexpectedChar { ch: other, offset }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// True (and consumes) if the next token is the given identifier.
    fn eat_ident(&mut self, name: &str) -> bool {
        match self.peek() {
            Some(Token {
                kind: TokKind::Ident(found),
                ..
            }) if found == name => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: TokKind, expected: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected,
                found: token.kind.describe(),
                offset: token.offset,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and()?;
        while self.eat_ident("or") {
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while self.eat_ident("and") {
            let rhs = self.unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat_ident("not") {
            let inner = self.unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if matches!(
            self.peek(),
            Some(Token {
                kind: TokKind::LParen,
                ..
            })
        ) {
            self.pos += 1;
            let inner = self.expr()?;
            self.expect(TokKind::RParen, "')'")?;
            return Ok(inner);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let field = self.field()?;

        let (op_kind, op_offset) = match self.next() {
            Some(token) => (token.kind.clone(), token.offset),
            None => return Err(ParseError::UnexpectedEnd { expected: "comparison operator" }),
        };

        let op = match &op_kind {
            TokKind::EqEq => Cmp::Eq,
            TokKind::NotEq => Cmp::Ne,
            TokKind::Ident(name) if name == "contains" => Cmp::Contains,
            TokKind::Ident(name) if name == "starts_with" => Cmp::StartsWith,
            TokKind::Ident(name) if name == "ends_with" => Cmp::EndsWith,
            TokKind::Ident(name) if name == "in" => {
                return self.membership(field);
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "comparison operator",
                    found: other.describe(),
                    offset: op_offset,
                })
            }
        };

        let value = self.string_literal()?;
        Ok(Expr::Compare { field, op, value })
    }

    /// The bracketed list after `field in`.
    fn membership(&mut self, field: Field) -> Result<Expr, ParseError> {
        self.expect(TokKind::LBracket, "'['")?;
        let mut values = vec![self.string_literal()?];
        loop {
            match self.peek() {
                Some(Token {
                    kind: TokKind::Comma,
                    ..
                }) => {
                    self.pos += 1;
                    values.push(self.string_literal()?);
                }
                _ => break,
            }
        }
        self.expect(TokKind::RBracket, "']'")?;
        Ok(Expr::In { field, values })
    }

    fn field(&mut self) -> Result<Field, ParseError> {
        match self.next() {
            Some(Token {
                kind: TokKind::Ident(name),
                offset,
            }) => {
                let name = name.clone();
                let offset = *offset;
                match name.as_str() {
                    "tool" => Ok(Field::Tool),
                    "input" => {
                        self.expect(TokKind::Dot, "'.' after 'input'")?;
                        match self.next() {
                            Some(Token {
                                kind: TokKind::Ident(key),
                                ..
                            }) => Ok(Field::Input(key.clone())),
                            Some(token) => Err(ParseError::UnexpectedToken {
                                expected: "input parameter name",
                                found: token.kind.describe(),
                                offset: token.offset,
                            }),
                            None => Err(ParseError::UnexpectedEnd {
                                expected: "input parameter name",
                            }),
                        }
                    }
                    _ => Err(ParseError::UnexpectedToken {
                        expected: "'tool' or 'input.<param>'",
                        found: format!("'{}'", name),
                        offset,
                    }),
                }
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: "'tool' or 'input.<param>'",
                found: token.kind.describe(),
                offset: token.offset,
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "'tool' or 'input.<param>'",
            }),
        }
    }

    fn string_literal(&mut self) -> Result<String, ParseError> {
        match self.next() {
            Some(Token {
                kind: TokKind::Str(value),
                ..
            }) => Ok(value.clone()),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: "string literal",
                found: token.kind.describe(),
                offset: token.offset,
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "string literal",
            }),
        }
    }
}
