use crate::errors::DomError;

use super::{Axis, CmpOp, Expr, Function, NodeTest, Step};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    At,
    Comma,
    Star,
    Dot,
    DotDot,
    Op(CmpOp),
    Name(String),
    Literal(String),
    Number(f64),
}

#[derive(Clone, Debug)]
struct Lexed {
    token: Token,
    position: usize,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn decode_literal(raw: &str) -> String {
    raw.replace(xpath_locator::QUOTE_ENTITY, "\"")
}

fn tokenize(source: &str) -> Result<Vec<Lexed>, DomError> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);
        let mut advance = 1;

        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '/' if next == Some('/') => {
                advance = 2;
                Token::DoubleSlash
            }
            '/' => Token::Slash,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '@' => Token::At,
            ',' => Token::Comma,
            '*' => Token::Star,
            '=' => Token::Op(CmpOp::Eq),
            '!' if next == Some('=') => {
                advance = 2;
                Token::Op(CmpOp::Ne)
            }
            '<' if next == Some('=') => {
                advance = 2;
                Token::Op(CmpOp::Le)
            }
            '<' => Token::Op(CmpOp::Lt),
            '>' if next == Some('=') => {
                advance = 2;
                Token::Op(CmpOp::Ge)
            }
            '>' => Token::Op(CmpOp::Gt),
            '.' if next == Some('.') => {
                advance = 2;
                Token::DotDot
            }
            '.' if !next.map(|n| n.is_ascii_digit()).unwrap_or(false) => Token::Dot,
            '|' => return Err(DomError::UnsupportedXPath("union expressions".to_string())),
            ':' if next == Some(':') => {
                return Err(DomError::UnsupportedXPath("explicit axes".to_string()))
            }
            '"' | '\'' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|(_, ch)| *ch == c)
                    .ok_or_else(|| DomError::syntax(position, "unterminated string literal"))?;
                let start = position + c.len_utf8();
                let end = chars[i + 1 + close].0;
                advance = close + 2;
                Token::Literal(decode_literal(&source[start..end]))
            }
            c if c.is_ascii_digit() || c == '.' => {
                let len = chars[i..]
                    .iter()
                    .take_while(|(_, ch)| ch.is_ascii_digit() || *ch == '.')
                    .count();
                let end = chars.get(i + len).map(|(p, _)| *p).unwrap_or(source.len());
                let text = &source[position..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| DomError::syntax(position, format!("bad number '{}'", text)))?;
                advance = len;
                Token::Number(value)
            }
            c if is_name_start(c) => {
                let len = chars[i..]
                    .iter()
                    .take_while(|(_, ch)| is_name_char(*ch))
                    .count();
                let end = chars.get(i + len).map(|(p, _)| *p).unwrap_or(source.len());
                advance = len;
                Token::Name(source[position..end].to_string())
            }
            other => {
                return Err(DomError::syntax(
                    position,
                    format!("unexpected character '{}'", other),
                ))
            }
        };

        tokens.push(Lexed { token, position });
        i += advance;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Lexed>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(source: &str) -> Result<Self, DomError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            end: source.len(),
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|l| &l.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|l| &l.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|l| l.position)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|l| l.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> DomError {
        DomError::syntax(self.position(), message)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), DomError> {
        if self.peek() == Some(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    fn separator(&mut self) -> Option<Axis> {
        let axis = match self.peek()? {
            Token::Slash => Axis::Child,
            Token::DoubleSlash => Axis::Descendant,
            _ => return None,
        };
        self.pos += 1;
        Some(axis)
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, DomError> {
        let position = self.position();
        let test = match self.next() {
            Some(Token::Star) => NodeTest::AnyElement,
            Some(Token::Dot) => {
                return Ok(Step {
                    axis: Axis::SelfNode,
                    test: NodeTest::AnyNode,
                    predicates: Vec::new(),
                })
            }
            Some(Token::DotDot) => {
                return Ok(Step {
                    axis: Axis::Parent,
                    test: NodeTest::AnyNode,
                    predicates: Vec::new(),
                })
            }
            Some(Token::Name(name)) if self.peek() == Some(&Token::LParen) => {
                let test = match name.as_str() {
                    "text" => NodeTest::Text,
                    "node" => NodeTest::AnyNode,
                    _ => return Err(self.error(format!("'{}()' is not a node test", name))),
                };
                self.pos += 1;
                self.expect(Token::RParen, "')'")?;
                test
            }
            Some(Token::Name(name)) => NodeTest::Name(name),
            _ => return Err(DomError::syntax(position, "expected a node test")),
        };

        let mut predicates = Vec::new();
        while self.peek() == Some(&Token::LBracket) {
            self.pos += 1;
            predicates.push(self.parse_expr()?);
            self.expect(Token::RBracket, "']'")?;
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, DomError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Name(n)) if n == "or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, DomError> {
        let mut left = self.parse_equality()?;
        while matches!(self.peek(), Some(Token::Name(n)) if n == "and") {
            self.pos += 1;
            let right = self.parse_equality()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, DomError> {
        let mut left = self.parse_relational()?;
        while let Some(Token::Op(op @ (CmpOp::Eq | CmpOp::Ne))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.parse_relational()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, DomError> {
        let mut left = self.parse_primary()?;
        while let Some(Token::Op(op @ (CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge))) =
            self.peek()
        {
            let op = *op;
            self.pos += 1;
            let right = self.parse_primary()?;
            left = Expr::Compare(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, DomError> {
        match self.peek() {
            Some(Token::At) => {
                self.pos += 1;
                match self.next() {
                    Some(Token::Star) => Ok(Expr::Attribute(None)),
                    Some(Token::Name(name)) => Ok(Expr::Attribute(Some(name))),
                    _ => Err(self.error("expected an attribute name after '@'")),
                }
            }
            Some(Token::Literal(value)) => {
                let value = value.clone();
                self.pos += 1;
                Ok(Expr::Literal(value))
            }
            Some(Token::Number(value)) => {
                let value = *value;
                self.pos += 1;
                Ok(Expr::Number(value))
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Name(name))
                if self.peek_at(1) == Some(&Token::LParen) && name != "text" && name != "node" =>
            {
                self.parse_call()
            }
            Some(Token::Name(_) | Token::Star | Token::Dot | Token::DotDot) => {
                let mut steps = vec![self.parse_step(Axis::Child)?];
                while let Some(axis) = self.separator() {
                    steps.push(self.parse_step(axis)?);
                }
                Ok(Expr::Path(steps))
            }
            Some(Token::Slash | Token::DoubleSlash) => Err(DomError::UnsupportedXPath(
                "absolute paths inside predicates".to_string(),
            )),
            Some(_) => Err(self.error("unexpected token")),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn parse_call(&mut self) -> Result<Expr, DomError> {
        let start = self.position();
        let name = match self.next() {
            Some(Token::Name(name)) => name,
            _ => return Err(self.error("expected a function name")),
        };
        let function = Function::lookup(&name)
            .ok_or_else(|| DomError::UnsupportedXPath(format!("function {}()", name)))?;
        self.expect(Token::LParen, "'('")?;

        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'")?;

        let (min, max) = function.arity();
        if args.len() < min || args.len() > max {
            return Err(DomError::syntax(
                start,
                format!("{}() takes {}..={} arguments, got {}", name, min, max, args.len()),
            ));
        }
        Ok(Expr::Call(function, args))
    }
}

/// Parse an absolute location path; an empty step list means `/`
pub(crate) fn parse_location_path(source: &str) -> Result<Vec<Step>, DomError> {
    let mut parser = Parser::new(source)?;
    let Some(first) = parser.separator() else {
        return Err(match parser.peek() {
            None => DomError::syntax(0, "empty expression"),
            Some(_) => DomError::UnsupportedXPath("relative location paths".to_string()),
        });
    };

    if first == Axis::Child && parser.peek().is_none() {
        return Ok(Vec::new());
    }

    let mut steps = vec![parser.parse_step(first)?];
    while parser.peek().is_some() {
        let axis = parser
            .separator()
            .ok_or_else(|| parser.error("expected '/' or end of expression"))?;
        steps.push(parser.parse_step(axis)?);
    }
    Ok(steps)
}
