//! Roll formula parsing
//!
//! Understands the subset of dice notation the rule set authors: integers,
//! dice terms (`2d6`, `d20`, `1d%`, `4d6kh3`), roll-data references
//! (`@attributes.str.mod`), the four arithmetic operators, unary minus and
//! parentheses. Evaluation is left to the host's dice roller; this module only
//! answers whether a formula is well formed and what it refers to.

use std::fmt;
use thiserror::Error;

/// Error when parsing a roll formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("Empty roll formula")]
    Empty,
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },
    #[error("Unexpected {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("Unexpected end of formula")]
    UnexpectedEnd,
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    #[error("Die size must be at least 2")]
    InvalidDieSize,
    #[error("Empty roll data reference at position {0}")]
    EmptyReference(usize),
    #[error("Number too large: {0}")]
    Overflow(String),
    #[error("Formula nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("Formula has more than {0} terms and operators")]
    TooLong(usize),
}

/// Deepest nesting of parentheses and unary minus a formula may use
pub const MAX_NESTING: usize = 64;

/// Most tokens a formula may hold; bounds the depth of operator chains
pub const MAX_TOKENS: usize = 1024;

/// Which dice of a pool are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    Highest(u32),
    Lowest(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

/// Parsed formula tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Dice {
        count: u32,
        faces: u32,
        keep: Option<Keep>,
    },
    /// A roll-data path without the leading `@`
    Reference(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Neg(inner) => inner.visit(f),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.visit(f);
                rhs.visit(f);
            }
            _ => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Dice { count, faces, keep } => {
                write!(f, "{}d{}", count, faces)?;
                match keep {
                    Some(Keep::Highest(n)) => write!(f, "kh{}", n),
                    Some(Keep::Lowest(n)) => write!(f, "kl{}", n),
                    None => Ok(()),
                }
            }
            Expr::Reference(path) => write!(f, "@{}", path),
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

/// A validated roll formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse a formula such as `1d20 + @attributes.dex.mod + 2`
    pub fn parse(input: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(FormulaError::TooLong(MAX_TOKENS));
        }

        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.expression()?;
        if let Some(token) = parser.peek() {
            return Err(FormulaError::UnexpectedToken {
                found: token.kind.describe(),
                position: token.position,
            });
        }

        Ok(Formula {
            source: input.trim().to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Roll-data paths this formula refers to, in order of appearance
    pub fn references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.expr.visit(&mut |e| {
            if let Expr::Reference(path) = e {
                refs.push(path.as_str());
            }
        });
        refs
    }

    /// Whether the formula rolls any dice
    pub fn has_dice(&self) -> bool {
        let mut found = false;
        self.expr.visit(&mut |e| {
            if matches!(e, Expr::Dice { .. }) {
                found = true;
            }
        });
        found
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Check that a roll formula parses
pub fn validate_formula(input: &str) -> bool {
    Formula::parse(input).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Number(u64),
    /// The `d` of a dice term
    Die,
    Percent,
    KeepHighest,
    KeepLowest,
    Reference(String),
    Op(BinaryOp),
    LParen,
    RParen,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Die => "'d'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::KeepHighest => "'kh'".to_string(),
            TokenKind::KeepLowest => "'kl'".to_string(),
            TokenKind::Reference(path) => format!("reference @{}", path),
            TokenKind::Op(op) => format!("'{}'", op.symbol()),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let position = i;

        let kind = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let digits: String = chars[start..i].iter().collect();
                let value = digits
                    .parse::<u64>()
                    .map_err(|_| FormulaError::Overflow(digits.clone()))?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    position,
                });
                continue;
            }
            '@' => {
                let start = i + 1;
                i = start;
                while i < chars.len() && is_reference_char(chars[i]) {
                    i += 1;
                }
                let path: String = chars[start..i].iter().collect();
                if path.is_empty() || path.starts_with('.') || path.ends_with('.') {
                    return Err(FormulaError::EmptyReference(position));
                }
                tokens.push(Token {
                    kind: TokenKind::Reference(path),
                    position,
                });
                continue;
            }
            'd' | 'D' => TokenKind::Die,
            'k' | 'K' => match chars.get(i + 1) {
                Some('h') | Some('H') => {
                    i += 1;
                    TokenKind::KeepHighest
                }
                Some('l') | Some('L') => {
                    i += 1;
                    TokenKind::KeepLowest
                }
                // bare `k` keeps highest
                _ => TokenKind::KeepHighest,
            },
            '%' => TokenKind::Percent,
            '+' => TokenKind::Op(BinaryOp::Add),
            '-' => TokenKind::Op(BinaryOp::Sub),
            '*' => TokenKind::Op(BinaryOp::Mul),
            '/' => TokenKind::Op(BinaryOp::Div),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => {
                return Err(FormulaError::UnexpectedChar {
                    found: other,
                    position,
                })
            }
        };

        tokens.push(Token { kind, position });
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&'a Token, FormulaError> {
        let token = self.tokens.get(self.pos).ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(token: &Token) -> FormulaError {
        FormulaError::UnexpectedToken {
            found: token.kind.describe(),
            position: token.position,
        }
    }

    /// Run one nested production, refusing to go past `MAX_NESTING`
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Expr, FormulaError>,
    ) -> Result<Expr, FormulaError> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::TooDeep(MAX_NESTING));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        while let Some(Token {
            kind: TokenKind::Op(op @ (BinaryOp::Add | BinaryOp::Sub)),
            ..
        }) = self.peek()
        {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op: *op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        while let Some(Token {
            kind: TokenKind::Op(op @ (BinaryOp::Mul | BinaryOp::Div)),
            ..
        }) = self.peek()
        {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op: *op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // factor := '-' factor | '(' expression ')' | dice | number | reference
    fn factor(&mut self) -> Result<Expr, FormulaError> {
        let token = self.next()?;
        match &token.kind {
            TokenKind::Op(BinaryOp::Sub) => {
                let inner = self.nested(Self::factor)?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            TokenKind::LParen => {
                let inner = self.nested(Self::expression)?;
                match self.next() {
                    Ok(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Ok(other) => Err(Self::unexpected(other)),
                    Err(e) => Err(e),
                }
            }
            TokenKind::Number(n) => {
                if self.eat(&TokenKind::Die) {
                    self.dice(*n)
                } else {
                    let value = i64::try_from(*n).map_err(|_| FormulaError::Overflow(n.to_string()))?;
                    Ok(Expr::Number(value))
                }
            }
            TokenKind::Die => self.dice(1),
            TokenKind::Reference(path) => Ok(Expr::Reference(path.clone())),
            _ => Err(Self::unexpected(token)),
        }
    }

    // dice := count 'd' (number | '%') [('kh' | 'kl') number?]
    fn dice(&mut self, count: u64) -> Result<Expr, FormulaError> {
        let count = u32::try_from(count).map_err(|_| FormulaError::Overflow(count.to_string()))?;
        if count == 0 {
            return Err(FormulaError::InvalidDiceCount);
        }

        let token = self.next()?;
        let faces = match token.kind {
            TokenKind::Number(n) => {
                u32::try_from(n).map_err(|_| FormulaError::Overflow(n.to_string()))?
            }
            TokenKind::Percent => 100,
            _ => return Err(Self::unexpected(token)),
        };
        if faces < 2 {
            return Err(FormulaError::InvalidDieSize);
        }

        let keep = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::KeepHighest) | Some(TokenKind::KeepLowest) => {
                let highest = matches!(self.next()?.kind, TokenKind::KeepHighest);
                let kept = match self.peek() {
                    Some(Token {
                        kind: TokenKind::Number(n),
                        ..
                    }) => {
                        self.pos += 1;
                        u32::try_from(*n).map_err(|_| FormulaError::Overflow(n.to_string()))?
                    }
                    _ => 1,
                };
                Some(if highest {
                    Keep::Highest(kept)
                } else {
                    Keep::Lowest(kept)
                })
            }
            _ => None,
        };

        Ok(Expr::Dice { count, faces, keep })
    }
}
