//! Parser for the sift query language.
//!
//! # Grammar
//!
//! ```text
//! query        ::= filters? actions?
//! filters      ::= filter_group (JOINING_OP filter_group)*
//! filter_group ::= filter | "(" filter (JOINING_OP filter)* ")"
//! filter       ::= KEY COMP_OP (value | array)
//! value        ::= STRING | NUMBER | TIME | DATE | DATETIME
//! array        ::= "[" (value ("," value)*)? "]"
//! actions      ::= "|" action (";" action)*
//! action       ::= ACTION_KEY (KEY | value)+
//! ```
//!
//! Joining operators have no precedence over each other. Chains are folded
//! left to right, so `a and b or c` is `(a and b) or c`.

use std::mem;

use tracing::debug;

use crate::{
    ast::{
        ActionNode, CompOp, FilterNode, Joiner, JoinerNode, Literal, Operand, Param, Query,
        Spanned, Token,
    },
    error::{Error, ParseError},
    lexer::Lexer,
};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Option<Spanned>,
}

/// The literal a token stands for, if it is a value token.
fn literal(token: &Token) -> Option<Literal> {
    match token {
        Token::String(s) => Some(Literal::String(s.clone())),
        Token::Integer(n) => Some(Literal::Integer(*n)),
        Token::Decimal(d) => Some(Literal::Decimal(*d)),
        Token::Time(s) => Some(Literal::Time(s.clone())),
        Token::Date(s) => Some(Literal::Date(s.clone())),
        Token::DateTime(s) => Some(Literal::DateTime(s.clone())),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Creates a parser and reads the first token.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, Error> {
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current })
    }

    fn peek(&self) -> Option<&Token> {
        self.current.as_ref().map(|t| &t.token)
    }

    fn advance(&mut self) -> Result<Option<Spanned>, Error> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), Error> {
        if !self.check(token) {
            return Err(self.unexpected(expected));
        }
        self.advance()?;
        Ok(())
    }

    /// Error for the current token, or for the end of input.
    fn unexpected(&self, expected: &'static str) -> Error {
        let err = match &self.current {
            Some(t) => ParseError::UnexpectedToken {
                found: t.token.describe(),
                expected,
                line: t.line,
                position: t.position,
            },
            None => ParseError::UnexpectedEof {
                expected,
                line: self.lexer.line(),
                position: self.lexer.input().len(),
            },
        };
        err.into()
    }

    fn joining_op(&self) -> Option<Joiner> {
        match self.peek() {
            Some(Token::JoiningOp(joiner)) => Some(*joiner),
            _ => None,
        }
    }

    /// Parse a complete query
    pub fn parse_query(&mut self) -> Result<Query, Error> {
        let filter = match self.peek() {
            Some(Token::Key(_) | Token::LParen) => Some(self.parse_filters()?),
            _ => None,
        };

        let actions = if self.check(&Token::Pipe) {
            self.parse_actions()?
        } else {
            Vec::new()
        };

        if self.current.is_some() {
            let expected = match (filter.is_some(), actions.is_empty()) {
                (_, false) => "an action parameter, ';' or end of input",
                (true, true) => "'and', 'or', '|' or end of input",
                (false, true) => "a filter, '(' or '|'",
            };
            return Err(self.unexpected(expected));
        }

        debug!(
            has_filter = filter.is_some(),
            actions = actions.len(),
            "parsed query"
        );
        Ok(Query::new(filter, actions))
    }

    fn parse_filters(&mut self) -> Result<JoinerNode, Error> {
        let mut chain = self.parse_filter_group()?;

        while let Some(joiner) = self.joining_op() {
            self.advance()?;
            let next = self.parse_filter_group()?;
            chain = JoinerNode::join(chain, joiner, next);
        }
        Ok(chain)
    }

    fn parse_filter_group(&mut self) -> Result<JoinerNode, Error> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance()?;
                let mut chain = JoinerNode::leaf(self.parse_filter()?);

                while let Some(joiner) = self.joining_op() {
                    self.advance()?;
                    let next = JoinerNode::leaf(self.parse_filter()?);
                    chain = JoinerNode::join(chain, joiner, next);
                }

                self.expect(&Token::RParen, "'and', 'or' or ')'")?;
                Ok(JoinerNode::group(chain))
            }
            Some(Token::Key(_)) => Ok(JoinerNode::leaf(self.parse_filter()?)),
            _ => Err(self.unexpected("a filter or '('")),
        }
    }

    fn parse_filter(&mut self) -> Result<FilterNode, Error> {
        let key = match self.peek() {
            Some(Token::Key(key)) => key.clone(),
            _ => return Err(self.unexpected("a key")),
        };
        self.advance()?;

        let operator: CompOp = match self.peek() {
            Some(Token::CompOp(op)) => *op,
            _ => return Err(self.unexpected("a comparison operator")),
        };
        self.advance()?;

        let operand = if self.check(&Token::LBracket) {
            Operand::List(self.parse_array()?)
        } else {
            Operand::Scalar(self.parse_value("a value or array")?)
        };

        Ok(FilterNode::new(key, operator, operand))
    }

    fn parse_value(&mut self, expected: &'static str) -> Result<Literal, Error> {
        match self.peek().and_then(literal) {
            Some(lit) => {
                self.advance()?;
                Ok(lit)
            }
            None => Err(self.unexpected(expected)),
        }
    }

    fn parse_array(&mut self) -> Result<Vec<Literal>, Error> {
        self.advance()?; // consume '['
        let mut items = vec![];

        if self.check(&Token::RBracket) {
            self.advance()?;
            return Ok(items);
        }

        loop {
            items.push(self.parse_value("a value")?);

            if self.check(&Token::Comma) {
                self.advance()?;
            } else {
                self.expect(&Token::RBracket, "',' or ']'")?;
                return Ok(items);
            }
        }
    }

    fn parse_actions(&mut self) -> Result<Vec<ActionNode>, Error> {
        self.advance()?; // consume '|'
        let mut actions = vec![self.parse_action()?];

        while self.check(&Token::Semicolon) {
            self.advance()?;
            actions.push(self.parse_action()?);
        }
        Ok(actions)
    }

    fn parse_action(&mut self) -> Result<ActionNode, Error> {
        let action_key = match self.peek() {
            Some(Token::ActionKey(key)) => key.clone(),
            _ => return Err(self.unexpected("an action key")),
        };
        self.advance()?;

        let mut params = vec![];
        while let Some(param) = self.param() {
            self.advance()?;
            params.push(param);
        }

        if params.is_empty() {
            return Err(self.unexpected("an action parameter"));
        }
        Ok(ActionNode::new(action_key, params))
    }

    /// The current token as an action parameter.
    fn param(&self) -> Option<Param> {
        match self.peek()? {
            Token::Key(key) => Some(Param::Key(key.clone())),
            token => literal(token).map(Param::Literal),
        }
    }
}

#[test]
fn test_group_is_wrapped() {
    let mut parser = Parser::new(Lexer::new("(a == 1)")).unwrap();
    let query = parser.parse_query().unwrap();
    let root = query.filter_root().unwrap();

    assert!(!root.is_leaf());
    assert!(!root.has_right());
    assert!(root.left().unwrap().is_leaf());
}
