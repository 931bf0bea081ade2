//! Recursive descent parser.
//!
//! Precedence, loosest first:
//!
//! ```text
//! ternary      c ? a : b, if c then a else b
//! pipe         a -> f(b)
//! or, and      ||  &&
//! equality     ==  !=
//! relational   <  <=  >  >=
//! to           a to b
//! additive     +  -
//! product      *  /
//! unary        -a  !a
//! power        a ^ b        (right associative)
//! postfix      f(x)  a.b  a[i]
//! ```

use sq_ir::ast::{Decorator, Identifier, InfixOp, Node, NodeKind, UnaryOp};
use sq_ir::{ImportDecl, LineIndex, Span};
use sq_stack::ensure_sufficient_stack;

use crate::lexer::{tokenize, Token};
use crate::{Ast, SyntaxError, SyntaxErrorKind};

type PResult<T> = Result<T, (SyntaxErrorKind, Span)>;

/// Parse a whole module.
#[tracing::instrument(level = "debug", skip(source))]
pub fn parse(source: &str, source_id: &str) -> Result<Ast, SyntaxError> {
    let line_index = LineIndex::new(source_id, source);
    match tokenize(source).and_then(|tokens| Parser::new(tokens, source.len()).program()) {
        Ok(root) => Ok(Ast { root, line_index }),
        Err((kind, span)) => Err(SyntaxError {
            kind,
            location: line_index.location(span),
        }),
    }
}

/// Read only the import header of a module.
///
/// Lexes the whole text (an unlexable module is unusable anyway) but stops
/// parsing at the first non-import statement, so a syntax error in the body
/// does not hide the module's dependencies.
pub fn parse_imports(source: &str, source_id: &str) -> Result<Vec<ImportDecl>, SyntaxError> {
    tokenize(source)
        .and_then(|tokens| Parser::new(tokens, source.len()).imports())
        .map_err(|(kind, span)| SyntaxError {
            kind,
            location: LineIndex::new(source_id, source).location(span),
        })
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    eof: Span,
}

impl Parser {
    fn new(tokens: Vec<(Token, Span)>, source_len: usize) -> Self {
        let end = u32::try_from(source_len).unwrap_or(u32::MAX);
        Parser {
            tokens,
            pos: 0,
            eof: Span::new(end, end),
        }
    }

    // Token access

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(token, _)| token)
    }

    fn span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.eof, |(_, span)| *span)
    }

    fn prev_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map_or(self.eof, |(_, span)| *span)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> PResult<Span> {
        if self.eat(token) {
            Ok(self.prev_span())
        } else {
            Err(self.error_here(expected))
        }
    }

    fn expect_ident(&mut self) -> PResult<Identifier> {
        if let Some((Token::Ident(name), span)) = self.tokens.get(self.pos) {
            let ident = Identifier {
                name: name.clone(),
                span: *span,
            };
            self.pos += 1;
            return Ok(ident);
        }
        Err(self.error_here("an identifier"))
    }

    fn expect_string(&mut self) -> PResult<String> {
        if let Some((Token::String(value), _)) = self.tokens.get(self.pos) {
            let value = value.clone();
            self.pos += 1;
            return Ok(value);
        }
        Err(self.error_here("a string"))
    }

    fn expect_statement_end(&self) -> PResult<()> {
        match self.peek() {
            None | Some(Token::Newline | Token::Semicolon) => Ok(()),
            Some(_) => Err(self.error_here("end of statement")),
        }
    }

    fn error_here(&self, expected: &str) -> (SyntaxErrorKind, Span) {
        let found = self
            .peek()
            .map_or_else(|| "end of input".to_string(), Token::describe);
        (
            SyntaxErrorKind::Expected {
                expected: expected.to_string(),
                found,
            },
            self.span(),
        )
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Token::Newline) {}
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(Token::Newline | Token::Semicolon)) {
            self.pos += 1;
        }
    }

    // Module structure

    fn imports(&mut self) -> PResult<Vec<ImportDecl>> {
        let mut imports = Vec::new();
        loop {
            self.skip_separators();
            if !matches!(self.peek(), Some(Token::Import | Token::Include)) {
                return Ok(imports);
            }
            imports.push(self.import()?);
            self.expect_statement_end()?;
        }
    }

    fn import(&mut self) -> PResult<ImportDecl> {
        let start = self.span();
        let requires_alias = self.eat(&Token::Import);
        if !requires_alias {
            self.expect(&Token::Include, "`import` or `#include`")?;
        }
        let path = self.expect_string()?;
        let alias = if self.eat(&Token::As) {
            Some(self.expect_ident()?.name)
        } else if requires_alias {
            return Err(self.error_here("`as`"));
        } else {
            None
        };
        Ok(ImportDecl {
            path,
            alias,
            span: start.merge(self.prev_span()),
        })
    }

    fn program(mut self) -> PResult<Node> {
        let imports = self.imports()?;
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.at_end() {
                break;
            }
            if matches!(self.peek(), Some(Token::Import | Token::Include)) {
                return Err((SyntaxErrorKind::LateImport, self.span()));
            }
            let statement = self.statement()?;
            self.expect_statement_end()?;
            statements.push(statement);
        }
        if let Some((_, init)) = statements.split_last() {
            if let Some(bad) = init.iter().find(|s| !s.kind.is_binding()) {
                return Err((SyntaxErrorKind::ExpressionBeforeEnd, bad.span));
            }
        }
        Ok(Node::new(
            NodeKind::Program {
                imports,
                statements,
            },
            Span::new(0, self.eof.end),
        ))
    }

    /// Statements up to and including the closing `}`; the last one must be
    /// an expression.
    fn block_statements(&mut self) -> PResult<Vec<Node>> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.eat(&Token::RBrace) {
                break;
            }
            if self.at_end() {
                return Err(self.error_here("`}`"));
            }
            let statement = self.statement()?;
            if !self.check(&Token::RBrace) {
                self.expect_statement_end()?;
            }
            statements.push(statement);
        }
        match statements.split_last() {
            Some((last, init)) if !last.kind.is_binding() => {
                if let Some(bad) = init.iter().find(|s| !s.kind.is_binding()) {
                    return Err((SyntaxErrorKind::ExpressionBeforeEnd, bad.span));
                }
                Ok(statements)
            }
            Some((last, _)) => Err((SyntaxErrorKind::BlockWithoutResult, last.span)),
            None => Err((SyntaxErrorKind::BlockWithoutResult, self.prev_span())),
        }
    }

    // Statements

    fn statement(&mut self) -> PResult<Node> {
        ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> PResult<Node> {
        let start = self.span();
        if self.check(&Token::At) {
            let decorator = self.decorator()?;
            self.skip_newlines();
            let statement = self.statement()?;
            let span = start.merge(statement.span);
            return Ok(Node::new(
                NodeKind::Decorated {
                    decorator,
                    statement: Box::new(statement),
                },
                span,
            ));
        }

        if matches!(self.peek(), Some(Token::Ident(_))) {
            if self.peek_at(1) == Some(&Token::Assign) {
                let name = self.expect_ident()?;
                self.pos += 1;
                self.skip_newlines();
                let value = self.expression()?;
                let span = start.merge(value.span);
                return Ok(Node::new(
                    NodeKind::Let {
                        name,
                        value: Box::new(value),
                    },
                    span,
                ));
            }
            if self.peek_at(1) == Some(&Token::LParen) && self.is_definition() {
                let name = self.expect_ident()?;
                self.expect(&Token::LParen, "`(`")?;
                let parameters = self.comma_list(&Token::RParen, "`)`", Self::expect_ident)?;
                self.expect(&Token::Assign, "`=`")?;
                self.skip_newlines();
                let body = self.expression()?;
                let span = start.merge(body.span);
                return Ok(Node::new(
                    NodeKind::Defun {
                        name,
                        parameters,
                        body: Box::new(body),
                    },
                    span,
                ));
            }
        }

        self.expression()
    }

    /// `name(...) =` ahead, as opposed to a call expression.
    fn is_definition(&self) -> bool {
        let mut depth = 0usize;
        let mut idx = self.pos + 1;
        while let Some((token, _)) = self.tokens.get(idx) {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return matches!(self.tokens.get(idx + 1), Some((Token::Assign, _)));
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        false
    }

    fn decorator(&mut self) -> PResult<Decorator> {
        let start = self.expect(&Token::At, "`@`")?;
        let name = self.expect_ident()?;
        let args = if self.check(&Token::LParen) {
            self.arguments()?
        } else {
            Vec::new()
        };
        Ok(Decorator {
            name,
            args,
            span: start.merge(self.prev_span()),
        })
    }

    // Expressions

    fn expression(&mut self) -> PResult<Node> {
        ensure_sufficient_stack(|| self.ternary())
    }

    fn ternary(&mut self) -> PResult<Node> {
        let start = self.span();
        if self.eat(&Token::If) {
            self.skip_newlines();
            let condition = self.expression()?;
            self.skip_newlines();
            self.expect(&Token::Then, "`then`")?;
            self.skip_newlines();
            let if_true = self.expression()?;
            self.skip_newlines();
            self.expect(&Token::Else, "`else`")?;
            self.skip_newlines();
            let if_false = self.expression()?;
            let span = start.merge(if_false.span);
            return Ok(Self::ternary_node(condition, if_true, if_false, span));
        }

        let condition = self.pipe()?;
        if !self.eat(&Token::Question) {
            return Ok(condition);
        }
        self.skip_newlines();
        let if_true = self.expression()?;
        self.skip_newlines();
        self.expect(&Token::Colon, "`:`")?;
        self.skip_newlines();
        let if_false = self.expression()?;
        let span = start.merge(if_false.span);
        Ok(Self::ternary_node(condition, if_true, if_false, span))
    }

    fn ternary_node(condition: Node, if_true: Node, if_false: Node, span: Span) -> Node {
        Node::new(
            NodeKind::Ternary {
                condition: Box::new(condition),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            },
            span,
        )
    }

    fn pipe(&mut self) -> PResult<Node> {
        let mut value = self.or()?;
        while self.eat(&Token::Arrow) {
            self.skip_newlines();
            let callee = self.lookup_chain()?;
            let args = if self.check(&Token::LParen) {
                self.arguments()?
            } else {
                Vec::new()
            };
            let span = value.span.merge(self.prev_span());
            value = Node::new(
                NodeKind::Pipe {
                    value: Box::new(value),
                    callee: Box::new(callee),
                    args,
                },
                span,
            );
        }
        Ok(value)
    }

    fn binary(
        &mut self,
        next: fn(&mut Self) -> PResult<Node>,
        operator: fn(&Token) -> Option<InfixOp>,
    ) -> PResult<Node> {
        let mut left = next(self)?;
        while let Some(op) = self.peek().and_then(operator) {
            self.pos += 1;
            self.skip_newlines();
            let right = next(self)?;
            let span = left.span.merge(right.span);
            left = Node::new(
                NodeKind::Infix {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn or(&mut self) -> PResult<Node> {
        self.binary(Self::and, |t| matches!(t, Token::OrOr).then_some(InfixOp::Or))
    }

    fn and(&mut self) -> PResult<Node> {
        self.binary(Self::equality, |t| {
            matches!(t, Token::AndAnd).then_some(InfixOp::And)
        })
    }

    fn equality(&mut self) -> PResult<Node> {
        self.binary(Self::relational, |t| match t {
            Token::EqEq => Some(InfixOp::Equal),
            Token::NotEq => Some(InfixOp::NotEqual),
            _ => None,
        })
    }

    fn relational(&mut self) -> PResult<Node> {
        self.binary(Self::to, |t| match t {
            Token::Lt => Some(InfixOp::Less),
            Token::LtEq => Some(InfixOp::LessEq),
            Token::Gt => Some(InfixOp::Greater),
            Token::GtEq => Some(InfixOp::GreaterEq),
            _ => None,
        })
    }

    fn to(&mut self) -> PResult<Node> {
        self.binary(Self::additive, |t| matches!(t, Token::To).then_some(InfixOp::To))
    }

    fn additive(&mut self) -> PResult<Node> {
        self.binary(Self::product, |t| match t {
            Token::Plus => Some(InfixOp::Add),
            Token::Minus => Some(InfixOp::Subtract),
            _ => None,
        })
    }

    fn product(&mut self) -> PResult<Node> {
        self.binary(Self::unary, |t| match t {
            Token::Star => Some(InfixOp::Multiply),
            Token::Slash => Some(InfixOp::Divide),
            _ => None,
        })
    }

    fn unary(&mut self) -> PResult<Node> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Negate,
            Some(Token::Bang) => UnaryOp::Not,
            _ => return self.power(),
        };
        let start = self.span();
        self.pos += 1;
        let operand = ensure_sufficient_stack(|| self.unary())?;
        let span = start.merge(operand.span);
        Ok(Node::new(
            NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn power(&mut self) -> PResult<Node> {
        let base = self.postfix()?;
        if !self.eat(&Token::Caret) {
            return Ok(base);
        }
        self.skip_newlines();
        let exponent = self.unary()?;
        let span = base.span.merge(exponent.span);
        Ok(Node::new(
            NodeKind::Infix {
                op: InfixOp::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            },
            span,
        ))
    }

    fn postfix(&mut self) -> PResult<Node> {
        let mut node = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    let args = self.arguments()?;
                    let span = node.span.merge(self.prev_span());
                    node = Node::new(
                        NodeKind::Call {
                            callee: Box::new(node),
                            args,
                        },
                        span,
                    );
                }
                Some(Token::Dot) => node = self.dot_lookup(node)?,
                Some(Token::LBracket) => {
                    self.pos += 1;
                    self.skip_newlines();
                    let index = self.expression()?;
                    self.skip_newlines();
                    let end = self.expect(&Token::RBracket, "`]`")?;
                    let span = node.span.merge(end);
                    node = Node::new(
                        NodeKind::BracketLookup {
                            target: Box::new(node),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                _ => return Ok(node),
            }
        }
    }

    /// Pipe targets: a primary followed by field lookups, without calls.
    fn lookup_chain(&mut self) -> PResult<Node> {
        let mut node = self.primary()?;
        while self.check(&Token::Dot) {
            node = self.dot_lookup(node)?;
        }
        Ok(node)
    }

    fn dot_lookup(&mut self, target: Node) -> PResult<Node> {
        self.expect(&Token::Dot, "`.`")?;
        let key = self.expect_ident()?;
        let span = target.span.merge(key.span);
        Ok(Node::new(
            NodeKind::DotLookup {
                target: Box::new(target),
                key: key.name,
            },
            span,
        ))
    }

    fn arguments(&mut self) -> PResult<Vec<Node>> {
        self.expect(&Token::LParen, "`(`")?;
        self.comma_list(&Token::RParen, "`)`", Self::expression)
    }

    /// Items separated by commas up to `close`, which is consumed.
    /// Newlines and a trailing comma are allowed.
    fn comma_list<T>(
        &mut self,
        close: &Token,
        close_desc: &str,
        item: fn(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(item(self)?);
            self.skip_newlines();
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(&Token::Comma, &format!("`,` or {close_desc}"))?;
        }
    }

    fn primary(&mut self) -> PResult<Node> {
        let Some((token, span)) = self.tokens.get(self.pos).cloned() else {
            return Err(self.error_here("an expression"));
        };
        let kind = match token {
            Token::Number(n) => NodeKind::Number(n),
            Token::String(s) => NodeKind::String(s),
            Token::True => NodeKind::Boolean(true),
            Token::False => NodeKind::Boolean(false),
            Token::Ident(name) => NodeKind::Identifier(name),
            Token::LParen => {
                self.pos += 1;
                self.skip_newlines();
                let inner = self.expression()?;
                self.skip_newlines();
                self.expect(&Token::RParen, "`)`")?;
                return Ok(inner);
            }
            Token::LBracket => {
                self.pos += 1;
                let items = self.comma_list(&Token::RBracket, "`]`", Self::expression)?;
                return Ok(Node::new(NodeKind::Array(items), span.merge(self.prev_span())));
            }
            Token::LBrace => return self.brace(),
            _ => return Err(self.error_here("an expression")),
        };
        self.pos += 1;
        Ok(Node::new(kind, span))
    }

    /// `{` starts a lambda, a record or a block.
    fn brace(&mut self) -> PResult<Node> {
        let start = self.expect(&Token::LBrace, "`{`")?;
        self.skip_newlines();
        let kind = match self.peek() {
            Some(Token::Bar) => {
                self.pos += 1;
                let parameters = self.comma_list(&Token::Bar, "`|`", Self::expect_ident)?;
                self.lambda(start, parameters)?
            }
            Some(Token::OrOr) => {
                self.pos += 1;
                self.lambda(start, Vec::new())?
            }
            Some(Token::RBrace) => {
                self.pos += 1;
                NodeKind::Dict(Vec::new())
            }
            Some(Token::Ident(_) | Token::String(_)) if self.peek_at(1) == Some(&Token::Colon) => {
                NodeKind::Dict(self.comma_list(&Token::RBrace, "`}`", Self::dict_entry)?)
            }
            _ => NodeKind::Block(self.block_statements()?),
        };
        Ok(Node::new(kind, start.merge(self.prev_span())))
    }

    fn lambda(&mut self, start: Span, parameters: Vec<Identifier>) -> PResult<NodeKind> {
        let mut statements = self.block_statements()?;
        let body = if statements.len() == 1 {
            statements.remove(0)
        } else {
            Node::new(NodeKind::Block(statements), start.merge(self.prev_span()))
        };
        Ok(NodeKind::Lambda {
            parameters,
            body: Box::new(body),
        })
    }

    fn dict_entry(&mut self) -> PResult<(Node, Node)> {
        let key = match self.tokens.get(self.pos).cloned() {
            Some((Token::Ident(name) | Token::String(name), span)) => {
                Node::new(NodeKind::String(name), span)
            }
            _ => return Err(self.error_here("a record key")),
        };
        self.pos += 1;
        self.expect(&Token::Colon, "`:`")?;
        self.skip_newlines();
        let value = self.expression()?;
        Ok((key, value))
    }
}

#[cfg(test)]
mod tests;
