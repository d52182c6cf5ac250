use anyhow::{bail, Context, Result};

use crate::ast::{
    AssignmentOperator, Ast, BinaryOperator, Location, NodeId, NodeKind, UnaryOperator,
};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use crate::source::SourceFile;

/// Turns the text of one build file into nodes of the shared arena.
///
/// Implementations allocate every node of the file into `ast`, link parents
/// and return the file's `BuildDefinition` root.
pub trait BuildFileParser {
    fn parse(&self, ast: &mut Ast, source: &SourceFile) -> Result<NodeId>;
}

/// The bundled parser for the Meson build language.
#[derive(Debug, Default, Clone, Copy)]
pub struct MesonParser;

impl BuildFileParser for MesonParser {
    fn parse(&self, ast: &mut Ast, source: &SourceFile) -> Result<NodeId> {
        let tokens = Lexer::new(source)
            .tokenize()
            .with_context(|| format!("failed to tokenize {}", source.path.display()))?;
        let root = Parser::new(ast, tokens)
            .parse()
            .with_context(|| format!("failed to parse {}", source.path.display()))?;
        ast.set_parents(root);
        Ok(root)
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
enum Precedence {
    Lowest = 0,
    Ternary,
    Or,
    And,
    Comparison,
    Term,
    Factor,
    Unary,
}

pub struct Parser<'a> {
    ast: &'a mut Ast,
    tokens: Vec<Token>,
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(ast: &'a mut Ast, tokens: Vec<Token>) -> Self {
        Self {
            ast,
            tokens,
            current: 0,
        }
    }

    fn location_of(token: &Token) -> Location {
        Location::new(token.line, token.column, token.end_line, token.end_column)
    }

    fn span(&self, a: NodeId, b: NodeId) -> Location {
        Location::union(&self.ast.location(a), &self.ast.location(b))
    }

    pub fn parse(&mut self) -> Result<NodeId> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            let statement = self.parse_statement()?;
            statements.push(statement);
        }

        let end = self.peek();
        let location = Location::new(0, 0, end.line, end.column);
        Ok(self
            .ast
            .alloc(NodeKind::BuildDefinition { statements }, location))
    }

    fn parse_statement(&mut self) -> Result<NodeId> {
        match self.peek_kind() {
            TokenKind::Keyword(Keyword::If) => self.parse_selection(),
            TokenKind::Keyword(Keyword::Foreach) => self.parse_iteration(),
            TokenKind::Keyword(Keyword::Break) | TokenKind::Keyword(Keyword::Continue) => {
                let token = self.advance().clone();
                let kind = if token.kind == TokenKind::Keyword(Keyword::Break) {
                    NodeKind::Break
                } else {
                    NodeKind::Continue
                };
                let node = self.ast.alloc(kind, Self::location_of(&token));
                self.expect_newline("expected newline after loop control")?;
                Ok(node)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<NodeId> {
        let expression = self.parse_expression()?;

        let statement = match assignment_operator_from_token(self.peek_kind()) {
            Some(op) => {
                self.advance();
                let rhs = self.parse_expression()?;
                let location = self.span(expression, rhs);
                self.ast.alloc(
                    NodeKind::Assignment {
                        lhs: expression,
                        op,
                        rhs,
                    },
                    location,
                )
            }
            None => expression,
        };

        self.expect_newline("expected newline after statement")?;
        Ok(statement)
    }

    fn parse_selection(&mut self) -> Result<NodeId> {
        let if_token = self.advance().clone();
        let mut conditions = Vec::new();
        let mut blocks = Vec::new();

        conditions.push(self.parse_expression()?);
        self.expect_newline("expected newline after if condition")?;
        blocks.push(self.parse_block_until(&[Keyword::Elif, Keyword::Else, Keyword::Endif])?);

        while self.check_keyword(Keyword::Elif) {
            self.advance();
            conditions.push(self.parse_expression()?);
            self.expect_newline("expected newline after elif condition")?;
            blocks.push(self.parse_block_until(&[Keyword::Elif, Keyword::Else, Keyword::Endif])?);
        }

        if self.check_keyword(Keyword::Else) {
            self.advance();
            self.expect_newline("expected newline after else")?;
            blocks.push(self.parse_block_until(&[Keyword::Endif])?);
        }

        let endif_token = self.peek().clone();
        self.expect_keyword(Keyword::Endif, "expected 'endif' to close if")?;
        let location = Location::union(
            &Self::location_of(&if_token),
            &Self::location_of(&endif_token),
        );
        let node = self
            .ast
            .alloc(NodeKind::Selection { conditions, blocks }, location);
        self.expect_newline("expected newline after endif")?;
        Ok(node)
    }

    fn parse_iteration(&mut self) -> Result<NodeId> {
        let foreach_token = self.advance().clone();

        let mut ids = vec![self.parse_loop_variable()?];
        if matches!(self.peek_kind(), TokenKind::Comma) {
            self.advance();
            ids.push(self.parse_loop_variable()?);
        }
        self.expect_token(TokenKind::Colon, "expected ':' in foreach")?;
        let expression = self.parse_expression()?;
        self.expect_newline("expected newline after foreach header")?;

        let block = self.parse_block_until(&[Keyword::Endforeach])?;
        let end_token = self.peek().clone();
        self.expect_keyword(Keyword::Endforeach, "expected 'endforeach' to close foreach")?;
        let location = Location::union(
            &Self::location_of(&foreach_token),
            &Self::location_of(&end_token),
        );
        let node = self.ast.alloc(
            NodeKind::Iteration {
                ids,
                expression,
                block,
            },
            location,
        );
        self.expect_newline("expected newline after endforeach")?;
        Ok(node)
    }

    fn parse_loop_variable(&mut self) -> Result<NodeId> {
        let token = self.peek().clone();
        self.expect_token(TokenKind::Identifier, "expected loop variable")?;
        Ok(self.identifier(&token))
    }

    fn parse_block_until(&mut self, terminators: &[Keyword]) -> Result<Vec<NodeId>> {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self
                .peek_keyword()
                .map(|kw| terminators.contains(&kw))
                .unwrap_or(false)
            {
                break;
            }
            if self.is_at_end() {
                let token = self.peek();
                bail!(
                    "unexpected end of file at line {}, column {}",
                    token.line,
                    token.column
                );
            }
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn parse_expression(&mut self) -> Result<NodeId> {
        self.parse_expression_prec(Precedence::Lowest)
    }

    fn parse_expression_prec(&mut self, precedence: Precedence) -> Result<NodeId> {
        let mut expr = self.parse_prefix_expression()?;

        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    expr = self.finish_call(expr)?;
                    continue;
                }
                TokenKind::LBracket => {
                    expr = self.finish_index(expr)?;
                    continue;
                }
                TokenKind::Dot => {
                    expr = self.finish_method_call(expr)?;
                    continue;
                }
                _ => {}
            }

            let next_precedence = match self.infix_precedence() {
                Some(p) => p,
                None => break,
            };

            if precedence >= next_precedence {
                break;
            }

            expr = self.parse_infix_expression(expr, next_precedence)?;
        }

        Ok(expr)
    }

    fn infix_precedence(&self) -> Option<Precedence> {
        match self.peek_kind() {
            TokenKind::Question => Some(Precedence::Ternary),
            TokenKind::Keyword(Keyword::Or) => Some(Precedence::Or),
            TokenKind::Keyword(Keyword::And) => Some(Precedence::And),
            TokenKind::DoubleEqual
            | TokenKind::BangEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Keyword(Keyword::In) => Some(Precedence::Comparison),
            TokenKind::Keyword(Keyword::Not)
                if self.peek_kind_at(1) == Some(TokenKind::Keyword(Keyword::In)) =>
            {
                Some(Precedence::Comparison)
            }
            TokenKind::Plus | TokenKind::Minus => Some(Precedence::Term),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(Precedence::Factor),
            _ => None,
        }
    }

    fn parse_prefix_expression(&mut self) -> Result<NodeId> {
        let token = self.advance().clone();
        let location = Self::location_of(&token);
        match token.kind {
            TokenKind::Identifier => Ok(self.identifier(&token)),
            TokenKind::IntegerLiteral(value) => Ok(self
                .ast
                .alloc(NodeKind::IntegerLiteral { value }, location)),
            TokenKind::BooleanLiteral(value) => Ok(self
                .ast
                .alloc(NodeKind::BooleanLiteral { value }, location)),
            TokenKind::StringLiteral(value) => Ok(self.ast.alloc(
                NodeKind::StringLiteral {
                    value,
                    is_format: false,
                },
                location,
            )),
            TokenKind::FormatString(value) => Ok(self.ast.alloc(
                NodeKind::StringLiteral {
                    value,
                    is_format: true,
                },
                location,
            )),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                self.expect_token(TokenKind::RParen, "expected ')' after expression")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array_literal(location),
            TokenKind::LBrace => self.parse_dict_literal(location),
            TokenKind::Minus | TokenKind::Bang | TokenKind::Keyword(Keyword::Not) => {
                let op = match token.kind {
                    TokenKind::Minus => UnaryOperator::Negate,
                    TokenKind::Bang => UnaryOperator::Exclamation,
                    _ => UnaryOperator::Not,
                };
                let expr = self.parse_expression_prec(Precedence::Unary)?;
                let location = Location::union(&location, &self.ast.location(expr));
                Ok(self.ast.alloc(NodeKind::Unary { op, expr }, location))
            }
            other => bail!(
                "unexpected token {:?} at line {}, column {}",
                other,
                token.line,
                token.column
            ),
        }
    }

    fn parse_array_literal(&mut self, opening: Location) -> Result<NodeId> {
        let mut elements = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            if !self.eat_comma_before(&TokenKind::RBracket, "array literal")? {
                break;
            }
        }
        let closing = self.peek().clone();
        self.expect_token(TokenKind::RBracket, "expected ']' to close array")?;
        let location = Location::union(&opening, &Self::location_of(&closing));
        Ok(self
            .ast
            .alloc(NodeKind::ArrayLiteral { elements }, location))
    }

    fn parse_dict_literal(&mut self, opening: Location) -> Result<NodeId> {
        let mut entries = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace) {
            let key = self.parse_expression()?;
            self.expect_token(TokenKind::Colon, "expected ':' after dictionary key")?;
            let value = self.parse_expression()?;
            let location = self.span(key, value);
            entries.push(
                self.ast
                    .alloc(NodeKind::KeyValueItem { key, value }, location),
            );
            if !self.eat_comma_before(&TokenKind::RBrace, "dictionary literal")? {
                break;
            }
        }
        let closing = self.peek().clone();
        self.expect_token(TokenKind::RBrace, "expected '}' to close dictionary")?;
        let location = Location::union(&opening, &Self::location_of(&closing));
        Ok(self
            .ast
            .alloc(NodeKind::DictionaryLiteral { entries }, location))
    }

    /// Consumes a separating comma. Returns false when the closing token
    /// follows directly.
    fn eat_comma_before(&mut self, closing: &TokenKind, context: &str) -> Result<bool> {
        match self.peek_kind() {
            TokenKind::Comma => {
                self.advance();
                Ok(true)
            }
            kind if kind == closing => Ok(false),
            other => {
                let token = self.peek();
                bail!(
                    "expected ',' in {}, found {:?} at line {}, column {}",
                    context,
                    other,
                    token.line,
                    token.column
                );
            }
        }
    }

    fn parse_infix_expression(&mut self, left: NodeId, precedence: Precedence) -> Result<NodeId> {
        let operator_token = self.advance().clone();
        match operator_token.kind {
            TokenKind::Question => {
                let if_true = self.parse_expression()?;
                self.expect_token(TokenKind::Colon, "expected ':' in ternary expression")?;
                let if_false = self.parse_expression_prec(Precedence::Lowest)?;
                let location = self.span(left, if_false);
                Ok(self.ast.alloc(
                    NodeKind::Conditional {
                        condition: left,
                        if_true,
                        if_false,
                    },
                    location,
                ))
            }
            ref kind => {
                let op = if *kind == TokenKind::Keyword(Keyword::Not) {
                    self.expect_keyword(Keyword::In, "expected 'in' after 'not'")?;
                    BinaryOperator::NotIn
                } else {
                    binary_operator_from_token(kind)?
                };
                let right = self.parse_expression_prec(precedence)?;
                let location = self.span(left, right);
                Ok(self.ast.alloc(
                    NodeKind::Binary {
                        lhs: left,
                        op,
                        rhs: right,
                    },
                    location,
                ))
            }
        }
    }

    fn finish_call(&mut self, callee: NodeId) -> Result<NodeId> {
        let open_token = self.peek().clone();
        if self.ast.identifier_name(callee).is_none() {
            bail!(
                "only functions can be called, at line {}, column {}",
                open_token.line,
                open_token.column
            );
        }
        self.expect_token(TokenKind::LParen, "expected '(' to start argument list")?;
        let (args, closing) = self.parse_arguments()?;
        let location = Location::union(&self.ast.location(callee), &closing);
        Ok(self.ast.alloc(
            NodeKind::FunctionCall {
                id: callee,
                args,
                function: None,
            },
            location,
        ))
    }

    /// Arguments after an opening `(` up to and including `)`. Returns the
    /// argument list (if any argument exists) and the location of `)`.
    fn parse_arguments(&mut self) -> Result<(Option<NodeId>, Location)> {
        let mut arguments = Vec::new();

        while !matches!(self.peek_kind(), TokenKind::RParen) {
            let argument = if matches!(self.peek_kind(), TokenKind::Identifier)
                && matches!(self.peek_kind_at(1), Some(TokenKind::Colon))
            {
                let name_token = self.advance().clone();
                let key = self.identifier(&name_token);
                self.advance(); // consume ':'
                let value = self.parse_expression()?;
                let location = self.span(key, value);
                self.ast
                    .alloc(NodeKind::KeywordItem { key, value }, location)
            } else {
                self.parse_expression()?
            };
            arguments.push(argument);
            if !self.eat_comma_before(&TokenKind::RParen, "argument list")? {
                break;
            }
        }

        let closing_token = self.peek().clone();
        self.expect_token(TokenKind::RParen, "expected ')' to close argument list")?;
        let closing = Self::location_of(&closing_token);

        let args = match (arguments.first(), arguments.last()) {
            (Some(first), Some(last)) => {
                let location = self.span(*first, *last);
                Some(self.ast.alloc(
                    NodeKind::ArgumentList { args: arguments },
                    location,
                ))
            }
            _ => None,
        };
        Ok((args, closing))
    }

    fn finish_index(&mut self, outer: NodeId) -> Result<NodeId> {
        self.expect_token(TokenKind::LBracket, "expected '[' for subscript")?;
        let inner = self.parse_expression()?;
        let closing_token = self.peek().clone();
        self.expect_token(TokenKind::RBracket, "expected ']' after subscript")?;
        let location = Location::union(
            &self.ast.location(outer),
            &Self::location_of(&closing_token),
        );
        Ok(self
            .ast
            .alloc(NodeKind::Subscript { outer, inner }, location))
    }

    fn finish_method_call(&mut self, obj: NodeId) -> Result<NodeId> {
        self.expect_token(TokenKind::Dot, "expected '.' for method call")?;
        let name_token = self.peek().clone();
        self.expect_token(TokenKind::Identifier, "expected method name after '.'")?;
        let id = self.identifier(&name_token);
        self.expect_token(TokenKind::LParen, "expected '(' after method name")?;
        let (args, closing) = self.parse_arguments()?;
        let location = Location::union(&self.ast.location(obj), &closing);
        Ok(self.ast.alloc(
            NodeKind::MethodCall {
                obj,
                id,
                args,
                method: None,
            },
            location,
        ))
    }

    fn identifier(&mut self, token: &Token) -> NodeId {
        self.ast.alloc(
            NodeKind::Identifier {
                name: token.lexeme.clone(),
            },
            Self::location_of(token),
        )
    }

    fn expect_newline(&mut self, message: &str) -> Result<()> {
        match self.peek_kind() {
            TokenKind::Newline => {
                self.skip_newlines();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => {
                let token = self.peek();
                bail!(
                    "{} at line {}, column {} (found '{}')",
                    message,
                    token.line,
                    token.column,
                    token.lexeme
                );
            }
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword, message: &str) -> Result<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            let token = self.peek().clone();
            bail!(
                "{} at line {}, column {} (found '{}')",
                message,
                token.line,
                token.column,
                token.lexeme
            );
        }
    }

    fn expect_token(&mut self, expected: TokenKind, message: &str) -> Result<()> {
        if std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(&expected) {
            self.advance();
            Ok(())
        } else {
            let token = self.peek().clone();
            bail!(
                "{} at line {}, column {} (found '{}')",
                message,
                token.line,
                token.column,
                token.lexeme
            );
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek_keyword(), Some(kw) if kw == keyword)
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        match self.peek_kind() {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.current].kind
    }

    fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens
            .get(self.current + offset)
            .map(|token| token.kind.clone())
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
            return &self.tokens[self.current - 1];
        }
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }
}

fn assignment_operator_from_token(kind: &TokenKind) -> Option<AssignmentOperator> {
    let operator = match kind {
        TokenKind::Equal => AssignmentOperator::Equals,
        TokenKind::PlusEqual => AssignmentOperator::PlusEquals,
        TokenKind::MinusEqual => AssignmentOperator::MinusEquals,
        TokenKind::StarEqual => AssignmentOperator::MulEquals,
        TokenKind::SlashEqual => AssignmentOperator::DivEquals,
        TokenKind::PercentEqual => AssignmentOperator::ModEquals,
        _ => return None,
    };
    Some(operator)
}

fn binary_operator_from_token(kind: &TokenKind) -> Result<BinaryOperator> {
    let operator = match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::DoubleEqual => BinaryOperator::Equal,
        TokenKind::BangEqual => BinaryOperator::NotEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::Keyword(Keyword::And) => BinaryOperator::And,
        TokenKind::Keyword(Keyword::Or) => BinaryOperator::Or,
        TokenKind::Keyword(Keyword::In) => BinaryOperator::In,
        other => bail!("unsupported binary operator {:?}", other),
    };
    Ok(operator)
}
