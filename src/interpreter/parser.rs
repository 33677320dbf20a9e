use crate::interpreter::ast::{Branch, Expr, Function, Program, Stmt};
use crate::interpreter::lexer::{Lexer, LexerError, Token, TokenPos, TokenType};

#[cfg(test)]
mod tests;

const COMPARISON_OPERATORS: [TokenType; 5] = [
    TokenType::Greater, TokenType::GreaterEqual,
    TokenType::Less, TokenType::LessEqual,
    TokenType::Equal,
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("{pos} Syntax error at {found}: {message}")]
    UnexpectedToken { pos: TokenPos, found: String, message: String },
    #[error("Syntax error at end of input: {message}")]
    UnexpectedEof { message: String },
    #[error("{pos} Invalid number literal '{literal}'")]
    InvalidNumber { pos: TokenPos, literal: String },
    #[error("{pos} Duplicate parameter '{name}'")]
    DuplicateParameter { pos: TokenPos, name: String },
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Recursive descent parser over a [`Lexer`].
///
/// Keeps two tokens of lookahead (`current` and `next`): telling `x = ...`
/// apart from an expression statement, and deciding whether a line break
/// continues the current block, both need to see one token past the current one.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    previous: Token, current: Token, next: Token,

    lexer_errors: Vec<LexerError>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        Parser {
            lexer,
            previous: Token::empty(), current: Token::empty(), next: Token::empty(),
            lexer_errors: Vec::new(),
        }
    }

    /// Diagnostics the lexer reported while the parser pulled tokens.
    pub fn lexer_errors(&self) -> &[LexerError] {
        &self.lexer_errors
    }

    // Declaration parsing

    pub fn parse(&mut self) -> ParseResult<Program> {
        // Fill `current` and `next`
        self.consume();
        self.consume();

        self.skip_newlines();
        let mut functions = Vec::new();

        loop {
            functions.push(self.parse_function()?);
            self.skip_newlines();

            if self.is_eof() {
                break;
            }
        }

        Ok(Program { functions })
    }

    fn parse_function(&mut self) -> ParseResult<Function> {
        self.expect(TokenType::Function, "Expected 'jugador' to start a function definition")?;
        let name = self.expect(TokenType::Identifier, "Expected function name after 'jugador'")?;

        self.expect(TokenType::ParenthesisLeft, "Expected '(' after function name")?;
        let mut params: Vec<Token> = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            params.push(self.expect(TokenType::Identifier, "Expected parameter name after '('")?);

            while self.matches(TokenType::Comma) {
                let param = self.expect(TokenType::Identifier, "Expected parameter name after ','")?;

                if params.iter().any(|existing| existing.source() == param.source()) {
                    return Err(SyntaxError::DuplicateParameter { pos: *param.start(), name: param.source().to_owned() });
                }

                params.push(param);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after function parameters")?;
        self.expect_block_start("function header")?;

        let body = self.parse_block()?;
        Ok(Function { name, params, body })
    }

    // Statement parsing

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![self.parse_statement()?];

        // Without indentation tokens a block runs until a line that cannot start a statement
        while self.check(TokenType::Newline) && Self::starts_statement(self.next.token_type()) {
            self.consume();
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn starts_statement(token_type: TokenType) -> bool {
        matches!(token_type,
            TokenType::Identifier | TokenType::Number | TokenType::String
            | TokenType::True | TokenType::False | TokenType::ParenthesisLeft
            | TokenType::Return | TokenType::If | TokenType::For | TokenType::Nop)
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.check(TokenType::Identifier) && self.next.token_type() == TokenType::Assign {
            self.consume();
            let name = self.previous.clone();
            self.consume(); // '='

            let expr = self.parse_expression()?;
            return Ok(Stmt::Assign { name, expr });
        } else if self.matches(TokenType::Return) {
            let token = self.previous.clone();
            let expr = self.parse_expression()?;

            return Ok(Stmt::Return { token, expr });
        } else if self.matches(TokenType::If) {
            return self.parse_if_statement();
        } else if self.matches(TokenType::For) {
            return self.parse_for_statement();
        } else if self.matches(TokenType::Nop) {
            return Ok(Stmt::Nop);
        }

        Ok(Stmt::Expr(self.parse_expression()?))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let token = self.previous.clone();

        let condition = self.parse_condition("tarjeta")?;
        self.expect_block_start("'tarjeta' condition")?;
        let then = self.parse_block()?;

        let mut branches = vec![];

        while self.check(TokenType::Newline) && self.next.token_type() == TokenType::Elif {
            self.consume();
            self.consume();
            let token = self.previous.clone();

            let condition = self.parse_condition("amonestacion")?;
            self.expect_block_start("'amonestacion' condition")?;
            let body = self.parse_block()?;

            branches.push(Branch::Elif { token, condition, body });
        }

        if self.check(TokenType::Newline) && self.next.token_type() == TokenType::Else {
            self.consume();
            self.consume();

            self.expect_block_start("'expulsado'")?;
            let body = self.parse_block()?;

            branches.push(Branch::Else { body });
        }

        Ok(Stmt::If { token, condition, then, branches })
    }

    fn parse_condition(&mut self, keyword: &str) -> ParseResult<Expr> {
        self.expect(TokenType::ParenthesisLeft, &format!("Expected '(' after '{}'", keyword))?;
        let condition = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, &format!("Expected ')' after '{}' condition", keyword))?;

        Ok(condition)
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        let variable = self.expect(TokenType::Identifier, "Expected loop variable after 'delantero'")?;
        self.expect(TokenType::In, "Expected 'en' after loop variable")?;
        self.expect(TokenType::Range, "Expected 'rango' after 'en'")?;

        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'rango'")?;
        let count = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after loop count")?;

        self.expect_block_start("'rango(...)'")?;
        let body = self.parse_block()?;

        Ok(Stmt::For { variable, count, body })
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_and()?;

        while self.matches(TokenType::Or) {
            let right = self.parse_and()?;

            expr = Expr::Or { left: Box::new(expr), right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;

        while self.matches(TokenType::And) {
            let right = self.parse_comparison()?;

            expr = Expr::And { left: Box::new(expr), right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_term()?;

        if !self.matches_any(&COMPARISON_OPERATORS) {
            return Ok(expr);
        }

        let operator = self.previous.clone();
        let right = self.parse_term()?;

        if COMPARISON_OPERATORS.contains(&self.current.token_type()) {
            return Err(self.error_at_current("Comparisons cannot be chained"));
        }

        Ok(Expr::Comparison { left: Box::new(expr), operator, right: Box::new(right) })
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_factor()?;

        while self.matches_any(&[TokenType::Plus, TokenType::Minus]) {
            let operator = self.previous.clone();
            let right = self.parse_factor()?;

            expr = Expr::BinaryOperator { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.matches_any(&[TokenType::Multiply, TokenType::Divide]) {
            let operator = self.previous.clone();
            let right = self.parse_primary()?;

            expr = Expr::BinaryOperator { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.matches(TokenType::Number) {
            return self.parse_number();
        } else if self.matches(TokenType::String) {
            return Ok(Expr::ConstantString(self.previous.source().to_owned()));
        } else if self.matches(TokenType::True) {
            return Ok(Expr::ConstantBoolean(true));
        } else if self.matches(TokenType::False) {
            return Ok(Expr::ConstantBoolean(false));
        } else if self.matches(TokenType::Identifier) {
            let name = self.previous.clone();

            return if self.matches(TokenType::ParenthesisLeft) {
                self.finish_call(name)
            } else {
                Ok(Expr::Variable(name))
            };
        } else if self.matches(TokenType::ParenthesisLeft) {
            let expr = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expected ')' after expression")?;

            return Ok(expr);
        }

        Err(self.error_at_current("Expected expression"))
    }

    fn parse_number(&mut self) -> ParseResult<Expr> {
        let number = &self.previous;
        let invalid = || SyntaxError::InvalidNumber { pos: *number.start(), literal: number.source().to_owned() };

        if number.source().contains('.') {
            number.source().parse().map(Expr::ConstantFloat).map_err(|_| invalid())
        } else {
            number.source().parse().map(Expr::ConstantInt).map_err(|_| invalid())
        }
    }

    fn finish_call(&mut self, name: Token) -> ParseResult<Expr> {
        let mut args = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            args.push(self.parse_expression()?);

            while self.matches(TokenType::Comma) {
                args.push(self.parse_expression()?);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after function call arguments")?;
        Ok(Expr::FunctionCall { name, args })
    }

    // Token handling

    fn consume(&mut self) {
        self.previous = std::mem::replace(&mut self.current, Token::empty());
        std::mem::swap(&mut self.current, &mut self.next);

        loop {
            match self.lexer.scan_token() {
                Ok(token) => {
                    self.next = token;
                    break;
                },
                Err(err) => self.lexer_errors.push(err),
            }
        }
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(token_type) {
            self.consume();
            return Ok(self.previous.clone());
        }

        Err(self.error_at_current(message))
    }

    fn expect_block_start(&mut self, after: &str) -> ParseResult<()> {
        self.expect(TokenType::Colon, &format!("Expected ':' after {}", after))?;
        self.expect(TokenType::Newline, "Expected a line break after ':'")?;
        Ok(())
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    fn matches_any(&mut self, token_types: &[TokenType]) -> bool {
        for token_type in token_types {
            if self.check(*token_type) {
                self.consume();
                return true;
            }
        }

        false
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn skip_newlines(&mut self) {
        while self.matches(TokenType::Newline) {}
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }

    // Error handling

    fn error_at_current(&self, message: &str) -> SyntaxError {
        if self.is_eof() {
            SyntaxError::UnexpectedEof { message: message.to_owned() }
        } else {
            SyntaxError::UnexpectedToken {
                pos: *self.current.start(),
                found: self.current.to_string(),
                message: message.to_owned(),
            }
        }
    }
}
