//! Recursive-descent recognizer for `int main() { ... }` programs.
//!
//! The parser never stops at the first problem. Each failure is recorded as a
//! [`Diagnostic`] and the parser resynchronizes at the next `;` or at the end
//! of the enclosing block, so one malformed statement costs one diagnostic.
use lexa_syntax::ast::*;
use lexa_syntax::diagnostic::{sort_by_position, Diagnostic, DiagnosticKind};
use lexa_syntax::token::{Token, TokenKind};
use log::debug;

use crate::delimiters::check_delimiters;

/// Default limit for nested blocks and expressions.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Marker for "diagnostic already recorded, caller must recover".
struct Recover;

type PResult<T> = std::result::Result<T, Recover>;

/// Binary operator levels from loosest to tightest binding.
const BINARY_LEVELS: [&[(TokenKind, BinaryOp)]; 6] = [
    &[(TokenKind::Or, BinaryOp::Or)],
    &[(TokenKind::And, BinaryOp::And)],
    &[(TokenKind::Equal, BinaryOp::Eq), (TokenKind::NotEqual, BinaryOp::Ne)],
    &[
        (TokenKind::Less, BinaryOp::Lt),
        (TokenKind::LessEqual, BinaryOp::Le),
        (TokenKind::Greater, BinaryOp::Gt),
        (TokenKind::GreaterEqual, BinaryOp::Ge),
    ],
    &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
    &[
        (TokenKind::Star, BinaryOp::Mul),
        (TokenKind::Slash, BinaryOp::Div),
        (TokenKind::Percent, BinaryOp::Rem),
    ],
];

pub struct Parser<'a> {
    /// Tokens with `Unknown` entries removed; those are reported up front.
    tokens: Vec<&'a Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// Tokens that open a `main` definition, in source order.
    main_defs: Vec<&'a Token>,
    delimiters_balanced: bool,
    max_depth: usize,
    depth: usize,
    depth_reported: bool,
    loop_depth: usize,
    end: (usize, usize),
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut diagnostics = Vec::new();
        let mut kept = Vec::with_capacity(tokens.len());
        for tok in tokens {
            if tok.kind == TokenKind::Unknown {
                let lexeme = tok.lexeme.lines().next().unwrap_or_default().to_string();
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnrecognizedToken { lexeme },
                    tok.line,
                    tok.col,
                ));
            } else {
                kept.push(tok);
            }
        }

        let delimiter_diagnostics = check_delimiters(tokens);
        let delimiters_balanced = delimiter_diagnostics.is_empty();
        diagnostics.extend(delimiter_diagnostics);

        let main_defs = kept
            .windows(2)
            .filter(|w| w[0].is_reserved("main") && w[1].kind == TokenKind::ParenOpen)
            .map(|w| w[0])
            .collect();

        Self {
            end: tokens.last().map(end_of).unwrap_or((1, 1)),
            tokens: kept,
            pos: 0,
            diagnostics,
            main_defs,
            delimiters_balanced,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            depth_reported: false,
            loop_depth: 0,
        }
    }

    /// Override the nesting limit for blocks and expressions.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    // === Token navigation ===

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }
    fn previous(&self) -> Option<&'a Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i).copied())
    }
    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }
    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |t| t.kind == kind)
    }
    fn check_reserved(&self, word: &str) -> bool {
        self.peek().map_or(false, |t| t.is_reserved(word))
    }

    // === Reporting ===

    fn report(&mut self, kind: DiagnosticKind, line: usize, col: usize) {
        self.diagnostics.push(Diagnostic::new(kind, line, col));
    }

    /// Report that `expected` was wanted at the current position.
    fn report_expected(&mut self, expected: &str) {
        match self.peek() {
            Some(tok) => self.report(
                DiagnosticKind::Expected {
                    expected: expected.to_string(),
                    found: tok.lexeme.clone(),
                },
                tok.line,
                tok.col,
            ),
            None => {
                let (line, col) = self.end;
                self.report(
                    DiagnosticKind::UnexpectedEof {
                        expected: expected.to_string(),
                    },
                    line,
                    col,
                );
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<&'a Token> {
        if let Some(tok) = self.peek() {
            if tok.kind == kind {
                self.pos += 1;
                return Ok(tok);
            }
        }
        // An unclosed opener at end of input is already a delimiter diagnostic.
        let covered = self.is_at_end() && kind.is_closing_delimiter() && !self.delimiters_balanced;
        if !covered {
            self.report_expected(expected);
        }
        Err(Recover)
    }

    /// Expect the `;` ending a statement. A missing `;` right before the start
    /// of another statement (or on a new line) is reported but not fatal.
    fn expect_terminator(&mut self) -> PResult<()> {
        if self.check(TokenKind::Semicolon) {
            self.pos += 1;
            return Ok(());
        }
        self.report_expected("';'");
        let Some(tok) = self.peek() else { return Ok(()) };
        let new_line = self.previous().map_or(false, |p| tok.line > p.line);
        if new_line || starts_statement(tok) || tok.kind == TokenKind::BraceClose {
            Ok(())
        } else {
            Err(Recover)
        }
    }

    /// Skip to a safe boundary: just past the next `;`, or just before the `}`
    /// closing the current block. Nested `{ ... }` are skipped as a unit.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                TokenKind::BraceOpen => {
                    depth += 1;
                    self.pos += 1;
                }
                TokenKind::BraceClose => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Enter one level of nesting, failing once the limit is reached.
    fn enter(&mut self, at: &Token) -> PResult<()> {
        if self.depth >= self.max_depth {
            if !self.depth_reported {
                self.depth_reported = true;
                self.report(
                    DiagnosticKind::NestingTooDeep {
                        limit: self.max_depth,
                    },
                    at.line,
                    at.col,
                );
            }
            return Err(Recover);
        }
        self.depth += 1;
        Ok(())
    }

    // === Program ===

    /// Parse the whole token stream into a recovered [`Program`] plus every
    /// syntax diagnostic, sorted by source position.
    pub fn parse_program(mut self) -> (Program, Vec<Diagnostic>) {
        let mut program = Program::default();

        if let Some(first) = self.main_defs.first().copied() {
            for dup in self.main_defs.clone().into_iter().skip(1) {
                self.report(
                    DiagnosticKind::DuplicateMain {
                        first_line: first.line,
                    },
                    dup.line,
                    dup.col,
                );
            }
        } else {
            let (line, col) = self.peek().map_or((1, 1), |t| (t.line, t.col));
            self.report(DiagnosticKind::MissingMain, line, col);
        }

        if !self.is_at_end() {
            let header_ok = self.parse_main_header(&mut program);
            if header_ok && !self.check(TokenKind::BraceOpen) {
                self.report_expected("'{' to open the body of 'main'");
            }
            while !self.is_at_end() && !self.check(TokenKind::BraceOpen) {
                self.pos += 1;
            }
            if self.check(TokenKind::BraceOpen) {
                if let Ok(body) = self.parse_block() {
                    program.body = Some(body);
                }
            }
            if let Some(tok) = self.peek() {
                self.report(
                    DiagnosticKind::TrailingTokens {
                        found: tok.lexeme.clone(),
                    },
                    tok.line,
                    tok.col,
                );
            }
        }

        debug!(
            "parsed program: {} top-level statements, {} syntax diagnostics",
            program.body.as_ref().map_or(0, |b| b.stmts.len()),
            self.diagnostics.len()
        );
        sort_by_position(&mut self.diagnostics);
        (program, self.diagnostics)
    }

    /// `int main ( [void] )`. Returns false when the header is unusable and
    /// the caller should look for the body's opening brace instead.
    fn parse_main_header(&mut self, program: &mut Program) -> bool {
        match self.peek() {
            Some(tok) if tok.kind.is_type_keyword() => {
                if tok.kind != TokenKind::TypeInt {
                    self.report(
                        DiagnosticKind::MainReturnType {
                            found: tok.lexeme.clone(),
                        },
                        tok.line,
                        tok.col,
                    );
                }
                self.pos += 1;
            }
            Some(tok) if tok.is_reserved("main") => {
                self.report_expected("return type 'int' before 'main'");
            }
            _ => {
                if !self.main_defs.is_empty() {
                    self.report_expected("'int main()'");
                }
                return false;
            }
        }

        match self.peek() {
            Some(tok) if tok.is_reserved("main") => {
                program.main_line = Some(tok.line);
                self.pos += 1;
            }
            _ => {
                if !self.main_defs.is_empty() {
                    self.report_expected("'main'");
                }
                return false;
            }
        }

        if self.expect(TokenKind::ParenOpen, "'(' after 'main'").is_err() {
            return false;
        }
        if self.check(TokenKind::TypeVoid) {
            self.pos += 1;
        }
        self.expect(TokenKind::ParenClose, "')' after 'main('").is_ok()
    }

    // === Statements ===

    fn parse_block(&mut self) -> PResult<Block> {
        let open = self.expect(TokenKind::BraceOpen, "'{'")?;
        let mut block = Block {
            stmts: Vec::new(),
            line: open.line,
            col: open.col,
        };
        if self.enter(open).is_err() {
            self.skip_block_contents();
            return Ok(block);
        }
        while let Some(tok) = self.peek() {
            if tok.kind == TokenKind::BraceClose {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => block.stmts.push(stmt),
                Err(Recover) => self.synchronize(),
            }
        }
        self.depth -= 1;
        let _ = self.expect(TokenKind::BraceClose, "'}'");
        Ok(block)
    }

    /// Skip past the `}` matching an already consumed `{`.
    fn skip_block_contents(&mut self) {
        let mut depth = 1usize;
        while let Some(tok) = self.advance() {
            match tok.kind {
                TokenKind::BraceOpen => depth += 1,
                TokenKind::BraceClose => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn parse_statement(&mut self) -> PResult<Stmt> {
        let Some(tok) = self.peek() else {
            self.report_expected("a statement");
            return Err(Recover);
        };
        let kind = match tok.kind {
            k if k.is_type_keyword() => self.parse_declaration(true)?,
            TokenKind::Identifier | TokenKind::Increment | TokenKind::Decrement => {
                self.parse_simple(true)?
            }
            TokenKind::BraceOpen => StmtKind::Block(self.parse_block()?),
            TokenKind::ReservedWord => match tok.lexeme.as_str() {
                "if" => self.parse_if()?,
                "while" => self.parse_while()?,
                "do" => self.parse_do_while()?,
                "for" => self.parse_for()?,
                "return" => self.parse_return()?,
                "break" => self.parse_loop_control(StmtKind::Break)?,
                "continue" => self.parse_loop_control(StmtKind::Continue)?,
                _ => return Err(self.invalid_statement(tok)),
            },
            _ => return Err(self.invalid_statement(tok)),
        };
        Ok(Stmt {
            kind,
            line: tok.line,
            col: tok.col,
        })
    }

    fn invalid_statement(&mut self, tok: &Token) -> Recover {
        self.report(
            DiagnosticKind::InvalidStatement {
                found: tok.lexeme.clone(),
            },
            tok.line,
            tok.col,
        );
        Recover
    }

    /// `<type> <name> [= <expr>]` with the `;` when `terminated`.
    fn parse_declaration(&mut self, terminated: bool) -> PResult<StmtKind> {
        let Some(ty_tok) = self.advance() else { return Err(Recover) };
        let Some(ty) = DataType::from_token_kind(ty_tok.kind) else { return Err(Recover) };
        let expected_name = format!("a variable name after '{}'", ty_tok.lexeme);
        let name = self.expect(TokenKind::Identifier, &expected_name)?.lexeme.clone();

        let mut init = None;
        if self.check(TokenKind::Assign) {
            self.pos += 1;
            match self.parse_expression() {
                Ok(expr) => init = Some(expr),
                // Keep the declaration so later uses of `name` still resolve.
                Err(Recover) if terminated => {
                    self.synchronize();
                    return Ok(StmtKind::Declaration { ty, name, init });
                }
                Err(Recover) => return Err(Recover),
            }
        }
        if terminated {
            self.expect_terminator()?;
        }
        Ok(StmtKind::Declaration { ty, name, init })
    }

    /// Assignment or increment/decrement statement.
    fn parse_simple(&mut self, terminated: bool) -> PResult<StmtKind> {
        let kind = if let Some(op) = self.peek().and_then(|t| step_op(t.kind, true)) {
            self.pos += 1;
            let target = self.expect(TokenKind::Identifier, "a variable name")?.lexeme.clone();
            StmtKind::Step { target, op }
        } else {
            let target = self.expect(TokenKind::Identifier, "a statement")?.lexeme.clone();
            let next = self.peek();
            if self.check(TokenKind::Assign) {
                self.pos += 1;
                let value = self.parse_expression()?;
                StmtKind::Assign { target, value }
            } else if let Some(op) = next.and_then(|t| step_op(t.kind, false)) {
                self.pos += 1;
                StmtKind::Step { target, op }
            } else {
                self.report_expected(&format!("'=' after '{}'", target));
                return Err(Recover);
            }
        };
        if terminated {
            self.expect_terminator()?;
        }
        Ok(kind)
    }

    fn parse_condition(&mut self, keyword: &str) -> PResult<Expr> {
        self.expect(TokenKind::ParenOpen, &format!("'(' after '{}'", keyword))?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::ParenClose, "')' after the condition")?;
        Ok(cond)
    }

    /// `if` with any number of `else if` links, collected in a loop so a long
    /// chain stays flat.
    fn parse_if(&mut self) -> PResult<StmtKind> {
        let mut branches = Vec::new();
        let mut else_block = None;
        loop {
            self.pos += 1;
            let cond = self.parse_condition("if")?;
            let block = self.parse_block()?;
            branches.push((cond, block));
            if !self.check_reserved("else") {
                break;
            }
            self.pos += 1;
            if !self.check_reserved("if") {
                else_block = Some(self.parse_block()?);
                break;
            }
        }
        Ok(StmtKind::If { branches, else_block })
    }

    fn parse_loop_body(&mut self) -> PResult<Block> {
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        body
    }

    fn parse_while(&mut self) -> PResult<StmtKind> {
        self.pos += 1;
        let cond = self.parse_condition("while")?;
        let body = self.parse_loop_body()?;
        Ok(StmtKind::While { cond, body })
    }

    fn parse_do_while(&mut self) -> PResult<StmtKind> {
        self.pos += 1;
        let body = self.parse_loop_body()?;
        if !self.check_reserved("while") {
            self.report_expected("'while' after the body of 'do'");
            return Err(Recover);
        }
        self.pos += 1;
        let cond = self.parse_condition("while")?;
        self.expect_terminator()?;
        Ok(StmtKind::DoWhile { body, cond })
    }

    fn parse_for(&mut self) -> PResult<StmtKind> {
        self.pos += 1;
        self.expect(TokenKind::ParenOpen, "'(' after 'for'")?;

        let init = match self.peek() {
            Some(t) if t.kind == TokenKind::Semicolon => None,
            Some(t) => {
                let kind = if t.kind.is_type_keyword() {
                    self.parse_declaration(false)?
                } else {
                    self.parse_simple(false)?
                };
                Some(Box::new(Stmt {
                    kind,
                    line: t.line,
                    col: t.col,
                }))
            }
            None => {
                self.report_expected("a 'for' header");
                return Err(Recover);
            }
        };
        self.expect(TokenKind::Semicolon, "';' after the 'for' initializer")?;

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon, "';' after the 'for' condition")?;

        let step = match self.peek() {
            Some(t) if t.kind == TokenKind::ParenClose => None,
            Some(t) => Some(Box::new(Stmt {
                kind: self.parse_simple(false)?,
                line: t.line,
                col: t.col,
            })),
            None => {
                self.report_expected("')' to close the 'for' header");
                return Err(Recover);
            }
        };
        self.expect(TokenKind::ParenClose, "')' to close the 'for' header")?;

        let body = self.parse_loop_body()?;
        Ok(StmtKind::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_return(&mut self) -> PResult<StmtKind> {
        self.pos += 1;
        let value = match self.peek() {
            Some(t) if t.kind == TokenKind::Semicolon || t.kind == TokenKind::BraceClose => None,
            None => None,
            Some(_) => Some(self.parse_expression()?),
        };
        self.expect_terminator()?;
        Ok(StmtKind::Return(value))
    }

    fn parse_loop_control(&mut self, kind: StmtKind) -> PResult<StmtKind> {
        let Some(tok) = self.advance() else { return Err(Recover) };
        if self.loop_depth == 0 {
            self.report(
                DiagnosticKind::LoopControlOutsideLoop {
                    keyword: tok.lexeme.clone(),
                },
                tok.line,
                tok.col,
            );
        }
        self.expect_terminator()?;
        Ok(kind)
    }

    // === Expressions ===

    /// Parse a single expression starting at the current token.
    pub fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expression().ok()
    }

    fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, level: usize) -> PResult<Expr> {
        let Some(ops) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };
        let first = self.parse_binary(level + 1)?;
        let mut steps = Vec::new();
        while let Some((tok, op)) = self
            .peek()
            .and_then(|t| ops.iter().find(|(k, _)| *k == t.kind).map(|(_, op)| (t, *op)))
        {
            self.pos += 1;
            let rhs = self.parse_binary(level + 1)?;
            steps.push(BinaryStep {
                op,
                rhs,
                line: tok.line,
                col: tok.col,
            });
        }
        if steps.is_empty() {
            return Ok(first);
        }
        let (line, col) = (first.line, first.col);
        Ok(Expr {
            kind: ExprKind::Binary(Box::new(first), steps),
            line,
            col,
        })
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let Some(tok) = self.peek() else {
            self.report_expected("an expression");
            return Err(Recover);
        };
        let op = match tok.kind {
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            k => step_op(k, true),
        };
        let Some(op) = op else {
            return self.parse_primary();
        };
        self.pos += 1;
        self.enter(tok)?;
        let operand = self.parse_unary();
        self.depth -= 1;
        Ok(Expr {
            kind: ExprKind::Unary(op, Box::new(operand?)),
            line: tok.line,
            col: tok.col,
        })
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let Some(tok) = self.peek() else {
            self.report_expected("an expression");
            return Err(Recover);
        };
        let literal = match tok.kind {
            TokenKind::IntLiteral => Some(Literal::Int),
            TokenKind::FloatLiteral => Some(Literal::Float),
            TokenKind::StringLiteral => Some(Literal::String),
            TokenKind::CharLiteral => Some(Literal::Char),
            TokenKind::BoolLiteral => Some(Literal::Bool),
            _ => None,
        };
        let at = |kind| Expr {
            kind,
            line: tok.line,
            col: tok.col,
        };

        if let Some(lit) = literal {
            self.pos += 1;
            return Ok(at(ExprKind::Literal(lit, tok.lexeme.clone())));
        }
        match tok.kind {
            TokenKind::Identifier => {
                self.pos += 1;
                let ident = at(ExprKind::Ident(tok.lexeme.clone()));
                match self.peek().and_then(|t| step_op(t.kind, false)) {
                    Some(op) => {
                        self.pos += 1;
                        Ok(at(ExprKind::Unary(op, Box::new(ident))))
                    }
                    None => Ok(ident),
                }
            }
            TokenKind::ParenOpen => {
                self.pos += 1;
                self.enter(tok)?;
                let inner = self.parse_expression();
                self.depth -= 1;
                let inner = inner?;
                self.expect(TokenKind::ParenClose, "')'")?;
                Ok(inner)
            }
            _ => {
                self.report_expected("an expression");
                Err(Recover)
            }
        }
    }
}

/// Increment/decrement operator for `kind`, prefix or postfix flavor.
fn step_op(kind: TokenKind, prefix: bool) -> Option<UnaryOp> {
    match (kind, prefix) {
        (TokenKind::Increment, true) => Some(UnaryOp::PreIncrement),
        (TokenKind::Decrement, true) => Some(UnaryOp::PreDecrement),
        (TokenKind::Increment, false) => Some(UnaryOp::PostIncrement),
        (TokenKind::Decrement, false) => Some(UnaryOp::PostDecrement),
        _ => None,
    }
}

fn starts_statement(tok: &Token) -> bool {
    tok.kind.is_type_keyword()
        || tok.kind == TokenKind::BraceOpen
        || matches!(
            (tok.kind, tok.lexeme.as_str()),
            (
                TokenKind::ReservedWord,
                "if" | "while" | "do" | "for" | "return" | "break" | "continue"
            )
        )
}

/// Position just past the last character of `tok`.
fn end_of(tok: &Token) -> (usize, usize) {
    match tok.lexeme.rfind('\n') {
        Some(idx) => (
            tok.line + tok.lexeme.matches('\n').count(),
            tok.lexeme[idx + 1..].chars().count() + 1,
        ),
        None => (tok.line, tok.col + tok.lexeme.chars().count()),
    }
}
