use lexa_syntax::ast::{Block, DataType, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
use lexa_syntax::diagnostic::{sort_by_position, Diagnostic, DiagnosticKind};

use crate::scope::ScopeArena;
use crate::types::{binary_result, is_assignable, unary_result, ValueType};

/// Walks a recovered [`Program`] and collects semantic diagnostics.
///
/// Scopes are opened for `main`'s body, every nested block, and every `for`
/// header, mirroring the block structure the parser recognized.
#[derive(Debug, Default)]
pub struct Checker {
    scopes: ScopeArena,
    diagnostics: Vec<Diagnostic>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_program(mut self, program: &Program) -> Vec<Diagnostic> {
        if let Some(body) = &program.body {
            self.check_block(body);
            if !block_returns(body) {
                self.report(DiagnosticKind::MissingReturn, body.line, body.col);
            }
        }
        sort_by_position(&mut self.diagnostics);
        self.diagnostics
    }

    fn report(&mut self, kind: DiagnosticKind, line: usize, col: usize) {
        self.diagnostics.push(Diagnostic::new(kind, line, col));
    }

    fn check_block(&mut self, block: &Block) {
        self.scopes.push();
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Declaration { ty, name, init } => {
                let value = init.as_ref().map(|e| (self.type_of(e), e.line, e.col));
                if *ty == DataType::Void {
                    self.report(DiagnosticKind::VoidVariable { name: name.clone() }, stmt.line, stmt.col);
                }
                if let Err(existing) = self.scopes.declare(name, *ty, stmt.line, stmt.col) {
                    self.report(
                        DiagnosticKind::Redeclaration {
                            name: name.clone(),
                            first_line: existing.line,
                        },
                        stmt.line,
                        stmt.col,
                    );
                }
                if let Some((found, line, col)) = value {
                    self.check_assignable(name, *ty, found, line, col);
                }
            }
            StmtKind::Assign { target, value } => {
                let found = self.type_of(value);
                if let Some(ty) = self.resolve(target, stmt.line, stmt.col) {
                    self.check_assignable(target, ty, found, value.line, value.col);
                }
            }
            StmtKind::Step { target, op } => {
                if let Some(ty) = self.resolve(target, stmt.line, stmt.col) {
                    self.check_unary(*op, ValueType::from(ty), stmt.line, stmt.col);
                }
            }
            StmtKind::If { branches, else_block } => {
                for (cond, block) in branches {
                    self.type_of(cond);
                    self.check_block(block);
                }
                if let Some(block) = else_block {
                    self.check_block(block);
                }
            }
            StmtKind::While { cond, body } => {
                self.type_of(cond);
                self.check_block(body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.check_block(body);
                self.type_of(cond);
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                // the header gets its own scope so `i` dies with the loop
                self.scopes.push();
                if let Some(init) = init {
                    self.check_stmt(init);
                }
                if let Some(cond) = cond {
                    self.type_of(cond);
                }
                if let Some(step) = step {
                    self.check_stmt(step);
                }
                self.check_block(body);
                self.scopes.pop();
            }
            StmtKind::Return(Some(expr)) => {
                let found = self.type_of(expr);
                if !is_assignable(DataType::Int, found) {
                    self.report(
                        DiagnosticKind::ReturnTypeMismatch {
                            found: found.to_string(),
                        },
                        expr.line,
                        expr.col,
                    );
                }
            }
            StmtKind::Return(None) | StmtKind::Break | StmtKind::Continue => {}
            StmtKind::Block(block) => self.check_block(block),
        }
    }

    fn check_assignable(&mut self, name: &str, ty: DataType, found: ValueType, line: usize, col: usize) {
        if is_assignable(ty, found) {
            return;
        }
        self.report(
            DiagnosticKind::TypeMismatch {
                name: name.to_string(),
                expected: ty.to_string(),
                found: found.to_string(),
            },
            line,
            col,
        );
    }

    /// Declared type of `name`, reporting it when nothing in scope declares it.
    fn resolve(&mut self, name: &str, line: usize, col: usize) -> Option<DataType> {
        match self.scopes.lookup(name) {
            Some(sym) => Some(sym.ty),
            None => {
                self.report(
                    DiagnosticKind::UndeclaredVariable {
                        name: name.to_string(),
                    },
                    line,
                    col,
                );
                None
            }
        }
    }

    fn type_of(&mut self, expr: &Expr) -> ValueType {
        match &expr.kind {
            ExprKind::Literal(lit, _) => ValueType::from(*lit),
            ExprKind::Ident(name) => self
                .resolve(name, expr.line, expr.col)
                .map(ValueType::from)
                .unwrap_or(ValueType::Unknown),
            ExprKind::Unary(op, operand) => {
                let inner = self.type_of(operand);
                self.check_unary(*op, inner, expr.line, expr.col)
            }
            ExprKind::Binary(first, steps) => {
                let mut acc = self.type_of(first);
                for step in steps {
                    let rhs = self.type_of(&step.rhs);
                    acc = match binary_result(step.op, acc, rhs) {
                        Some(ty) => ty,
                        None => {
                            self.report(
                                DiagnosticKind::BinaryOperandMismatch {
                                    op: step.op.symbol().to_string(),
                                    lhs: acc.to_string(),
                                    rhs: rhs.to_string(),
                                },
                                step.line,
                                step.col,
                            );
                            ValueType::Unknown
                        }
                    };
                }
                acc
            }
        }
    }

    /// Result of `op operand`; an operand the operator rejects is reported and
    /// the result becomes `Unknown`.
    fn check_unary(&mut self, op: UnaryOp, operand: ValueType, line: usize, col: usize) -> ValueType {
        match unary_result(op, operand) {
            Some(ty) => ty,
            None => {
                self.report(
                    DiagnosticKind::UnaryOperandMismatch {
                        op: op.symbol().to_string(),
                        operand: operand.to_string(),
                    },
                    line,
                    col,
                );
                ValueType::Unknown
            }
        }
    }
}

fn block_returns(block: &Block) -> bool {
    block.stmts.iter().any(stmt_returns)
}

/// True when every path through `stmt` ends in a `return`. Loops never count.
fn stmt_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::If {
            branches,
            else_block: Some(else_block),
        } => branches.iter().all(|(_, block)| block_returns(block)) && block_returns(else_block),
        StmtKind::Block(block) => block_returns(block),
        _ => false,
    }
}
