//! Bytecode compiler: transforms AST into a chunk.
//!
//! Compilation is type-directed: every expression is assigned a target
//! representation up front, operands are compiled recursively and coerced
//! to that representation, and only then is the operator opcode emitted.

use crate::ast::{BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
use crate::bytecode::chunk::Chunk;
use crate::bytecode::instruction::{Instruction, Op};
use crate::bytecode::kind::{cast_sequence, Kind};
use crate::bytecode::symbol::SymbolTable;
use crate::error::CompileError;
use crate::span::Span;

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// The bytecode compiler. Symbols persist across `compile` calls so a
/// REPL can keep slot assignments stable from line to line; the chunk is
/// handed off fresh each time.
pub struct Compiler {
    chunk: Chunk,
    symbols: SymbolTable,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            chunk: Chunk::new(),
            symbols: SymbolTable::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Compile a program into a chunk. On error the partial chunk is
    /// discarded.
    pub fn compile(&mut self, program: &Program) -> CompileResult<Chunk> {
        self.chunk = Chunk::new();
        for statement in &program.statements {
            self.statement(statement)?;
        }
        Ok(std::mem::take(&mut self.chunk))
    }

    // ===== Statements =====

    fn statement(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Expression(expression) => {
                self.expression(expression)?;
                // Statement values do not survive into the next statement.
                self.emit(Op::Pop, &[], stmt.span)
            }
            StmtKind::Empty => Ok(()),
            StmtKind::Block(statements) => {
                for statement in statements {
                    self.statement(statement)?;
                }
                Ok(())
            }
            StmtKind::Var { declarations } => {
                for declaration in declarations {
                    self.expression(declaration)?;
                    self.emit(Op::Pop, &[], stmt.span)?;
                }
                Ok(())
            }
        }
    }

    // ===== Expressions =====

    fn expression(&mut self, expr: &Expr) -> CompileResult<()> {
        match &expr.kind {
            ExprKind::NumberLiteral { lexeme, value } => {
                self.number_literal(lexeme, *value, expr.span)
            }
            ExprKind::StringLiteral(value) => self.string_literal(value, expr.span),
            ExprKind::BoolLiteral(value) => self.emit(Op::BoolLoad, &[*value as u64], expr.span),
            ExprKind::Null => self.emit(Op::NullLoad, &[], expr.span),
            ExprKind::Undefined => self.emit(Op::UndefLoad, &[], expr.span),
            ExprKind::Identifier(name) => self.identifier(name, expr.span),
            ExprKind::Prefix { op, right } => self.prefix(expr, *op, right),
            ExprKind::Infix { left, op, right } => self.infix(expr, left, *op, right),
            ExprKind::Assign { target, value } => self.assignment(target, value, expr.span),
        }
    }

    fn prefix(&mut self, expr: &Expr, op: UnaryOp, right: &Expr) -> CompileResult<()> {
        let target = self.infer(expr);
        let right_kind = self.infer(right);

        self.expression(right)?;
        self.cast(right_kind, target, expr.span)?;

        match op {
            UnaryOp::Plus => Ok(()),
            UnaryOp::Negate => match target {
                Kind::Int32 => {
                    self.emit(Op::I32Load, &[u32::MAX as u64], expr.span)?;
                    self.emit(Op::I32Mul, &[], expr.span)
                }
                Kind::Float64 => {
                    self.emit(Op::F64Load, &[(-1.0f64).to_bits()], expr.span)?;
                    self.emit(Op::F64Mul, &[], expr.span)
                }
                _ => Ok(()),
            },
        }
    }

    fn infix(&mut self, expr: &Expr, left: &Expr, op: BinaryOp, right: &Expr) -> CompileResult<()> {
        let target = self.infer(expr);
        let left_kind = self.infer(left);
        let right_kind = self.infer(right);

        self.expression(left)?;
        self.cast(left_kind, target, left.span)?;

        self.expression(right)?;
        self.cast(right_kind, target, right.span)?;

        let opcode = match target {
            Kind::Int32 => match op {
                BinaryOp::Add => Some(Op::I32Add),
                BinaryOp::Subtract => Some(Op::I32Sub),
                BinaryOp::Multiply => Some(Op::I32Mul),
                // Division and modulo always lift to float64.
                _ => None,
            },
            Kind::Float64 => match op {
                BinaryOp::Add => Some(Op::F64Add),
                BinaryOp::Subtract => Some(Op::F64Sub),
                BinaryOp::Multiply => Some(Op::F64Mul),
                BinaryOp::Divide => Some(Op::F64Div),
                BinaryOp::Modulo => Some(Op::F64Mod),
            },
            Kind::String => match op {
                BinaryOp::Add => Some(Op::StrAdd),
                _ => None,
            },
            _ => None,
        };

        match opcode {
            Some(opcode) => self.emit(opcode, &[], expr.span),
            None => Err(CompileError::unsupported_operator(
                op.to_string(),
                format!("{} and {}", left_kind, right_kind),
                expr.span,
            )),
        }
    }

    fn assignment(&mut self, target: &Expr, value: &Expr, span: Span) -> CompileResult<()> {
        let ExprKind::Identifier(name) = &target.kind else {
            return Err(CompileError::unsupported_node(
                "assignment target",
                target.span,
            ));
        };

        self.expression(value)?;

        let symbol = match self.symbols.resolve(name) {
            Some(symbol) => symbol,
            None => self.symbols.define(name),
        };
        let kind = self.infer(value);
        self.symbols.set_kind(name, kind);

        // The assignment's value stays on the stack.
        self.emit(Op::SlotStore, &[symbol.index as u64], span)?;
        self.emit(Op::SlotLoad, &[symbol.index as u64], span)
    }

    fn number_literal(&mut self, lexeme: &str, value: f64, span: Span) -> CompileResult<()> {
        match lexeme {
            "NaN" => self.emit(Op::F64Load, &[f64::NAN.to_bits()], span),
            "Infinity" => self.emit(Op::F64Load, &[f64::INFINITY.to_bits()], span),
            _ => {
                if number_kind(lexeme, value) == Kind::Int32 {
                    self.emit(Op::I32Load, &[(value as i32 as u32) as u64], span)
                } else {
                    self.emit(Op::F64Load, &[value.to_bits()], span)
                }
            }
        }
    }

    fn string_literal(&mut self, value: &str, span: Span) -> CompileResult<()> {
        let offset = self.chunk.store(value.as_bytes());
        self.emit(Op::StrLoad, &[offset as u64, value.len() as u64], span)
    }

    fn identifier(&mut self, name: &str, span: Span) -> CompileResult<()> {
        let Some(symbol) = self.symbols.resolve(name) else {
            return Err(CompileError::UndefinedIdentifier(name.to_string(), span));
        };
        self.emit(Op::SlotLoad, &[symbol.index as u64], span)
    }

    // ===== Type inference =====

    /// The static representation of an expression. Pure: consults only
    /// the AST and the current symbol kinds.
    pub fn infer(&self, expr: &Expr) -> Kind {
        match &expr.kind {
            ExprKind::NumberLiteral { lexeme, value } => number_kind(lexeme, *value),
            ExprKind::StringLiteral(_) => Kind::String,
            ExprKind::BoolLiteral(_) => Kind::Bool,
            ExprKind::Null => Kind::Null,
            ExprKind::Undefined => Kind::Undefined,
            ExprKind::Identifier(name) => self
                .symbols
                .resolve(name)
                .map(|symbol| symbol.kind)
                .unwrap_or(Kind::Undefined),
            ExprKind::Prefix { right, .. } => match self.infer(right) {
                Kind::Bool => Kind::Int32,
                Kind::String => Kind::Float64,
                kind @ (Kind::Int32 | Kind::Float64) => kind,
                _ => Kind::Unknown,
            },
            ExprKind::Infix { left, op, right } => {
                let left = self.infer(left);
                let right = self.infer(right);
                if left == Kind::Unknown || right == Kind::Unknown {
                    return Kind::Unknown;
                }

                match op {
                    BinaryOp::Add => {
                        if left == Kind::String || right == Kind::String {
                            Kind::String
                        } else if left == Kind::Float64 || right == Kind::Float64 {
                            Kind::Float64
                        } else if left == Kind::Int32 && right == Kind::Int32 {
                            Kind::Int32
                        } else {
                            Kind::Float64
                        }
                    }
                    BinaryOp::Divide | BinaryOp::Modulo => Kind::Float64,
                    _ => {
                        if left == Kind::Float64 || right == Kind::Float64 {
                            Kind::Float64
                        } else if left == Kind::Int32 && right == Kind::Int32 {
                            Kind::Int32
                        } else {
                            Kind::Float64
                        }
                    }
                }
            }
            ExprKind::Assign { value, .. } => self.infer(value),
        }
    }

    /// The kind a whole program evaluates to: that of its last statement.
    /// Used by renderers only, never for emission.
    pub fn infer_program(&self, program: &Program) -> Kind {
        fn last_expression(statements: &[Stmt]) -> Option<&Expr> {
            match statements.last().map(|stmt| &stmt.kind) {
                Some(StmtKind::Expression(expression)) => Some(expression),
                Some(StmtKind::Block(statements)) => last_expression(statements),
                Some(StmtKind::Var { declarations }) => declarations.last(),
                _ => None,
            }
        }

        last_expression(&program.statements)
            .map(|expression| self.infer(expression))
            .unwrap_or(Kind::Undefined)
    }

    // ===== Emission =====

    fn cast(&mut self, from: Kind, to: Kind, span: Span) -> CompileResult<()> {
        let Some(sequence) = cast_sequence(from, to) else {
            return Err(CompileError::no_cast_path(
                from.to_string(),
                to.to_string(),
                span,
            ));
        };
        for &op in sequence {
            self.emit(op, &[], span)?;
        }
        Ok(())
    }

    fn emit(&mut self, op: Op, operands: &[u64], span: Span) -> CompileResult<()> {
        let Some(instruction) = Instruction::new(op, operands) else {
            return Err(CompileError::OperandRange {
                mnemonic: op.mnemonic().to_string(),
                span,
            });
        };
        self.chunk.append(&[instruction]);
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a numeric literal. The spelling matters: a `.` or exponent
/// forces float64 even when the value happens to be integral, and so do
/// the reserved `NaN`/`Infinity` lexemes; otherwise any value that is
/// losslessly an int32 stays int32.
fn number_kind(lexeme: &str, value: f64) -> Kind {
    if lexeme == "NaN" || lexeme == "Infinity" {
        return Kind::Float64;
    }
    if lexeme.contains('.') || lexeme.contains('e') {
        return Kind::Float64;
    }
    if value != (value as i32) as f64 {
        return Kind::Float64;
    }
    Kind::Int32
}
