//! Abstract syntax tree for the expression language.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{Program, Stmt, StmtKind};
