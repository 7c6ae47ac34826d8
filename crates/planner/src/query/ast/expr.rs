use model::core::value::Value;

/// A column reference, optionally qualified with its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnName {
    pub table: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnName),
    /// A value bound as a server-side query parameter.
    Value(Value),
    BinaryOp(Box<BinaryOp>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    And,
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    /// Folds `exprs` into a left-deep `AND` chain.
    pub fn and_all(exprs: Vec<Expr>) -> Option<Expr> {
        exprs
            .into_iter()
            .reduce(|acc, next| Expr::binary(acc, BinaryOperator::And, next))
    }

    /// Column references appearing anywhere in the expression.
    pub fn columns(&self) -> Vec<&ColumnName> {
        match self {
            Expr::Column(c) => vec![c],
            Expr::Value(_) => Vec::new(),
            Expr::BinaryOp(op) => {
                let mut cols = op.left.columns();
                cols.extend(op.right.columns());
                cols
            }
        }
    }
}
