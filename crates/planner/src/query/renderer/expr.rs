use crate::query::{
    ast::expr::{BinaryOperator, ColumnName, Expr},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Column(column) => column.render(r),
            Expr::Value(value) => r.add_param(value.clone()),
            Expr::BinaryOp(op) => {
                op.left.render(r);
                let op_str = match op.op {
                    BinaryOperator::Eq => " = ",
                    BinaryOperator::And => " AND ",
                };
                r.sql.push_str(op_str);
                op.right.render(r);
            }
        }
    }
}

impl Render for ColumnName {
    fn render(&self, r: &mut Renderer) {
        if let Some(table) = &self.table {
            r.sql.push_str(&r.dialect.quote_identifier(table));
            r.sql.push('.');
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
    }
}
