use crate::query::{
    ast::{
        common::JoinKind,
        select::{JoinClause, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push_str(" FROM ");
            r.render_table_ref(from);
        }

        // 3. JOIN
        for join in &self.joins {
            r.sql.push(' ');
            join.render(r);
        }

        // 4. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 5. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, expr) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                expr.render(r);
            }
        }

        // 6. LIMIT
        if let Some(limit) = self.limit {
            r.sql.push_str(&format!(" LIMIT {limit}"));
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        let join_str = match self.kind {
            JoinKind::AllLeft => "ALL LEFT JOIN",
            JoinKind::AllInner => "ALL INNER JOIN",
        };
        r.sql.push_str(join_str);
        r.sql.push(' ');
        r.render_table_ref(&self.table);
        r.sql.push_str(" ON ");
        self.on.render(r);
    }
}
