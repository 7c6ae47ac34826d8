use crate::query::{
    ast::insert::Insert,
    renderer::{Render, Renderer},
};

impl Render for Insert {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("INSERT INTO ");
        r.render_table_ref(&self.table);

        if !self.columns.is_empty() {
            let quoted_columns: Vec<String> = self
                .columns
                .iter()
                .map(|c| r.dialect.quote_identifier(c))
                .collect();
            r.sql.push_str(" (");
            r.sql.push_str(&quoted_columns.join(", "));
            r.sql.push(')');
        }

        r.sql.push_str(" FORMAT ");
        r.sql.push_str(self.format.name());
    }
}
