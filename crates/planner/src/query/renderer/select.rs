use crate::query::{
    ast::{common::OrderDir, select::Select},
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("SELECT ");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            if r.text_projection {
                let quoted = r.dialect.quote_identifier(column);
                r.sql.push_str(&r.dialect.cast_to_text(&quoted));
                r.sql.push_str(" AS ");
                r.sql.push_str(&quoted);
            } else {
                r.render_ident(column);
            }
        }

        r.sql.push_str(" FROM ");
        r.render_table_ref(&self.from);

        if let Some(after) = &self.after {
            r.sql.push_str(" WHERE ");
            r.render_key_predicate(after);
        }

        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                // Text aliases would shadow the column in ORDER BY.
                if r.text_projection {
                    r.render_table_ref(&self.from);
                    r.sql.push('.');
                }
                r.render_ident(&order.column);
                match order.direction {
                    Some(OrderDir::Asc) => r.sql.push_str(" ASC"),
                    Some(OrderDir::Desc) => r.sql.push_str(" DESC"),
                    None => {}
                }
            }
        }

        if let Some(limit) = self.limit {
            r.sql.push_str(&format!(" LIMIT {limit}"));
        }
    }
}
