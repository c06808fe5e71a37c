use crate::query::{
    ast::update::Update,
    renderer::{Render, Renderer},
};

/// Masked values are written as SQL literals so the server coerces them to
/// each column's own type. The identifier is bound as a parameter.
impl Render for Update {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("UPDATE ");
        r.render_table_ref(&self.table);
        r.sql.push_str(" SET ");
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            r.render_ident(column);
            r.sql.push_str(" = ");
            r.sql.push_str(&value.to_string());
        }

        r.sql.push_str(" WHERE ");
        r.render_key_predicate(&self.key);
    }
}
