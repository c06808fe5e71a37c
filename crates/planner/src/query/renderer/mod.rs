//! Defines the core rendering trait and context for converting AST to SQL.

use crate::query::{
    ast::common::{KeyOp, KeyPredicate, TableRef},
    dialect::Dialect,
};
use model::core::value::Value;

pub mod select;
pub mod update;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    /// Project every selected column as text. Stores whose drivers are
    /// strictly typed read rows this way and parse values themselves.
    pub text_projection: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            text_projection: false,
        }
    }

    pub fn with_text_projection(mut self) -> Self {
        self.text_projection = true;
        self
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        self.sql.push_str(&placeholder);
    }

    pub fn render_ident(&mut self, ident: &str) {
        let quoted = self.dialect.quote_identifier(ident);
        self.sql.push_str(&quoted);
    }

    pub fn render_key_predicate(&mut self, predicate: &KeyPredicate) {
        self.render_ident(&predicate.column);
        self.sql.push_str(match predicate.op {
            KeyOp::Eq => " = ",
            KeyOp::Gt => " > ",
        });

        self.params.push(Value::String(predicate.key.clone()));
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        match &predicate.key_type {
            Some(key_type) => {
                let cast = self.dialect.cast_param(&placeholder, key_type);
                self.sql.push_str(&cast);
            }
            None => self.sql.push_str(&placeholder),
        }
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        if let Some(schema) = &table.schema {
            self.render_ident(schema);
            self.sql.push('.');
        }
        self.render_ident(&table.name);
    }
}

/// Renders a node with the given dialect in one call.
pub fn render<T: Render>(node: &T, dialect: &dyn Dialect) -> (String, Vec<Value>) {
    let mut renderer = Renderer::new(dialect);
    node.render(&mut renderer);
    renderer.finish()
}
