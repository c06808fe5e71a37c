//! Defines the `Dialect` trait for database-specific SQL syntax.

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// PostgreSQL uses double quotes: `"my_column"`.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    ///
    /// PostgreSQL uses `$1`, `$2`, etc.
    fn get_placeholder(&self, index: usize) -> String;

    /// Casts an already quoted expression to the dialect's text type.
    fn cast_to_text(&self, expr: &str) -> String;

    /// Casts a text-bound parameter to a column type, e.g. to compare it
    /// against a `bigint` or `uuid` key.
    fn cast_param(&self, placeholder: &str, type_name: &str) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL").
    fn name(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{ident}""#)
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn cast_to_text(&self, expr: &str) -> String {
        format!("CAST({expr} AS TEXT)")
    }

    fn cast_param(&self, placeholder: &str, type_name: &str) -> String {
        format!("CAST(CAST({placeholder} AS TEXT) AS {type_name})")
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}
