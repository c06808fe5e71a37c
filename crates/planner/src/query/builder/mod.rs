use crate::{
    error::PlanError,
    query::ast::{
        common::{KeyOp, KeyPredicate, OrderDir, TableRef},
        select::{OrderByExpr, Select},
        update::Update,
    },
};
use model::{
    catalog::field::MaskableFieldSpec, pagination::cursor::Cursor, records::record::ContactRecord,
};
use std::collections::HashSet;

/// The read query of one masking run: every catalog field plus the record
/// identifier, over the whole dataset, ordered by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskQuery {
    pub table: TableRef,
    pub id_field: String,
    pub fields: Vec<MaskableFieldSpec>,
    /// Selected paths that are read but never written back.
    pub read_only: Vec<String>,
}

impl MaskQuery {
    /// Marks `paths` as read-only. Matching ignores ASCII case.
    pub fn with_read_only<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            let path = path.as_ref().to_string();
            if !self.read_only.iter().any(|p| p.eq_ignore_ascii_case(&path)) {
                self.read_only.push(path);
            }
        }
        self
    }

    pub fn is_writable(&self, field: &MaskableFieldSpec) -> bool {
        !self
            .read_only
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&field.field_path))
    }

    /// Catalog fields an update may assign, in catalog order.
    pub fn writable_fields(&self) -> impl Iterator<Item = &MaskableFieldSpec> {
        self.fields.iter().filter(|f| self.is_writable(f))
    }

    /// Field paths in catalog order, without the identifier.
    pub fn field_paths(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field_path.as_str()).collect()
    }

    /// Selected columns, identifier first.
    pub fn columns(&self) -> Vec<String> {
        std::iter::once(self.id_field.clone())
            .chain(self.fields.iter().map(|f| f.field_path.clone()))
            .collect()
    }

    /// The SELECT for the chunk that continues after `cursor`.
    pub fn page(&self, cursor: &Cursor, limit: usize) -> Select {
        Select {
            columns: self.columns(),
            from: self.table.clone(),
            after: cursor
                .last_id()
                .map(|last| KeyPredicate::new(&self.id_field, KeyOp::Gt, last)),
            order_by: vec![OrderByExpr {
                column: self.id_field.clone(),
                direction: Some(OrderDir::Asc),
            }],
            limit: Some(limit),
        }
    }

    /// The UPDATE writing the writable fields of one record back, or `None`
    /// when every selected field is read-only.
    pub fn update_for(&self, record: &ContactRecord) -> Option<Update> {
        let assignments: Vec<_> = self
            .writable_fields()
            .map(|f| (f.field_path.clone(), record.get_value(&f.field_path)))
            .collect();

        if assignments.is_empty() {
            return None;
        }

        Some(Update {
            table: self.table.clone(),
            assignments,
            key: KeyPredicate::new(&self.id_field, KeyOp::Eq, &record.id),
        })
    }
}

/// Builds the read query for `dataset` from the resolved catalog fields.
///
/// No filtering is applied: every run masks the entire dataset.
pub fn build_query(
    dataset: &str,
    id_field: &str,
    fields: &[MaskableFieldSpec],
) -> Result<MaskQuery, PlanError> {
    let table = parse_table(dataset)?;
    validate_ident(id_field)?;

    if fields.is_empty() {
        return Err(PlanError::NoFields(dataset.to_string()));
    }

    let mut seen = HashSet::new();
    for field in fields {
        validate_ident(&field.field_path)?;
        if field.field_path.eq_ignore_ascii_case(id_field) {
            return Err(PlanError::IdentifierMasked(field.field_path.clone()));
        }
        if !seen.insert(field.field_path.to_ascii_lowercase()) {
            return Err(PlanError::DuplicateField(field.field_path.clone()));
        }
    }

    Ok(MaskQuery {
        table,
        id_field: id_field.to_string(),
        fields: fields.to_vec(),
        read_only: Vec::new(),
    })
}

fn parse_table(dataset: &str) -> Result<TableRef, PlanError> {
    match dataset.split_once('.') {
        Some((schema, name)) => {
            validate_ident(schema)?;
            validate_ident(name)?;
            Ok(crate::table_ref!(schema, name))
        }
        None => {
            validate_ident(dataset)?;
            Ok(crate::table_ref!(dataset))
        }
    }
}

fn validate_ident(ident: &str) -> Result<(), PlanError> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(PlanError::InvalidIdentifier(ident.to_string()))
    }
}
