use thiserror::Error;

/// Failures while turning the resolved catalog into a read query.
#[derive(Error, Debug, PartialEq)]
pub enum PlanError {
    #[error("No maskable fields were supplied for dataset '{0}'")]
    NoFields(String),

    #[error("Invalid identifier '{0}': only letters, digits and underscores are allowed")]
    InvalidIdentifier(String),

    #[error("Field '{0}' appears more than once in the catalog")]
    DuplicateField(String),

    #[error("Field '{0}' is the record identifier and cannot be masked")]
    IdentifierMasked(String),
}
