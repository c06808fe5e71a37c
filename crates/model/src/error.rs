use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("Record is missing its identifier field '{0}'")]
    MissingId(String),

    #[error("Record is not a JSON object: {0}")]
    NotAnObject(String),
}
