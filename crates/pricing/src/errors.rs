use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NumericError {
    #[error("value is null")]
    Null,
    #[error("value is not a finite number")]
    NonFinite,
    #[error("value does not fit a decimal amount")]
    Unrepresentable,
    #[error("malformed numeric literal `{raw}`")]
    Malformed { raw: String },
    #[error("unsupported value type `{kind}`")]
    UnsupportedType { kind: &'static str },
}
