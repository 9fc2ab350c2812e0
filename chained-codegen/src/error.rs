use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Generation-time failures. A failed generation never yields partial output.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum Error {
    #[error("malformed type '{text}': {reason}")]
    #[diagnostic(
        code(chained::malformed_type),
        help("generic arguments must be balanced and the closing '>' must end the type")
    )]
    MalformedType { text: String, reason: &'static str },

    #[error("ambiguous constructor for '{type_name}': {reason}")]
    #[diagnostic(
        code(chained::ambiguous_constructor),
        help("mark exactly one constructor with `designated = true`")
    )]
    AmbiguousConstructor { type_name: String, reason: String },

    #[error("no constructor declared for '{type_name}'")]
    #[diagnostic(
        code(chained::missing_constructor),
        help("declare at least one constructor under [[types.\"{type_name}\".constructors]]")
    )]
    MissingConstructor { type_name: String },

    #[error("'{class_name}' would be generated for both '{first}' and '{second}'")]
    #[diagnostic(
        code(chained::duplicate_class),
        help("give one of the types its own `builder` or `implementation` template")
    )]
    DuplicateClass {
        class_name: String,
        first: String,
        second: String,
    },

    #[error("invalid parameter '{name}': {reason}")]
    #[diagnostic(code(chained::invalid_parameter))]
    InvalidParameter { name: String, reason: String },
}
