use thiserror::Error;

/// Why a declarator string could not be split into arguments and modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclaratorError {
    #[error("declarator does not start with '(': {0:?}")]
    MissingOpenParen(String),

    #[error("unbalanced parentheses in declarator: {0:?}")]
    Unbalanced(String),
}
