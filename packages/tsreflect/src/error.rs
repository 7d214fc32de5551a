use thiserror::Error;

/// Errors raised while registering types with a generator
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The configured namer handed back a name that is already bound.
    /// This is a defect in the caller-supplied naming function.
    #[error("namer returned taken name '{name}'")]
    NameTaken { name: String },

    #[error("function name '{name}' is already bound to a different type")]
    FunctionNameTaken { name: String },

    #[error("too many implementations for function '{name}': expected at most 1, got {count}")]
    TooManyImplementations { name: String, count: usize },

    #[error("type bound as function '{name}' is not callable")]
    NotCallable { name: String },

    #[error("Invalid generator options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl GenerateError {
    /// Configuration errors come from caller-supplied setup (namers, bindings)
    /// rather than from the types being walked.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GenerateError::NameTaken { .. }
                | GenerateError::FunctionNameTaken { .. }
                | GenerateError::TooManyImplementations { .. }
                | GenerateError::InvalidOptions(_)
        )
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
