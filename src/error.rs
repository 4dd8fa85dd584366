use serde_json::Value;

/// Every failure the marshaling core and its backends can report.
///
/// Errors raised deep inside recursive construction reach the caller
/// exactly as they were created; nothing here wraps or renames them.
#[derive(Debug, thiserror::Error)]
pub enum ImdbError {
    /// A parameter had the wrong runtime kind (e.g. an identifier that is
    /// neither an integer nor a string).
    #[error("invalid argument type: {0}")]
    InvalidArgumentType(String),

    /// Right kind, wrong shape.
    #[error("invalid identifier '{value}': expected {expected}")]
    InvalidIdentifier { value: String, expected: String },

    #[error("'{field}' is not a valid attribute for {kind}")]
    UnknownField { kind: String, field: String },

    #[error("unknown entity kind '{0}'")]
    UnknownEntityKind(String),

    #[error("missing required field '{field}' for {kind}")]
    MissingRequiredField { kind: String, field: String },

    #[error("field '{field}' of {kind} must be {expected}, found {found}")]
    FieldTypeMismatch {
        kind: String,
        field: String,
        expected: String,
        found: String,
    },

    /// The GraphQL endpoint answered with a non-empty `errors` array.
    #[error("remote query failed: {}", Value::Array(.0.clone()))]
    RemoteQueryError(Vec<Value>),

    #[error("transport error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    TransportError {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid subselection '{value}', must be one of {allowed:?}")]
    InvalidSubselection {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Default (main-attribute) selection of a kind never bottoms out.
    #[error("main attributes of '{0}' reference back into themselves")]
    MainAttributeCycle(String),
}

pub type Result<T> = std::result::Result<T, ImdbError>;

impl From<reqwest::Error> for ImdbError {
    fn from(err: reqwest::Error) -> Self {
        ImdbError::TransportError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Short name of a JSON value's kind, used in mismatch messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
