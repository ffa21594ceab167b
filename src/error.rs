//! Typed errors for schemas, transformers, route dispatch and configuration.

use thiserror::Error;

/// Raised while resolving or applying a field transformer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("unknown transformer '{name}' for field '{field}'")]
    UnknownTransformer { field: String, name: String },
    #[error("field '{0}' is not declared in the schema")]
    UnknownField(String),
    #[error("invalid arguments for transformer '{name}': {message}")]
    InvalidArgs { name: String, message: String },
    #[error("transform failed: {0}")]
    Failed(String),
}

/// A JSON schema document has an invalid shape.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid schema: {0}")]
pub struct SchemaError(pub String);

#[derive(Error, Debug)]
pub enum ApiError {
    /// A filter or handler aborted the request.
    #[error("{}", .message.as_deref().unwrap_or("request rejected"))]
    Rejected {
        code: Option<u16>,
        message: Option<String>,
    },
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("handler result must be a response or a JSON object or array, got {0}")]
    InvalidHandlerResult(&'static str),
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Abort with an explicit status code and message.
    pub fn reject(code: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            code: Some(code),
            message: Some(message.into()),
        }
    }

    /// Abort with a status code; the message comes from the status table.
    pub fn status(code: u16) -> Self {
        ApiError::Rejected {
            code: Some(code),
            message: None,
        }
    }

    /// Abort without a code. Rendered as a 500.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Rejected {
            code: None,
            message: Some(message.into()),
        }
    }

    /// Numeric code carried by the failure, if any.
    pub fn code(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { code, .. } => *code,
            ApiError::BadRequest(_) => Some(400),
            _ => None,
        }
    }

    /// Message to expose in the envelope. Only coded failures expose their own text.
    pub fn public_message(&self) -> Option<String> {
        match self {
            ApiError::Rejected {
                code: Some(_),
                message,
            } => message.clone().filter(|m| !m.is_empty()),
            ApiError::BadRequest(m) => Some(m.clone()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },
    #[error("invalid route pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("config load: {0}")]
    Load(String),
}
