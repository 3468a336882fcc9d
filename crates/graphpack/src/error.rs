use graphpack_buffers::BufferError;
use graphpack_runtime::RuntimeError;
use thiserror::Error;

/// Errors raised while registering, encoding, decoding or copying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
    #[error("no adapter registered for {0}")]
    UnregisteredType(&'static str),
    #[error("unknown class id {0}")]
    UnknownTypeId(u32),
    #[error("{0} is already registered")]
    DuplicateRegistration(String),
    #[error("class not found: {0}")]
    ClassNotFound(String),
    #[error("field `{field}` not found on {owner}")]
    FieldNotFound {
        owner: &'static str,
        field: &'static str,
    },
    #[error("field `{field}` on {owner} is not a {expected}")]
    FieldTypeMismatch {
        owner: &'static str,
        field: &'static str,
        expected: &'static str,
    },
    #[error("unknown {family} discriminator {index}")]
    UnknownDiscriminator { family: &'static str, index: usize },
    #[error("{variant} is not a known {family} variant")]
    UnknownVariant { family: &'static str, variant: String },
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid value tag {0}")]
    InvalidTag(u8),
    #[error("reference {0} is not resolved yet")]
    UnresolvedReference(u32),
    #[error("reference {0} does not exist")]
    InvalidReference(u32),
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
    #[error("maximum nesting depth {0} exceeded")]
    DepthExceeded(usize),
    #[error("`{constant}` is not a constant of {ty}")]
    UnknownEnumConstant { ty: &'static str, constant: String },
    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: &'static str, reason: String },
    #[error("{0} cannot be copied")]
    CopyUnsupported(&'static str),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("duplicate constant name `{0}`")]
    DuplicateConstant(&'static str),
    #[error("no pending reference to fulfil")]
    NoPendingReference,
}

impl GraphError {
    pub(crate) fn invalid_record(kind: &'static str, reason: impl Into<String>) -> Self {
        GraphError::InvalidRecord {
            kind,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
