use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeystoreError>;

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("Cannot open trust store. Is the password correct?")]
    InvalidPassword,

    #[error("There was a problem saving the trust store: {0}")]
    UnableToSave(#[source] std::io::Error),

    #[error("Trust store is corrupted: {0}")]
    CorruptStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Key derivation error: {0}")]
    Kdf(String),
}

/// Failure to read or decode a single certificate file. Never fatal to a
/// synchronization run: the caller downgrades it to a warning and skips
/// the entry.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Decode(String),
}
