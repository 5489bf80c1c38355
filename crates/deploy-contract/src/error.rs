use {
    alloy::{dyn_abi, signers::local::LocalSignerError},
    std::path::PathBuf,
    thiserror::Error,
};

/// Every way a deployment can fail. The display output of each variant starts
/// with the category so it can be printed as a one-line diagnostic.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file error: failed to read {path:?}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse error: {path:?} is not a valid build artifact: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("parse error: {path:?} contains no bytecode")]
    EmptyBytecode { path: PathBuf },
    #[error("constructor error: {0}")]
    Constructor(#[from] ConstructorError),
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    #[error("network error: {0:#}")]
    Network(anyhow::Error),
    #[error("output error: failed to write deployment report: {0}")]
    Output(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConstructorError {
    #[error("constructor expects {expected} argument(s) but {actual} were given")]
    ArgumentCount { expected: usize, actual: usize },
    #[error("argument {index} ({name}) cannot be parsed as {ty}: {source}")]
    Argument {
        index: usize,
        name: String,
        ty: String,
        source: dyn_abi::Error,
    },
    #[error("failed to encode constructor arguments: {0}")]
    Encoding(#[source] dyn_abi::Error),
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("no private key configured")]
    Missing,
    #[error("private key is not valid hex: {0}")]
    Hex(#[from] const_hex::FromHexError),
    #[error("private key is not a valid secp256k1 key: {0}")]
    Signer(#[from] LocalSignerError),
}
