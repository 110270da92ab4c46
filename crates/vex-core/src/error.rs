use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid decimals: {0} does not fit in uint8")]
    InvalidDecimals(String),

    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(u64),

    #[error("Chain id mismatch: {0} != {1}")]
    ChainIdMismatch(u64, u64),

    /// Two values that must agree do not. Callers should treat this as a bug.
    #[error("Inconsistent data: {0}")]
    Inconsistent(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
}

impl From<alloy_sol_types::Error> for Error {
    fn from(err: alloy_sol_types::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
