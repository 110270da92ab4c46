use crate::Result;
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

/// Read-only access to deployed contracts.
///
/// This is the only capability the fetcher needs from a node connection:
/// send ABI-encoded calldata to a contract and get the raw return data back.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Execute a state-non-mutating call against `to` and return the raw output.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}

/// Encode `call`, send it to `to` and decode the typed return value.
///
/// Return data is validated against the declared types, so a `uint8` slot
/// holding 256 is an error instead of being truncated.
pub async fn read_call<R, C>(reader: &R, to: Address, call: C) -> Result<C::Return>
where
    R: ContractReader + ?Sized,
    C: SolCall + Send,
{
    let data = Bytes::from(call.abi_encode());
    let raw = reader.call(to, data).await?;
    Ok(C::abi_decode_returns_validate(&raw)?)
}
