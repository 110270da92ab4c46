use crate::token::Token;
use crate::{Error, Result};
use alloy_primitives::utils::format_units;
use alloy_primitives::U256;
use serde::Serialize;
use std::fmt;

/// Largest unit `format_units` accepts.
const MAX_UNITS: u8 = 77;

/// A raw, non-negative amount of a specific token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAmount {
    token: Token,
    raw: U256,
}

impl TokenAmount {
    pub fn new(token: Token, raw: impl Into<U256>) -> Self {
        Self {
            token,
            raw: raw.into(),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn add(&self, other: &TokenAmount) -> Result<TokenAmount> {
        self.ensure_same_token(other)?;
        let raw = self
            .raw
            .checked_add(other.raw)
            .ok_or_else(|| Error::Arithmetic(format!("{} + {} overflows", self.raw, other.raw)))?;
        Ok(Self::new(self.token.clone(), raw))
    }

    pub fn checked_sub(&self, other: &TokenAmount) -> Result<TokenAmount> {
        self.ensure_same_token(other)?;
        let raw = self
            .raw
            .checked_sub(other.raw)
            .ok_or_else(|| Error::Arithmetic(format!("{} - {} underflows", self.raw, other.raw)))?;
        Ok(Self::new(self.token.clone(), raw))
    }

    /// The amount in whole token units, e.g. `1.500` for raw 1500 of a
    /// 3-decimal token.
    pub fn to_exact(&self) -> Result<String> {
        let decimals = self.token.decimals();
        if decimals <= MAX_UNITS {
            return format_units(self.raw, decimals).map_err(|e| Error::Arithmetic(e.to_string()));
        }

        // format_units stops at 77 decimals, place the point by hand beyond that
        let decimals = decimals as usize;
        let raw = self.raw.to_string();
        let digits = format!("{raw:0>width$}", width = decimals + 1);
        let (integer, fraction) = digits.split_at(digits.len() - decimals);
        Ok(format!("{integer}.{fraction}"))
    }

    fn ensure_same_token(&self, other: &TokenAmount) -> Result<()> {
        if self.token.equals(&other.token)? {
            Ok(())
        } else {
            Err(Error::Inconsistent(format!(
                "amounts of different tokens: {} and {}",
                self.token, other.token
            )))
        }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.raw, self.token)
    }
}
