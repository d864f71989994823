use tracing::warn;

use crate::data_source::ProviderError;
use crate::Symbol;

/// Outcome of one per-symbol branch of a fan-out.
///
/// A failed upstream call settles as [`Branch::NoData`]; it never crosses the
/// fan-out boundary as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch<T> {
    Data(T),
    NoData,
}

impl<T> Branch<T> {
    pub fn settle(symbol: &Symbol, result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => Self::Data(value),
            Err(error) => {
                warn!(
                    symbol = %symbol,
                    endpoint = %error.endpoint(),
                    error = %error,
                    "upstream call failed; treating as no data"
                );
                Self::NoData
            }
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            Self::NoData => None,
        }
    }

    pub const fn has_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

impl<T: Default> Branch<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}
