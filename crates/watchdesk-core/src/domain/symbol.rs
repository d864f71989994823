use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized ticker symbol, always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        // Leading digits are legal on foreign listings ("0700.HK"). ':' admits
        // exchange-prefixed tickers such as "BINANCE:BTCUSDT".
        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | ':');
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// Insertion-ordered set of symbols.
///
/// Iteration order is the order symbols were first supplied; the news
/// round-robin relies on this order being stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    ordered: Vec<Symbol>,
    seen: HashSet<Symbol>,
}

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every entry, rejecting the whole set on the first invalid one.
    /// Blank entries are skipped.
    pub fn parse<I, S>(raw: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for entry in raw {
            let entry = entry.as_ref();
            if entry.trim().is_empty() {
                continue;
            }
            set.insert(Symbol::parse(entry)?);
        }
        Ok(set)
    }

    /// Parse every entry, silently dropping blank or invalid ones.
    pub fn parse_lenient<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|entry| Symbol::parse(entry.as_ref()).ok())
            .collect()
    }

    /// Inserts a symbol; returns `false` if it was already present.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if !self.seen.insert(symbol.clone()) {
            return false;
        }
        self.ordered.push(symbol);
        true
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.seen.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.ordered.iter()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.ordered
    }
}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        let mut set = Self::new();
        for symbol in iter {
            set.insert(symbol);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SymbolSet {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
