//! Resource type tokens
//!
//! Tokens have the form `package:module:Name`. A [`ModuleMap`] lets a
//! package expose its types under a different module name, e.g. `helmBase`
//! types living in the `index` module.

use crate::error::TokenError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Parsed `package:module:Name` type token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeToken {
    package: String,
    module: String,
    name: String,
}

impl TypeToken {
    /// Build a token from its parts
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            name: name.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[inline]
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for TypeToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(package), Some(module), Some(name), None)
                if !package.is_empty() && !module.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(package, module, name))
            }
            _ => Err(TokenError::Malformed(s.to_owned())),
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.package, self.module, self.name)
    }
}

/// Module renames applied to type tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleMap(BTreeMap<String, String>);

impl ModuleMap {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// With module rename
    #[inline]
    #[must_use]
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.0.insert(from.into(), to.into());
        self
    }

    /// Rewrite the module of `token` if it is mapped
    #[must_use]
    pub fn normalize(&self, token: &TypeToken) -> TypeToken {
        match self.0.get(&token.module) {
            Some(module) => TypeToken::new(&token.package, module, &token.name),
            None => token.clone(),
        }
    }

    /// Parse and normalize a raw token
    ///
    /// # Errors
    /// [`TokenError`] if `raw` is not a valid token.
    pub fn normalize_str(&self, raw: &str) -> Result<TypeToken, TokenError> {
        raw.parse().map(|token| self.normalize(&token))
    }
}

impl Default for ModuleMap {
    /// `helmBase` types live in the `index` module
    fn default() -> Self {
        Self::new().with("helmBase", "index")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let token: TypeToken = "helmBase:index:Redis".parse().unwrap();
        assert_eq!(token.package(), "helmBase");
        assert_eq!(token.module(), "index");
        assert_eq!(token.name(), "Redis");
        assert_eq!(token.to_string(), "helmBase:index:Redis");
    }

    #[test]
    fn parse_rejects_malformed() {
        for raw in ["", "a:b", "a:b:c:d", "a::c", ":b:c", "a:b:"] {
            assert!(raw.parse::<TypeToken>().is_err(), "{raw}");
        }
    }

    #[test]
    fn module_map_normalizes() {
        let map = ModuleMap::default();
        let token = map.normalize_str("helmBase:helmBase:Redis").unwrap();
        assert_eq!(token.to_string(), "helmBase:index:Redis");

        let untouched = map.normalize_str("helmBase:index:Redis").unwrap();
        assert_eq!(untouched, token);
    }
}
