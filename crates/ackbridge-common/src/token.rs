//! Deferred value tokens
//!
//! Source constructs expose runtime attributes (e.g. a database endpoint) as
//! opaque string tokens. A token stands in for an intrinsic expression until
//! something resolves it. `TokenTable` mints tokens and resolves them back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Prefix shared by every token string
pub const TOKEN_PREFIX: &str = "${Token[";

/// Intrinsic key for attribute references
pub const FN_GET_ATT: &str = "Fn::GetAtt";

/// Resolves token strings back to the expressions they stand for
pub trait TokenResolver {
    /// Whether the string contains an unresolved token
    fn is_unresolved(&self, value: &str) -> bool {
        value.contains(TOKEN_PREFIX)
    }

    /// Expression behind a token, or `None` if the string is not a known token
    fn resolve(&self, value: &str) -> Option<Value>;
}

/// Table of minted tokens and the expressions they encode
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenTable {
    entries: BTreeMap<String, Value>,
    #[serde(skip)]
    next: usize,
}

impl TokenTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new token for an expression.
    ///
    /// Numbers already taken by inserted tokens are skipped.
    pub fn register(&mut self, expression: Value) -> String {
        loop {
            let token = format!("{}TOKEN.{}]}}", TOKEN_PREFIX, self.next);
            self.next += 1;
            if !self.entries.contains_key(&token) {
                self.entries.insert(token.clone(), expression);
                return token;
            }
        }
    }

    /// Insert a token with a caller-chosen string
    pub fn insert(&mut self, token: impl Into<String>, expression: Value) {
        self.entries.insert(token.into(), expression);
    }

    /// Mint a token for `{"Fn::GetAtt": [logical_id, attribute]}`
    pub fn get_att(&mut self, logical_id: &str, attribute: &str) -> String {
        self.register(json!({ FN_GET_ATT: [logical_id, attribute] }))
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tokens are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TokenResolver for TokenTable {
    fn resolve(&self, value: &str) -> Option<Value> {
        self.entries.get(value).cloned()
    }
}
