//!
//! XML namespace prefix table
//!
use std::{collections::HashMap, sync::LazyLock};

use log::trace;
use regex::Regex;

use crate::error::InkError;

static XMLNS_DECL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"xmlns:(\w+)\s*=\s*"(.*?)""#).unwrap());

/// Mapping of namespace prefixes to namespace URIs as declared in a document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Namespaces {
    prefixes: HashMap<String, String>,
}

impl Namespaces {
    /// Create an empty prefix table
    pub fn new() -> Namespaces {
        Namespaces::default()
    }

    /// Collect every `xmlns:prefix="uri"` declaration found anywhere in the raw document text.
    ///
    /// Declarations on nested elements are included. A prefix declared twice keeps its last URI.
    pub fn scrape(text: &str) -> Namespaces {
        let mut namespaces = Namespaces::new();
        for cap in XMLNS_DECL.captures_iter(text) {
            trace!("Namespace declaration: {} => {}", &cap[1], &cap[2]);
            namespaces.insert(&cap[1], &cap[2]);
        }
        namespaces
    }

    /// Add or replace a prefix
    pub fn insert<P, U>(&mut self, prefix: P, uri: U)
    where
        P: AsRef<str>,
        U: AsRef<str>,
    {
        self.prefixes
            .insert(prefix.as_ref().to_owned(), uri.as_ref().to_owned());
    }

    /// Look up the URI bound to a prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Look up the URI bound to a prefix, failing when the prefix was never declared
    pub fn resolve(&self, prefix: &str) -> Result<&str, InkError> {
        self.get(prefix)
            .ok_or_else(|| InkError::UnknownPrefix(prefix.to_owned()))
    }

    /// Number of declared prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether no prefix was declared
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
