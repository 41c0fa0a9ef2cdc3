//! Sniff configuration

use crate::detect::matches_expected;
use crate::limits::{validate_sniff_len, DEFAULT_SNIFF_LEN};

/// Which classifications a sniff check lets through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accept {
    /// Any classification passes
    Any,
    /// Only these media types pass; an empty list rejects everything
    Only(Vec<String>),
}

impl Accept {
    /// The listed media types (empty for [`Accept::Any`])
    pub fn types(&self) -> &[String] {
        match self {
            Accept::Any => &[],
            Accept::Only(types) => types,
        }
    }
}

/// Configuration for sniffing a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffConfig {
    /// Maximum number of bytes read before classification
    pub sniff_len: usize,

    /// Accepted media types
    pub accept: Accept,
}

impl Default for SniffConfig {
    fn default() -> Self {
        Self {
            sniff_len: DEFAULT_SNIFF_LEN,
            accept: Accept::Only(vec!["image/png".to_string()]),
        }
    }
}

impl SniffConfig {
    /// Configuration that accepts exactly the given media types
    pub fn expecting<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sniff_len: DEFAULT_SNIFF_LEN,
            accept: Accept::Only(types.into_iter().map(Into::into).collect()),
        }
    }

    /// Set the sniff length
    pub fn with_sniff_len(mut self, sniff_len: usize) -> Self {
        self.sniff_len = sniff_len;
        self
    }

    /// Add an accepted media type
    ///
    /// On an accept-any configuration this narrows it to just `media_type`.
    pub fn expect(mut self, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        self.accept = match self.accept {
            Accept::Any => Accept::Only(vec![media_type]),
            Accept::Only(mut types) => {
                types.push(media_type);
                Accept::Only(types)
            }
        };
        self
    }

    /// Accept any classification
    pub fn accept_any(mut self) -> Self {
        self.accept = Accept::Any;
        self
    }

    /// The accepted media types (empty when any type is accepted)
    pub fn expected(&self) -> &[String] {
        self.accept.types()
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> crate::Result<()> {
        validate_sniff_len(self.sniff_len)?;
        Ok(())
    }

    /// Does `label` satisfy the accepted set?
    pub fn accepts(&self, label: &str) -> bool {
        match &self.accept {
            Accept::Any => true,
            Accept::Only(types) => matches_expected(label, types),
        }
    }
}
