use std::fmt;

/// Namespace bound to the reserved `xml` prefix without any declaration.
pub const XML_NAMESPACE_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// A qualified XML name: optional prefix plus local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        QName {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        QName {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Splits a raw `prefix:local` tag name on the first colon.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => QName::prefixed(prefix, local),
            None => QName::new(raw),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A namespace binding declared on an element (`xmlns="…"` or
/// `xmlns:prefix="…"`). `prefix: None` is the default namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: Option<String>,
    pub uri: String,
}

impl Namespace {
    pub fn new(prefix: Option<String>, uri: impl Into<String>) -> Self {
        Namespace {
            prefix,
            uri: uri.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_first_colon() {
        let name = QName::parse("xsl:template");
        assert_eq!(name.prefix.as_deref(), Some("xsl"));
        assert_eq!(name.local, "template");

        let plain = QName::parse("root");
        assert_eq!(plain.prefix, None);
        assert_eq!(plain.local, "root");
    }

    #[test]
    fn display_round_trips_prefix() {
        assert_eq!(QName::parse("fo:block").to_string(), "fo:block");
        assert_eq!(QName::new("item").to_string(), "item");
    }
}
