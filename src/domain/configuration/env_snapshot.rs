//! Immutable view of environment variables taken once at start-up.

use std::collections::BTreeMap;

/// Environment variables captured at process start.
///
/// Components read configuration from this snapshot instead of the live
/// process environment. Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Value of `key`, or `None` when unset or empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }

    /// Value of `key`, or `default` when unset or empty.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Add entries that are not already present.
    ///
    /// Used for `.env` files, which never override the real environment.
    pub fn fill_missing<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            self.vars.entry(key).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_unset() {
        let env = EnvSnapshot::from_pairs([("ENVIRONMENT", "")]);
        assert_eq!(env.get("ENVIRONMENT"), None);
        assert_eq!(env.get_or("ENVIRONMENT", "dev"), "dev");
    }

    #[test]
    fn fill_missing_keeps_existing_values() {
        let mut env = EnvSnapshot::from_pairs([("TAG", "v1")]);
        env.fill_missing([
            ("TAG".to_string(), "v2".to_string()),
            ("BRANCH_NAME".to_string(), "feature".to_string()),
        ]);
        assert_eq!(env.get("TAG"), Some("v1"));
        assert_eq!(env.get("BRANCH_NAME"), Some("feature"));
    }
}
