//! Key-name translation between configuration keys and environment variables.

/// An ordered set of string substitutions applied to configuration keys
/// before they are matched against environment variable names.
///
/// Immutable once constructed. Pairs are applied in order, each replacing
/// every occurrence of its pattern.
#[derive(Debug, Clone)]
pub struct KeyReplacer {
    pairs: Vec<(String, String)>,
}

impl KeyReplacer {
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(|(m, r)| (m.into(), r.into())).collect(),
        }
    }

    /// The replacer used for environment variable lookups: `-` and `.` both
    /// become `_`, since neither is a valid character in a variable name.
    pub fn env_default() -> Self {
        Self::new([("-", "_"), (".", "_")])
    }

    /// Apply every substitution pair, in order, to `key`.
    pub fn apply(&self, key: &str) -> String {
        self.pairs
            .iter()
            .fold(key.to_string(), |acc, (pat, rep)| acc.replace(pat.as_str(), rep))
    }

    /// The environment variable name a key is matched against: the replaced
    /// key, upper-cased.
    pub fn env_name(&self, key: &str) -> String {
        self.apply(key).to_ascii_uppercase()
    }
}

impl Default for KeyReplacer {
    fn default() -> Self {
        Self::env_default()
    }
}
