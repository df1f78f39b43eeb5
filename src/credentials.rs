use std::convert::Infallible;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key/value pairs returned by the account auth exchange, in response order.
///
/// Only `Auth` is used here, as the bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(IndexMap<String, String>);

impl Credentials {
    /// Parse the exchange's `key=value` lines. Lines without `=` are skipped;
    /// a repeated key keeps its first position and last value.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Bearer token, empty when the exchange returned none.
    pub fn auth(&self) -> &str {
        self.get("Auth").unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Credentials {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exchange_lines() {
        let creds = Credentials::parse("SID=abc\nLSID=def\nAuth=ya29.token\nExpiry=1700000000\n");
        assert_eq!(creds.auth(), "ya29.token");
        assert_eq!(creds.get("SID"), Some("abc"));
        let keys: Vec<_> = creds.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["SID", "LSID", "Auth", "Expiry"]);
    }

    #[test]
    fn value_may_contain_equals() {
        let creds = Credentials::parse("Auth=a=b==\n");
        assert_eq!(creds.auth(), "a=b==");
    }

    #[test]
    fn missing_auth_is_empty() {
        let creds: Credentials = "Error=BadAuthentication".parse().unwrap();
        assert_eq!(creds.auth(), "");
    }
}
