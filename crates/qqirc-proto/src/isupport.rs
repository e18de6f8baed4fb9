//! RPL_ISUPPORT (005) token builder.

/// Builder for the space-separated feature tokens of `RPL_ISUPPORT`.
#[derive(Debug, Clone, Default)]
pub struct IsupportBuilder {
    tokens: Vec<String>,
}

impl IsupportBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `NETWORK` token.
    pub fn network(mut self, name: &str) -> Self {
        self.tokens.push(format!("NETWORK={name}"));
        self
    }

    /// Set the `CHANTYPES` token.
    pub fn chantypes(mut self, types: &str) -> Self {
        self.tokens.push(format!("CHANTYPES={types}"));
        self
    }

    /// Set the `PREFIX` token with symbols and mode letters.
    pub fn prefix(mut self, symbols: &str, letters: &str) -> Self {
        self.tokens.push(format!("PREFIX=({letters}){symbols}"));
        self
    }

    /// Set the `CHARSET` token.
    pub fn charset(mut self, charset: &str) -> Self {
        self.tokens.push(format!("CHARSET={charset}"));
        self
    }

    /// Set the `CASEMAPPING` token.
    pub fn casemapping(mut self, mapping: &str) -> Self {
        self.tokens.push(format!("CASEMAPPING={mapping}"));
        self
    }

    /// Add a custom token, with or without a value.
    pub fn custom(mut self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.tokens.push(format!("{key}={v}")),
            None => self.tokens.push(key.to_owned()),
        }
        self
    }

    /// The tokens in insertion order.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Build the tokens into a single space-separated string.
    pub fn build(self) -> String {
        self.tokens.join(" ")
    }
}
