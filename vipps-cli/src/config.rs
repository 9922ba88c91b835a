//! CLI configuration.
//!
//! Loads a [`VippsConfig`] from a TOML file. String values may reference
//! environment variables as `$VAR` or `${VAR}`; they are expanded before the
//! file is parsed.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "test"
//! timeout_secs = 30
//!
//! [credentials]
//! client_id = "$VIPPS_CLIENT_ID"
//! client_secret = "${VIPPS_CLIENT_SECRET}"
//! subscription_key = "$VIPPS_SUBSCRIPTION_KEY"
//! merchant_serial_number = "123456"
//! ```

use std::path::{Path, PathBuf};

use vipps::VippsConfig;

/// Failure to load the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid configuration.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A credential is still an unresolved variable reference.
    #[error("credential `{0}` references an unset environment variable")]
    Unresolved(&'static str),
}

/// Reads and validates the configuration at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, malformed, or a
/// credential was left unresolved.
pub fn load(path: &Path) -> Result<VippsConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse(&content, |name| std::env::var(name).ok()).map_err(|err| match err {
        ParseFailure::Toml(source) => ConfigError::Parse {
            path: path.to_owned(),
            source,
        },
        ParseFailure::Unresolved(field) => ConfigError::Unresolved(field),
    })
}

#[derive(Debug)]
enum ParseFailure {
    Toml(toml::de::Error),
    Unresolved(&'static str),
}

fn parse(
    content: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<VippsConfig, ParseFailure> {
    let expanded = expand_env_vars(content, lookup);
    let config: VippsConfig = toml::from_str(&expanded).map_err(ParseFailure::Toml)?;

    let credentials = &config.credentials;
    for (field, value) in [
        ("client_id", &credentials.client_id),
        ("client_secret", &credentials.client_secret),
        ("subscription_key", &credentials.subscription_key),
        ("merchant_serial_number", &credentials.merchant_serial_number),
    ] {
        if value.trim().is_empty() || value.starts_with('$') {
            return Err(ParseFailure::Unresolved(field));
        }
    }

    Ok(config)
}

/// Replaces `$VAR` and `${VAR}` with the value `lookup` returns.
///
/// References `lookup` cannot resolve are kept verbatim.
fn expand_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let (name, consumed) = if let Some(inner) = after.strip_prefix('{') {
            match inner.find('}') {
                Some(end) => (&inner[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), lookup(name)) {
            (false, Some(value)) => out.push_str(&value),
            _ => out.push_str(&rest[start..=start + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}
