//! Checkout harness configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

use tally_core::{CoreError, PricePolicy, PriceRow};

/// Letters the random generator may draw from, in order.
pub const MAX_ALPHABET: usize = 26;

/// Checkout harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Policy rows from `TALLY_POLICY` (None: use the sample policy)
    pub policy_rows: Option<Vec<PriceRow>>,

    /// Abort when some product has no size-1 rule
    pub strict_unit_pricing: bool,

    /// Length of a `--random` purchase
    pub random_length: usize,

    /// Number of letters (from 'A') a `--random` purchase draws from
    pub random_alphabet: usize,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            policy_rows: None,
            strict_unit_pricing: false,
            random_length: 200,
            random_alphabet: 6,
        }
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CheckoutConfig::default();

        let policy_rows = match lookup("TALLY_POLICY") {
            Some(raw) if !raw.trim().is_empty() => Some(
                serde_json::from_str::<Vec<PriceRow>>(&raw)
                    .map_err(|e| ConfigError::MalformedPolicy(e.to_string()))?,
            ),
            _ => None,
        };

        let config = CheckoutConfig {
            policy_rows,

            strict_unit_pricing: lookup("TALLY_STRICT_UNIT_PRICING")
                .map(|raw| raw.trim().eq_ignore_ascii_case("true") || raw.trim() == "1")
                .unwrap_or(defaults.strict_unit_pricing),

            random_length: lookup("TALLY_RANDOM_LENGTH")
                .map(|raw| raw.trim().parse())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("TALLY_RANDOM_LENGTH".to_string()))?
                .unwrap_or(defaults.random_length),

            random_alphabet: lookup("TALLY_RANDOM_ALPHABET")
                .map(|raw| raw.trim().parse())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("TALLY_RANDOM_ALPHABET".to_string()))?
                .unwrap_or(defaults.random_alphabet),
        };

        // Validate generator settings
        if config.random_alphabet == 0 || config.random_alphabet > MAX_ALPHABET {
            return Err(ConfigError::InvalidValue("TALLY_RANDOM_ALPHABET".to_string()));
        }

        Ok(config)
    }

    /// Builds the configured policy, running the unit-price check when strict.
    pub fn build_policy(&self) -> Result<PricePolicy, ConfigError> {
        let policy = match &self.policy_rows {
            Some(rows) => PricePolicy::build(rows)?,
            None => PricePolicy::sample(),
        };

        if self.strict_unit_pricing {
            policy.ensure_unit_prices()?;
        }

        Ok(policy)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("TALLY_POLICY is not a JSON array of price rows: {0}")]
    MalformedPolicy(String),

    #[error("Price policy rejected: {0}")]
    Policy(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CheckoutConfig::default());
        assert_eq!(config.build_policy().unwrap(), PricePolicy::sample());
    }

    #[test]
    fn test_policy_from_json_arrays() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[(
            "TALLY_POLICY",
            r#"[["A","1","2"],["A","3","5"]]"#,
        )]))
        .unwrap();

        let policy = config.build_policy().unwrap();
        assert_eq!(policy.rule_count(), 2);
    }

    #[test]
    fn test_policy_from_json_objects() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[(
            "TALLY_POLICY",
            r#"[{"product":"B","bundle_size":"1","price":"12"}]"#,
        )]))
        .unwrap();
        assert_eq!(config.build_policy().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_policy_json() {
        let result = CheckoutConfig::from_lookup(lookup_from(&[("TALLY_POLICY", "not json")]));
        assert!(matches!(result, Err(ConfigError::MalformedPolicy(_))));
    }

    #[test]
    fn test_bad_policy_row_surfaces_at_build() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[(
            "TALLY_POLICY",
            r#"[["A","1","two"]]"#,
        )]))
        .unwrap();
        assert!(matches!(
            config.build_policy(),
            Err(ConfigError::Policy(CoreError::MalformedPolicyEntry { row: 0, .. }))
        ));
    }

    #[test]
    fn test_strict_unit_pricing() {
        let rows = r#"[["A","4","7"]]"#;

        let lenient =
            CheckoutConfig::from_lookup(lookup_from(&[("TALLY_POLICY", rows)])).unwrap();
        assert!(lenient.build_policy().is_ok());

        let strict = CheckoutConfig::from_lookup(lookup_from(&[
            ("TALLY_POLICY", rows),
            ("TALLY_STRICT_UNIT_PRICING", "true"),
        ]))
        .unwrap();
        assert!(matches!(
            strict.build_policy(),
            Err(ConfigError::Policy(CoreError::MissingUnitPrice(_)))
        ));
    }

    #[test]
    fn test_generator_settings() {
        let config = CheckoutConfig::from_lookup(lookup_from(&[
            ("TALLY_RANDOM_LENGTH", "50"),
            ("TALLY_RANDOM_ALPHABET", "4"),
        ]))
        .unwrap();
        assert_eq!(config.random_length, 50);
        assert_eq!(config.random_alphabet, 4);

        for bad in ["0", "27", "six"] {
            let result =
                CheckoutConfig::from_lookup(lookup_from(&[("TALLY_RANDOM_ALPHABET", bad)]));
            assert!(matches!(result, Err(ConfigError::InvalidValue(_))), "{bad}");
        }
        assert!(CheckoutConfig::from_lookup(lookup_from(&[("TALLY_RANDOM_LENGTH", "-1")])).is_err());
    }
}
