//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Entropy below which hashing is considered brute-forceable offline.
const DEFAULT_MIN_HASH_ENTROPY_BITS: u32 = 128;

/// Tunable knobs for one analysis run.
///
/// Loadable from the surrounding driver's TOML configuration; every field
/// has a sensible default, so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Entropy (in bits) a hashed value must provably carry to avoid the
    /// low-entropy advisory.
    pub min_hash_entropy_bits: u32,
    /// Emit advisories for hashes of unproven-entropy values.
    pub hash_advisories: bool,
    /// Analyze independent call-graph regions in parallel.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_hash_entropy_bits: DEFAULT_MIN_HASH_ENTROPY_BITS,
            hash_advisories: true,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Parses a `[disclosure]`-style TOML table.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Single-threaded configuration; useful for deterministic profiling
    /// and for embedding in already-parallel drivers.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::AnalysisConfig;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = AnalysisConfig::from_toml_str("min_hash_entropy_bits = 96").unwrap();
        assert_eq!(config.min_hash_entropy_bits, 96);
        assert!(config.hash_advisories);
        assert!(config.parallel);
    }

    #[test]
    fn empty_table_is_valid() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }
}
