use anyhow::{Result, bail};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

/// A resolved seed and the label it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub label: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, label: None }
    }

    /// Derive a seed from free text, so runs can be named (`release-1`, `nightly`).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0_u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self {
            seed: u64::from_le_bytes(bytes),
            label: Some(label.to_string()),
        }
    }

    #[must_use]
    pub fn display(&self) -> String {
        match &self.label {
            Some(label) => format!("{label} ({})", self.seed),
            None => self.seed.to_string(),
        }
    }
}

/// Resolve CLI seed tokens: integers are taken as-is (sign dropped), anything
/// else is hashed into a labelled seed. Duplicates are removed in order.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            SeedInfo::from_label(token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };
        if seen.insert(info.seed) {
            seeds.push(info);
        }
    }

    if seeds.is_empty() {
        seeds.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(seeds)
}
