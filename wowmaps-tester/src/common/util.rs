use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{fs, path::Path, path::PathBuf};

/// Directory for one failing scenario/seed pair, stamped with `at`.
pub fn artifacts_dir(base: &Path, scenario: &str, seed: u64, at: DateTime<Utc>) -> PathBuf {
    let ts = at.format("%Y%m%dT%H%M%S");
    base.join(slug(scenario))
        .join(format!("seed-{seed}"))
        .join(ts.to_string())
}

/// Write the failure lines of one scenario run under `dir`.
pub fn write_failure_artifacts(dir: &Path, failures: &[String]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating artifacts dir {}", dir.display()))?;
    fs::write(dir.join("failures.txt"), failures.join("\n"))
        .with_context(|| format!("writing failures under {}", dir.display()))?;
    Ok(())
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn artifacts_dir_includes_key_segments() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let dir = artifacts_dir(
            Path::new("target/out"),
            "Native reward, no countdown",
            42,
            at,
        );
        assert_eq!(
            dir,
            Path::new("target/out/native-reward-no-countdown/seed-42/20260301T123000")
        );
    }

    #[test]
    fn write_failure_artifacts_writes_lines() {
        let base = std::env::temp_dir().join(format!(
            "wowmaps-artifacts-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        write_failure_artifacts(&base, &["first".into(), "second".into()]).unwrap();
        let written = fs::read_to_string(base.join("failures.txt")).unwrap();
        assert_eq!(written, "first\nsecond");
    }
}
