use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use mdr_roi_core::calculator::PricingPolicy;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load the pricing policy, or the published defaults when no file is given.
/// `.yaml`/`.yml` files are read as YAML, anything else as JSON. Fields
/// missing from the file keep their default values.
pub fn load_policy(path: Option<&str>) -> Result<PricingPolicy, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(PricingPolicy::default());
    };
    let canonical = resolve_path(path)?;
    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let policy: PricingPolicy = if is_yaml {
        let contents = fs::read_to_string(&canonical)
            .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        read_json(path)?
    };
    policy.validate()?;

    tracing::info!(path = %canonical.display(), "pricing policy loaded");
    Ok(policy)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scratch_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("mdr-roi-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_no_policy_file_uses_defaults() {
        let policy = load_policy(None).unwrap();
        assert_eq!(policy.in_house_cost_per_endpoint, dec!(440));
    }

    #[test]
    fn test_yaml_policy_overrides_some_fields() {
        let path = scratch_file("policy.yaml", "server_cost_per_year: \"1500\"\n");
        let policy = load_policy(Some(&path)).unwrap();
        assert_eq!(policy.server_cost_per_year, dec!(1500));
        assert_eq!(policy.in_house_cost_per_endpoint, dec!(440));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let path = scratch_file("policy.json", r#"{ "work_year_hours": "0" }"#);
        assert!(load_policy(Some(&path)).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_policy(Some("/nonexistent/policy.json")).is_err());
    }
}
