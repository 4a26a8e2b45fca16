use islamic_finance_core::policy::TermPolicy;
use std::path::Path;

use super::file;

/// Load a policy override, or the defaults when no path is given.
///
/// `.yaml` / `.yml` files are read as YAML, everything else as JSON.
/// Variant blocks present in the file replace the defaults whole.
pub fn load_policy(path: Option<&str>) -> Result<TermPolicy, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(TermPolicy::default());
    };
    let (canonical, contents) = file::read_text(path)?;
    let policy = parse_policy(&contents, is_yaml(&canonical))
        .map_err(|e| format!("Failed to parse policy '{}': {}", canonical.display(), e))?;
    policy.validate()?;
    tracing::info!(path = %canonical.display(), "loaded term policy override");
    Ok(policy)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_policy(contents: &str, yaml: bool) -> Result<TermPolicy, Box<dyn std::error::Error>> {
    if yaml {
        Ok(serde_yaml::from_str(contents)?)
    } else {
        Ok(serde_json::from_str(contents)?)
    }
}
