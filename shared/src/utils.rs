// JSON helpers shared across the workspace: deep merge for layered config
// and locale files, and a key-coverage check between locale files.
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Merges `overlay` into `base`. Objects merge key by key, recursively;
/// any other overlay value replaces the base value.
pub fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Reads every file and merges them left to right; later files win.
pub fn merge_json_files<P: AsRef<Path>>(paths: &[P]) -> Result<Value> {
    let mut merged: Option<Value> = None;
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON file '{}'", path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON file '{}'", path.display()))?;
        match merged.as_mut() {
            Some(acc) => merge_json(acc, value),
            None => merged = Some(value),
        }
    }
    merged.ok_or_else(|| anyhow!("No JSON files given to merge"))
}

/// Dotted paths of the leaf keys in `reference` that `candidate` lacks.
/// Used to spot untranslated strings in a locale file.
pub fn missing_keys(reference: &Value, candidate: &Value) -> Vec<String> {
    let mut missing = Vec::new();
    collect_missing(reference, Some(candidate), "", &mut missing);
    missing
}

fn collect_missing(reference: &Value, candidate: Option<&Value>, prefix: &str, out: &mut Vec<String>) {
    match reference {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                let candidate_child = candidate.and_then(|c| c.get(key));
                collect_missing(child, candidate_child, &path, out);
            }
        }
        _ => {
            if candidate.is_none() {
                out.push(prefix.to_string());
            }
        }
    }
}
