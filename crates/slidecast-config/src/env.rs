use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.NAME }}` with an optional `| default("value")` filter
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Substitute environment placeholders in raw TOML text
///
/// Runs before deserialization so the config structs only ever see plain
/// strings. Comment lines are copied through untouched, so a commented-out
/// secret never has to be present in the environment.
pub(crate) fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut failure = None;
        let replaced = placeholder().replace_all(line, |captures: &Captures<'_>| {
            let fallback = captures.get(2).map(|m| m.as_str());

            resolve(&captures[1], fallback).unwrap_or_else(|e| {
                failure.get_or_insert(e);
                String::new()
            })
        });

        if let Some(e) = failure {
            return Err(e);
        }

        output.push_str(&replaced);
    }

    Ok(output)
}

fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let name = key
        .strip_prefix("env.")
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| format!("only variables scoped with 'env.' are supported: `{key}`"))?;

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{name}`")),
    }
}
