use std::sync::OnceLock;

use regex::{Captures, Regex};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("environment variable not found: `{0}`")]
    Missing(String),
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.NAME }}` with an optional `| default("value")`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Substitute `{{ env.VAR }}` placeholders in raw TOML text
///
/// Comment lines are copied verbatim so that commented-out settings never
/// require their variables to be set.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut expanded = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_owned())
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?
        .join("\n");

    if input.ends_with('\n') {
        expanded.push('\n');
    }

    Ok(expanded)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut failure = None;

    let replaced = placeholder().replace_all(line, |caps: &Captures<'_>| {
        match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(replaced.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned()));
    };

    std::env::var(name)
        .ok()
        .or_else(|| default.map(str::to_owned))
        .ok_or_else(|| ExpandError::Missing(name.to_owned()))
}
