use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Failure while substituting `{{ env.VAR }}` placeholders
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder names a variable that is unset and has no default
    #[error("environment variable not found: `{0}`")]
    MissingVar(String),
    /// Placeholder uses a scope other than `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("placeholder pattern is valid")
    })
}

/// Substitute environment placeholders in raw config text
///
/// Comment lines are copied verbatim so documented-but-disabled settings do
/// not require their variables to exist.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(line)?);
        }
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, ExpandError> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> Result<String, ExpandError> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned()));
    };

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(ExpandError::MissingVar(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "model = \"gpt-image-1\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_api_key() {
        temp_env::with_var("EASEL_TEST_KEY", Some("sk-123"), || {
            let result = expand_env("api_key = \"{{ env.EASEL_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-123\"");
        });
    }

    #[test]
    fn substitutes_several_vars_on_separate_lines() {
        let vars = [("EASEL_TEST_A", Some("a")), ("EASEL_TEST_B", Some("b"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("x = \"{{ env.EASEL_TEST_A }}\"\ny = \"{{env.EASEL_TEST_B}}\"").unwrap();
            assert_eq!(result, "x = \"a\"\ny = \"b\"");
        });
    }

    #[test]
    fn missing_var_is_an_error() {
        temp_env::with_var_unset("EASEL_TEST_MISSING", || {
            let err = expand_env("key = \"{{ env.EASEL_TEST_MISSING }}\"").unwrap_err();
            assert_eq!(err, ExpandError::MissingVar("EASEL_TEST_MISSING".to_owned()));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("EASEL_TEST_ORG", || {
            let result = expand_env("organization = \"{{ env.EASEL_TEST_ORG | default(\"\") }}\"").unwrap();
            assert_eq!(result, "organization = \"\"");
        });

        temp_env::with_var("EASEL_TEST_ORG", Some("org-1"), || {
            let result = expand_env("organization = \"{{ env.EASEL_TEST_ORG | default(\"\") }}\"").unwrap();
            assert_eq!(result, "organization = \"org-1\"");
        });
    }

    #[test]
    fn other_scopes_are_rejected() {
        let err = expand_env("key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(matches!(err, ExpandError::UnsupportedScope(_)));
    }

    #[test]
    fn comments_are_not_expanded() {
        temp_env::with_var_unset("EASEL_TEST_MISSING", || {
            let input = "  # style = \"{{ env.EASEL_TEST_MISSING }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
