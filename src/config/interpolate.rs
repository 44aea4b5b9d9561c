//! Variable interpolation for config values
//!
//! Replaces `${VAR}` references, looking the name up in the supplied
//! variables first and the process environment second.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::env;
use std::sync::OnceLock;

/// Matches `${name}` references
fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("variable pattern is valid"))
}

/// Interpolate variables in a string
///
/// Undefined variables are an error. Substituted values are not expanded
/// again.
pub fn interpolate(s: &str, vars: &BTreeMap<String, String>) -> InterpolationResult<String> {
    let re = variable_pattern();

    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in re.captures_iter(s) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let var_name = caps.get(1).map_or("", |m| m.as_str()).trim();

        if var_name.is_empty() {
            return Err(InterpolationError::InvalidSyntax(format!(
                "empty variable reference in '{}'",
                s
            )));
        }

        let value = match vars.get(var_name) {
            Some(value) => value.clone(),
            None => env::var(var_name)
                .map_err(|_| InterpolationError::UndefinedVariable(var_name.to_string()))?,
        };

        result.push_str(&s[last..whole.start]);
        result.push_str(&value);
        last = whole.end;
    }

    let rest = &s[last..];
    if rest.contains("${") {
        return Err(InterpolationError::InvalidSyntax(format!(
            "unterminated variable reference in '{}'",
            s
        )));
    }
    result.push_str(rest);

    Ok(result)
}
