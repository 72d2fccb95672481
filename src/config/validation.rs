use std::env;

use regex::Regex;

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left in place.
pub fn expand_env_var_in_string(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

pub fn expand_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    re.replace_all(value, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Endpoint URLs must be absolute http(s) URLs.
pub fn validate_endpoint(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("'{}' is not an http(s) URL", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_known_and_unknown_vars() {
        let lookup = |name: &str| (name == "MCP_HOST").then(|| "agentgw".to_string());
        assert_eq!(
            expand_with("http://${MCP_HOST}:3000/${MISSING}", lookup),
            "http://agentgw:3000/${MISSING}"
        );
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("http://localhost:3000/mcp").is_ok());
        assert!(validate_endpoint("localhost:3000").is_err());
    }
}
