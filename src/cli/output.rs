//! CLI output: error mapping from dispatch errors to the stable CLI surface.

use crate::error::CliError;

/// Single-line message for stderr, prefixed with the error code when there is one.
pub fn map_error(e: &CliError) -> String {
    match (e, e.code()) {
        // clap already renders a full usage message
        (CliError::Usage(message), _) => message.trim_end().to_string(),
        (_, Some(code)) => format!("Error [{}]: {}", code, e),
        (_, None) => format!("Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error_includes_code() {
        let err = CliError::MissingTarget {
            domain: "registry".to_string(),
            action: "add".to_string(),
        };
        assert_eq!(
            map_error(&err),
            "Error [MISSING_TARGET]: Action 'registry add' requires a target"
        );
    }

    #[test]
    fn test_map_error_unstructured() {
        let err = CliError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(map_error(&err), "Error: disk on fire");
    }

    #[test]
    fn test_map_error_usage_is_verbatim() {
        let err = CliError::Usage("error: unexpected argument '--nope'\n".to_string());
        assert_eq!(map_error(&err), "error: unexpected argument '--nope'");
    }
}
