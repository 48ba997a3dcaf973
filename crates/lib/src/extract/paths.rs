use crate::errors::ExtractError;
use std::path::{Path, PathBuf};

/// Derives an output path from a source path by replacing one token with another.
///
/// Every occurrence of `from` is replaced. A substitution that leaves the path
/// unchanged is an error: the output would overwrite the corpus file it was
/// derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSubstitution {
    from: String,
    to: String,
}

impl PathSubstitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Applies the substitution to `path` and resolves the result against `base`.
    ///
    /// Absolute results ignore `base`.
    pub fn apply(&self, path: &str, base: &Path) -> Result<PathBuf, ExtractError> {
        let substituted = path.replace(&self.from, &self.to);
        if substituted == path {
            return Err(ExtractError::PathUnchanged {
                path: path.to_string(),
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }
        Ok(base.join(substituted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_every_occurrence() {
        let rule = PathSubstitution::new("github", "gpt4");
        let out = rule
            .apply("github_code/github_repo/a.py", Path::new("."))
            .unwrap();
        assert_eq!(out, PathBuf::from("./gpt4_code/gpt4_repo/a.py"));
    }

    #[test]
    fn test_noop_substitution_is_rejected() {
        let rule = PathSubstitution::new("github", "gpt4");
        let err = rule.apply("other_code/a.py", Path::new(".")).unwrap_err();
        assert!(matches!(err, ExtractError::PathUnchanged { .. }));
    }

    #[test]
    fn test_identical_tokens_are_rejected() {
        let rule = PathSubstitution::new("github", "github");
        assert!(rule.apply("github_code/a.py", Path::new("out")).is_err());
    }
}
