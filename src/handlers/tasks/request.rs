//! Wire DTO for `POST /execute`, decoupled from the internal `Submission`
//! domain type.

use serde::Deserialize;

use crate::error::AppError;
use crate::models::Submission;

/// Unknown JSON fields are ignored by default serde behavior (no
/// `deny_unknown_fields`), matching the source's permissive `dict.get` style.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub language: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub run_memory_profile: bool,
}

impl TryFrom<ExecuteRequest> for Submission {
    type Error = AppError;

    fn try_from(req: ExecuteRequest) -> Result<Self, Self::Error> {
        let code = req
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Validation("No code provided".to_string()))?;
        let language = req
            .language
            .filter(|l| !l.is_empty())
            .ok_or_else(|| AppError::Validation("No language provided".to_string()))?;

        Ok(Submission {
            language,
            code,
            stdin: req.stdin,
            libraries: req.libraries,
            timeout_s: Submission::clamp_timeout(req.timeout),
            run_profiling: req.run_memory_profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_code() {
        let req = ExecuteRequest {
            language: Some("python".to_string()),
            code: None,
            libraries: vec![],
            stdin: None,
            timeout: None,
            run_memory_profile: false,
        };
        let err = Submission::try_from(req).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: No code provided");
    }

    #[test]
    fn rejects_missing_language() {
        let req = ExecuteRequest {
            language: None,
            code: Some("print(1)".to_string()),
            libraries: vec![],
            stdin: None,
            timeout: None,
            run_memory_profile: false,
        };
        let err = Submission::try_from(req).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: No language provided");
    }
}
