use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const FILE_NAME_FIELD: &str = "fileName";

/// Body of `POST /process-video` and of queue messages.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest {
    /// Name of the raw object to process. Used as a single path segment.
    #[validate(custom(function = "validate_file_name"))]
    #[schema(example = "my-video.mp4")]
    pub file_name: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Bad Request: Missing : {}", .0.join(" "))]
    Missing(Vec<&'static str>),

    #[error("Bad Request: Invalid : {}", .0.join(" "))]
    Invalid(Vec<&'static str>),
}

impl ProcessVideoRequest {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.file_name.as_deref().is_none_or(str::is_empty) {
            missing.push(FILE_NAME_FIELD);
        }
        missing
    }

    /// Check the request and hand back the file name it names.
    pub fn into_file_name(self) -> Result<String, RequestError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(RequestError::Missing(missing));
        }

        if self.validate().is_err() {
            return Err(RequestError::Invalid(vec![FILE_NAME_FIELD]));
        }

        self.file_name
            .ok_or(RequestError::Missing(vec![FILE_NAME_FIELD]))
    }
}

/// The name is joined onto local directories, so it must stay one segment.
fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    let escapes = name == "." || name == "..";
    let separators = name.contains(['/', '\\', '\0']);

    if escapes || separators {
        return Err(ValidationError::new("file_name_segment"));
    }
    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoResponse {
    pub file_name: String,
    pub processed_file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(file_name: Option<&str>) -> ProcessVideoRequest {
        ProcessVideoRequest {
            file_name: file_name.map(str::to_string),
        }
    }

    #[test]
    fn absent_or_empty_file_name_is_missing() {
        for req in [request(None), request(Some(""))] {
            let err = req.into_file_name().unwrap_err();
            assert_eq!(err, RequestError::Missing(vec!["fileName"]));
            assert_eq!(err.to_string(), "Bad Request: Missing : fileName");
        }
    }

    #[test]
    fn path_like_names_are_invalid() {
        for name in ["..", ".", "../etc/passwd", "dir/clip.mp4", "dir\\clip.mp4"] {
            let err = request(Some(name)).into_file_name().unwrap_err();
            assert_eq!(err.to_string(), "Bad Request: Invalid : fileName", "name {name:?}");
        }
    }

    #[test]
    fn plain_name_is_accepted() {
        assert_eq!(
            request(Some("holiday clip.mp4")).into_file_name().unwrap(),
            "holiday clip.mp4"
        );
    }

    #[test]
    fn body_uses_camel_case() {
        let req: ProcessVideoRequest = serde_json::from_str(r#"{"fileName":"a.mp4"}"#).unwrap();
        assert_eq!(req.file_name.as_deref(), Some("a.mp4"));

        let req: ProcessVideoRequest = serde_json::from_str(r#"{"file_name":"a.mp4"}"#).unwrap();
        assert!(req.file_name.is_none());
    }
}
