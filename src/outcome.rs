//! The uniform result envelope returned by every public operation.
//!
//! An outer command layer never sees [`crate::Error`] directly: it gets a
//! success flag, a string code, a human-readable message and, on success,
//! an optional payload. Payloads are `Serialize` so the caller can render
//! the whole envelope as JSON without the core doing any output itself.

use std::fmt;

use serde::Serialize;

use crate::Error;

/// String codes reported in [`OperationResult::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResultCode {
    Ok,

    // Not found
    NodeNotFound,
    LayerNotFound,
    AttributeNotFound,
    HyperedgeNotFound,
    EdgeNotFound,
    PathNotFound,

    // Conflict
    NodeAlreadyExists,
    AttributeNameExists,
    LayerAlreadyExists,
    EdgeExists,
    EdgeAlreadyExists,

    // Validation
    InvalidAttributeType,
    SelftiesNotAllowed,
    AttributeTypeMismatch,
    LayerNotOneMode,
    LayerNotTwoMode,
    ConstraintNodeNotAffiliated,
    InvalidArgument,
    FileFormatError,
    FileColumnsError,

    // I/O
    #[serde(rename = "IOError")]
    IoError,
    LoadError,
    SaveError,
    UnexpectedImportError,
}

impl ResultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Ok => "Ok",
            ResultCode::NodeNotFound => "NodeNotFound",
            ResultCode::LayerNotFound => "LayerNotFound",
            ResultCode::AttributeNotFound => "AttributeNotFound",
            ResultCode::HyperedgeNotFound => "HyperedgeNotFound",
            ResultCode::EdgeNotFound => "EdgeNotFound",
            ResultCode::PathNotFound => "PathNotFound",
            ResultCode::NodeAlreadyExists => "NodeAlreadyExists",
            ResultCode::AttributeNameExists => "AttributeNameExists",
            ResultCode::LayerAlreadyExists => "LayerAlreadyExists",
            ResultCode::EdgeExists => "EdgeExists",
            ResultCode::EdgeAlreadyExists => "EdgeAlreadyExists",
            ResultCode::InvalidAttributeType => "InvalidAttributeType",
            ResultCode::SelftiesNotAllowed => "SelftiesNotAllowed",
            ResultCode::AttributeTypeMismatch => "AttributeTypeMismatch",
            ResultCode::LayerNotOneMode => "LayerNotOneMode",
            ResultCode::LayerNotTwoMode => "LayerNotTwoMode",
            ResultCode::ConstraintNodeNotAffiliated => "ConstraintNodeNotAffiliated",
            ResultCode::InvalidArgument => "InvalidArgument",
            ResultCode::FileFormatError => "FileFormatError",
            ResultCode::FileColumnsError => "FileColumnsError",
            ResultCode::IoError => "IOError",
            ResultCode::LoadError => "LoadError",
            ResultCode::SaveError => "SaveError",
            ResultCode::UnexpectedImportError => "UnexpectedImportError",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success flag + code + message + optional payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T = ()> {
    pub success: bool,
    pub code: ResultCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> OperationResult<T> {
    /// Success without a payload.
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, code: ResultCode::Ok, message: message.into(), payload: None }
    }

    /// Success carrying a payload.
    pub fn ok_with(payload: T, message: impl Into<String>) -> Self {
        Self { success: true, code: ResultCode::Ok, message: message.into(), payload: Some(payload) }
    }

    pub fn fail(code: ResultCode, message: impl Into<String>) -> Self {
        Self { success: false, code, message: message.into(), payload: None }
    }

    /// Wrap an internal result, building the success message from the value.
    pub fn from_result(res: crate::Result<T>, message: impl FnOnce(&T) -> String) -> Self {
        match res {
            Ok(value) => {
                let msg = message(&value);
                Self::ok_with(value, msg)
            }
            Err(err) => err.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    /// Transform the payload, keeping code and message.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        OperationResult {
            success: self.success,
            code: self.code,
            message: self.message,
            payload: self.payload.map(f),
        }
    }

    /// Drop the payload (used when forwarding a failure of another type).
    pub fn discard<U>(self) -> OperationResult<U> {
        OperationResult { success: self.success, code: self.code, message: self.message, payload: None }
    }
}

impl OperationResult<()> {
    /// Wrap a payload-less internal result.
    pub fn from_unit(res: crate::Result<()>, message: impl Into<String>) -> Self {
        match res {
            Ok(()) => Self::ok(message),
            Err(err) => err.into(),
        }
    }
}

impl<T> From<Error> for OperationResult<T> {
    fn from(err: Error) -> Self {
        Self::fail(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_converts_to_failure() {
        let res: OperationResult<u32> = Error::NodeNotFound("Node 7".into()).into();
        assert!(!res.success);
        assert_eq!(res.code, ResultCode::NodeNotFound);
        assert!(res.message.contains("Node 7"));
        assert!(res.payload.is_none());
    }

    #[test]
    fn test_code_strings() {
        assert_eq!(ResultCode::IoError.as_str(), "IOError");
        assert_eq!(
            Error::NodeNotAffiliated("x".into()).code().to_string(),
            "ConstraintNodeNotAffiliated"
        );
    }

    #[test]
    fn test_map_keeps_message() {
        let res = OperationResult::ok_with(3usize, "three").map(|n| n * 2);
        assert_eq!(res.payload, Some(6));
        assert_eq!(res.message, "three");
    }
}
