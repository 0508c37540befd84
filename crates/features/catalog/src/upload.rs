//! Course file upload validation.

use chub_domain::config::UploadPolicy;
use chub_kernel::error::{RuleError, RuleErrorExt};
use chub_kernel::pipeline::RuleChain;
use serde::{Deserialize, Serialize};

/// An upload as announced by the client: no bytes, just what the rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub filename: String,
    pub size_bytes: u64,
}

impl FileUpload {
    #[must_use]
    pub fn new(filename: impl Into<String>, size_bytes: u64) -> Self {
        Self { filename: filename.into(), size_bytes }
    }

    /// Lowercase suffix from the last dot on, e.g. `.pdf`. A bare `.pdf` is its own extension.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{}", ext.to_ascii_lowercase()))
    }
}

/// Which size cap applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadScope {
    /// Course material attached to a course.
    Material,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadVerdict {
    Accepted,
}

#[derive(Debug)]
pub struct UploadCheck<'a> {
    pub upload: &'a FileUpload,
    pub scope: UploadScope,
    pub policy: &'a UploadPolicy,
}

impl UploadCheck<'_> {
    const fn cap(&self) -> u64 {
        match self.scope {
            UploadScope::Material => self.policy.material_max_bytes,
            UploadScope::General => self.policy.general_max_bytes,
        }
    }
}

#[must_use]
pub fn upload_chain<'a>() -> RuleChain<UploadCheck<'a>> {
    RuleChain::<UploadCheck<'a>>::new("upload.validate")
        .rule("allowed extension", allowed_extension)
        .rule("within size cap", within_size_cap)
}

/// # Errors
/// * [`RuleError::UnsupportedFileType`] for extensions outside the policy.
/// * [`RuleError::FileTooLarge`] when the upload exceeds the scope's cap.
pub fn validate_upload(
    policy: &UploadPolicy,
    upload: &FileUpload,
    scope: UploadScope,
) -> Result<UploadVerdict, RuleError> {
    upload_chain().evaluate(&UploadCheck { upload, scope, policy })?;
    Ok(UploadVerdict::Accepted)
}

fn allowed_extension(check: &UploadCheck<'_>) -> Result<(), RuleError> {
    let allowed = check.upload.extension().is_some_and(|ext| {
        check.policy.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext))
    });
    if allowed {
        Ok(())
    } else {
        Err(RuleError::unsupported_file_type("unsupported file type"))
            .context(check.upload.filename.clone())
    }
}

fn within_size_cap(check: &UploadCheck<'_>) -> Result<(), RuleError> {
    if check.upload.size_bytes <= check.cap() {
        Ok(())
    } else {
        Err(RuleError::file_too_large("file too large"))
            .context(format!("{} > {} bytes", check.upload.size_bytes, check.cap()))
    }
}
