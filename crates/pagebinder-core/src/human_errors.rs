// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the front end.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the front end presents it.

use crate::error::PagebinderError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must change something (add an image, pick a smaller margin).
    ActionRequired,
    /// The input itself is unusable; retrying will not help.
    Permanent,
    /// A bug or environment problem inside Pagebinder.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `PagebinderError` into a `HumanError`.
pub fn humanize_error(err: &PagebinderError) -> HumanError {
    match err {
        PagebinderError::Configuration(detail) => {
            if detail.contains("no images") || detail.contains("no supported") {
                HumanError {
                    message: "Please add at least one image.".into(),
                    suggestion: "Supported formats are JPG, PNG, GIF and WEBP.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if detail.contains("margin") {
                HumanError {
                    message: "That margin doesn't fit on the page.".into(),
                    suggestion: "Choose a smaller margin, for example 10 mm.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Some of the PDF options aren't valid.".into(),
                    suggestion: format!("Check the page settings and try again. ({detail})"),
                    severity: Severity::ActionRequired,
                }
            }
        }

        PagebinderError::Font(_) => HumanError {
            message: "Page numbers can't be drawn on this device.".into(),
            suggestion: "Turn off page numbers, or choose a TrueType font file in the settings."
                .into(),
            severity: Severity::ActionRequired,
        },

        PagebinderError::Decode { name, .. } => HumanError {
            message: format!("The image \"{name}\" couldn't be opened."),
            suggestion: "The file may be damaged. Remove it from the list or save it again as a JPEG or PNG."
                .into(),
            severity: Severity::Permanent,
        },

        PagebinderError::Render(_) | PagebinderError::Encode(_) | PagebinderError::Assembly(_) => {
            HumanError {
                message: "Failed to generate PDF.".into(),
                suggestion: "Please try again. If this keeps happening, please report it.".into(),
                severity: Severity::Internal,
            }
        }

        PagebinderError::PdfRead(_) => HumanError {
            message: "The generated PDF couldn't be checked.".into(),
            suggestion: "Please try generating it again.".into(),
            severity: Severity::Internal,
        },

        PagebinderError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Pagebinder doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or pick a different location.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                severity: Severity::Internal,
            },
        },

        PagebinderError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Delete the settings file to go back to the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
