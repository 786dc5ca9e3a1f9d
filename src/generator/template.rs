//! The embedded PowerShell detection script template.

use include_dir::{include_dir, Dir};

use crate::error::{IntuneError, Result};
use crate::generator::interpolation::{self, Segment};

/// Embedded templates directory.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// File name of the detection template inside `templates/`.
pub const DETECTION_TEMPLATE: &str = "detect-app.ps1";

/// The only variable a detection template may reference.
pub const APP_ID_VARIABLE: &str = "app_id";

/// A parsed detection script template with a single `${app_id}` placeholder.
#[derive(Debug, Clone)]
pub struct DetectionTemplate {
    segments: Vec<Segment>,
}

impl DetectionTemplate {
    /// Load the template compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let file = TEMPLATES_DIR.get_file(DETECTION_TEMPLATE).ok_or_else(|| {
            IntuneError::TemplateError {
                message: format!("templates/{} is not embedded", DETECTION_TEMPLATE),
            }
        })?;
        let content = file
            .contents_utf8()
            .ok_or_else(|| IntuneError::TemplateError {
                message: format!("templates/{} is not valid UTF-8", DETECTION_TEMPLATE),
            })?;
        Self::from_source(content)
    }

    /// Parse a template, requiring exactly the `${app_id}` variable.
    pub fn from_source(source: &str) -> Result<Self> {
        let segments = interpolation::parse(source)?;
        let vars = interpolation::variables(&segments);
        if vars != [APP_ID_VARIABLE] {
            return Err(IntuneError::TemplateError {
                message: format!(
                    "Template must reference exactly '${{{}}}', found {:?}",
                    APP_ID_VARIABLE, vars
                ),
            });
        }
        Ok(Self { segments })
    }

    /// Render the script for `app_id`.
    ///
    /// The placeholder sits inside a PowerShell single-quoted string, so the
    /// identifier is quoted accordingly. Identifiers with line breaks or other
    /// control characters are rejected.
    pub fn render(&self, app_id: &str) -> Result<String> {
        validate_app_id(app_id)?;
        let quoted = app_id.replace('\'', "''");
        interpolation::render(&self.segments, |name| {
            (name == APP_ID_VARIABLE).then(|| quoted.clone())
        })
    }
}

/// Check that `app_id` can be embedded in a generated script.
pub fn validate_app_id(app_id: &str) -> Result<()> {
    if app_id.trim().is_empty() {
        return Err(IntuneError::TemplateError {
            message: "Application identifier must not be empty".to_string(),
        });
    }
    if app_id.chars().any(char::is_control) {
        return Err(IntuneError::TemplateError {
            message: "Application identifier must not contain control characters".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_template_loads() {
        let template = DetectionTemplate::embedded().unwrap();
        let script = template.render("7zip.7zip").unwrap();
        assert!(script.contains("$AppId = '7zip.7zip'"));
        assert!(script.contains("winget"));
        assert!(script.contains("finally"));
        assert!(!script.contains("${app_id}"));
    }

    #[test]
    fn identifier_is_embedded_verbatim() {
        let template = DetectionTemplate::from_source("x = '${app_id}'").unwrap();
        assert_eq!(
            template.render("Notepad++.Notepad++").unwrap(),
            "x = 'Notepad++.Notepad++'"
        );
    }

    #[test]
    fn single_quotes_are_doubled() {
        let template = DetectionTemplate::from_source("'${app_id}'").unwrap();
        assert_eq!(template.render("a'b").unwrap(), "'a''b'");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!(DetectionTemplate::from_source("exit 1").is_err());
    }

    #[test]
    fn template_with_extra_variable_is_rejected() {
        let err = DetectionTemplate::from_source("${app_id} ${other}").unwrap_err();
        assert!(err.to_string().contains("other"));
    }

    #[test]
    fn repeated_placeholder_is_allowed() {
        let template = DetectionTemplate::from_source("${app_id}/${app_id}").unwrap();
        assert_eq!(template.render("a.b").unwrap(), "a.b/a.b");
    }

    #[test]
    fn unsafe_identifiers_are_rejected() {
        let template = DetectionTemplate::from_source("${app_id}").unwrap();
        assert!(template.render("").is_err());
        assert!(template.render("   ").is_err());
        assert!(template.render("a\nexit 0").is_err());
    }
}
