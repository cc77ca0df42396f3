use serde::Serialize;

use crate::models::resume::ResumeRow;
use crate::models::template::TemplateRow;

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub resume_id: i64,
    pub jade_format: String,
    pub template_used: String,
    pub conversion_successful: bool,
}

/// Renders a resume into the plain-text Jade layout.
///
/// Deterministic: built only from the resume's stored fields, headed by the
/// template's name. Document text is not re-read from disk.
pub fn render_jade(resume: &ResumeRow, template: &TemplateRow) -> String {
    let experience = resume
        .experience_years
        .map(|y| format!("{y} years"))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    let mut out = String::new();
    out.push_str("JADE FORMAT RESUME\n");
    out.push_str("==================\n");
    out.push_str(&format!("Template: {}\n\n", template.name));
    if let Some(summary) = resume.summary.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(summary);
        out.push_str("\n\n");
    }
    out.push_str(&format!("EXPERIENCE: {experience}\n"));
    out.push_str(&format!("SKILLS: {}\n", field_or_default(&resume.skills)));
    out.push_str(&format!("EDUCATION: {}\n\n", field_or_default(&resume.education)));
    out.push_str("ORIGINAL CONTENT:\n");
    out.push_str(&resume.content);
    out.push('\n');
    out
}

fn field_or_default(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_SPECIFIED)
}
