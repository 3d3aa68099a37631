//! Message composition — resolves the value map a stored template is filled with.
//!
//! Precedence per variable: caller value > directive default > (resume variables
//! only) the user's default resume. Resume variables given a resume id resolve to
//! that resume's `file_url`.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::resume::ResumeRow;
use crate::variables::{TemplateVariable, VariableType};

pub fn needs_resumes(variables: &[TemplateVariable]) -> bool {
    variables
        .iter()
        .any(|v| v.variable_type == VariableType::ResumeSelect)
}

pub fn resolve_values(
    variables: &[TemplateVariable],
    supplied: &HashMap<String, String>,
    resumes: &[ResumeRow],
) -> HashMap<String, String> {
    let mut values: HashMap<String, String> = supplied
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for variable in variables {
        if !values.contains_key(&variable.name) {
            if let Some(default) = variable.default_value.as_deref().filter(|d| !d.is_empty()) {
                values.insert(variable.name.clone(), default.to_string());
            }
        }

        if variable.variable_type != VariableType::ResumeSelect {
            continue;
        }

        let resolved = match values.get(&variable.name) {
            Some(value) => resume_by_id(resumes, value).map(|r| r.file_url.clone()),
            None => resumes
                .iter()
                .find(|r| r.is_default)
                .map(|r| r.file_url.clone()),
        };
        if let Some(url) = resolved {
            values.insert(variable.name.clone(), url);
        }
    }

    values
}

fn resume_by_id<'a>(resumes: &'a [ResumeRow], value: &str) -> Option<&'a ResumeRow> {
    let id = Uuid::parse_str(value.trim()).ok()?;
    resumes.iter().find(|r| r.id == id)
}
