//! Template registry: a read-only catalogue of consultation templates.
//!
//! Queryable by id, category and jurisdiction. The catalogue is built once
//! and shared for the life of the process.

mod catalogue;

use std::sync::LazyLock;

use thiserror::Error;

use crate::models::{Jurisdiction, Template, TemplateCategory};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),
}

static BUILTIN: LazyLock<TemplateRegistry> =
    LazyLock::new(|| TemplateRegistry::new(catalogue::builtin_templates()));

#[derive(Debug)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

impl TemplateRegistry {
    fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// The process-wide built-in catalogue.
    pub fn builtin() -> &'static TemplateRegistry {
        &BUILTIN
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Result<&Template, TemplateError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.category == category).collect()
    }

    /// Templates usable in `jurisdiction`, international ones included.
    pub fn by_jurisdiction(&self, jurisdiction: Jurisdiction) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.applies_to(jurisdiction)).collect()
    }

    /// Combined filter; `None` matches everything.
    pub fn query(
        &self,
        category: Option<TemplateCategory>,
        jurisdiction: Option<Jurisdiction>,
    ) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .filter(|t| jurisdiction.map_or(true, |j| t.applies_to(j)))
            .collect()
    }

    /// Categories present in the catalogue, in first-seen order.
    pub fn categories(&self) -> Vec<TemplateCategory> {
        let mut seen = Vec::new();
        for t in &self.templates {
            if !seen.contains(&t.category) {
                seen.push(t.category);
            }
        }
        seen
    }
}
