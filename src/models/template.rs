use std::collections::BTreeMap;

use serde::Serialize;

use super::enums::{Jurisdiction, SectionType, TemplateCategory};

/// One ordered section of a consultation template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateSection {
    pub id: &'static str,
    pub title: &'static str,
    pub section_type: SectionType,
    pub required: bool,
    /// Display categorization hints. Never used to parse notes.
    pub keywords: &'static [&'static str],
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub jurisdiction: Jurisdiction,
    pub sections: Vec<TemplateSection>,
}

impl Template {
    pub fn section(&self, id: &str) -> Option<&TemplateSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn required_sections(&self) -> impl Iterator<Item = &TemplateSection> {
        self.sections.iter().filter(|s| s.required)
    }

    /// Required sections with no text in `notes`, in template order.
    pub fn missing_required(&self, notes: &BTreeMap<String, String>) -> Vec<&TemplateSection> {
        self.required_sections()
            .filter(|s| notes.get(s.id).map_or(true, |v| v.trim().is_empty()))
            .collect()
    }

    /// Section whose keyword list matches `text` first, in template order.
    pub fn categorize(&self, text: &str) -> Option<&TemplateSection> {
        let lower = text.to_lowercase();
        self.sections
            .iter()
            .find(|s| s.keywords.iter().any(|k| lower.contains(k)))
    }

    pub fn applies_to(&self, jurisdiction: Jurisdiction) -> bool {
        self.jurisdiction == jurisdiction || self.jurisdiction == Jurisdiction::International
    }
}
