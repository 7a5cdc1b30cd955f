use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{component::ComponentKind, connection::TemplateType};

/// SEO strings of a template type. Title and description contain
/// placeholder tokens, see [`crate::placeholder`].
/// Table: `seo_page_templates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTemplate {
    #[serde(rename = "template_type_id")]
    pub template_type: Id<TemplateType>,
    pub seo_title: String,
    pub meta_description: String,
}

impl HasId for PageTemplate {
    type IdType = String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Active,
    Inactive,
}

/// A named block to render on pages of a template.
/// Table: `seo_template_components`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateComponent {
    #[serde(rename = "template_id")]
    pub template: Id<PageTemplate>,
    #[serde(rename = "component_name")]
    pub component: ComponentKind,
    pub display_order: i32,
    pub status: ComponentStatus,
}

impl TemplateComponent {
    pub fn new(template: Id<PageTemplate>, component: ComponentKind, display_order: i32) -> Self {
        Self {
            template,
            component,
            display_order,
            status: ComponentStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ComponentStatus::Active
    }
}
