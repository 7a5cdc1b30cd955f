use model::{
    component::ComponentKind,
    template::{ComponentStatus, PageTemplate, TemplateComponent},
    WithId,
};
use serde::Deserialize;
use utility::{id::Id, serde::string_or_number};

use super::{DatabaseRow, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct PageTemplateRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub template_type_id: String,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

impl DatabaseRow for PageTemplateRow {
    type Model = WithId<PageTemplate>;

    fn to_model(self) -> Result<Self::Model> {
        Ok(WithId::new(
            Id::new(self.id),
            PageTemplate {
                template_type: Id::new(self.template_type_id),
                seo_title: self.seo_title.unwrap_or_default(),
                meta_description: self.meta_description.unwrap_or_default(),
            },
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateComponentRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub template_id: String,
    pub component_name: ComponentKind,
    pub display_order: i32,
    pub status: ComponentStatus,
}

impl DatabaseRow for TemplateComponentRow {
    type Model = TemplateComponent;

    fn to_model(self) -> Result<Self::Model> {
        Ok(TemplateComponent {
            template: Id::new(self.template_id),
            component: self.component_name,
            display_order: self.display_order,
            status: self.status,
        })
    }
}
