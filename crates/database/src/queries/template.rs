use model::{
    connection::TemplateType,
    template::{PageTemplate, TemplateComponent},
    WithId,
};
use seo::database::Result;
use utility::id::Id;

use crate::{
    data_model::{
        template::{PageTemplateRow, TemplateComponentRow},
        DatabaseRow,
    },
    query::{Order, Query},
    PostgrestDatabase,
};

use super::to_models;

pub async fn by_template_type(
    database: &PostgrestDatabase,
    template_type: &Id<TemplateType>,
) -> Result<WithId<PageTemplate>> {
    let query = Query::from("seo_page_templates")
        .select("id, template_type_id, seo_title, meta_description")
        .eq("template_type_id", template_type)
        .single();
    let row: PageTemplateRow = database.fetch(&query).await?;
    row.to_model()
}

pub async fn active_components(
    database: &PostgrestDatabase,
    template: &Id<PageTemplate>,
) -> Result<Vec<TemplateComponent>> {
    let query = Query::from("seo_template_components")
        .select("template_id, component_name, display_order, status")
        .eq("template_id", template)
        .eq("status", "active")
        .order("display_order", Order::Ascending);
    let rows: Vec<TemplateComponentRow> = database.fetch(&query).await?;
    to_models(rows)
}
