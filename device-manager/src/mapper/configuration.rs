use serde_json::Value;

use super::relation;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::Configuration;

impl Resource for Configuration {
    const PATH: &'static str = "/api/configurations";
    const PROFILE: usize = 6;

    fn item_path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        // content travels as a JSON string inside the item
        let content = match &self.content {
            Some(content) => Value::String(serde_json::to_string(content)?),
            None => Value::Null,
        };

        Ok(vec![
            Property::new("id", "Configuration ID", self.id),
            Property::new("name", "Name", self.name.as_str()),
            Property::optional("description", "Description", self.description.clone()),
            Property::new("content", "Configuration as JSON", content),
        ])
    }

    fn to_links(&self, ctx: &RequestContext) -> Vec<Link> {
        vec![relation(ctx, Self::PATH, self.id, "configuration", "devices", "Devices")]
    }

    fn queries(ctx: &RequestContext) -> Vec<Query> {
        vec![Query::search(ctx.resolve(Self::PATH), &["id", "name"])]
    }

    fn template() -> Option<Template> {
        Some(Template::of(&[
            ("name", "Configuration name"),
            ("description", "Description"),
            ("content", "Configuration as JSON"),
        ]))
    }
}
