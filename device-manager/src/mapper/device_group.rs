use super::relation;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::DeviceGroup;

impl Resource for DeviceGroup {
    const PATH: &'static str = "/api/device-groups";
    const PROFILE: usize = 1;

    fn item_path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        Ok(vec![
            Property::new("id", "Device Group ID", self.id),
            Property::new("name", "Device Group Name", self.name.as_str()),
            Property::optional("description", "Description", self.description.clone()),
        ])
    }

    fn to_links(&self, ctx: &RequestContext) -> Vec<Link> {
        [
            ("devices", "Devices"),
            ("measurements", "Measurements"),
            ("locations", "Locations"),
        ]
        .into_iter()
        .map(|(suffix, prompt)| relation(ctx, Self::PATH, self.id, "group", suffix, prompt))
        .collect()
    }

    fn queries(ctx: &RequestContext) -> Vec<Query> {
        vec![Query::search(ctx.resolve(Self::PATH), &["id", "name"])]
    }

    fn template() -> Option<Template> {
        Some(Template::of(&[
            ("name", "Group name"),
            ("description", "Description"),
        ]))
    }
}
