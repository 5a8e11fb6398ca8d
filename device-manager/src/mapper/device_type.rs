use super::relation;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::DeviceType;

impl Resource for DeviceType {
    const PATH: &'static str = "/api/device-types";
    const PROFILE: usize = 3;

    fn item_path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        Ok(vec![
            Property::new("id", "Device Type ID", self.id),
            Property::new("name", "Device Type Name", self.name.as_str()),
            Property::optional("deviceIconId", "Device Icon ID", self.device_icon_id),
        ])
    }

    fn to_links(&self, ctx: &RequestContext) -> Vec<Link> {
        vec![
            relation(ctx, Self::PATH, self.id, "type", "devices", "Devices"),
            relation(ctx, Self::PATH, self.id, "type", "icon", "Device icon"),
        ]
    }

    fn queries(ctx: &RequestContext) -> Vec<Query> {
        vec![Query::search(
            ctx.resolve(Self::PATH),
            &["id", "name", "deviceIconId"],
        )]
    }

    fn template() -> Option<Template> {
        Some(Template::of(&[
            ("name", "Type name"),
            ("deviceIconId", "Device icon identifier"),
        ]))
    }
}
