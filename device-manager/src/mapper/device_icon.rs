use super::relation;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::DeviceIcon;

/// Example address of an icon image, offered as a query
const ICON_IMAGE_PATH: &str = "/api/device-icons/name.png";

impl Resource for DeviceIcon {
    const PATH: &'static str = "/api/device-icons";
    const PROFILE: usize = 2;

    fn item_path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        Ok(vec![
            Property::new("id", "Device Icon ID", self.id),
            Property::new("name", "Device Icon Name", self.name.as_str()),
        ])
    }

    fn to_links(&self, ctx: &RequestContext) -> Vec<Link> {
        vec![relation(ctx, Self::PATH, self.id, "icon", "types", "Device Types")]
    }

    fn queries(ctx: &RequestContext) -> Vec<Query> {
        vec![
            Query::search(ctx.resolve(Self::PATH), &["id", "name"]),
            Query {
                href: ctx.resolve(ICON_IMAGE_PATH),
                rel: "image".to_string(),
                prompt: Some("Search image".to_string()),
                data: Vec::new(),
            },
        ]
    }

    // Icons are uploaded as multipart files, not JSON
    fn template() -> Option<Template> {
        None
    }
}
