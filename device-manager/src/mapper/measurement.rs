use serde_json::Value;

use super::device_link;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::{time, Measurement};

impl Resource for Measurement {
    const PATH: &'static str = "/api/measurements";
    const PROFILE: usize = 5;

    fn item_path(&self) -> String {
        format!("{}?deviceId={}", Self::PATH, self.device_id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        Ok(vec![
            Property::new("deviceId", "Device ID", self.device_id),
            Property::new(
                "content",
                "Content",
                Value::String(serde_json::to_string(&self.content)?),
            ),
            Property::new("time", "Timestamp", time::format(&self.time)),
        ])
    }

    fn to_links(&self, ctx: &RequestContext) -> Vec<Link> {
        vec![device_link(ctx, self.device_id)]
    }

    fn queries(ctx: &RequestContext) -> Vec<Query> {
        vec![Query::search(
            ctx.resolve(Self::PATH),
            &["deviceId", "exactTime", "startTime", "endTime"],
        )]
    }

    fn template() -> Option<Template> {
        Some(Template::of(&[
            ("deviceId", "Device ID"),
            ("content", "Content"),
            ("time", "Timestamp"),
        ]))
    }
}
