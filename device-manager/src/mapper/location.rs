use super::device_link;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::{time, Location};

impl Resource for Location {
    const PATH: &'static str = "/api/locations";
    const PROFILE: usize = 4;

    fn item_path(&self) -> String {
        format!("{}?deviceId={}", Self::PATH, self.device_id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        Ok(vec![
            Property::new("deviceId", "Device ID", self.device_id),
            Property::new("latitude", "Latitude", self.latitude),
            Property::new("longitude", "Longitude", self.longitude),
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
            ("latitude", "Latitude"),
            ("longitude", "Longitude"),
            ("time", "Timestamp"),
        ]))
    }
}
