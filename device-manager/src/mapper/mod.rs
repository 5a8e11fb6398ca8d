//! Collection+JSON renderings of the domain records
//!
//! One [`Resource`](crate::collection::Resource) implementation per entity:
//! item data, relation links, search queries and write templates.

mod configuration;
mod device;
mod device_group;
mod device_icon;
mod device_type;
mod location;
mod measurement;

use crate::collection::{Link, RequestContext};

/// Relation link to a sub-resource of a record, e.g. `/api/devices/3/group`
fn relation(
    ctx: &RequestContext,
    base: &str,
    id: i32,
    kind: &str,
    suffix: &str,
    prompt: &str,
) -> Link {
    Link::new(
        ctx.resolve(&format!("{}/{}/{}", base, id, suffix)),
        format!("{} {} {}", kind, id, suffix),
        prompt,
    )
}

/// Link from a location or measurement to its device
fn device_link(ctx: &RequestContext, device_id: i32) -> Link {
    Link::new(
        ctx.resolve(&format!("/api/devices?id={}", device_id)),
        "device",
        "Device",
    )
}
