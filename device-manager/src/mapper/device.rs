use super::relation;
use crate::classify::Failure;
use crate::collection::{Link, Property, Query, RequestContext, Resource, Template};
use crate::domain::Device;

impl Resource for Device {
    const PATH: &'static str = "/api/devices";
    const PROFILE: usize = 0;

    fn item_path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }

    fn to_properties(&self) -> Result<Vec<Property>, Failure> {
        Ok(vec![
            Property::new("id", "Device ID", self.id),
            Property::new("name", "Device Name", self.name.as_str()),
            Property::optional("deviceTypeId", "Device Type ID", self.device_type_id),
            Property::optional("deviceGroupId", "Device Group ID", self.device_group_id),
            Property::optional("configurationId", "Configuration ID", self.configuration_id),
            Property::new(
                "authenticationKey",
                "Authentication Key",
                self.authentication_key.as_str(),
            ),
        ])
    }

    fn to_links(&self, ctx: &RequestContext) -> Vec<Link> {
        [
            ("group", "Device Group"),
            ("type", "Device Type"),
            ("icon", "Device icon"),
            ("configuration", "Configuration"),
            ("measurements", "Measurements"),
            ("locations", "Locations"),
        ]
        .into_iter()
        .map(|(suffix, prompt)| relation(ctx, Self::PATH, self.id, "device", suffix, prompt))
        .collect()
    }

    fn queries(ctx: &RequestContext) -> Vec<Query> {
        vec![Query::search(
            ctx.resolve(Self::PATH),
            &[
                "id",
                "name",
                "deviceTypeId",
                "deviceGroupId",
                "configurationId",
                "authenticationKey",
            ],
        )]
    }

    fn template() -> Option<Template> {
        Some(Template::of(&[
            ("name", "Device name"),
            ("deviceTypeId", "Device Type Identifier"),
            ("deviceGroupId", "Device Group Identifier"),
            ("configurationId", "Configuration Identifier"),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::to_collection;
    use serde_json::Value;

    fn device(id: i32) -> Device {
        Device {
            id,
            name: format!("device-{id}"),
            device_type_id: None,
            device_group_id: Some(2),
            configuration_id: None,
            authentication_key: "0123456789abcdef0123456789abcdef".into(),
        }
    }

    #[test]
    fn test_device_item() {
        let ctx = RequestContext::new("http://localhost", "/api/devices");
        let document = to_collection(&[device(5)], &ctx).unwrap();
        let item = &document.collection.items[0];

        assert_eq!(item.href, "http://localhost/api/devices/5");
        assert_eq!(item.value("id"), Some(&Value::from(5)));
        assert_eq!(item.value("deviceTypeId"), Some(&Value::Null));
        assert_eq!(item.value("deviceGroupId"), Some(&Value::from(2)));
        assert_eq!(item.data.len(), 6);
    }

    #[test]
    fn test_device_links() {
        let ctx = RequestContext::new("http://localhost", "/api/devices");
        let links = device(5).to_links(&ctx);
        assert_eq!(links.len(), 6);
        assert_eq!(links[0].rel, "device 5 group");
        assert_eq!(links[0].href, "http://localhost/api/devices/5/group");
        assert_eq!(links[5].prompt.as_deref(), Some("Locations"));
    }

    #[test]
    fn test_device_template_excludes_server_fields() {
        let template = Device::template().unwrap();
        let names: Vec<_> = template.data.iter().map(|p| p.name.as_str()).collect();
        assert!(!names.contains(&"id"));
        assert!(!names.contains(&"authenticationKey"));
    }
}
