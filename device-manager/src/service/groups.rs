use super::series::{fan_out_delete, fan_out_list};
use super::{groups, Envelope};
use crate::classify::{classify, Failure};
use crate::domain::{Device, DeviceFilter, DeviceInput, Location, Measurement, Selector, TimeFilter};
use crate::repository::{Repository, Store};
use crate::validation::validate_body;

const DEVICES_TITLE: &str = "Get group's devices failed";
const ADD_DEVICE_TITLE: &str = "Add device to group failed";
const LOCATIONS_TITLE: &str = "Get group's location updates failed";
const DELETE_LOCATIONS_TITLE: &str = "Delete group's location updates failed";
const MEASUREMENTS_TITLE: &str = "Get group's measurements failed";
const DELETE_MEASUREMENTS_TITLE: &str = "Delete group's measurements failed";

/// Operations spanning a group's member devices
pub struct GroupService<'a, S> {
    store: &'a S,
}

impl<'a, S: Store> GroupService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn members(&self, id: i32) -> Result<Vec<Device>, Failure> {
        groups(self.store).find(&Selector::id(id)).await?;
        let filter = DeviceFilter {
            device_group_id: Some(id),
            ..Default::default()
        };
        Ok(self.store.devices().list(&filter).await?)
    }

    /// Members of the group, failing when there are none
    async fn require_members(&self, id: i32) -> Result<Vec<Device>, Failure> {
        let members = self.members(id).await?;
        if members.is_empty() {
            return Err(Failure::not_found(format!("No devices found for group {}", id)));
        }
        Ok(members)
    }

    pub async fn devices(&self, id: i32) -> Envelope<Vec<Device>> {
        async {
            let members = self.members(id).await?;
            if members.is_empty() {
                return Err(Failure::not_found(format!("[deviceGroupId: {}]", id)));
            }
            Ok(members)
        }
        .await
        .map_err(|f| classify(f, DEVICES_TITLE))
    }

    pub async fn add_device(&self, id: i32, mut input: DeviceInput) -> Envelope<Device> {
        validate_body(&input)?;
        async {
            groups(self.store).find(&Selector::id(id)).await?;
            input.device_group_id = Some(id);
            Ok(self.store.devices().add(input).await?)
        }
        .await
        .map_err(|f| classify(f, ADD_DEVICE_TITLE))
    }

    pub async fn locations(&self, id: i32, window: &TimeFilter) -> Envelope<Vec<Location>> {
        async {
            let members = self.require_members(id).await?;
            let rows = fan_out_list(self.store.locations(), &members, window).await?;
            if rows.is_empty() {
                return Err(nothing_in_window("locations", id, window));
            }
            Ok(rows)
        }
        .await
        .map_err(|f| classify(f, LOCATIONS_TITLE))
    }

    pub async fn delete_locations(&self, id: i32, window: &TimeFilter) -> Envelope<()> {
        async {
            let members = self.require_members(id).await?;
            if !fan_out_delete(self.store.locations(), &members, window).await? {
                return Err(nothing_in_window("locations", id, window));
            }
            Ok(())
        }
        .await
        .map_err(|f| classify(f, DELETE_LOCATIONS_TITLE))
    }

    pub async fn measurements(&self, id: i32, window: &TimeFilter) -> Envelope<Vec<Measurement>> {
        async {
            let members = self.require_members(id).await?;
            let rows = fan_out_list(self.store.measurements(), &members, window).await?;
            if rows.is_empty() {
                return Err(nothing_in_window("measurements", id, window));
            }
            Ok(rows)
        }
        .await
        .map_err(|f| classify(f, MEASUREMENTS_TITLE))
    }

    pub async fn delete_measurements(&self, id: i32, window: &TimeFilter) -> Envelope<()> {
        async {
            let members = self.require_members(id).await?;
            if !fan_out_delete(self.store.measurements(), &members, window).await? {
                return Err(nothing_in_window("measurements", id, window));
            }
            Ok(())
        }
        .await
        .map_err(|f| classify(f, DELETE_MEASUREMENTS_TITLE))
    }
}

fn nothing_in_window(kind: &str, id: i32, window: &TimeFilter) -> Failure {
    Failure::not_found(format!(
        "No {} found for group {} with parameters: {}",
        kind,
        id,
        window.describe_window()
    ))
}
