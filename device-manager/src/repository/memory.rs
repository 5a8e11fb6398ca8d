//! In-memory store for tests
//!
//! Mirrors the constraint behavior of the PostgreSQL schema: unique names,
//! foreign keys that restrict deletes, and cascading removal of a device's
//! locations and measurements.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDateTime, SubsecRound, Utc};

use super::error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use super::traits::{ReplaceRepository, Repository, RepositoryResult, Store};
use crate::domain::device::generate_authentication_key;
use crate::domain::{
    Configuration, ConfigurationInput, Device, DeviceFilter, DeviceGroup, DeviceGroupInput,
    DeviceIcon, DeviceIconInput, DeviceInput, DeviceSelector, DeviceType, DeviceTypeFilter,
    DeviceTypeInput, FilterSet, Location, LocationInput, Measurement, MeasurementInput, Selector,
    TimeFilter,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    devices: Vec<Device>,
    groups: Vec<DeviceGroup>,
    types: Vec<DeviceType>,
    icons: Vec<DeviceIcon>,
    configurations: Vec<Configuration>,
    locations: Vec<Location>,
    measurements: Vec<Measurement>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

macro_rules! table_view {
    ($($name:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone)]
            pub struct $name {
                tables: Arc<Mutex<Tables>>,
            }

            impl $name {
                fn lock(&self) -> MutexGuard<'_, Tables> {
                    self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
                }
            }
        )*
    };
}

table_view!(
    MemoryDevices,
    MemoryGroups,
    MemoryTypes,
    MemoryIcons,
    MemoryConfigurations,
    MemoryLocations,
    MemoryMeasurements,
);

/// Every repository shares the same tables
#[derive(Debug, Clone)]
pub struct MemoryStore {
    devices: MemoryDevices,
    groups: MemoryGroups,
    types: MemoryTypes,
    icons: MemoryIcons,
    configurations: MemoryConfigurations,
    locations: MemoryLocations,
    measurements: MemoryMeasurements,
}

impl MemoryStore {
    pub fn new() -> Self {
        let tables = Arc::new(Mutex::new(Tables::default()));
        Self {
            devices: MemoryDevices { tables: tables.clone() },
            groups: MemoryGroups { tables: tables.clone() },
            types: MemoryTypes { tables: tables.clone() },
            icons: MemoryIcons { tables: tables.clone() },
            configurations: MemoryConfigurations { tables: tables.clone() },
            locations: MemoryLocations { tables: tables.clone() },
            measurements: MemoryMeasurements { tables },
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate(operation: RepositoryOperation, table: &str) -> RepositoryError {
    RepositoryError::already_exists(
        operation,
        format!("duplicate key value violates unique constraint \"{}_name_key\"", table),
    )
    .with_constraint(format!("{}_name_key", table))
    .with_entity(table)
}

fn missing_reference(operation: RepositoryOperation, table: &str, column: &str) -> RepositoryError {
    let constraint = format!("{}_{}_fkey", table, column);
    RepositoryError::constraint_violation(
        operation,
        format!(
            "insert or update on table \"{}\" violates foreign key constraint \"{}\"",
            table, constraint
        ),
    )
    .with_constraint(constraint)
    .with_entity(table)
}

fn still_referenced(table: &str, referencing: &str, column: &str) -> RepositoryError {
    let constraint = format!("{}_{}_fkey", referencing, column);
    RepositoryError::constraint_violation(
        RepositoryOperation::Delete,
        format!(
            "update or delete on table \"{}\" violates foreign key constraint \"{}\"",
            table, constraint
        ),
    )
    .with_constraint(constraint)
    .with_entity(table)
}

fn not_null(operation: RepositoryOperation, table: &str, column: &str) -> RepositoryError {
    RepositoryError::new(
        operation,
        RepositoryErrorKind::ConstraintViolation,
        format!("null value in column \"{}\" violates not-null constraint", column),
    )
    .with_entity(table)
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

fn check_reference<T>(
    operation: RepositoryOperation,
    rows: &[T],
    id: Option<i32>,
    row_id: impl Fn(&T) -> i32,
    table: &str,
    column: &str,
) -> RepositoryResult<()> {
    match id {
        Some(id) if !rows.iter().any(|row| row_id(row) == id) => {
            Err(missing_reference(operation, table, column))
        }
        _ => Ok(()),
    }
}

fn name_taken<T>(
    rows: &[T],
    name: &str,
    except: Option<i32>,
    row: impl Fn(&T) -> (i32, &str),
) -> bool {
    rows.iter().any(|candidate| {
        let (id, candidate_name) = row(candidate);
        candidate_name == name && Some(id) != except
    })
}

/// Single id selected by a selector, enforcing the schema's refusal of empty selectors
fn selected_id<T>(
    rows: &[T],
    selector: &impl FilterSet,
    matches: impl Fn(&T) -> bool,
    id: impl Fn(&T) -> i32,
) -> Option<i32> {
    if selector.is_empty() {
        return None;
    }
    rows.iter().find(|row| matches(row)).map(id)
}

impl Store for MemoryStore {
    type Devices = MemoryDevices;
    type Groups = MemoryGroups;
    type Types = MemoryTypes;
    type Icons = MemoryIcons;
    type Configurations = MemoryConfigurations;
    type Locations = MemoryLocations;
    type Measurements = MemoryMeasurements;

    fn devices(&self) -> &MemoryDevices {
        &self.devices
    }

    fn groups(&self) -> &MemoryGroups {
        &self.groups
    }

    fn types(&self) -> &MemoryTypes {
        &self.types
    }

    fn icons(&self) -> &MemoryIcons {
        &self.icons
    }

    fn configurations(&self) -> &MemoryConfigurations {
        &self.configurations
    }

    fn locations(&self) -> &MemoryLocations {
        &self.locations
    }

    fn measurements(&self) -> &MemoryMeasurements {
        &self.measurements
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

impl Repository for MemoryDevices {
    type Entity = Device;
    type Filter = DeviceFilter;
    type Input = DeviceInput;
    type Selector = DeviceSelector;

    async fn list(&self, filter: &DeviceFilter) -> RepositoryResult<Vec<Device>> {
        Ok(self
            .lock()
            .devices
            .iter()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect())
    }

    async fn add(&self, input: DeviceInput) -> RepositoryResult<Device> {
        let op = RepositoryOperation::Add;
        let mut tables = self.lock();
        check_device_references(&tables, op, &input)?;
        if name_taken(&tables.devices, input.name(), None, |d| (d.id, d.name.as_str())) {
            return Err(duplicate(op, "device"));
        }
        let device = Device {
            id: tables.next_id(),
            name: input.name().to_string(),
            device_type_id: input.device_type_id,
            device_group_id: input.device_group_id,
            configuration_id: input.configuration_id,
            authentication_key: generate_authentication_key(),
        };
        tables.devices.push(device.clone());
        Ok(device)
    }

    async fn delete(&self, selector: &DeviceSelector) -> RepositoryResult<bool> {
        if selector.is_empty() {
            return Ok(false);
        }
        let filter = DeviceFilter::from(selector);
        let mut tables = self.lock();
        let removed: Vec<i32> = tables
            .devices
            .iter()
            .filter(|device| filter.matches(device))
            .map(|device| device.id)
            .collect();
        tables.devices.retain(|device| !removed.contains(&device.id));
        tables.locations.retain(|l| !removed.contains(&l.device_id));
        tables.measurements.retain(|m| !removed.contains(&m.device_id));
        Ok(!removed.is_empty())
    }
}

fn check_device_references(
    tables: &Tables,
    op: RepositoryOperation,
    input: &DeviceInput,
) -> RepositoryResult<()> {
    check_reference(op, &tables.types, input.device_type_id, |t| t.id, "device", "device_type_id")?;
    check_reference(op, &tables.groups, input.device_group_id, |g| g.id, "device", "device_group_id")?;
    check_reference(
        op,
        &tables.configurations,
        input.configuration_id,
        |c| c.id,
        "device",
        "configuration_id",
    )
}

impl ReplaceRepository for MemoryDevices {
    async fn update(&self, selector: &DeviceSelector, input: DeviceInput) -> RepositoryResult<Device> {
        let op = RepositoryOperation::Update;
        let filter = DeviceFilter::from(selector);
        let mut tables = self.lock();
        let id = selected_id(&tables.devices, selector, |d| filter.matches(d), |d| d.id)
            .ok_or_else(|| RepositoryError::not_found(op, "device"))?;
        check_device_references(&tables, op, &input)?;
        if name_taken(&tables.devices, input.name(), Some(id), |d| (d.id, d.name.as_str())) {
            return Err(duplicate(op, "device"));
        }
        let device = tables
            .devices
            .iter_mut()
            .find(|device| device.id == id)
            .ok_or_else(|| RepositoryError::not_found(op, "device"))?;
        device.name = input.name().to_string();
        device.device_type_id = input.device_type_id;
        device.device_group_id = input.device_group_id;
        device.configuration_id = input.configuration_id;
        Ok(device.clone())
    }
}

impl Repository for MemoryGroups {
    type Entity = DeviceGroup;
    type Filter = Selector;
    type Input = DeviceGroupInput;
    type Selector = Selector;

    async fn list(&self, filter: &Selector) -> RepositoryResult<Vec<DeviceGroup>> {
        Ok(self
            .lock()
            .groups
            .iter()
            .filter(|group| filter.matches(group.id, &group.name))
            .cloned()
            .collect())
    }

    async fn add(&self, input: DeviceGroupInput) -> RepositoryResult<DeviceGroup> {
        let mut tables = self.lock();
        if name_taken(&tables.groups, input.name(), None, |g| (g.id, g.name.as_str())) {
            return Err(duplicate(RepositoryOperation::Add, "device_group"));
        }
        let group = DeviceGroup {
            id: tables.next_id(),
            name: input.name().to_string(),
            description: input.description,
        };
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        let mut tables = self.lock();
        let Some(id) = selected_id(&tables.groups, selector, |g| selector.matches(g.id, &g.name), |g| g.id) else {
            return Ok(false);
        };
        if tables.devices.iter().any(|d| d.device_group_id == Some(id)) {
            return Err(still_referenced("device_group", "device", "device_group_id"));
        }
        tables.groups.retain(|group| group.id != id);
        Ok(true)
    }
}

impl ReplaceRepository for MemoryGroups {
    async fn update(&self, selector: &Selector, input: DeviceGroupInput) -> RepositoryResult<DeviceGroup> {
        let op = RepositoryOperation::Update;
        let mut tables = self.lock();
        let id = selected_id(&tables.groups, selector, |g| selector.matches(g.id, &g.name), |g| g.id)
            .ok_or_else(|| RepositoryError::not_found(op, "device_group"))?;
        if name_taken(&tables.groups, input.name(), Some(id), |g| (g.id, g.name.as_str())) {
            return Err(duplicate(op, "device_group"));
        }
        let group = tables
            .groups
            .iter_mut()
            .find(|group| group.id == id)
            .ok_or_else(|| RepositoryError::not_found(op, "device_group"))?;
        group.name = input.name().to_string();
        group.description = input.description;
        Ok(group.clone())
    }
}

impl Repository for MemoryTypes {
    type Entity = DeviceType;
    type Filter = DeviceTypeFilter;
    type Input = DeviceTypeInput;
    type Selector = Selector;

    async fn list(&self, filter: &DeviceTypeFilter) -> RepositoryResult<Vec<DeviceType>> {
        Ok(self
            .lock()
            .types
            .iter()
            .filter(|device_type| filter.matches(device_type))
            .cloned()
            .collect())
    }

    async fn add(&self, input: DeviceTypeInput) -> RepositoryResult<DeviceType> {
        let op = RepositoryOperation::Add;
        let mut tables = self.lock();
        check_reference(op, &tables.icons, input.device_icon_id, |i| i.id, "device_type", "device_icon_id")?;
        if name_taken(&tables.types, input.name(), None, |t| (t.id, t.name.as_str())) {
            return Err(duplicate(op, "device_type"));
        }
        let device_type = DeviceType {
            id: tables.next_id(),
            name: input.name().to_string(),
            device_icon_id: input.device_icon_id,
        };
        tables.types.push(device_type.clone());
        Ok(device_type)
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        let mut tables = self.lock();
        let Some(id) = selected_id(&tables.types, selector, |t| selector.matches(t.id, &t.name), |t| t.id) else {
            return Ok(false);
        };
        if tables.devices.iter().any(|d| d.device_type_id == Some(id)) {
            return Err(still_referenced("device_type", "device", "device_type_id"));
        }
        tables.types.retain(|device_type| device_type.id != id);
        Ok(true)
    }
}

impl ReplaceRepository for MemoryTypes {
    async fn update(&self, selector: &Selector, input: DeviceTypeInput) -> RepositoryResult<DeviceType> {
        let op = RepositoryOperation::Update;
        let mut tables = self.lock();
        let id = selected_id(&tables.types, selector, |t| selector.matches(t.id, &t.name), |t| t.id)
            .ok_or_else(|| RepositoryError::not_found(op, "device_type"))?;
        check_reference(op, &tables.icons, input.device_icon_id, |i| i.id, "device_type", "device_icon_id")?;
        if name_taken(&tables.types, input.name(), Some(id), |t| (t.id, t.name.as_str())) {
            return Err(duplicate(op, "device_type"));
        }
        let device_type = tables
            .types
            .iter_mut()
            .find(|device_type| device_type.id == id)
            .ok_or_else(|| RepositoryError::not_found(op, "device_type"))?;
        device_type.name = input.name().to_string();
        device_type.device_icon_id = input.device_icon_id;
        Ok(device_type.clone())
    }
}

impl Repository for MemoryIcons {
    type Entity = DeviceIcon;
    type Filter = Selector;
    type Input = DeviceIconInput;
    type Selector = Selector;

    async fn list(&self, filter: &Selector) -> RepositoryResult<Vec<DeviceIcon>> {
        Ok(self
            .lock()
            .icons
            .iter()
            .filter(|icon| filter.matches(icon.id, &icon.name))
            .cloned()
            .collect())
    }

    async fn add(&self, input: DeviceIconInput) -> RepositoryResult<DeviceIcon> {
        let mut tables = self.lock();
        if name_taken(&tables.icons, input.name(), None, |i| (i.id, i.name.as_str())) {
            return Err(duplicate(RepositoryOperation::Add, "device_icon"));
        }
        let icon = DeviceIcon {
            id: tables.next_id(),
            name: input.name().to_string(),
        };
        tables.icons.push(icon.clone());
        Ok(icon)
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        let mut tables = self.lock();
        let Some(id) = selected_id(&tables.icons, selector, |i| selector.matches(i.id, &i.name), |i| i.id) else {
            return Ok(false);
        };
        if tables.types.iter().any(|t| t.device_icon_id == Some(id)) {
            return Err(still_referenced("device_icon", "device_type", "device_icon_id"));
        }
        tables.icons.retain(|icon| icon.id != id);
        Ok(true)
    }
}

impl ReplaceRepository for MemoryIcons {
    async fn update(&self, selector: &Selector, input: DeviceIconInput) -> RepositoryResult<DeviceIcon> {
        let op = RepositoryOperation::Update;
        let mut tables = self.lock();
        let id = selected_id(&tables.icons, selector, |i| selector.matches(i.id, &i.name), |i| i.id)
            .ok_or_else(|| RepositoryError::not_found(op, "device_icon"))?;
        if name_taken(&tables.icons, input.name(), Some(id), |i| (i.id, i.name.as_str())) {
            return Err(duplicate(op, "device_icon"));
        }
        let icon = tables
            .icons
            .iter_mut()
            .find(|icon| icon.id == id)
            .ok_or_else(|| RepositoryError::not_found(op, "device_icon"))?;
        icon.name = input.name().to_string();
        Ok(icon.clone())
    }
}

impl Repository for MemoryConfigurations {
    type Entity = Configuration;
    type Filter = Selector;
    type Input = ConfigurationInput;
    type Selector = Selector;

    async fn list(&self, filter: &Selector) -> RepositoryResult<Vec<Configuration>> {
        Ok(self
            .lock()
            .configurations
            .iter()
            .filter(|configuration| filter.matches(configuration.id, &configuration.name))
            .cloned()
            .collect())
    }

    async fn add(&self, input: ConfigurationInput) -> RepositoryResult<Configuration> {
        let mut tables = self.lock();
        if name_taken(&tables.configurations, input.name(), None, |c| (c.id, c.name.as_str())) {
            return Err(duplicate(RepositoryOperation::Add, "configuration"));
        }
        let configuration = Configuration {
            id: tables.next_id(),
            name: input.name().to_string(),
            description: input.description,
            content: input.content,
        };
        tables.configurations.push(configuration.clone());
        Ok(configuration)
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        let mut tables = self.lock();
        let Some(id) = selected_id(&tables.configurations, selector, |c| selector.matches(c.id, &c.name), |c| c.id)
        else {
            return Ok(false);
        };
        if tables.devices.iter().any(|d| d.configuration_id == Some(id)) {
            return Err(still_referenced("configuration", "device", "configuration_id"));
        }
        tables.configurations.retain(|configuration| configuration.id != id);
        Ok(true)
    }
}

impl ReplaceRepository for MemoryConfigurations {
    async fn update(
        &self,
        selector: &Selector,
        input: ConfigurationInput,
    ) -> RepositoryResult<Configuration> {
        let op = RepositoryOperation::Update;
        let mut tables = self.lock();
        let id = selected_id(&tables.configurations, selector, |c| selector.matches(c.id, &c.name), |c| c.id)
            .ok_or_else(|| RepositoryError::not_found(op, "configuration"))?;
        if name_taken(&tables.configurations, input.name(), Some(id), |c| (c.id, c.name.as_str())) {
            return Err(duplicate(op, "configuration"));
        }
        let configuration = tables
            .configurations
            .iter_mut()
            .find(|configuration| configuration.id == id)
            .ok_or_else(|| RepositoryError::not_found(op, "configuration"))?;
        configuration.name = input.name().to_string();
        configuration.description = input.description;
        configuration.content = input.content;
        Ok(configuration.clone())
    }
}

impl Repository for MemoryLocations {
    type Entity = Location;
    type Filter = TimeFilter;
    type Input = LocationInput;
    type Selector = TimeFilter;

    async fn list(&self, filter: &TimeFilter) -> RepositoryResult<Vec<Location>> {
        let mut rows: Vec<Location> = self
            .lock()
            .locations
            .iter()
            .filter(|l| filter.matches(l.device_id, &l.time))
            .cloned()
            .collect();
        rows.sort_by_key(|l| (l.time, l.device_id));
        Ok(rows)
    }

    async fn add(&self, input: LocationInput) -> RepositoryResult<Location> {
        let op = RepositoryOperation::Add;
        let mut tables = self.lock();
        let (Some(device_id), Some(latitude), Some(longitude)) =
            (input.device_id, input.latitude, input.longitude)
        else {
            return Err(not_null(op, "location", "device_id"));
        };
        check_reference(op, &tables.devices, Some(device_id), |d| d.id, "location", "device_id")?;
        let location = Location {
            device_id,
            latitude,
            longitude,
            time: input.time.unwrap_or_else(now),
        };
        tables.locations.push(location.clone());
        Ok(location)
    }

    async fn delete(&self, selector: &TimeFilter) -> RepositoryResult<bool> {
        if selector.is_empty() {
            return Ok(false);
        }
        let mut tables = self.lock();
        let before = tables.locations.len();
        tables
            .locations
            .retain(|l| !selector.matches(l.device_id, &l.time));
        Ok(tables.locations.len() < before)
    }
}

impl Repository for MemoryMeasurements {
    type Entity = Measurement;
    type Filter = TimeFilter;
    type Input = MeasurementInput;
    type Selector = TimeFilter;

    async fn list(&self, filter: &TimeFilter) -> RepositoryResult<Vec<Measurement>> {
        let mut rows: Vec<Measurement> = self
            .lock()
            .measurements
            .iter()
            .filter(|m| filter.matches(m.device_id, &m.time))
            .cloned()
            .collect();
        rows.sort_by_key(|m| (m.time, m.device_id));
        Ok(rows)
    }

    async fn add(&self, input: MeasurementInput) -> RepositoryResult<Measurement> {
        let op = RepositoryOperation::Add;
        let mut tables = self.lock();
        let (Some(device_id), Some(content)) = (input.device_id, input.content) else {
            return Err(not_null(op, "measurement", "device_id"));
        };
        check_reference(op, &tables.devices, Some(device_id), |d| d.id, "measurement", "device_id")?;
        let measurement = Measurement {
            device_id,
            content,
            time: input.time.unwrap_or_else(now),
        };
        tables.measurements.push(measurement.clone());
        Ok(measurement)
    }

    async fn delete(&self, selector: &TimeFilter) -> RepositoryResult<bool> {
        if selector.is_empty() {
            return Ok(false);
        }
        let mut tables = self.lock();
        let before = tables.measurements.len();
        tables
            .measurements
            .retain(|m| !selector.matches(m.device_id, &m.time));
        Ok(tables.measurements.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unique_names() {
        let store = MemoryStore::new();
        store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        let err = store.groups().add(DeviceGroupInput::named("g")).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::AlreadyExists);
        assert_eq!(err.constraint.as_deref(), Some("device_group_name_key"));
    }

    #[tokio::test]
    async fn test_missing_reference_is_constraint_violation() {
        let store = MemoryStore::new();
        let input = DeviceInput {
            device_group_id: Some(99),
            ..DeviceInput::named("d")
        };
        let err = store.devices().add(input).await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::ConstraintViolation);
        assert_eq!(err.constraint.as_deref(), Some("device_device_group_id_fkey"));
    }

    #[tokio::test]
    async fn test_referenced_group_cannot_be_deleted() {
        let store = MemoryStore::new();
        let group = store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        let input = DeviceInput {
            device_group_id: Some(group.id),
            ..DeviceInput::named("d")
        };
        store.devices().add(input).await.unwrap();
        let err = store.groups().delete(&Selector::id(group.id)).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_device_delete_cascades() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        store
            .locations()
            .add(LocationInput::new(device.id, 60.0, 24.0))
            .await
            .unwrap();
        assert!(store.devices().delete(&DeviceSelector::id(device.id)).await.unwrap());
        let rows = store.locations().list(&TimeFilter::default()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_empty_selector_removes_nothing() {
        let store = MemoryStore::new();
        store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        assert!(!store.groups().delete(&Selector::default()).await.unwrap());
        assert!(!store.locations().delete(&TimeFilter::default()).await.unwrap());
        let err = store
            .groups()
            .update(&Selector::default(), DeviceGroupInput::named("h"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_replaces_every_field() {
        let store = MemoryStore::new();
        let mut input = DeviceGroupInput::named("g");
        input.description = Some("first".into());
        let group = store.groups().add(input).await.unwrap();
        let updated = store
            .groups()
            .update(&Selector::id(group.id), DeviceGroupInput::named("g2"))
            .await
            .unwrap();
        assert_eq!(updated.name, "g2");
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_added_location_defaults_time() {
        let store = MemoryStore::new();
        let device = store.devices().add(DeviceInput::named("d")).await.unwrap();
        let location = store
            .locations()
            .add(LocationInput::new(device.id, 1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(location.time.and_utc().timestamp_subsec_nanos(), 0);
    }
}
