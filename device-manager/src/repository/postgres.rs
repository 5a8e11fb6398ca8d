//! PostgreSQL repositories
//!
//! Every call goes through a stored function defined in
//! `migrations/0001_device_manager.sql`. Filters are bound positionally with
//! `NULL` meaning "ignore"; the functions themselves refuse to update or delete
//! with no filter set.

use sqlx::PgPool;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{ReplaceRepository, Repository, RepositoryResult, Store};
use crate::domain::device::generate_authentication_key;
use crate::domain::{
    Configuration, ConfigurationInput, Device, DeviceFilter, DeviceGroup, DeviceGroupInput,
    DeviceIcon, DeviceIconInput, DeviceInput, DeviceSelector, DeviceType, DeviceTypeFilter,
    DeviceTypeInput, Location, LocationInput, Measurement, MeasurementInput, Selector, TimeFilter,
};

/// Map a driver error, tagging the operation and table
fn db_error(operation: RepositoryOperation, entity: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |err| {
        let error = RepositoryError::from(err).with_operation(operation);
        if error.entity_type.is_some() {
            error
        } else {
            error.with_entity(entity)
        }
    }
}

fn removed(count: i32) -> bool {
    count > 0
}

/// All repositories over one connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    devices: PgDevices,
    groups: PgGroups,
    types: PgTypes,
    icons: PgIcons,
    configurations: PgConfigurations,
    locations: PgLocations,
    measurements: PgMeasurements,
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            devices: PgDevices { pool: pool.clone() },
            groups: PgGroups { pool: pool.clone() },
            types: PgTypes { pool: pool.clone() },
            icons: PgIcons { pool: pool.clone() },
            configurations: PgConfigurations { pool: pool.clone() },
            locations: PgLocations { pool: pool.clone() },
            measurements: PgMeasurements { pool: pool.clone() },
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for PgStore {
    type Devices = PgDevices;
    type Groups = PgGroups;
    type Types = PgTypes;
    type Icons = PgIcons;
    type Configurations = PgConfigurations;
    type Locations = PgLocations;
    type Measurements = PgMeasurements;

    fn devices(&self) -> &PgDevices {
        &self.devices
    }

    fn groups(&self) -> &PgGroups {
        &self.groups
    }

    fn types(&self) -> &PgTypes {
        &self.types
    }

    fn icons(&self) -> &PgIcons {
        &self.icons
    }

    fn configurations(&self) -> &PgConfigurations {
        &self.configurations
    }

    fn locations(&self) -> &PgLocations {
        &self.locations
    }

    fn measurements(&self) -> &PgMeasurements {
        &self.measurements
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Ping))?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PgDevices {
    pool: PgPool,
}

impl Repository for PgDevices {
    type Entity = Device;
    type Filter = DeviceFilter;
    type Input = DeviceInput;
    type Selector = DeviceSelector;

    async fn list(&self, filter: &DeviceFilter) -> RepositoryResult<Vec<Device>> {
        sqlx::query_as::<_, Device>("SELECT * FROM get_devices($1, $2, $3, $4, $5, $6)")
            .bind(filter.id)
            .bind(filter.name.as_deref())
            .bind(filter.device_type_id)
            .bind(filter.device_group_id)
            .bind(filter.configuration_id)
            .bind(filter.authentication_key.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "device"))
    }

    async fn add(&self, input: DeviceInput) -> RepositoryResult<Device> {
        sqlx::query_as::<_, Device>("SELECT * FROM add_device($1, $2, $3, $4, $5)")
            .bind(input.name())
            .bind(input.device_type_id)
            .bind(input.device_group_id)
            .bind(input.configuration_id)
            .bind(generate_authentication_key())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "device"))
    }

    async fn delete(&self, selector: &DeviceSelector) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_device($1, $2, $3)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .bind(selector.authentication_key.as_deref())
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "device"))
    }
}

impl ReplaceRepository for PgDevices {
    async fn update(&self, selector: &DeviceSelector, input: DeviceInput) -> RepositoryResult<Device> {
        sqlx::query_as::<_, Device>("SELECT * FROM update_device($1, $2, $3, $4, $5, $6, $7)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .bind(selector.authentication_key.as_deref())
            .bind(input.name())
            .bind(input.device_type_id)
            .bind(input.device_group_id)
            .bind(input.configuration_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Update, "device"))?
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Update, "device"))
    }
}

#[derive(Debug, Clone)]
pub struct PgGroups {
    pool: PgPool,
}

impl Repository for PgGroups {
    type Entity = DeviceGroup;
    type Filter = Selector;
    type Input = DeviceGroupInput;
    type Selector = Selector;

    async fn list(&self, filter: &Selector) -> RepositoryResult<Vec<DeviceGroup>> {
        sqlx::query_as::<_, DeviceGroup>("SELECT * FROM get_device_groups($1, $2)")
            .bind(filter.id)
            .bind(filter.name.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "device_group"))
    }

    async fn add(&self, input: DeviceGroupInput) -> RepositoryResult<DeviceGroup> {
        sqlx::query_as::<_, DeviceGroup>("SELECT * FROM add_device_group($1, $2)")
            .bind(input.name())
            .bind(input.description.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "device_group"))
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_device_group($1, $2)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "device_group"))
    }
}

impl ReplaceRepository for PgGroups {
    async fn update(&self, selector: &Selector, input: DeviceGroupInput) -> RepositoryResult<DeviceGroup> {
        sqlx::query_as::<_, DeviceGroup>("SELECT * FROM update_device_group($1, $2, $3, $4)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .bind(input.name())
            .bind(input.description.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Update, "device_group"))?
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Update, "device_group"))
    }
}

#[derive(Debug, Clone)]
pub struct PgTypes {
    pool: PgPool,
}

impl Repository for PgTypes {
    type Entity = DeviceType;
    type Filter = DeviceTypeFilter;
    type Input = DeviceTypeInput;
    type Selector = Selector;

    async fn list(&self, filter: &DeviceTypeFilter) -> RepositoryResult<Vec<DeviceType>> {
        sqlx::query_as::<_, DeviceType>("SELECT * FROM get_device_types($1, $2, $3)")
            .bind(filter.id)
            .bind(filter.name.as_deref())
            .bind(filter.device_icon_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "device_type"))
    }

    async fn add(&self, input: DeviceTypeInput) -> RepositoryResult<DeviceType> {
        sqlx::query_as::<_, DeviceType>("SELECT * FROM add_device_type($1, $2)")
            .bind(input.name())
            .bind(input.device_icon_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "device_type"))
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_device_type($1, $2)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "device_type"))
    }
}

impl ReplaceRepository for PgTypes {
    async fn update(&self, selector: &Selector, input: DeviceTypeInput) -> RepositoryResult<DeviceType> {
        sqlx::query_as::<_, DeviceType>("SELECT * FROM update_device_type($1, $2, $3, $4)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .bind(input.name())
            .bind(input.device_icon_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Update, "device_type"))?
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Update, "device_type"))
    }
}

#[derive(Debug, Clone)]
pub struct PgIcons {
    pool: PgPool,
}

impl Repository for PgIcons {
    type Entity = DeviceIcon;
    type Filter = Selector;
    type Input = DeviceIconInput;
    type Selector = Selector;

    async fn list(&self, filter: &Selector) -> RepositoryResult<Vec<DeviceIcon>> {
        sqlx::query_as::<_, DeviceIcon>("SELECT * FROM get_device_icons($1, $2)")
            .bind(filter.id)
            .bind(filter.name.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "device_icon"))
    }

    async fn add(&self, input: DeviceIconInput) -> RepositoryResult<DeviceIcon> {
        sqlx::query_as::<_, DeviceIcon>("SELECT * FROM add_device_icon($1)")
            .bind(input.name())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "device_icon"))
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_device_icon($1, $2)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "device_icon"))
    }
}

impl ReplaceRepository for PgIcons {
    async fn update(&self, selector: &Selector, input: DeviceIconInput) -> RepositoryResult<DeviceIcon> {
        sqlx::query_as::<_, DeviceIcon>("SELECT * FROM update_device_icon($1, $2, $3)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .bind(input.name())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Update, "device_icon"))?
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Update, "device_icon"))
    }
}

#[derive(Debug, Clone)]
pub struct PgConfigurations {
    pool: PgPool,
}

impl Repository for PgConfigurations {
    type Entity = Configuration;
    type Filter = Selector;
    type Input = ConfigurationInput;
    type Selector = Selector;

    async fn list(&self, filter: &Selector) -> RepositoryResult<Vec<Configuration>> {
        sqlx::query_as::<_, Configuration>("SELECT * FROM get_configurations($1, $2)")
            .bind(filter.id)
            .bind(filter.name.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "configuration"))
    }

    async fn add(&self, input: ConfigurationInput) -> RepositoryResult<Configuration> {
        sqlx::query_as::<_, Configuration>("SELECT * FROM add_configuration($1, $2, $3)")
            .bind(input.name())
            .bind(input.description.as_deref())
            .bind(input.content.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "configuration"))
    }

    async fn delete(&self, selector: &Selector) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_configuration($1, $2)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "configuration"))
    }
}

impl ReplaceRepository for PgConfigurations {
    async fn update(
        &self,
        selector: &Selector,
        input: ConfigurationInput,
    ) -> RepositoryResult<Configuration> {
        sqlx::query_as::<_, Configuration>("SELECT * FROM update_configuration($1, $2, $3, $4, $5)")
            .bind(selector.id)
            .bind(selector.name.as_deref())
            .bind(input.name())
            .bind(input.description.as_deref())
            .bind(input.content.as_ref())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Update, "configuration"))?
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Update, "configuration"))
    }
}

#[derive(Debug, Clone)]
pub struct PgLocations {
    pool: PgPool,
}

impl Repository for PgLocations {
    type Entity = Location;
    type Filter = TimeFilter;
    type Input = LocationInput;
    type Selector = TimeFilter;

    async fn list(&self, filter: &TimeFilter) -> RepositoryResult<Vec<Location>> {
        sqlx::query_as::<_, Location>("SELECT * FROM get_locations($1, $2, $3, $4)")
            .bind(filter.device_id)
            .bind(filter.exact_time)
            .bind(filter.start_time)
            .bind(filter.end_time)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "location"))
    }

    async fn add(&self, input: LocationInput) -> RepositoryResult<Location> {
        sqlx::query_as::<_, Location>("SELECT * FROM add_location($1, $2, $3, $4)")
            .bind(input.device_id)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.time)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "location"))
    }

    async fn delete(&self, selector: &TimeFilter) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_locations($1, $2, $3, $4)")
            .bind(selector.device_id)
            .bind(selector.exact_time)
            .bind(selector.start_time)
            .bind(selector.end_time)
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "location"))
    }
}

#[derive(Debug, Clone)]
pub struct PgMeasurements {
    pool: PgPool,
}

impl Repository for PgMeasurements {
    type Entity = Measurement;
    type Filter = TimeFilter;
    type Input = MeasurementInput;
    type Selector = TimeFilter;

    async fn list(&self, filter: &TimeFilter) -> RepositoryResult<Vec<Measurement>> {
        sqlx::query_as::<_, Measurement>("SELECT * FROM get_measurements($1, $2, $3, $4)")
            .bind(filter.device_id)
            .bind(filter.exact_time)
            .bind(filter.start_time)
            .bind(filter.end_time)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::List, "measurement"))
    }

    async fn add(&self, input: MeasurementInput) -> RepositoryResult<Measurement> {
        sqlx::query_as::<_, Measurement>("SELECT * FROM add_measurement($1, $2, $3)")
            .bind(input.device_id)
            .bind(input.content.as_ref())
            .bind(input.time)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error(RepositoryOperation::Add, "measurement"))
    }

    async fn delete(&self, selector: &TimeFilter) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT delete_measurements($1, $2, $3, $4)")
            .bind(selector.device_id)
            .bind(selector.exact_time)
            .bind(selector.start_time)
            .bind(selector.end_time)
            .fetch_one(&self.pool)
            .await
            .map(removed)
            .map_err(db_error(RepositoryOperation::Delete, "measurement"))
    }
}
