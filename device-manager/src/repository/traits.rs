//! Repository trait definitions
//!
//! Generic traits for filtered storage access using RPITIT
//! (Return Position Impl Trait In Traits), so no `async_trait` is needed.
//!
//! - [`Repository`]: filtered list, add and delete
//! - [`ReplaceRepository`]: full-replace update for entities that support it
//! - [`Store`]: the set of repositories a service runs against
//!
//! Every filter is optional and an unset filter is ignored, so callers can
//! compose any subset. List calls return an empty vector, never an error, when
//! nothing matches; deciding whether emptiness is a failure is left to callers.

use std::future::Future;

use super::error::RepositoryError;
use crate::domain::{
    Configuration, ConfigurationInput, Device, DeviceFilter, DeviceGroup, DeviceGroupInput,
    DeviceIcon, DeviceIconInput, DeviceInput, DeviceSelector, DeviceType, DeviceTypeFilter,
    DeviceTypeInput, Location, LocationInput, Measurement, MeasurementInput, Selector, TimeFilter,
};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Filtered access to one entity table
pub trait Repository: Send + Sync {
    /// Persisted record
    type Entity: Send;
    /// Filters accepted by [`list`](Repository::list)
    type Filter: Send + Sync;
    /// Payload accepted by [`add`](Repository::add)
    type Input: Send;
    /// Target of update and delete calls
    type Selector: Send + Sync;

    /// Records matching every set filter, in storage order
    fn list(
        &self,
        filter: &Self::Filter,
    ) -> impl Future<Output = RepositoryResult<Vec<Self::Entity>>> + Send;

    /// Insert a record; returns it with generated fields filled in
    fn add(&self, input: Self::Input) -> impl Future<Output = RepositoryResult<Self::Entity>> + Send;

    /// Hard delete of every match
    ///
    /// Returns `true` if at least one row was removed. A selector with no
    /// filter set removes nothing and returns `false`.
    fn delete(
        &self,
        selector: &Self::Selector,
    ) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// Entities that support full-replace updates
pub trait ReplaceRepository: Repository {
    /// Replace every field of the selected record
    ///
    /// Fields left `None` in `input` become null; they are not kept. Fails
    /// with `NotFound` when nothing is selected.
    fn update(
        &self,
        selector: &Self::Selector,
        input: Self::Input,
    ) -> impl Future<Output = RepositoryResult<Self::Entity>> + Send;
}

/// The full set of repositories backing the service
pub trait Store: Clone + Send + Sync + 'static {
    type Devices: ReplaceRepository<
        Entity = Device,
        Filter = DeviceFilter,
        Input = DeviceInput,
        Selector = DeviceSelector,
    >;
    type Groups: ReplaceRepository<
        Entity = DeviceGroup,
        Filter = Selector,
        Input = DeviceGroupInput,
        Selector = Selector,
    >;
    type Types: ReplaceRepository<
        Entity = DeviceType,
        Filter = DeviceTypeFilter,
        Input = DeviceTypeInput,
        Selector = Selector,
    >;
    type Icons: ReplaceRepository<
        Entity = DeviceIcon,
        Filter = Selector,
        Input = DeviceIconInput,
        Selector = Selector,
    >;
    type Configurations: ReplaceRepository<
        Entity = Configuration,
        Filter = Selector,
        Input = ConfigurationInput,
        Selector = Selector,
    >;
    type Locations: Repository<
        Entity = Location,
        Filter = TimeFilter,
        Input = LocationInput,
        Selector = TimeFilter,
    >;
    type Measurements: Repository<
        Entity = Measurement,
        Filter = TimeFilter,
        Input = MeasurementInput,
        Selector = TimeFilter,
    >;

    fn devices(&self) -> &Self::Devices;
    fn groups(&self) -> &Self::Groups;
    fn types(&self) -> &Self::Types;
    fn icons(&self) -> &Self::Icons;
    fn configurations(&self) -> &Self::Configurations;
    fn locations(&self) -> &Self::Locations;
    fn measurements(&self) -> &Self::Measurements;

    /// Cheap connectivity probe used by readiness checks
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}
