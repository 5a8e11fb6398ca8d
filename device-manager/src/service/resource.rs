use validator::Validate;

use super::{no_rows_removed, Envelope};
use crate::classify::{classify, Failure};
use crate::domain::FilterSet;
use crate::repository::{ReplaceRepository, Repository};
use crate::validation::{check_minimum_filters, validate_body};

/// Titles of the four basic operations on one resource
#[derive(Debug)]
pub struct Titles {
    pub list: &'static str,
    pub add: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

/// List, add, update and delete over one repository
///
/// Update and delete refuse an empty selector, then confirm the target
/// exists before touching it.
pub struct ResourceService<'a, R> {
    repo: &'a R,
    titles: &'static Titles,
}

impl<'a, R> ResourceService<'a, R>
where
    R: Repository,
    R::Filter: for<'s> From<&'s R::Selector>,
    R::Selector: FilterSet,
    R::Input: Validate,
{
    pub fn new(repo: &'a R, titles: &'static Titles) -> Self {
        Self { repo, titles }
    }

    pub(crate) fn repo(&self) -> &'a R {
        self.repo
    }

    pub fn titles(&self) -> &'static Titles {
        self.titles
    }

    /// Every record matching `filter`; may be empty
    pub async fn list(&self, filter: &R::Filter) -> Envelope<Vec<R::Entity>> {
        self.repo
            .list(filter)
            .await
            .map_err(|e| classify(e.into(), self.titles.list))
    }

    pub async fn add(&self, input: R::Input) -> Envelope<R::Entity> {
        validate_body(&input)?;
        self.repo
            .add(input)
            .await
            .map_err(|e| classify(e.into(), self.titles.add))
    }

    pub async fn delete(&self, selector: &R::Selector) -> Envelope<()> {
        check_minimum_filters(selector)?;
        self.remove(selector)
            .await
            .map_err(|f| classify(f, self.titles.delete))
    }

    /// First record the selector matches, or a not-found failure naming it
    pub async fn find(&self, selector: &R::Selector) -> Result<R::Entity, Failure> {
        let filter = R::Filter::from(selector);
        self.repo
            .list(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Failure::not_found(selector.describe()))
    }

    pub(crate) async fn remove(&self, selector: &R::Selector) -> Result<(), Failure> {
        self.find(selector).await?;
        if self.repo.delete(selector).await? {
            Ok(())
        } else {
            Err(no_rows_removed())
        }
    }
}

impl<'a, R> ResourceService<'a, R>
where
    R: ReplaceRepository,
    R::Filter: for<'s> From<&'s R::Selector>,
    R::Selector: FilterSet,
    R::Input: Validate,
{
    pub async fn update(&self, selector: &R::Selector, input: R::Input) -> Envelope<R::Entity> {
        validate_body(&input)?;
        check_minimum_filters(selector)?;
        self.replace(selector, input)
            .await
            .map_err(|f| classify(f, self.titles.update))
    }

    pub(crate) async fn replace(
        &self,
        selector: &R::Selector,
        input: R::Input,
    ) -> Result<R::Entity, Failure> {
        self.find(selector).await?;
        Ok(self.repo.update(selector, input).await?)
    }
}
