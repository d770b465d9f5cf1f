use sea_orm::{ConnectionTrait, DbErr, ItemsAndPagesNumber, SelectorTrait};
use std::num::NonZeroU64;
use utoipa::{IntoParams, ToSchema};

/// Paging parameters, as accepted in the query string of list endpoints.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, IntoParams, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Paginated {
    /// The number of items per page
    #[serde(default = "default::page_size")]
    #[param(value_type = u64, default = 50, minimum = 1)]
    #[schema(value_type = u64)]
    pub page_size: NonZeroU64,
    /// The zero based page to return
    #[serde(default)]
    #[param(default = 0)]
    pub page: u64,
}

impl Default for Paginated {
    fn default() -> Self {
        Self {
            page_size: default::page_size(),
            page: 0,
        }
    }
}

mod default {
    use std::num::NonZeroU64;

    pub(super) fn page_size() -> NonZeroU64 {
        NonZeroU64::MIN.saturating_add(49)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResults<R> {
    pub results: Vec<R>,
    pub page: u64,
    #[schema(value_type = u64)]
    pub page_size: NonZeroU64,
    pub number_of_items: u64,
    pub number_of_pages: u64,
}

impl<R> PaginatedResults<R> {
    /// Create a new paginated result
    pub async fn new<'c, C, S>(
        paginated: Paginated,
        results: Vec<R>,
        paginator: &sea_orm::Paginator<'c, C, S>,
    ) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
        S: SelectorTrait,
    {
        let ItemsAndPagesNumber {
            number_of_items,
            number_of_pages,
        } = paginator.num_items_and_pages().await?;

        Ok(PaginatedResults {
            results,
            page: paginated.page,
            page_size: paginated.page_size,
            number_of_items,
            number_of_pages,
        })
    }

    pub fn map<O, F>(self, f: F) -> PaginatedResults<O>
    where
        F: FnMut(R) -> O,
    {
        PaginatedResults {
            results: self.results.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            number_of_items: self.number_of_items,
            number_of_pages: self.number_of_pages,
        }
    }
}
