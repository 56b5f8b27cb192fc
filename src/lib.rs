//! Client core for the Auxo Online object-access REST API.
//!
//! Generated entity clients all sit on the same three pieces: a
//! criteria-to-filter compiler, a query-string builder, and a request
//! dispatcher with auth, timeout and retry. This crate is that core.
//!
//! ```rust,ignore
//! use auxo_api::api::{AuxoClient, ClientConfig, Credential, QueryOptions, Resource, SearchCriteria};
//!
//! const PAYMENT_PLANS: Resource = Resource::new("paymentPlans");
//!
//! #[tokio::main]
//! async fn main() -> auxo_api::api::Result<()> {
//!     let client = AuxoClient::new(ClientConfig::from_env()?);
//!
//!     let options = QueryOptions::new()
//!         .fields(&["CODE", "LABEL"])
//!         .criteria(SearchCriteria::new().field("STATUS", 1))
//!         .limit(25)
//!         .count();
//!
//!     let page = PAYMENT_PLANS.list::<serde_json::Value>(&client, &options).await?;
//!     println!("{} of {} plans", page.len(), page.total());
//!     Ok(())
//! }
//! ```

pub mod api;

pub use api::{
    ApiError, ApiResponse, AuxoClient, ClientConfig, CompareOp, Credential, FieldMap, FieldValue,
    QueryOptions, Resource, Result, RetryConfig, SearchCriteria, SortDirection, SortSpec, Verb,
};
