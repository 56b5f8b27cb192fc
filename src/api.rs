//! Auxo Online Web API request/query core.
//!
//! The shared layer every generated entity client sits on: search
//! criteria compiled into the service's filter grammar, query options
//! encoded into its query-string grammar, and an authenticated
//! dispatcher with timeout and bounded retry of idempotent requests.

pub mod client;
pub mod config;
pub mod constants;
pub mod criteria;
pub mod envelope;
pub mod error;
pub mod query;
pub mod resource;
pub mod retry;

pub use client::{AuxoClient, Verb};
pub use config::{ClientConfig, Credential};
pub use criteria::{CompareOp, FieldMap, FieldValue, Operand, Scalar, SearchCriteria};
pub use envelope::ApiResponse;
pub use error::{ApiError, Result};
pub use query::{QueryFilter, QueryOptions, SortDirection, SortSpec, compose_filter};
pub use resource::Resource;
pub use retry::{FailureKind, RetryConfig, RetryPolicy, TRANSIENT_STATUS};
