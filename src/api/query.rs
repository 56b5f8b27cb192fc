//! Query-options encoding into the service's URL query-string grammar.
//!
//! Parameter emission order is fixed (`fields`, `limit`, `offset`,
//! `sort`, `dir`, `count`, `q`, `expand`) so identical options always
//! produce a byte-identical string.

use super::criteria::SearchCriteria;
use super::error::ApiError;

/// Sort direction; ascending is the wire default and is not encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// The accepted sort shapes: a single field, a field with direction, a
/// field list with direction, or a bare field list (ascending).
#[derive(Debug, Clone, PartialEq)]
pub enum SortSpec {
    Field(String),
    FieldWithDirection(String, SortDirection),
    Fields(Vec<String>),
    FieldsWithDirection(Vec<String>, SortDirection),
}

impl SortSpec {
    pub fn by(field: impl Into<String>) -> Self {
        SortSpec::Field(field.into())
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec::FieldWithDirection(field.into(), SortDirection::Descending)
    }

    /// Normalize every shape into a field list plus one direction.
    pub fn normalize(&self) -> (Vec<&str>, SortDirection) {
        match self {
            SortSpec::Field(field) => (vec![field.as_str()], SortDirection::Ascending),
            SortSpec::FieldWithDirection(field, dir) => (vec![field.as_str()], *dir),
            SortSpec::Fields(fields) => (
                fields.iter().map(String::as_str).collect(),
                SortDirection::Ascending,
            ),
            SortSpec::FieldsWithDirection(fields, dir) => {
                (fields.iter().map(String::as_str).collect(), *dir)
            }
        }
    }
}

impl From<&str> for SortSpec {
    fn from(field: &str) -> Self {
        SortSpec::Field(field.to_string())
    }
}

impl From<String> for SortSpec {
    fn from(field: String) -> Self {
        SortSpec::Field(field)
    }
}

impl From<Vec<&str>> for SortSpec {
    fn from(fields: Vec<&str>) -> Self {
        SortSpec::Fields(fields.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for SortSpec {
    fn from(fields: Vec<String>) -> Self {
        SortSpec::Fields(fields)
    }
}

/// The `q` parameter: an already-compiled filter passed through
/// verbatim, or structured criteria compiled and URL-encoded.
#[derive(Debug, Clone)]
pub enum QueryFilter {
    Raw(String),
    Criteria(SearchCriteria),
}

/// Options for a listing request. Every member is optional; building
/// with none set yields an empty query string.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    fields: Option<Vec<String>>,
    sort: Option<SortSpec>,
    limit: Option<u32>,
    offset: Option<u32>,
    q: Option<QueryFilter>,
    count: bool,
    expand: Option<Vec<String>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the returned fields.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Sort the result set.
    pub fn sort(mut self, spec: impl Into<SortSpec>) -> Self {
        self.sort = Some(spec.into());
        self
    }

    /// Page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page start offset.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Ask the service to include a total count in the envelope.
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Filter with an already-compiled expression, passed through
    /// verbatim.
    pub fn raw_filter(mut self, filter: impl Into<String>) -> Self {
        self.q = Some(QueryFilter::Raw(filter.into()));
        self
    }

    /// Filter with structured criteria; compiled and URL-encoded at
    /// build time. Empty criteria emit no `q` parameter at all.
    pub fn criteria(mut self, criteria: SearchCriteria) -> Self {
        self.q = Some(QueryFilter::Criteria(criteria));
        self
    }

    /// Expand related entities.
    pub fn expand(mut self, expansions: &[&str]) -> Self {
        self.expand = Some(expansions.iter().map(|e| e.to_string()).collect());
        self
    }

    /// Encode into the wire query string. Absent members emit nothing;
    /// a parameter is never emitted with an empty value.
    pub fn to_query_string(&self) -> Result<String, ApiError> {
        let mut params = Vec::new();

        if let Some(fields) = &self.fields {
            if !fields.is_empty() {
                params.push(format!("fields={}", fields.join(",")));
            }
        }

        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }

        if let Some(offset) = self.offset {
            params.push(format!("offset={}", offset));
        }

        if let Some(sort) = &self.sort {
            let (fields, direction) = sort.normalize();
            if fields.is_empty() {
                return Err(ApiError::Validation(
                    "sort requires at least one field".to_string(),
                ));
            }
            params.push(format!("sort={}", fields.join(",")));
            if direction == SortDirection::Descending {
                params.push("dir=desc".to_string());
            }
        }

        if self.count {
            params.push("count=true".to_string());
        }

        match &self.q {
            Some(QueryFilter::Raw(filter)) if !filter.is_empty() => {
                params.push(format!("q={}", filter));
            }
            Some(QueryFilter::Criteria(criteria)) => {
                if let Some(filter) = criteria.compile()? {
                    params.push(format!("q={}", urlencoding::encode(&filter)));
                }
            }
            _ => {}
        }

        if let Some(expand) = &self.expand {
            if !expand.is_empty() {
                params.push(format!("expand={}", expand.join(",")));
            }
        }

        Ok(params.join("&"))
    }
}

/// Join raw filter fragments with ` and `, matching what manual string
/// concatenation of pre-compiled clauses would produce.
pub fn compose_filter<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" and ")
}
