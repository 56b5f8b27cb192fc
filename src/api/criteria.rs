//! Search-criteria compilation into the Auxo filter grammar.
//!
//! Provides type-safe construction of the textual filter expressions
//! the service accepts in its `q` parameter. Clauses are AND-joined in
//! insertion order; array values become parenthesized OR-of-eq groups.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::error::ApiError;

/// A scalar operand in a filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Render as a filter literal: strings single-quoted verbatim
    /// (embedded quotes are not escaped, matching the upstream grammar),
    /// numbers and booleans bare.
    pub fn to_literal(&self) -> String {
        match self {
            Scalar::Text(s) => format!("'{}'", s),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    fn from_json(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::String(s) => Ok(Scalar::Text(s.clone())),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Scalar::Float(f))
                } else {
                    Err(ApiError::Validation(format!(
                        "number {} cannot be used as a filter value",
                        n
                    )))
                }
            }
            other => Err(ApiError::Validation(format!(
                "{} is not a valid filter value",
                other
            ))),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Comparison operators accepted by the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Like,
    Gte,
    Lte,
    Gt,
    Lt,
    Ne,
    In,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Like => "like",
            CompareOp::Gte => "gte",
            CompareOp::Lte => "lte",
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
            CompareOp::Ne => "ne",
            CompareOp::In => "in",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareOp {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(CompareOp::Eq),
            "like" => Ok(CompareOp::Like),
            "gte" => Ok(CompareOp::Gte),
            "lte" => Ok(CompareOp::Lte),
            "gt" => Ok(CompareOp::Gt),
            "lt" => Ok(CompareOp::Lt),
            "ne" => Ok(CompareOp::Ne),
            "in" => Ok(CompareOp::In),
            other => Err(ApiError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// Operand of an explicit operator: a single scalar, or a list for `in`.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Scalar),
    List(Vec<Scalar>),
}

impl From<Scalar> for Operand {
    fn from(value: Scalar) -> Self {
        Operand::Value(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Value(value.into())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Value(value.into())
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Value(value.into())
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Value(value.into())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Value(value.into())
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Value(value.into())
    }
}

impl From<Vec<Scalar>> for Operand {
    fn from(values: Vec<Scalar>) -> Self {
        Operand::List(values)
    }
}

/// Value side of a criteria entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Bare scalar, compiled with the implicit `eq` operator.
    Scalar(Scalar),
    /// Array of scalars, compiled as a parenthesized OR-of-eq group.
    OneOf(Vec<Scalar>),
    /// Explicit operators, AND-joined on the same field in order.
    Ops(Vec<(CompareOp, Operand)>),
}

impl FieldValue {
    /// Single explicit operator, e.g. `FieldValue::op(CompareOp::Like, "AUX%")`.
    pub fn op(op: CompareOp, operand: impl Into<Operand>) -> Self {
        FieldValue::Ops(vec![(op, operand.into())])
    }

    /// Multiple operators on the same field, AND-joined in order.
    pub fn ops(ops: Vec<(CompareOp, Operand)>) -> Self {
        FieldValue::Ops(ops)
    }

    /// Inclusive range: `gte` low AND `lte` high.
    pub fn between(low: impl Into<Scalar>, high: impl Into<Scalar>) -> Self {
        FieldValue::Ops(vec![
            (CompareOp::Gte, Operand::Value(low.into())),
            (CompareOp::Lte, Operand::Value(high.into())),
        ])
    }

    /// OR-of-eq over the given values.
    pub fn one_of<S: Into<Scalar>>(values: impl IntoIterator<Item = S>) -> Self {
        FieldValue::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Parse the untyped criteria form: a scalar, an array of scalars,
    /// or an operator object. Operator keys outside the supported set
    /// fail with [`ApiError::UnsupportedOperator`]. Operator objects are
    /// ordered by key for deterministic output.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(items) => {
                let scalars = items
                    .iter()
                    .map(Scalar::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FieldValue::OneOf(scalars))
            }
            Value::Object(map) => {
                let mut ops = Vec::with_capacity(map.len());
                for (key, operand) in map {
                    let op: CompareOp = key.parse()?;
                    let operand = match operand {
                        Value::Array(items) => Operand::List(
                            items
                                .iter()
                                .map(Scalar::from_json)
                                .collect::<Result<Vec<_>, _>>()?,
                        ),
                        other => Operand::Value(Scalar::from_json(other)?),
                    };
                    ops.push((op, operand));
                }
                Ok(FieldValue::Ops(ops))
            }
            other => Ok(FieldValue::Scalar(Scalar::from_json(other)?)),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::one_of(values)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::one_of(values)
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(values: Vec<i64>) -> Self {
        FieldValue::one_of(values)
    }
}

/// Static lookup from logical field names to upper-case wire names,
/// supplied by the caller's entity schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Wire name for a logical field, e.g. `auxilCode` -> `AUXIL_CODE`.
    pub fn wire_name(&self, logical: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == logical)
            .map(|(_, wire)| *wire)
    }
}

/// Ordered search criteria; insertion order is AND-clause order in the
/// compiled filter.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    entries: Vec<(String, FieldValue)>,
    map: Option<FieldMap>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria bound to a schema map: field names are given in logical
    /// form and resolved to wire names at compile time. An unresolvable
    /// name is a validation error, caught before any network call.
    pub fn mapped(map: FieldMap) -> Self {
        Self {
            entries: Vec::new(),
            map: Some(map),
        }
    }

    /// Add a clause for `field`. Accepts scalars, arrays of scalars, and
    /// explicit operator values.
    pub fn field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.entries.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Compile into the textual filter expression, or `None` when the
    /// criteria has no entries; callers must then omit the `q`
    /// parameter entirely rather than send an empty filter.
    pub fn compile(&self) -> Result<Option<String>, ApiError> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        let mut clauses = Vec::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let field = self.resolve(name)?;
            clauses.push(compile_clause(field, value)?);
        }
        Ok(Some(clauses.join(" and ")))
    }

    fn resolve<'a>(&self, name: &'a str) -> Result<&'a str, ApiError> {
        match &self.map {
            Some(map) => map.wire_name(name).ok_or_else(|| {
                ApiError::Validation(format!("field '{}' is not in the schema map", name))
            }),
            None => Ok(name),
        }
    }
}

fn compile_clause(field: &str, value: &FieldValue) -> Result<String, ApiError> {
    match value {
        FieldValue::Scalar(scalar) => Ok(format!("{} eq {}", field, scalar.to_literal())),
        FieldValue::OneOf(values) => or_group(field, values),
        FieldValue::Ops(ops) => {
            if ops.is_empty() {
                return Err(ApiError::Validation(format!(
                    "no operators given for field '{}'",
                    field
                )));
            }
            let mut parts = Vec::with_capacity(ops.len());
            for (op, operand) in ops {
                match (op, operand) {
                    (CompareOp::In, Operand::List(values)) => {
                        parts.push(or_group(field, values)?);
                    }
                    (CompareOp::In, Operand::Value(scalar)) => {
                        parts.push(or_group(field, std::slice::from_ref(scalar))?);
                    }
                    (op, Operand::Value(scalar)) => {
                        parts.push(format!("{} {} {}", field, op, scalar.to_literal()));
                    }
                    (op, Operand::List(_)) => {
                        return Err(ApiError::Validation(format!(
                            "operator '{}' on field '{}' takes a single value",
                            op, field
                        )));
                    }
                }
            }
            Ok(parts.join(" and "))
        }
    }
}

/// Parenthesized OR-of-eq group. One-element lists keep the group form
/// so compilation stays deterministic.
fn or_group(field: &str, values: &[Scalar]) -> Result<String, ApiError> {
    if values.is_empty() {
        return Err(ApiError::Validation(format!(
            "empty value list for field '{}'",
            field
        )));
    }
    let disjuncts: Vec<String> = values
        .iter()
        .map(|v| format!("{} eq {}", field, v.to_literal()))
        .collect();
    Ok(format!("({})", disjuncts.join(" or ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_criteria_compiles_to_none() {
        assert_eq!(SearchCriteria::new().compile().unwrap(), None);
    }

    #[test]
    fn test_scalar_uses_implicit_eq() {
        let criteria = SearchCriteria::new().field("AUXIL_CODE", "ABC");
        assert_eq!(
            criteria.compile().unwrap(),
            Some("AUXIL_CODE eq 'ABC'".to_string())
        );

        let criteria = SearchCriteria::new().field("STATUS", 1);
        assert_eq!(criteria.compile().unwrap(), Some("STATUS eq 1".to_string()));

        let criteria = SearchCriteria::new().field("IS_ACTIVE", true);
        assert_eq!(
            criteria.compile().unwrap(),
            Some("IS_ACTIVE eq true".to_string())
        );
    }

    #[test]
    fn test_clauses_join_with_and_in_insertion_order() {
        let criteria = SearchCriteria::new()
            .field("CODE", "ABC")
            .field("STATUS", 1);
        assert_eq!(
            criteria.compile().unwrap(),
            Some("CODE eq 'ABC' and STATUS eq 1".to_string())
        );
    }

    #[test]
    fn test_array_compiles_to_parenthesized_or_group() {
        let criteria = SearchCriteria::new().field("TAGS", vec!["A", "B"]);
        assert_eq!(
            criteria.compile().unwrap(),
            Some("(TAGS eq 'A' or TAGS eq 'B')".to_string())
        );
    }

    #[test]
    fn test_single_element_array_keeps_group_form() {
        let criteria = SearchCriteria::new().field("TAGS", vec!["A"]);
        assert_eq!(
            criteria.compile().unwrap(),
            Some("(TAGS eq 'A')".to_string())
        );
    }

    #[test]
    fn test_operator_object_joins_with_and() {
        let criteria = SearchCriteria::new().field("PRICE", FieldValue::between(100, 500));
        assert_eq!(
            criteria.compile().unwrap(),
            Some("PRICE gte 100 and PRICE lte 500".to_string())
        );
    }

    #[test]
    fn test_in_operator_matches_array_form() {
        let as_in = SearchCriteria::new().field(
            "STATUS",
            FieldValue::op(CompareOp::In, Operand::List(vec![1.into(), 2.into()])),
        );
        let as_array = SearchCriteria::new().field("STATUS", vec![1i64, 2]);
        assert_eq!(as_in.compile().unwrap(), as_array.compile().unwrap());
    }

    #[test]
    fn test_like_pattern_compiles_verbatim() {
        let criteria =
            SearchCriteria::new().field("NAME", FieldValue::op(CompareOp::Like, "AUX%"));
        assert_eq!(
            criteria.compile().unwrap(),
            Some("NAME like 'AUX%'".to_string())
        );
    }

    #[test]
    fn test_embedded_quotes_are_not_escaped() {
        let criteria = SearchCriteria::new().field("NAME", "O'Connor");
        assert_eq!(
            criteria.compile().unwrap(),
            Some("NAME eq 'O'Connor'".to_string())
        );
    }

    #[test]
    fn test_schema_map_resolves_logical_names() {
        static MAP: FieldMap = FieldMap::new(&[
            ("auxilCode", "AUXIL_CODE"),
            ("internalReference", "INTERNAL_REFERENCE"),
        ]);

        let criteria = SearchCriteria::mapped(MAP).field("auxilCode", "ABC");
        assert_eq!(
            criteria.compile().unwrap(),
            Some("AUXIL_CODE eq 'ABC'".to_string())
        );
    }

    #[test]
    fn test_unknown_logical_name_is_a_validation_error() {
        static MAP: FieldMap = FieldMap::new(&[("auxilCode", "AUXIL_CODE")]);

        let criteria = SearchCriteria::mapped(MAP).field("nope", 1);
        assert!(matches!(criteria.compile(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_empty_value_list_is_a_validation_error() {
        let criteria = SearchCriteria::new().field("TAGS", FieldValue::OneOf(Vec::new()));
        assert!(matches!(criteria.compile(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_list_operand_outside_in_is_rejected() {
        let criteria = SearchCriteria::new().field(
            "PRICE",
            FieldValue::Ops(vec![(CompareOp::Gte, Operand::List(vec![1.into()]))]),
        );
        assert!(matches!(criteria.compile(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_from_json_scalar_and_array() {
        assert_eq!(
            FieldValue::from_json(&json!("ABC")).unwrap(),
            FieldValue::Scalar(Scalar::Text("ABC".to_string()))
        );
        assert_eq!(
            FieldValue::from_json(&json!([1, 2])).unwrap(),
            FieldValue::OneOf(vec![Scalar::Int(1), Scalar::Int(2)])
        );
    }

    #[test]
    fn test_from_json_operator_object() {
        let value = FieldValue::from_json(&json!({"gte": 100, "lte": 500})).unwrap();
        let compiled = SearchCriteria::new()
            .field("PRICE", value)
            .compile()
            .unwrap();
        assert_eq!(
            compiled,
            Some("PRICE gte 100 and PRICE lte 500".to_string())
        );
    }

    #[test]
    fn test_from_json_unknown_operator() {
        let result = FieldValue::from_json(&json!({"regex": ".*"}));
        match result {
            Err(ApiError::UnsupportedOperator(op)) => assert_eq!(op, "regex"),
            other => panic!("expected UnsupportedOperator, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_null_is_rejected() {
        assert!(matches!(
            FieldValue::from_json(&json!(null)),
            Err(ApiError::Validation(_))
        ));
    }
}
