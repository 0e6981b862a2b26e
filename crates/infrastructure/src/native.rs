//! Native SQL support.
//!
//! Native queries are written with `:name` placeholders and a set of named
//! parameters. [`NativeStatement::prepare`] rewrites them into PostgreSQL's
//! positional `$n` form; list parameters expand to one placeholder per
//! element so `IN (:ids)` works. Result rows are exposed as [`NativeRow`], an
//! ordered array of loosely typed fields that entity-specific mappers turn
//! back into entities.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use pgcrud_common::DateTimeConverter;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::Query,
    Column, Postgres, Row, TypeInfo, ValueRef,
};
use std::fmt;

use crate::{Error, Result};

/// Most bind parameters one PostgreSQL statement can carry.
pub const MAX_BIND_PARAMETERS: usize = u16::MAX as usize;

/// A scalar value, either bound into a statement or read out of a native row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Bound as `TIMESTAMP`. Entity timestamp columns are `TEXT`; compare
    /// against them with [`SqlValue::column_timestamp`] instead.
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// A timestamp in the text form entity columns store, so it compares
    /// against them directly.
    pub fn column_timestamp(value: &NaiveDateTime) -> Self {
        SqlValue::Text(DateTimeConverter.to_database_column(value))
    }

    /// Short type name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "integer",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Bind this value as the next positional parameter of `query`.
    pub fn bind_to<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Bool(value) => query.bind(*value),
            SqlValue::Int(value) => query.bind(*value),
            SqlValue::Float(value) => query.bind(*value),
            SqlValue::Text(value) => query.bind(value.clone()),
            SqlValue::Timestamp(value) => query.bind(*value),
        }
    }

    fn from_json(value: serde_json::Value, name: &str) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(SqlValue::Null),
            serde_json::Value::Bool(value) => Ok(SqlValue::Bool(value)),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(SqlValue::Int)
                .or_else(|| number.as_f64().map(SqlValue::Float))
                .ok_or_else(|| {
                    Error::UnsupportedParameter(format!(":{name} holds an unrepresentable number"))
                }),
            serde_json::Value::String(value) => Ok(SqlValue::Text(value)),
            serde_json::Value::Array(_) => Err(Error::UnsupportedParameter(format!(
                ":{name} contains a nested list"
            ))),
            serde_json::Value::Object(_) => Err(Error::UnsupportedParameter(format!(
                ":{name} is a map; only scalars and lists can be bound"
            ))),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(value) => write!(f, "{value}"),
            SqlValue::Int(value) => write!(f, "{value}"),
            SqlValue::Float(value) => write!(f, "{value}"),
            SqlValue::Text(value) => f.write_str(value),
            SqlValue::Timestamp(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Value of a named native parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(SqlValue),
    List(Vec<SqlValue>),
}

impl ParamValue {
    /// List parameter from any iterable of scalars
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_scalar_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Scalar(value.into())
                }
            }
        )*
    };
}

impl_scalar_param!(SqlValue, bool, i32, i64, f64, &str, String, NaiveDateTime);

/// Named parameters of a native query, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeParams {
    values: IndexMap<String, ParamValue>,
}

impl NativeParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build parameters from a JSON object.
    ///
    /// Arrays become list parameters. Objects, at any depth, and arrays nested
    /// in arrays are rejected with [`Error::UnsupportedParameter`].
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(Error::UnsupportedParameter(
                "native parameters must be a JSON object".to_string(),
            ));
        };

        let mut params = Self::new();
        for (name, value) in map {
            let param = match value {
                serde_json::Value::Array(items) => ParamValue::List(
                    items
                        .into_iter()
                        .map(|item| SqlValue::from_json(item, &name))
                        .collect::<Result<_>>()?,
                ),
                other => ParamValue::Scalar(SqlValue::from_json(other, &name)?),
            };
            params.insert(name, param);
        }
        Ok(params)
    }
}

/// A native statement rewritten to positional placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeStatement {
    sql: String,
    binds: Vec<SqlValue>,
}

impl NativeStatement {
    /// Rewrite `:name` placeholders in `sql` using `params`.
    ///
    /// Quoted literals and identifiers, comments, dollar-quoted bodies,
    /// array slices and `::` casts are left intact. Null scalars and empty
    /// lists are inlined as `NULL`. A placeholder with no matching parameter,
    /// or a statement needing more than [`MAX_BIND_PARAMETERS`] binds, is an
    /// [`Error::UnsupportedParameter`].
    pub fn prepare(sql: &str, params: &NativeParams) -> Result<Self> {
        let bytes = sql.as_bytes();
        let mut out = String::with_capacity(sql.len() + 8);
        let mut binds = Vec::new();
        let mut copied = 0;
        let mut brackets = 0usize;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'\'' | b'"') => i = skip_past(bytes, i + 1, &[quote]),
                b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_past(bytes, i + 2, b"\n"),
                b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i + 2),
                b'$' => i = skip_dollar_quoted(bytes, i),
                b'[' => {
                    brackets += 1;
                    i += 1;
                }
                b']' => {
                    brackets = brackets.saturating_sub(1);
                    i += 1;
                }
                b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
                b':' if brackets == 0
                    && bytes
                        .get(i + 1)
                        .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_') =>
                {
                    let end = identifier_end(bytes, i + 1);
                    let name = &sql[i + 1..end];
                    let value = params.get(name).ok_or_else(|| {
                        Error::UnsupportedParameter(format!("no value bound for :{name}"))
                    })?;
                    out.push_str(&sql[copied..i]);
                    push_placeholders(&mut out, &mut binds, value);
                    copied = end;
                    i = end;
                }
                _ => i += 1,
            }
        }
        out.push_str(&sql[copied..]);

        if binds.len() > MAX_BIND_PARAMETERS {
            return Err(Error::UnsupportedParameter(format!(
                "statement needs {} bind parameters, at most {MAX_BIND_PARAMETERS} are allowed",
                binds.len()
            )));
        }

        Ok(Self { sql: out, binds })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[SqlValue] {
        &self.binds
    }

    /// Build the sqlx query with every value bound.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        bind_all(sqlx::query(&self.sql), &self.binds)
    }
}

/// Index just past the next occurrence of `terminator` at or after `from`.
fn skip_past(bytes: &[u8], from: usize, terminator: &[u8]) -> usize {
    let from = from.min(bytes.len());
    bytes[from..]
        .windows(terminator.len())
        .position(|window| window == terminator)
        .map_or(bytes.len(), |at| from + at + terminator.len())
}

fn identifier_end(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while bytes.get(end).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_') {
        end += 1;
    }
    end
}

/// Block comments nest in PostgreSQL.
fn skip_block_comment(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 1;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// `$tag$ ... $tag$` and `$$ ... $$`; a positional `$1` is not a quote.
fn skip_dollar_quoted(bytes: &[u8], start: usize) -> usize {
    let tag_end = identifier_end(bytes, start + 1);
    let opens = bytes.get(start + 1).is_some_and(|b| !b.is_ascii_digit())
        && bytes.get(tag_end) == Some(&b'$');
    if !opens {
        return start + 1;
    }
    skip_past(bytes, tag_end + 1, &bytes[start..=tag_end])
}

fn push_placeholders(out: &mut String, binds: &mut Vec<SqlValue>, value: &ParamValue) {
    match value {
        ParamValue::Scalar(scalar) => push_scalar(out, binds, scalar),
        ParamValue::List(items) if items.is_empty() => out.push_str("NULL"),
        ParamValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_scalar(out, binds, item);
            }
        }
    }
}

fn push_scalar(out: &mut String, binds: &mut Vec<SqlValue>, value: &SqlValue) {
    if matches!(value, SqlValue::Null) {
        out.push_str("NULL");
        return;
    }
    binds.push(value.clone());
    out.push('$');
    out.push_str(&binds.len().to_string());
}

/// Bind `values` in order.
pub fn bind_all<'q>(
    query: Query<'q, Postgres, PgArguments>,
    values: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    values.iter().fold(query, |query, value| value.bind_to(query))
}

/// One result row of a native query as an ordered field array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeRow {
    fields: Vec<SqlValue>,
}

impl NativeRow {
    pub fn new(fields: Vec<SqlValue>) -> Self {
        Self { fields }
    }

    /// Decode every column of a raw row.
    pub fn from_pg_row(row: &PgRow) -> Result<Self> {
        let mut fields = Vec::with_capacity(row.columns().len());

        for (index, column) in row.columns().iter().enumerate() {
            if row.try_get_raw(index)?.is_null() {
                fields.push(SqlValue::Null);
                continue;
            }

            let value = match column.type_info().name() {
                "BOOL" => SqlValue::Bool(row.try_get(index)?),
                "INT2" => SqlValue::Int(row.try_get::<i16, _>(index)?.into()),
                "INT4" => SqlValue::Int(row.try_get::<i32, _>(index)?.into()),
                "INT8" => SqlValue::Int(row.try_get(index)?),
                "FLOAT4" => SqlValue::Float(row.try_get::<f32, _>(index)?.into()),
                "FLOAT8" => SqlValue::Float(row.try_get(index)?),
                "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => SqlValue::Text(row.try_get(index)?),
                "TIMESTAMP" => SqlValue::Timestamp(row.try_get(index)?),
                "TIMESTAMPTZ" => {
                    SqlValue::Timestamp(row.try_get::<DateTime<Utc>, _>(index)?.naive_utc())
                }
                other => {
                    return Err(Error::Cast {
                        expected: "native field",
                        reason: format!("column {} has unsupported type {}", column.name(), other),
                    })
                }
            };
            fields.push(value);
        }

        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[SqlValue] {
        &self.fields
    }

    fn field(&self, index: usize, expected: &'static str) -> Result<&SqlValue> {
        self.fields.get(index).ok_or_else(|| Error::Cast {
            expected,
            reason: format!("row has {} fields, no field {}", self.fields.len(), index),
        })
    }

    fn mismatch(index: usize, expected: &'static str, found: &SqlValue) -> Error {
        Error::Cast {
            expected,
            reason: format!("field {} is {}", index, found.kind()),
        }
    }

    /// Integer field; text holding an integer is accepted.
    pub fn i64_at(&self, index: usize) -> Result<i64> {
        match self.field(index, "i64")? {
            SqlValue::Int(value) => Ok(*value),
            SqlValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| Self::mismatch(index, "i64", &SqlValue::Text(text.clone()))),
            other => Err(Self::mismatch(index, "i64", other)),
        }
    }

    /// Boolean field; `"true"`/`"false"` text is accepted.
    pub fn bool_at(&self, index: usize) -> Result<bool> {
        match self.field(index, "bool")? {
            SqlValue::Bool(value) => Ok(*value),
            SqlValue::Text(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            SqlValue::Text(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(Self::mismatch(index, "bool", other)),
        }
    }

    /// Text field; other scalars are rendered with their display form.
    pub fn text_at(&self, index: usize) -> Result<String> {
        match self.field(index, "text")? {
            SqlValue::Null => Err(Self::mismatch(index, "text", &SqlValue::Null)),
            other => Ok(other.to_string()),
        }
    }

    /// Timestamp field; text goes through [`DateTimeConverter`].
    pub fn datetime_at(&self, index: usize) -> Result<NaiveDateTime> {
        match self.field(index, "NaiveDateTime")? {
            SqlValue::Timestamp(value) => Ok(*value),
            SqlValue::Text(text) => Ok(DateTimeConverter.to_entity_attribute(text)?),
            other => Err(Self::mismatch(index, "NaiveDateTime", other)),
        }
    }
}

impl From<Vec<SqlValue>> for NativeRow {
    fn from(fields: Vec<SqlValue>) -> Self {
        Self::new(fields)
    }
}

/// Translates a native row into an entity.
pub trait EntityFieldMapper<T>: Send + Sync {
    fn map(&self, fields: &NativeRow) -> Result<T>;
}

impl<T, F> EntityFieldMapper<T> for F
where
    F: Fn(&NativeRow) -> Result<T> + Send + Sync,
{
    fn map(&self, fields: &NativeRow) -> Result<T> {
        self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_named_parameters_become_positional() {
        let params = NativeParams::new().with("active", true).with("after", "2020-01-01");
        let statement = NativeStatement::prepare(
            "SELECT * FROM cars WHERE active = :active AND first_registration_date >= :after",
            &params,
        )
        .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM cars WHERE active = $1 AND first_registration_date >= $2"
        );
        assert_eq!(
            statement.binds(),
            &[SqlValue::Bool(true), SqlValue::Text("2020-01-01".to_string())]
        );
    }

    #[test]
    fn test_list_parameters_expand() {
        let params = NativeParams::new().with("ids", ParamValue::list([1i64, 2, 3]));
        let statement =
            NativeStatement::prepare("DELETE FROM cars WHERE id IN (:ids)", &params).unwrap();

        assert_eq!(statement.sql(), "DELETE FROM cars WHERE id IN ($1, $2, $3)");
        assert_eq!(statement.binds().len(), 3);
    }

    #[test]
    fn test_empty_list_and_null_are_inlined() {
        let params = NativeParams::new()
            .with("ids", ParamValue::List(vec![]))
            .with("missing", SqlValue::Null);
        let statement = NativeStatement::prepare(
            "SELECT * FROM cars WHERE id IN (:ids) OR created = :missing",
            &params,
        )
        .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT * FROM cars WHERE id IN (NULL) OR created = NULL"
        );
        assert!(statement.binds().is_empty());
    }

    #[test]
    fn test_casts_and_literals_are_untouched() {
        let params = NativeParams::new().with("id", 7i64);
        let statement = NativeStatement::prepare(
            "SELECT id::text, ':not_a_param' FROM cars WHERE id = :id",
            &params,
        )
        .unwrap();

        assert_eq!(
            statement.sql(),
            "SELECT id::text, ':not_a_param' FROM cars WHERE id = $1"
        );
    }

    #[test]
    fn test_comments_dollar_quotes_and_slices_are_untouched() {
        let params = NativeParams::new().with("id", 7i64);
        let sql = "SELECT tags[:lo:hi], $body$ :inside $body$, $$ :also $$ -- :line\n\
                   FROM cars /* :block /* :nested */ */ WHERE id = :id";
        let statement = NativeStatement::prepare(sql, &params).unwrap();

        assert!(statement.sql().ends_with("WHERE id = $1"));
        assert!(statement.sql().contains("tags[:lo:hi]"));
        assert!(statement.sql().contains("/* :block /* :nested */ */"));
        assert_eq!(statement.binds(), &[SqlValue::Int(7)]);
    }

    #[test]
    fn test_positional_dollar_is_not_a_quote() {
        let params = NativeParams::new().with("active", false);
        let statement =
            NativeStatement::prepare("SELECT $1 FROM cars WHERE active = :active", &params)
                .unwrap();
        assert_eq!(statement.sql(), "SELECT $1 FROM cars WHERE active = $1");
    }

    #[test]
    fn test_bind_parameter_limit() {
        let at_limit = NativeParams::new()
            .with("ids", ParamValue::list(0..MAX_BIND_PARAMETERS as i64));
        let statement =
            NativeStatement::prepare("DELETE FROM cars WHERE id IN (:ids)", &at_limit).unwrap();
        assert_eq!(statement.binds().len(), MAX_BIND_PARAMETERS);

        let over = NativeParams::new().with("ids", ParamValue::list(0..70_000i64));
        let err = NativeStatement::prepare("DELETE FROM cars WHERE id IN (:ids)", &over)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedParameter(_)));
    }

    #[test]
    fn test_column_timestamp_matches_stored_text() {
        let value = SqlValue::column_timestamp(&timestamp());
        assert_eq!(value, SqlValue::Text("2021-06-01 08:30:00.000000".to_string()));
    }

    #[test]
    fn test_sql_without_placeholders_passes_through() {
        let sql = "UPDATE cars SET active = NOT active";
        let statement = NativeStatement::prepare(sql, &NativeParams::new()).unwrap();
        assert_eq!(statement.sql(), sql);
        assert!(statement.binds().is_empty());
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let err = NativeStatement::prepare("SELECT :nope", &NativeParams::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedParameter(_)));
    }

    #[test]
    fn test_json_params() {
        let params = NativeParams::from_json(json!({
            "active": false,
            "ids": [1, 2],
            "ratio": 0.5,
            "name": "x"
        }))
        .unwrap();

        assert_eq!(params.len(), 4);
        assert_eq!(params.get("active"), Some(&ParamValue::Scalar(SqlValue::Bool(false))));
        assert_eq!(
            params.get("ids"),
            Some(&ParamValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)]))
        );
        assert_eq!(params.get("ratio"), Some(&ParamValue::Scalar(SqlValue::Float(0.5))));
    }

    #[test]
    fn test_json_maps_are_rejected() {
        let err = NativeParams::from_json(json!({ "filter": { "active": true } })).unwrap_err();
        assert!(matches!(err, Error::UnsupportedParameter(ref m) if m.contains("map")));

        let err = NativeParams::from_json(json!({ "ids": [[1], [2]] })).unwrap_err();
        assert!(matches!(err, Error::UnsupportedParameter(_)));

        let err = NativeParams::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedParameter(_)));
    }

    #[test]
    fn test_native_row_accessors() {
        let row = NativeRow::new(vec![
            SqlValue::Int(5),
            SqlValue::Text("true".to_string()),
            SqlValue::Text("2021-06-01 08:30:00.000000".to_string()),
            SqlValue::Timestamp(timestamp()),
        ]);

        assert_eq!(row.i64_at(0).unwrap(), 5);
        assert!(row.bool_at(1).unwrap());
        assert_eq!(row.datetime_at(2).unwrap(), timestamp());
        assert_eq!(row.datetime_at(3).unwrap(), timestamp());
        assert_eq!(row.text_at(0).unwrap(), "5");
    }

    #[test]
    fn test_native_row_mismatches_are_cast_errors() {
        let row = NativeRow::new(vec![SqlValue::Bool(true), SqlValue::Null]);

        assert!(matches!(row.i64_at(0), Err(Error::Cast { expected: "i64", .. })));
        assert!(matches!(row.text_at(1), Err(Error::Cast { .. })));
        assert!(matches!(row.bool_at(9), Err(Error::Cast { .. })));
    }

    #[test]
    fn test_closures_are_mappers() {
        let mapper = |fields: &NativeRow| fields.i64_at(0);
        let row = NativeRow::from(vec![SqlValue::Int(11)]);
        assert_eq!(EntityFieldMapper::map(&mapper, &row).unwrap(), 11);
    }
}
