//! Car repository implementation.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use pgcrud_common::DateTimeConverter;
use pgcrud_domain::CarEntity;
use sqlx::{postgres::PgRow, Row};
use tracing::instrument;

use super::{BasicCrud, PersistentEntity, PgRepository};
use crate::native::{NativeRow, SqlValue};
use crate::Result;

impl PersistentEntity for CarEntity {
    const TABLE: &'static str = "cars";
    const COLUMNS: &'static [&'static str] = &["active", "first_registration_date", "created"];
    const NATIVE_MAPPING: bool = true;

    fn from_row(row: &PgRow) -> Result<Self> {
        let first_registration_date: String = row.try_get("first_registration_date")?;
        let created: String = row.try_get("created")?;

        Ok(Self {
            id: Some(row.try_get("id")?),
            active: row.try_get("active")?,
            first_registration_date: DateTimeConverter
                .to_entity_attribute(&first_registration_date)?,
            created: DateTimeConverter.to_entity_attribute(&created)?,
        })
    }

    fn column_values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Bool(self.active),
            SqlValue::column_timestamp(&self.first_registration_date),
            SqlValue::column_timestamp(&self.created),
        ]
    }

    /// Fields are `id, active, first_registration_date, created`.
    fn from_native_row(fields: &NativeRow) -> Result<Self> {
        Ok(Self {
            id: Some(fields.i64_at(0)?),
            active: fields.bool_at(1)?,
            first_registration_date: fields.datetime_at(2)?,
            created: fields.datetime_at(3)?,
        })
    }
}

/// Repository operations for [`CarEntity`].
#[async_trait]
pub trait CarDao: BasicCrud<CarEntity> {
    /// Cars first registered at or after `date`, ordered by identifier.
    async fn find_all_by_first_registration_date_after(
        &self,
        date: NaiveDateTime,
    ) -> Result<Vec<CarEntity>>;
}

/// PostgreSQL car repository.
pub type PgCarRepository = PgRepository<CarEntity>;

#[async_trait]
impl CarDao for PgRepository<CarEntity> {
    #[instrument(skip(self))]
    async fn find_all_by_first_registration_date_after(
        &self,
        date: NaiveDateTime,
    ) -> Result<Vec<CarEntity>> {
        // Fixed-width text columns compare in chronological order
        self.find_where(
            "find_all_by_first_registration_date_after",
            "first_registration_date >= $1",
            vec![SqlValue::column_timestamp(&date)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::NaiveDate;

    fn date(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_from_native_row_accepts_text_and_timestamps() {
        let fields = NativeRow::new(vec![
            SqlValue::Int(42),
            SqlValue::Bool(true),
            SqlValue::Text("2015-01-01 00:00:00.000000".to_string()),
            SqlValue::Timestamp(date(2020)),
        ]);

        let car = CarEntity::from_native_row(&fields).unwrap();
        assert_eq!(car, CarEntity::with_id(42, true, date(2015), date(2020)));
    }

    #[test]
    fn test_from_native_row_rejects_short_rows() {
        let fields = NativeRow::new(vec![SqlValue::Int(1), SqlValue::Bool(false)]);
        assert!(matches!(
            CarEntity::from_native_row(&fields),
            Err(Error::Cast { .. })
        ));
    }

    #[test]
    fn test_column_values_follow_columns() {
        let car = CarEntity::new(false, date(2001), date(2022));
        let values = car.column_values();

        assert_eq!(values.len(), CarEntity::COLUMNS.len());
        assert_eq!(
            values[1],
            SqlValue::Text("2001-01-01 00:00:00.000000".to_string())
        );
    }
}
