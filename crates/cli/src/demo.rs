//! Demonstration flow.
//!
//! Exercises both repositories end to end: single saves, lookups, deletes,
//! the entity finders, a native car select and an optional batch save.

use anyhow::{Context, Result};
use chrono::Duration;
use fake::{Fake, Faker};
use pgcrud_common::now;
use pgcrud_domain::{CarEntity, TestEntity};
use pgcrud_infrastructure::{BasicCrud, CarDao, NativeParams, TestEntityDao};
use tracing::info;

use crate::output::{render, OutputFormat, TableFormatter};

/// Native select run against the car table.
pub const ACTIVE_CARS_QUERY: &str = "SELECT id, active, first_registration_date, created \
     FROM cars WHERE active = :active ORDER BY id";

/// Demo settings
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Number of random test entities to save in one batch
    pub batch: Option<usize>,
    /// Rendering of entity lists
    pub format: OutputFormat,
}

/// One titled block of demo output
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Everything the demo printed, in order
#[derive(Debug, Default)]
pub struct DemoReport {
    pub sections: Vec<Section>,
}

impl DemoReport {
    fn push(&mut self, title: impl Into<String>, body: String) {
        let title = title.into();
        info!(section = %title, "Demo step finished");
        self.sections.push(Section { title, body });
    }

    pub fn titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }
}

/// Run the demonstration against any repository implementations.
pub async fn run(
    test_entities: &dyn TestEntityDao,
    cars: &dyn CarDao,
    options: &DemoOptions,
) -> Result<DemoReport> {
    let mut report = DemoReport::default();
    let format = options.format;

    let saved = test_entities
        .save(TestEntity::new(true, now()))
        .await
        .context("Failed to save test entity")?;
    report.push("Saved", render(&[saved], format)?);

    if let Some(first) = test_entities.find_by_id(1).await? {
        let deleted = test_entities.delete(&first).await?;
        report.push(
            "Deleted entity 1",
            TableFormatter::key_value(vec![("deleted", deleted.to_string())]),
        );
    }

    let all = test_entities.find_all().await?;
    report.push("All test entities", render(&all, format)?);

    let some = test_entities.find_by_ids(&[1, 3]).await?;
    report.push("Test entities 1 and 3", render(&some, format)?);

    if let Some(fourth) = test_entities.find_by_id(4).await? {
        report.push("Test entity 4", render(&[fourth], format)?);
    }

    let active = test_entities.find_by_active(true).await?;
    report.push("Only active entities", render(&active, format)?);

    test_entities.save(TestEntity::new(false, now())).await?;
    let inactive = test_entities.find_by_active(false).await?;
    report.push("Only inactive entities", render(&inactive, format)?);

    let registered = now() - Duration::days(5 * 365);
    cars.save(CarEntity::new(true, registered, now()))
        .await
        .context("Failed to save car")?;
    let recent = cars
        .find_all_by_first_registration_date_after(registered)
        .await?;
    report.push(
        format!("Cars registered since {}", registered.date()),
        render(&recent, format)?,
    );

    let params = NativeParams::new().with("active", true);
    let active_cars = cars
        .execute_select_query(ACTIVE_CARS_QUERY, &params, None)
        .await
        .context("Native car select failed")?;
    report.push("Active cars (native query)", render(&active_cars, format)?);

    if let Some(count) = options.batch.filter(|count| *count > 0) {
        let entities = (0..count)
            .map(|_| TestEntity::new(Faker.fake(), now()))
            .collect();
        let saved = test_entities
            .save_all(entities)
            .await
            .context("Batch save failed")?;
        report.push(format!("Batch of {}", saved.len()), render(&saved, format)?);
    }

    Ok(report)
}
