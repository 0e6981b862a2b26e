//! Integration tests for repository implementations
//!
//! These tests require a PostgreSQL database named by DATABASE_URL and are
//! marked with #[ignore]. They share tables, so run them one at a time:
//! `cargo test --test repository_tests -- --ignored --test-threads=1`

use chrono::Duration;
use pgcrud_common::{now, FailurePolicy, RepositoryConfig};
use pgcrud_domain::{CarEntity, TestEntity};
use pgcrud_infrastructure::{
    BasicCrud, CarDao, Error, NativeParams, NativeRow, ParamValue, PersistentEntity,
    PgRepository, RepositoryFactory, SqlValue, TestEntityDao, TransactionTemplate,
    MAX_BIND_PARAMETERS,
};
use pgcrud_testing::{new_car_entity, new_test_entity, TestDatabase};

async fn database() -> TestDatabase {
    TestDatabase::from_env()
        .await
        .expect("test database should be reachable")
}

#[tokio::test]
#[ignore]
async fn test_save_then_find_by_id_round_trips() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();

    let saved = repository.save(TestEntity::new(false, now())).await.unwrap();
    let id = saved.entity_id.expect("saved entity has an id");
    assert!(id > 0);

    let found = repository.find_by_id(id).await.unwrap();
    assert_eq!(found, Some(saved));
}

#[tokio::test]
#[ignore]
async fn test_find_by_active_includes_saved_entity() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();

    let saved = repository.save(TestEntity::new(false, now())).await.unwrap();
    repository.save(TestEntity::new(true, now())).await.unwrap();

    let inactive = repository.find_by_active(false).await.unwrap();
    assert_eq!(inactive, vec![saved]);
}

#[tokio::test]
#[ignore]
async fn test_save_all_keeps_input_order_across_batches() {
    let db = database().await;
    let config = RepositoryConfig {
        batch_size: 3,
        ..Default::default()
    };
    let repository = RepositoryFactory::from_config(db.pool().clone(), &config).car_repository();

    let cars: Vec<CarEntity> = (0..8).map(|_| new_car_entity()).collect();
    let saved = repository.save_all(cars.clone()).await.unwrap();

    assert_eq!(saved.len(), cars.len());
    for (input, output) in cars.iter().zip(&saved) {
        assert!(output.id.is_some_and(|id| id > 0));
        assert_eq!(input.first_registration_date, output.first_registration_date);
    }
    assert_eq!(repository.find_all().await.unwrap().len(), 8);
}

#[tokio::test]
#[ignore]
async fn test_save_all_with_oversized_batch_setting() {
    let db = database().await;
    let config = RepositoryConfig {
        batch_size: 25_000,
        ..Default::default()
    };
    let repository = RepositoryFactory::from_config(db.pool().clone(), &config).car_repository();

    let cars: Vec<CarEntity> = (0..25_000).map(|_| new_car_entity()).collect();
    let saved = repository.save_all(cars).await.unwrap();
    assert_eq!(saved.len(), 25_000);
}

#[tokio::test]
#[ignore]
async fn test_save_all_with_no_entities() {
    let db = database().await;
    let repository = db.factory().car_repository();
    assert!(repository.save_all(Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_find_by_ids_returns_requested_ids_in_order() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();
    repository
        .save_all((0..5).map(|_| new_test_entity()).collect())
        .await
        .unwrap();

    let found = repository.find_by_ids(&[3, 1]).await.unwrap();
    let ids: Vec<_> = found.iter().filter_map(|entity| entity.entity_id).collect();
    assert_eq!(ids, vec![1, 3]);

    assert!(repository.find_by_ids(&[]).await.unwrap().is_empty());
    assert!(repository.find_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_delete_reports_single_row() {
    let db = database().await;
    let repository = db.factory().car_repository();

    let saved = repository.save(new_car_entity()).await.unwrap();
    assert!(repository.delete(&saved).await.unwrap());
    assert!(!repository.delete(&saved).await.unwrap());
    assert!(!repository.delete(&new_car_entity()).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_delete_by_ids_requires_every_id() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();
    repository
        .save_all((0..4).map(|_| new_test_entity()).collect())
        .await
        .unwrap();

    assert!(repository.delete_by_ids(&[1, 2]).await.unwrap());
    // 3 exists and is removed, 99 does not
    assert!(!repository.delete_by_ids(&[3, 99]).await.unwrap());

    let remaining = repository.find_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].entity_id, Some(4));
}

#[tokio::test]
#[ignore]
async fn test_delete_all_in_batches() {
    let db = database().await;
    let repository = PgRepository::<CarEntity>::with_settings(
        TransactionTemplate::new(db.pool().clone()),
        2,
    );

    let saved = repository
        .save_all((0..5).map(|_| new_car_entity()).collect())
        .await
        .unwrap();
    assert!(repository.delete_all(&saved).await.unwrap());
    assert!(repository.find_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_car_date_finder_is_inclusive() {
    let db = database().await;
    let repository = db.factory().car_repository();
    let boundary = now() - Duration::days(365);

    let old = repository
        .save(CarEntity::new(true, boundary - Duration::days(1), now()))
        .await
        .unwrap();
    let exact = repository
        .save(CarEntity::new(true, boundary, now()))
        .await
        .unwrap();
    let recent = repository
        .save(CarEntity::new(false, now(), now()))
        .await
        .unwrap();

    let found = repository
        .find_all_by_first_registration_date_after(boundary)
        .await
        .unwrap();
    assert_eq!(found, vec![exact, recent]);
    assert!(!found.contains(&old));
}

#[tokio::test]
#[ignore]
async fn test_native_car_select_uses_entity_mapping() {
    let db = database().await;
    let repository = db.factory().car_repository();
    let saved = repository
        .save_all((0..3).map(|_| new_car_entity()).collect())
        .await
        .unwrap();

    let params = NativeParams::new().with("ids", ParamValue::list([1i64, 2]));
    let cars = repository
        .execute_select_query(
            "SELECT id, active, first_registration_date, created FROM cars WHERE id IN (:ids) ORDER BY id",
            &params,
            None,
        )
        .await
        .unwrap();
    assert_eq!(cars, saved[..2].to_vec());

    let ids = repository
        .execute_select_query(
            "SELECT id, active, first_registration_date, created FROM cars",
            &NativeParams::new(),
            Some(&|fields: &NativeRow| -> pgcrud_infrastructure::Result<CarEntity> {
                let mut car = CarEntity::from_native_row(fields)?;
                car.active = true;
                Ok(car)
            }),
        )
        .await
        .unwrap();
    assert!(ids.iter().all(|car| car.active));
}

#[tokio::test]
#[ignore]
async fn test_native_select_without_mapping_is_not_implemented() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();

    let err = repository
        .execute_select_query("SELECT * FROM test_bean", &NativeParams::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)));
}

#[tokio::test]
#[ignore]
async fn test_native_update_reports_touched_rows() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();
    let params = NativeParams::new().with("active", true);

    assert!(!repository
        .execute_update_query("UPDATE test_bean SET active = :active", &params)
        .await
        .unwrap());

    repository.save(TestEntity::new(false, now())).await.unwrap();
    assert!(repository
        .execute_update_query("UPDATE test_bean SET active = :active", &params)
        .await
        .unwrap());
    assert_eq!(repository.find_by_active(true).await.unwrap().len(), 1);
}

const INSERT_ONE: &str =
    "INSERT INTO test_bean (active, created) VALUES (true, '2020-01-01 00:00:00.000000')";

async fn insert_then_fail(template: &TransactionTemplate) -> pgcrud_infrastructure::Result<()> {
    template
        .void("insert_then_fail", move |conn| {
            Box::pin(async move {
                sqlx::query(INSERT_ONE).execute(&mut *conn).await?;
                Err::<(), _>(sqlx::Error::RowNotFound)
            })
        })
        .await
}

#[tokio::test]
#[ignore]
async fn test_statement_failure_is_storage_error() {
    let db = database().await;
    let repository = db.factory().test_entity_repository();

    let err = repository
        .execute_update_query("UPDATE no_such_table SET active = true", &NativeParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage { operation: "execute_update_query", .. }));
    assert_eq!(err.error_code(), "STORAGE_ERROR");
}

#[tokio::test]
#[ignore]
async fn test_failed_unit_rolls_back() {
    let db = database().await;
    let template = TransactionTemplate::new(db.pool().clone());

    let err = insert_then_fail(&template).await.unwrap_err();
    assert!(matches!(err, Error::Storage { operation: "insert_then_fail", .. }));

    let repository = db.factory().test_entity_repository();
    assert!(repository.find_all().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_commit_policy_keeps_partial_work() {
    let db = database().await;
    let config = RepositoryConfig {
        failure_policy: FailurePolicy::Commit,
        ..Default::default()
    };
    let template = TransactionTemplate::with_policy(db.pool().clone(), config.failure_policy);

    assert!(insert_then_fail(&template).await.is_err());

    let repository = RepositoryFactory::from_config(db.pool().clone(), &config).test_entity_repository();
    assert_eq!(repository.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_native_update_over_bind_limit_is_rejected() {
    let db = database().await;
    let repository = db.factory().car_repository();
    let params = NativeParams::new().with(
        "ids",
        ParamValue::list(1..=(MAX_BIND_PARAMETERS as i64 + 1)),
    );

    let err = repository
        .execute_update_query("DELETE FROM cars WHERE id IN (:ids)", &params)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedParameter(_)));
}

#[tokio::test]
#[ignore]
async fn test_native_select_compares_column_timestamps() {
    let db = database().await;
    let repository = db.factory().car_repository();
    let boundary = now() - Duration::days(30);
    repository
        .save(CarEntity::new(true, boundary - Duration::days(1), now()))
        .await
        .unwrap();
    let recent = repository
        .save(CarEntity::new(true, boundary, now()))
        .await
        .unwrap();

    let params =
        NativeParams::new().with("after", SqlValue::column_timestamp(&boundary));
    let cars = repository
        .execute_select_query(
            "SELECT id, active, first_registration_date, created FROM cars \
             WHERE first_registration_date >= :after",
            &params,
            None,
        )
        .await
        .unwrap();
    assert_eq!(cars, vec![recent]);
}

#[tokio::test]
#[ignore]
async fn test_health_check_reports_schema_version() {
    let db = database().await;
    let health = db.database_pool().health_check().await;

    assert!(health.healthy);
    assert!(health.error.is_none());
    assert!(health.schema_version.is_some_and(|version| version > 0));
}
