//! Shared fixtures for repository tests.

use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{self, DbPool, WriteHandle};

/// A migrated database in a temporary directory, removed on drop.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("db").join("test.db");
    let db_path = db::init(path.to_str().expect("utf-8 path")).expect("init db");
    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");
    let writer = db::spawn_writer(pool.as_ref().clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}
