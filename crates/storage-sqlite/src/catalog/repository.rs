use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use repairquote_core::catalog::{
    CatalogRepositoryTrait, NewRepairItem, NewSchool, RepairItem, School, SchoolUpdate,
};
use repairquote_core::constants::OTHER_ITEM_NAME;
use repairquote_core::errors::{DatabaseError, Error, Result};

use super::model::{NewRepairItemDB, NewSchoolDB, RepairItemDB, SchoolDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{repair_items, schools};

pub struct CatalogRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CatalogRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CatalogRepository { pool, writer }
    }
}

#[async_trait]
impl CatalogRepositoryTrait for CatalogRepository {
    fn get_school(&self, school_id: i64) -> Result<Option<School>> {
        let mut conn = get_connection(&self.pool)?;
        let school = schools::table
            .find(school_id)
            .select(SchoolDB::as_select())
            .first::<SchoolDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(school.map(School::from))
    }

    fn list_schools(&self) -> Result<Vec<School>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = schools::table
            .order(schools::id.asc())
            .select(SchoolDB::as_select())
            .load::<SchoolDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(School::from).collect())
    }

    fn get_item(&self, school_id: i64, item_id: i64) -> Result<Option<RepairItem>> {
        let mut conn = get_connection(&self.pool)?;
        let item = repair_items::table
            .filter(repair_items::id.eq(item_id))
            .filter(repair_items::school_id.eq(school_id))
            .select(RepairItemDB::as_select())
            .first::<RepairItemDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(item.map(RepairItem::from))
    }

    fn list_items(&self, school_id: i64) -> Result<Vec<RepairItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = repair_items::table
            .filter(repair_items::school_id.eq(school_id))
            .order(repair_items::id.asc())
            .select(RepairItemDB::as_select())
            .load::<RepairItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(RepairItem::from).collect())
    }

    async fn create_school(&self, new_school: NewSchool) -> Result<School> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<School> {
                let school_db = diesel::insert_into(schools::table)
                    .values(&NewSchoolDB {
                        name: new_school.name.trim().to_string(),
                    })
                    .returning(SchoolDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                diesel::insert_into(repair_items::table)
                    .values(&NewRepairItemDB::sentinel(school_db.id))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(School::from(school_db))
            })
            .await
    }

    async fn rename_school(&self, school_id: i64, update: SchoolUpdate) -> Result<School> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<School> {
                let updated = diesel::update(schools::table.find(school_id))
                    .set(schools::name.eq(update.name.trim()))
                    .returning(SchoolDB::as_returning())
                    .get_result::<SchoolDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                updated.map(School::from).ok_or_else(|| {
                    Error::Database(DatabaseError::NotFound(format!("School {}", school_id)))
                })
            })
            .await
    }

    async fn create_item(&self, new_item: NewRepairItem) -> Result<RepairItem> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RepairItem> {
                let item_db = diesel::insert_into(repair_items::table)
                    .values(&NewRepairItemDB::from(new_item))
                    .returning(RepairItemDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(RepairItem::from(item_db))
            })
            .await
    }

    async fn ensure_sentinel_items(&self) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let with_sentinel = repair_items::table
                    .filter(repair_items::name.eq(OTHER_ITEM_NAME))
                    .select(repair_items::school_id);
                let missing: Vec<i64> = schools::table
                    .filter(schools::id.ne_all(with_sentinel))
                    .select(schools::id)
                    .load(conn)
                    .map_err(StorageError::from)?;

                let rows: Vec<NewRepairItemDB> =
                    missing.iter().map(|id| NewRepairItemDB::sentinel(*id)).collect();
                if rows.is_empty() {
                    return Ok(0);
                }
                debug!("Adding '{}' line to schools {:?}", OTHER_ITEM_NAME, missing);
                diesel::insert_into(repair_items::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
    }
}
