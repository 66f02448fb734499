use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use repairquote_core::errors::Result;
use repairquote_core::quotations::{
    NewQuotation, Quotation, QuotationError, QuotationFilter, QuotationRepositoryTrait,
};

use super::model::{NewQuotationDB, NewQuotationItemDB, QuotationDB, QuotationItemDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{quotation_items, quotations};
use crate::utils::chunk_for_sqlite;

pub struct QuotationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl QuotationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        QuotationRepository { pool, writer }
    }

    /// Loads the lines of every header and attaches them in insertion order.
    fn hydrate(conn: &mut SqliteConnection, headers: Vec<QuotationDB>) -> Result<Vec<Quotation>> {
        let ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
        let mut lines_by_quotation: HashMap<i64, Vec<QuotationItemDB>> = HashMap::new();

        for chunk in chunk_for_sqlite(&ids) {
            let rows = quotation_items::table
                .filter(quotation_items::quotation_id.eq_any(chunk))
                .order(quotation_items::id.asc())
                .select(QuotationItemDB::as_select())
                .load::<QuotationItemDB>(conn)
                .map_err(StorageError::from)?;
            for row in rows {
                lines_by_quotation
                    .entry(row.quotation_id)
                    .or_default()
                    .push(row);
            }
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_quotation.remove(&header.id).unwrap_or_default();
                header.into_domain(lines)
            })
            .collect())
    }
}

#[async_trait]
impl QuotationRepositoryTrait for QuotationRepository {
    async fn create(&self, new_quotation: NewQuotation) -> Result<i64> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<i64> {
                new_quotation.validate()?;

                let quotation_id = diesel::insert_into(quotations::table)
                    .values(&NewQuotationDB::from(&new_quotation))
                    .returning(quotations::id)
                    .get_result::<i64>(conn)
                    .map_err(StorageError::from)?;

                // A failing line aborts the transaction, header included.
                for (index, line) in new_quotation.lines.iter().enumerate() {
                    line.validate(index)?;
                    diesel::insert_into(quotation_items::table)
                        .values(&NewQuotationItemDB::from_line(quotation_id, line))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                debug!(
                    "Inserted quotation {} with {} line(s)",
                    new_quotation.quotation_number,
                    new_quotation.lines.len()
                );
                Ok(quotation_id)
            })
            .await
    }

    async fn delete(&self, quotation_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let exists = quotations::table
                    .find(quotation_id)
                    .select(quotations::id)
                    .first::<i64>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .is_some();
                if !exists {
                    return Err(
                        QuotationError::NotFound(format!("Quotation {}", quotation_id)).into(),
                    );
                }

                let removed_lines = diesel::delete(
                    quotation_items::table.filter(quotation_items::quotation_id.eq(quotation_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::delete(quotations::table.find(quotation_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(removed_lines)
            })
            .await
    }

    fn get_by_id(&self, quotation_id: i64) -> Result<Option<Quotation>> {
        let mut conn = get_connection(&self.pool)?;

        // Header and lines are read in one transaction so a concurrent delete
        // is seen either completely or not at all.
        let quotation = conn.transaction::<_, StorageError, _>(|conn| {
            let header = quotations::table
                .find(quotation_id)
                .select(QuotationDB::as_select())
                .first::<QuotationDB>(conn)
                .optional()?;

            match header {
                Some(header) => Ok(Self::hydrate(conn, vec![header])?.into_iter().next()),
                None => Ok(None),
            }
        })?;
        Ok(quotation)
    }

    fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>> {
        let mut conn = get_connection(&self.pool)?;

        let quotations = conn.transaction::<_, StorageError, _>(|conn| {
            let mut query = quotations::table
                .select(QuotationDB::as_select())
                .into_boxed();
            if let Some(school_id) = filter.school_id {
                query = query.filter(quotations::school_id.eq(school_id));
            }
            if let Some(start) = &filter.start {
                query = query.filter(quotations::created_at.ge(start.clone()));
            }
            if let Some(end) = &filter.end {
                query = query.filter(quotations::created_at.le(end.clone()));
            }
            query = query.order(quotations::id.desc());
            match (filter.limit, filter.offset) {
                (Some(limit), offset) => {
                    query = query.limit(limit).offset(offset.unwrap_or(0));
                }
                // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
                (None, Some(offset)) => {
                    query = query.limit(-1).offset(offset);
                }
                (None, None) => {}
            }

            let headers = query.load::<QuotationDB>(conn)?;
            Ok(Self::hydrate(conn, headers)?)
        })?;
        Ok(quotations)
    }
}
