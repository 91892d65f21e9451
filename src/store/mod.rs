//! SQLite-backed record store for the personnel roster.
//!
//! The store owns the payroll-number unique index; the import pipeline's
//! pre-insert existence check is best-effort only, and the index is the
//! authoritative guard when two imports race.

use std::sync::Arc;

use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};

use crate::error::{StoreError, StoreResult};
use crate::models::{NewPersonnelRecord, PersonnelRecord};

/// Default database URL when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:roster.db";

/// RecordStore manages all persistence for personnel records.
#[derive(Clone)]
pub struct RecordStore {
    pool: Arc<SqlitePool>,
}

impl RecordStore {
    /// Open (creating if necessary) the database at `url`.
    pub async fn new(url: &str) -> StoreResult<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Open a uniquely-named in-memory database for tests.
    #[cfg(test)]
    pub async fn init_test() -> StoreResult<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);
        Self::new(&url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS personnel_records (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                payroll_number  TEXT NOT NULL,
                forenames       TEXT NOT NULL,
                surname         TEXT NOT NULL,
                date_of_birth   DATE NOT NULL,
                start_date      DATE NOT NULL,
                telephone       TEXT NOT NULL DEFAULT '',
                mobile          TEXT NOT NULL DEFAULT '',
                address         TEXT NOT NULL DEFAULT '',
                address2        TEXT NOT NULL DEFAULT '',
                postcode        TEXT NOT NULL DEFAULT '',
                email_home      TEXT NOT NULL DEFAULT ''
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_personnel_payroll
             ON personnel_records (payroll_number);",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Insert a new record, returning it with its assigned id.
    ///
    /// A unique-index violation on the payroll number maps to
    /// [`StoreError::Duplicate`] so callers can treat a lost race the same
    /// way as a pre-checked duplicate.
    pub async fn insert(&self, record: &NewPersonnelRecord) -> StoreResult<PersonnelRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO personnel_records
                (payroll_number, forenames, surname, date_of_birth, start_date,
                 telephone, mobile, address, address2, postcode, email_home)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.payroll_number)
        .bind(&record.forenames)
        .bind(&record.surname)
        .bind(record.date_of_birth)
        .bind(record.start_date)
        .bind(&record.telephone)
        .bind(&record.mobile)
        .bind(&record.address)
        .bind(&record.address2)
        .bind(&record.postcode)
        .bind(&record.email_home)
        .execute(&*self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(record.payroll_number.clone())
            }
            _ => StoreError::Database(e),
        })?;

        Ok(record.clone().with_id(result.last_insert_rowid()))
    }

    /// Update an existing record in full.
    ///
    /// When the update matches no row the record either vanished
    /// ([`StoreError::NotFound`]) or a concurrent modification got in the
    /// way ([`StoreError::Conflict`]); an existence re-check distinguishes
    /// the two.
    pub async fn update(&self, record: &PersonnelRecord) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE personnel_records SET
                payroll_number = ?, forenames = ?, surname = ?,
                date_of_birth = ?, start_date = ?, telephone = ?, mobile = ?,
                address = ?, address2 = ?, postcode = ?, email_home = ?
            WHERE id = ?
            "#,
        )
        .bind(&record.fields.payroll_number)
        .bind(&record.fields.forenames)
        .bind(&record.fields.surname)
        .bind(record.fields.date_of_birth)
        .bind(record.fields.start_date)
        .bind(&record.fields.telephone)
        .bind(&record.fields.mobile)
        .bind(&record.fields.address)
        .bind(&record.fields.address2)
        .bind(&record.fields.postcode)
        .bind(&record.fields.email_home)
        .bind(record.id)
        .execute(&*self.pool)
        .await?;

        if result.rows_affected() == 0 {
            if self.exists_by_id(record.id).await? {
                return Err(StoreError::Conflict(record.id));
            }
            return Err(StoreError::NotFound(record.id));
        }

        Ok(())
    }

    /// Fetch a record by its surrogate id.
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<PersonnelRecord>> {
        let row = sqlx::query("SELECT * FROM personnel_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| Self::row_to_record(&r)))
    }

    /// Fetch a record by its payroll number.
    pub async fn find_by_payroll_number(
        &self,
        payroll_number: &str,
    ) -> StoreResult<Option<PersonnelRecord>> {
        let row = sqlx::query("SELECT * FROM personnel_records WHERE payroll_number = ?")
            .bind(payroll_number)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| Self::row_to_record(&r)))
    }

    /// Check whether a payroll number is already taken.
    pub async fn exists_by_payroll_number(&self, payroll_number: &str) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM personnel_records WHERE payroll_number = ?")
            .bind(payroll_number)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Check whether a record id exists.
    pub async fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        let row = sqlx::query("SELECT 1 FROM personnel_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// List all records ordered by surname ascending.
    pub async fn list(&self) -> StoreResult<Vec<PersonnelRecord>> {
        let rows = sqlx::query("SELECT * FROM personnel_records ORDER BY surname ASC")
            .fetch_all(&*self.pool)
            .await?;

        Ok(rows.iter().map(Self::row_to_record).collect())
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> PersonnelRecord {
        PersonnelRecord {
            id: row.get("id"),
            fields: NewPersonnelRecord {
                payroll_number: row.get("payroll_number"),
                forenames: row.get("forenames"),
                surname: row.get("surname"),
                date_of_birth: row.get("date_of_birth"),
                start_date: row.get("start_date"),
                telephone: row.get("telephone"),
                mobile: row.get("mobile"),
                address: row.get("address"),
                address2: row.get("address2"),
                postcode: row.get("postcode"),
                email_home: row.get("email_home"),
            },
        }
    }
}
