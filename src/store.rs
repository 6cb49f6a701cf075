use async_trait::async_trait;
use diesel::connection::DefaultLoadingMode;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::upsert::excluded;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::PgPool;
use crate::models::{
    Application, ApplicationListing, Document, NewApplication, NewDocument, NewUser,
};
use crate::schema::{applications, documents, users};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("query failed: {0}")]
    Query(diesel::result::Error),
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                StoreError::Constraint(info.message().to_string())
            }
            other => StoreError::Query(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Every statement the HTTP layer issues against the relational store.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Applications owned by `owner`, ordered by id, each with its documents.
    ///
    /// Rows that fail to decode are logged and dropped, and an application
    /// whose document query fails is logged and left out; neither fails the
    /// whole listing.
    async fn list_applications(&self, owner: i32) -> StoreResult<Vec<ApplicationListing>>;

    async fn create_application(&self, application: NewApplication) -> StoreResult<()>;

    async fn create_document(&self, document: NewDocument) -> StoreResult<()>;

    /// Returns the id of the application matching both `id` and `owner`.
    async fn find_owned_application(&self, id: i32, owner: i32) -> StoreResult<Option<i32>>;

    /// Deletes by id alone. Returns the number of rows removed.
    async fn delete_application(&self, id: i32) -> StoreResult<usize>;

    /// Deletes by id alone. Returns the number of rows removed.
    async fn delete_document(&self, id: i32) -> StoreResult<usize>;

    /// Inserts the user, or overwrites name and photo of the row sharing its
    /// email, and returns the row's id.
    async fn upsert_user(&self, user: NewUser) -> StoreResult<i32>;
}

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_applications(&self, owner: i32) -> StoreResult<Vec<ApplicationListing>> {
        self.with_conn(move |conn| {
            let rows = applications::table
                .filter(applications::user_id.eq(owner))
                .order(applications::id.asc())
                .select(Application::as_select())
                .load_iter::<Application, DefaultLoadingMode>(conn)?;
            let owned = decodable_rows(rows, "application");

            let mut listings = Vec::with_capacity(owned.len());
            for application in owned {
                let children = documents::table
                    .filter(documents::application_id.eq(application.id))
                    .order(documents::id.asc())
                    .select(Document::as_select())
                    .load_iter::<Document, DefaultLoadingMode>(conn);

                match children {
                    Ok(rows) => {
                        let documents = decodable_rows(rows, "document");
                        listings.push(ApplicationListing::new(application, documents));
                    }
                    Err(err) => warn!(
                        application_id = application.id,
                        error = %err,
                        "skipping application whose documents could not be read"
                    ),
                }
            }

            Ok(listings)
        })
        .await
    }

    async fn create_application(&self, application: NewApplication) -> StoreResult<()> {
        self.with_conn(move |conn| {
            diesel::insert_into(applications::table)
                .values(&application)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn create_document(&self, document: NewDocument) -> StoreResult<()> {
        self.with_conn(move |conn| {
            diesel::insert_into(documents::table)
                .values(&document)
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn find_owned_application(&self, id: i32, owner: i32) -> StoreResult<Option<i32>> {
        self.with_conn(move |conn| {
            let found = applications::table
                .filter(applications::id.eq(id))
                .filter(applications::user_id.eq(owner))
                .select(applications::id)
                .first::<i32>(conn)
                .optional()?;
            Ok(found)
        })
        .await
    }

    async fn delete_application(&self, id: i32) -> StoreResult<usize> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(applications::table.find(id)).execute(conn)?;
            debug!(application_id = id, deleted, "deleted application");
            Ok(deleted)
        })
        .await
    }

    async fn delete_document(&self, id: i32) -> StoreResult<usize> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(documents::table.find(id)).execute(conn)?;
            debug!(document_id = id, deleted, "deleted document");
            Ok(deleted)
        })
        .await
    }

    async fn upsert_user(&self, user: NewUser) -> StoreResult<i32> {
        // Single statement so the returned id always belongs to this write.
        self.with_conn(move |conn| {
            let id = diesel::insert_into(users::table)
                .values(&user)
                .on_conflict(users::email)
                .do_update()
                .set((
                    users::name.eq(excluded(users::name)),
                    users::photo.eq(excluded(users::photo)),
                ))
                .returning(users::id)
                .get_result::<i32>(conn)?;
            Ok(id)
        })
        .await
    }
}

/// Keeps the rows that decode; each failing row is logged and dropped.
fn decodable_rows<T>(rows: impl Iterator<Item = QueryResult<T>>, kind: &str) -> Vec<T> {
    rows.filter_map(|row| match row {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(kind, error = %err, "skipping row that could not be read");
            None
        }
    })
    .collect()
}
