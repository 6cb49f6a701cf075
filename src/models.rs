use diesel::prelude::*;
use serde::Serialize;

use crate::schema::*;

/// Owner identifier used when a caller does not supply one.
pub const UNOWNED: i32 = 0;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = applications)]
pub struct Application {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplication {
    pub name: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
pub struct Document {
    pub id: i32,
    pub application_id: i32,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocument {
    pub application_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub photo: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub photo: String,
}

/// An application together with every document that references it.
///
/// `documents` is always serialized as an array, empty when the application
/// has none.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationListing {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub documents: Vec<Document>,
}

impl ApplicationListing {
    pub fn new(application: Application, documents: Vec<Document>) -> Self {
        Self {
            id: application.id,
            name: application.name,
            user_id: application.user_id,
            documents,
        }
    }
}
