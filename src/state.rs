use std::sync::Arc;

use sea_orm::DatabaseConnection;

/// Session signing settings shared by the login flow and the request extractor.
#[derive(Debug, Clone)]
pub struct SessionKeys {
    pub jwt_secret: Arc<str>,
    pub ttl_hours: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub session: SessionKeys,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, jwt_secret: impl Into<Arc<str>>, ttl_hours: i64) -> Self {
        Self {
            orm,
            session: SessionKeys {
                jwt_secret: jwt_secret.into(),
                ttl_hours,
            },
        }
    }
}
