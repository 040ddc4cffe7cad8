//! Domain layer - Core entities, contracts and errors

pub mod auth;
pub mod error;
pub mod identity;
pub mod storage;
pub mod tracking;

pub use auth::{AuthError, Claims, KeySetSource, TokenVerifier};
pub use error::DomainError;
pub use identity::{Credentials, IdentityClient};
pub use storage::{Record, RecordFilter, TableStore};
pub use tracking::{Activity, Point, Route, TrackSummary};
