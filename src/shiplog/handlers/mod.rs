pub mod health;
pub mod product;
pub mod update;
pub mod user;

use serde::Serialize;

/// Response envelope used by every data-returning endpoint.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}
