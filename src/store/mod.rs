// Tokensync — Store Module
//
// File-backed record storage: the record model, the JSON-array file
// adapter, and discovery of store files under a root directory.

mod error;
mod models;
mod repository;
mod scanner;

pub use error::StoreError;
pub use models::{
    LoadResult, Record, FIELD_NAME, FIELD_NUMBER, FIELD_REFRESH_TOKEN, FIELD_SUBSCRIBER_ID,
};
pub use repository::{render_records, JsonFileStore, RecordStore};
pub use scanner::discover_stores;
