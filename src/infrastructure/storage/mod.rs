pub mod file;

use std::sync::Arc;

use crate::domain::models::TranscriptStoreBox;

pub struct StoreManager {}

impl StoreManager {
    pub fn get() -> TranscriptStoreBox {
        return Arc::new(file::FileStore::default());
    }
}
