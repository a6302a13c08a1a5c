pub mod tracwise;

use std::sync::Arc;

use crate::domain::models::AnswerProviderBox;

pub struct AnswerProviderManager {}

impl AnswerProviderManager {
    pub fn get() -> AnswerProviderBox {
        return Arc::new(tracwise::TracWiseApi::default());
    }
}
