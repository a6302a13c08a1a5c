pub mod answers;
pub mod identity;
pub mod speech;
pub mod storage;
