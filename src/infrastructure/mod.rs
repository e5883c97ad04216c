pub mod audio;
pub mod callback;
pub mod observability;
pub mod persistence;
pub mod storage;
