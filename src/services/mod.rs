pub mod archive;
pub mod storage;
