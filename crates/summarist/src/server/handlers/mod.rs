pub mod logs;
pub mod page;
pub mod records;
pub mod status;
pub mod summaries;
