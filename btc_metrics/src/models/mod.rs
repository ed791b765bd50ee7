pub mod column;
pub mod daily_record;
pub mod date_range;

pub use column::DisplayColumn;
pub use daily_record::DailyRecord;
pub use date_range::DateRange;
