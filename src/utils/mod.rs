pub mod format;
pub mod series;
