pub mod activity;
pub mod factor;
pub mod file_formats;
pub mod form;
pub mod range;
pub mod result;
