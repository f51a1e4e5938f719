pub mod error;
pub mod estimate;
pub mod factors;
pub mod form;
pub mod numeric;
pub mod summary;
pub mod validation;
