pub mod acquisition;
pub mod consolidate;
