pub mod balance_sheet;
pub mod file;
pub mod stdin;
