//! Data module - CSV discovery and loading

mod discovery;
mod loader;
mod table;

pub use discovery::find_csv_files;
pub use loader::{CsvLoader, LoaderError, TableLoader};
pub use table::DataTable;
