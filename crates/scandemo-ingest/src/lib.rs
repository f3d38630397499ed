//! Run inputs: the source file that names the outputs, and the tables
//! produced by the external analysis script.

pub mod discovery;
pub mod error;
pub mod table;

pub use discovery::{list_input_files, select_source_file, source_identifier};
pub use error::{IngestError, Result};
pub use table::{TableFormat, read_table};
