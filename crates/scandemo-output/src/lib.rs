//! Output generation: one CSV per output kind, each holding the demographic
//! columns followed by the columns of the analysis tables.

pub mod assemble;
pub mod error;
pub mod naming;
pub mod writer;

pub use assemble::{assemble, assemble_all, record_frame};
pub use error::{OutputError, Result};
pub use naming::{output_file_name, output_path};
pub use writer::{OutputWriter, write_csv};
