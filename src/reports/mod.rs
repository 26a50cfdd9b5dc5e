//! Energy report generation and download

pub mod csv;
pub mod download;
pub mod source;

pub use csv::{generate_csv, generate_energy_saved_csv, generate_energy_used_csv, ReportKind};
pub use download::{download_csv, DirectoryFileSaver, DownloadError, FileSaver, CSV_MIME_TYPE};
pub use source::{fallback_rows, load_rows};
