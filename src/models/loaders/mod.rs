pub mod spreadsheet_loader;

pub use spreadsheet_loader::{extract_process_numbers, load_process_numbers};
