pub mod loaders;
pub mod portal;
pub mod process_number;

pub use loaders::{extract_process_numbers, load_process_numbers};
pub use process_number::{digits_only, format_for_search, is_plausible_length, CaseParts};
