mod file_scanner;
mod file_system;
#[cfg(test)]
mod memory_file_system;
mod name_sanitizer;
mod path_validator;
mod tag_reader;

pub use file_scanner::{TreeEntry, scan_tree};
pub use file_system::{FileSystem, LocalFileSystem};
#[cfg(test)]
pub use memory_file_system::MemoryFileSystem;
pub use name_sanitizer::{SanitizedName, sanitize_name};
pub use path_validator::validate_directory_exists;
pub use tag_reader::{
    MediaTags, Mp4TagReader, TagReader, UNKNOWN_AUTHOR, UNKNOWN_TITLE, UNKNOWN_YEAR,
};
