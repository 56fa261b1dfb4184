pub mod chapter_io;
pub mod config_io;
pub mod directory_io;
