pub mod edit;
pub mod timeline;
