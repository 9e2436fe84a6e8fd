pub mod archive;
pub mod download;
pub mod list;
pub mod manage;
pub mod types;
pub mod upload;

pub use archive::download_archive;
pub use download::serve_upload;
pub use list::list_files;
pub use manage::{delete_all_files, delete_file, delete_zip_entry};
pub use types::*;
pub use upload::upload_file;
