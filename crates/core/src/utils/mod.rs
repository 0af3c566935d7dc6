pub mod module_files;

pub use module_files::{
    candidate_file_names, existing_module_files, find_app_file, find_main_app_module,
    list_subdirectories, AppFile,
};
