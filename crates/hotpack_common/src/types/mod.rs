pub mod chunk_data;
pub mod chunk_list;
pub mod chunk_path;
pub mod module_id;
pub mod runtime_params;
pub mod source_info;
