pub mod file_list;
pub mod header;
pub mod options_form;
pub mod pdf_editor;
pub mod process_button;
pub mod progress_bar;
pub mod tool_grid;
pub mod tool_modal;
pub mod upload_area;
