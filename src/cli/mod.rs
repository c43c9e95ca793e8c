pub mod list_cmd;
pub mod retarget_cmd;
pub mod set_cmd;
pub mod show_cmd;
