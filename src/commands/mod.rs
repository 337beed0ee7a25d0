mod ask_cmd;
mod config_cmd;
mod doctor_cmd;
mod extract_cmd;

pub use ask_cmd::run_ask;
pub use config_cmd::handle_config;
pub use doctor_cmd::run_doctor;
pub use extract_cmd::run_extract;
