//! On-disk artifacts: the runtime config module and the install record

pub mod install_record;
pub mod layout;
pub mod runtime_config;
