//! One module per CLI subcommand.

pub mod cleanup_local;
pub mod home_init;
pub mod launch_context;
pub mod submit_local;
