mod batch;
mod build;
mod check;

pub use batch::BatchArgs;
pub use build::cmd_build;
pub use check::cmd_check;
