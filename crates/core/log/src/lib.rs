mod init;

pub use init::{default_directive, init};
