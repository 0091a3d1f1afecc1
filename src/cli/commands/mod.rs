mod genres;
mod init;

pub use genres::cmd_list_genres;
pub use init::cmd_init;
