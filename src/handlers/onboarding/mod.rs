pub mod complete;
pub mod options;

pub use complete::complete_post;
pub use options::options_get;
