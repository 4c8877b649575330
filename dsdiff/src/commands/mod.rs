pub mod info;
pub mod tree;

pub use info::run as info;
pub use tree::run as tree;
