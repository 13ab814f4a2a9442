pub mod completion;
pub mod repositories;
