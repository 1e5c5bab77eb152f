pub mod analyze;
pub mod apply;
pub mod config;
pub mod decision;
pub mod document;
pub mod error;
pub mod invocation;
pub mod io;
pub mod paths;
pub mod registry;
pub mod research;
pub mod scanner;
pub mod scope;
pub mod slug;
pub mod types;

pub use error::{Result, SkillError};
