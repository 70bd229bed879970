pub mod basecamp;
pub mod chat;
pub mod directory;
pub mod parser;
pub mod routing;
pub mod service;
