// pomnav-lib: page object navigation for browser tests, shared by the pomnav binary

pub mod cli;
pub mod commands;
pub mod config;
pub mod driver;
pub mod errors;
pub mod logger;
pub mod navigation;
pub mod output;
pub mod page;
pub mod parametrizer;
pub mod registry;
pub mod resolver;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use errors::{NavError, Result};
pub use navigation::{Navigation, NavigationHandle};
pub use page::{BasePage, Page, PageKwargs};
pub use registry::{PageClass, PageRegistry};
pub use session::Session;
