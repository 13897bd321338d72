pub mod cms;
pub mod config;
pub mod logging;
pub mod map;
pub mod site;
