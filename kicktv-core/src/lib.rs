pub mod config;
pub mod error;
pub mod logging;
pub mod player;
pub mod resolver;

pub use config::Config;
pub use error::{Error, Result};
pub use resolver::{ChannelInfo, ChannelResolver};
