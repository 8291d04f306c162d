pub mod config;
pub mod core;
pub mod domain;
pub mod transport;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::compose::Composer;
pub use crate::core::dispatch::{CancelToken, Dispatcher, IntervalPacer, NoPacer};
pub use crate::core::source::RecipientSpec;
pub use crate::domain::model::{
    ContentMode, DeliveryConfig, DeliveryReport, DeliveryResult, Link, Message, Outcome,
    RecipientList,
};
pub use crate::domain::ports::{Pacer, Transport};
pub use crate::utils::error::{MailError, Result};
