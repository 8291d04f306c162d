pub mod compose;
pub mod dispatch;
pub mod source;

pub use crate::domain::model::{
    ContentMode, DeliveryConfig, DeliveryReport, DeliveryResult, Link, Message, Outcome,
    RecipientList,
};
pub use crate::domain::ports::{Pacer, Transport};
pub use crate::utils::error::Result;
