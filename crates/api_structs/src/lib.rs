mod status;
mod telegram;

pub mod dtos {
    pub use crate::telegram::dtos::*;
}

pub use crate::status::api::*;
pub use crate::telegram::api::*;
