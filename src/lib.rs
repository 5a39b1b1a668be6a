#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod diagnostics;
mod driver;
mod error;
mod register;
mod utils;

pub use diagnostics::MagnetStatus;
pub use driver::{ADDRESS, As5600, Config, SETTLE_DELAY_MS};
pub use error::Error;
pub use register::{ConfigHiRegister, ConfigLoRegister, PowerMode, Register, Status};
pub use utils::{DEGREES_MAX, RAW_ANGLE_MAX};
