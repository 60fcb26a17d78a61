//! ui_to_usb Board Hardware Library
//!
//! Provides hardware abstraction for the USB-attached ui_to_usb panel:
//! a 256x64 greyscale OLED, two RGB LEDs, two buttons, and a rotary
//! encoder, driven through vendor control transfers and one bulk
//! endpoint.

pub mod device;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod protocol;
pub mod transport;

pub use device::{find_boards, UiBoard};
pub use error::{Error, Result};
pub use framebuffer::Framebuffer;
pub use input::InputEvent;
pub use protocol::{Command, RequestKind};
pub use transport::{UsbHandle, UsbTransport};

/// OLED display dimensions
pub const OLED_WIDTH: u16 = 256;
pub const OLED_HEIGHT: u16 = 64;

/// USB VID:PID for the board
pub const BOARD_VID: u16 = 0x16C0;
pub const BOARD_PID: u16 = 0x05DC;

/// Descriptor strings that identify a board among the many devices
/// sharing the shared V-USB VID:PID pair.
pub const BOARD_MANUFACTURER: &str = "betz-engineering.ch";
pub const BOARD_PRODUCT: &str = "ui_to_usb";
