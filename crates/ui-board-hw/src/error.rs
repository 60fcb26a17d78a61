//! Error types for the ui_to_usb hardware library.

use crate::protocol::Command;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the board.
#[derive(Error, Debug)]
pub enum Error {
    /// No board found or the device could not be opened.
    #[error("ui_to_usb board not found (VID:PID 16C0:05DC)")]
    BoardNotFound,

    /// USB error outside of a specific command transfer.
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// A control or bulk transfer for a specific command failed.
    #[error("{command} transfer failed: {source}")]
    Transfer {
        command: Command,
        #[source]
        source: rusb::Error,
    },

    /// The framebuffer bulk transfer failed.
    #[error("framebuffer transfer failed: {0}")]
    FrameTransfer(#[source] rusb::Error),

    /// Framebuffer does not pack to the fixed transfer size.
    #[error("framebuffer size mismatch: expected {expected} packed bytes, got {actual}")]
    FramebufferSize { expected: usize, actual: usize },

    /// Input status payload had the wrong length.
    #[error("input packet must be 2 bytes, got {0}")]
    InputLength(usize),

    /// Firmware version reply was not valid UTF-8.
    #[error("firmware version is not valid UTF-8: {0}")]
    VersionEncoding(#[from] std::string::FromUtf8Error),

    /// LED color outside the 3-bit range.
    #[error("invalid LED color (must be 0-7): {0}")]
    InvalidLedColor(u8),

    /// Brightness outside the documented range.
    #[error("invalid brightness (must be 0-16): {0}")]
    InvalidBrightness(u16),

    /// The bulk endpoint accepted fewer bytes than one full frame.
    #[error("short framebuffer write: {written} of {expected} bytes")]
    ShortFrameWrite { written: usize, expected: usize },
}
