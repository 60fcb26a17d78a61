//! Vendor control protocol definitions.
//!
//! Protocol structure:
//! - Commands are vendor control requests with a fixed bRequest byte.
//! - Parameters travel in wValue; replies use the data stage.
//! - The framebuffer bypasses the control pipe and is streamed as one
//!   8192-byte bulk transfer on endpoint 0x01.

/// Packed framebuffer size in bytes (256 * 64 / 2).
pub const FRAME_SIZE: usize = 8192;

/// Bulk OUT endpoint carrying framebuffer data.
pub const FRAME_ENDPOINT: u8 = 0x01;

/// Size of the button/encoder status reply.
pub const INPUT_PACKET_SIZE: usize = 2;

/// Maximum length of the firmware version reply (git describe output).
pub const VERSION_MAX_LEN: usize = 64;

/// Highest brightness level accepted by the firmware (0 = display off).
pub const BRIGHTNESS_MAX: u16 = 16;

/// Highest LED color value (3-bit BGR field).
pub const LED_COLOR_MAX: u8 = 7;

/// Button flag bits in byte 0 of the status reply.
///
/// STATE bits reflect the level at poll time; SHORT/LONG bits are
/// press events latched by the firmware since the previous poll.
pub const BTN0_STATE: u8 = 1 << 0;
pub const BTN1_STATE: u8 = 1 << 1;
pub const BTN0_SHORT: u8 = 1 << 2;
pub const BTN1_SHORT: u8 = 1 << 3;
pub const BTN0_LONG: u8 = 1 << 4;
pub const BTN1_LONG: u8 = 1 << 5;

/// Vendor command codes (bRequest).
///
/// Fixed firmware contract, never renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Reinitialize the board (display, LEDs, input state).
    Reset = 0x10,
    /// Read the firmware version string.
    Version = 0x11,
    /// Read button flags and encoder delta.
    ButtonsEncoder = 0x20,
    /// Set both LED color fields from wValue.
    Leds = 0x21,
    /// Set OLED brightness from wValue.
    OledBrightness = 0x31,
    /// Set OLED inversion from wValue.
    OledInverted = 0x32,
}

impl Command {
    /// Returns the transfer direction this command uses on the wire.
    ///
    /// The mapping is part of the firmware contract; it is never
    /// chosen per call.
    pub fn request_kind(self) -> RequestKind {
        match self {
            Command::Version | Command::ButtonsEncoder => RequestKind::DeviceToHost,
            Command::Reset
            | Command::Leds
            | Command::OledBrightness
            | Command::OledInverted => RequestKind::HostToDevice,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Reset => write!(f, "RESET"),
            Command::Version => write!(f, "VERSION"),
            Command::ButtonsEncoder => write!(f, "BTNS_ENC"),
            Command::Leds => write!(f, "IO_LEDS"),
            Command::OledBrightness => write!(f, "OLED_BRIGHTNESS"),
            Command::OledInverted => write!(f, "OLED_INVERTED"),
        }
    }
}

/// bmRequestType bytes for the two transfer directions.
///
/// Both are vendor-specific with device recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestKind {
    /// Host-to-device, vendor-specific, device recipient.
    HostToDevice = 0x40,
    /// Device-to-host, vendor-specific, device recipient.
    DeviceToHost = 0xC0,
}
