//! Board discovery and the device facade.

use rusb::{Context, UsbContext};
use tracing::{debug, info};

use crate::framebuffer::Framebuffer;
use crate::input::InputEvent;
use crate::protocol::{
    Command, BRIGHTNESS_MAX, FRAME_ENDPOINT, FRAME_SIZE, LED_COLOR_MAX, VERSION_MAX_LEN,
};
use crate::transport::{UsbHandle, UsbTransport};
use crate::{Error, Result, BOARD_MANUFACTURER, BOARD_PID, BOARD_PRODUCT, BOARD_VID};

/// Returns true if the identifiers and descriptor strings belong to a
/// ui_to_usb board.
fn is_board(vid: u16, pid: u16, manufacturer: &str, product: &str) -> bool {
    vid == BOARD_VID
        && pid == BOARD_PID
        && manufacturer == BOARD_MANUFACTURER
        && product == BOARD_PRODUCT
}

/// Returns all ui_to_usb boards on the bus, in enumeration order.
///
/// The VID:PID pair is a shared V-USB allocation, so candidates are
/// confirmed against the manufacturer and product strings. Candidates
/// whose descriptors cannot be read are skipped, not fatal: buses
/// routinely carry unrelated devices with the same IDs.
pub fn find_boards() -> Result<Vec<rusb::Device<Context>>> {
    let context = Context::new()?;
    let mut boards = Vec::new();

    for device in context.devices()?.iter() {
        let descriptor = match device.device_descriptor() {
            Ok(d) => d,
            Err(e) => {
                debug!("Skipping device without readable descriptor: {}", e);
                continue;
            }
        };
        if descriptor.vendor_id() != BOARD_VID || descriptor.product_id() != BOARD_PID {
            continue;
        }

        let handle = match device.open() {
            Ok(h) => h,
            Err(e) => {
                debug!(
                    "Skipping candidate at bus {:03} addr {:03}: open failed: {}",
                    device.bus_number(),
                    device.address(),
                    e
                );
                continue;
            }
        };
        let manufacturer = match handle.read_manufacturer_string_ascii(&descriptor) {
            Ok(s) => s,
            Err(e) => {
                debug!("Skipping candidate: manufacturer string unreadable: {}", e);
                continue;
            }
        };
        let product = match handle.read_product_string_ascii(&descriptor) {
            Ok(s) => s,
            Err(e) => {
                debug!("Skipping candidate: product string unreadable: {}", e);
                continue;
            }
        };

        if is_board(
            descriptor.vendor_id(),
            descriptor.product_id(),
            &manufacturer,
            &product,
        ) {
            debug!(
                "Found board at bus {:03} addr {:03}",
                device.bus_number(),
                device.address()
            );
            boards.push(device);
        }
    }

    Ok(boards)
}

/// Facade over one ui_to_usb board.
///
/// Owns the transport exclusively for the session and tracks the last
/// LED byte written, so setting one LED does not disturb the other.
/// The driver is synchronous and unlocked; share a board across
/// threads only with external synchronization.
pub struct UiBoard<T: UsbTransport = UsbHandle> {
    transport: T,
    led_state: u8,
}

impl UiBoard<UsbHandle> {
    /// Opens a board, selects its configuration, and claims the
    /// vendor interface. The interface is released on drop.
    pub fn open(device: &rusb::Device<Context>) -> Result<Self> {
        let mut handle = device.open()?;
        handle.set_active_configuration(1)?;
        handle.claim_interface(0)?;
        info!(
            "Board opened (bus {:03} addr {:03})",
            device.bus_number(),
            device.address()
        );
        Ok(Self::from_transport(UsbHandle::new(handle)))
    }

    /// Opens the first board found on the bus.
    pub fn open_first() -> Result<Self> {
        let boards = find_boards()?;
        let device = boards.first().ok_or(Error::BoardNotFound)?;
        Self::open(device)
    }
}

impl<T: UsbTransport> UiBoard<T> {
    /// Wraps an already-initialized transport. LED state starts at
    /// zero, matching a freshly reset board.
    pub fn from_transport(transport: T) -> Self {
        Self {
            transport,
            led_state: 0,
        }
    }

    fn command_out(&self, command: Command, value: u16) -> Result<()> {
        self.transport
            .control_out(command.request_kind() as u8, command as u8, value, 0)
            .map_err(|source| Error::Transfer { command, source })
    }

    fn command_in(&self, command: Command, buf: &mut [u8]) -> Result<usize> {
        self.transport
            .control_in(command.request_kind() as u8, command as u8, 0, 0, buf)
            .map_err(|source| Error::Transfer { command, source })
    }

    /// Reinitializes the board (display, LEDs, input state).
    ///
    /// The firmware turns the LEDs off during reinit, so the local
    /// LED byte is zeroed to stay in sync.
    pub fn reset(&mut self) -> Result<()> {
        self.command_out(Command::Reset, 0)?;
        self.led_state = 0;
        debug!("Board reset");
        Ok(())
    }

    /// Sets the LED colors. Values are 3-bit BGR, 0-7.
    ///
    /// A `None` field keeps its current color; both fields are always
    /// resynced to the firmware in one transfer.
    pub fn set_led(&mut self, led_a: Option<u8>, led_b: Option<u8>) -> Result<()> {
        for color in [led_a, led_b].into_iter().flatten() {
            if color > LED_COLOR_MAX {
                return Err(Error::InvalidLedColor(color));
            }
        }

        let mut state = self.led_state;
        if let Some(color) = led_a {
            state = (state & !0x07) | color;
        }
        if let Some(color) = led_b {
            state = (state & !(0x07 << 4)) | (color << 4);
        }

        self.command_out(Command::Leds, state as u16)?;
        self.led_state = state;
        debug!("LED state set to {:#04X}", state);
        Ok(())
    }

    /// Returns the last LED byte successfully written to the board.
    pub fn led_state(&self) -> u8 {
        self.led_state
    }

    /// Inverts the display (prevents burn-in if done periodically).
    pub fn set_inverted(&mut self, inverted: bool) -> Result<()> {
        self.command_out(Command::OledInverted, inverted as u16)
    }

    /// Sets OLED brightness (0 = off, 1-16 = on).
    pub fn set_brightness(&mut self, level: u16) -> Result<()> {
        if level > BRIGHTNESS_MAX {
            return Err(Error::InvalidBrightness(level));
        }
        self.command_out(Command::OledBrightness, level)
    }

    /// Returns the firmware version string (git describe output).
    pub fn firmware_version(&mut self) -> Result<String> {
        let mut buf = [0u8; VERSION_MAX_LEN];
        let n = self.command_in(Command::Version, &mut buf)?;
        Ok(String::from_utf8(buf[..n].to_vec())?)
    }

    /// Polls button and encoder state accumulated since the last call.
    ///
    /// Call once per frame of the application loop; the firmware does
    /// not buffer beyond one poll interval.
    pub fn poll_inputs(&mut self) -> Result<InputEvent> {
        let mut buf = [0u8; 2];
        let n = self.command_in(Command::ButtonsEncoder, &mut buf)?;
        InputEvent::decode(&buf[..n])
    }

    /// Packs a framebuffer and sends it to the display.
    pub fn send_frame(&mut self, framebuffer: &Framebuffer) -> Result<()> {
        let packed = framebuffer.pack()?;
        self.send_raw(&packed)
    }

    /// Sends an already-packed framebuffer to the display.
    ///
    /// The payload must be exactly one full frame; nothing is written
    /// otherwise. The frame goes out as a single bulk transfer, the
    /// firmware resyncs on the inter-frame gap.
    pub fn send_raw(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() != FRAME_SIZE {
            return Err(Error::FramebufferSize {
                expected: FRAME_SIZE,
                actual: frame.len(),
            });
        }

        let written = self
            .transport
            .write_bulk(FRAME_ENDPOINT, frame)
            .map_err(Error::FrameTransfer)?;
        if written != FRAME_SIZE {
            return Err(Error::ShortFrameWrite {
                written,
                expected: FRAME_SIZE,
            });
        }
        Ok(())
    }
}
