//! Button and encoder status decoding.

use crate::protocol::{
    BTN0_LONG, BTN0_SHORT, BTN0_STATE, BTN1_LONG, BTN1_SHORT, BTN1_STATE, INPUT_PACKET_SIZE,
};
use crate::{Error, Result};

/// One decoded input poll.
///
/// The firmware accumulates encoder ticks and latches button press
/// events between polls; the host keeps no input state of its own.
/// Skipping polls therefore drops intermediate deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Raw firmware button bitmask (see the `BTN*` constants).
    pub button_flags: u8,
    /// Encoder ticks since the previous poll, sign gives direction.
    pub encoder_delta: i8,
}

impl InputEvent {
    /// Decodes the 2-byte status reply from the firmware.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() != INPUT_PACKET_SIZE {
            return Err(Error::InputLength(raw.len()));
        }
        Ok(Self {
            button_flags: raw[0],
            encoder_delta: raw[1] as i8,
        })
    }

    /// Button 0 is currently held down.
    pub fn button0_pressed(&self) -> bool {
        self.button_flags & BTN0_STATE != 0
    }

    /// Button 1 is currently held down.
    pub fn button1_pressed(&self) -> bool {
        self.button_flags & BTN1_STATE != 0
    }

    /// Button 0 short press since the previous poll.
    pub fn button0_short_press(&self) -> bool {
        self.button_flags & BTN0_SHORT != 0
    }

    /// Button 1 short press since the previous poll.
    pub fn button1_short_press(&self) -> bool {
        self.button_flags & BTN1_SHORT != 0
    }

    /// Button 0 long press since the previous poll.
    pub fn button0_long_press(&self) -> bool {
        self.button_flags & BTN0_LONG != 0
    }

    /// Button 1 long press since the previous poll.
    pub fn button1_long_press(&self) -> bool {
        self.button_flags & BTN1_LONG != 0
    }

    /// True if nothing happened in this poll.
    pub fn is_idle(&self) -> bool {
        self.button_flags == 0 && self.encoder_delta == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_passthrough() {
        let event = InputEvent::decode(&[0x2A, 0x05]).unwrap();
        assert_eq!(event.button_flags, 0x2A);
        assert_eq!(event.encoder_delta, 5);
    }

    #[test]
    fn test_decode_signed_delta() {
        assert_eq!(InputEvent::decode(&[0, 0xFF]).unwrap().encoder_delta, -1);
        assert_eq!(InputEvent::decode(&[0, 0x80]).unwrap().encoder_delta, -128);
        assert_eq!(InputEvent::decode(&[0, 0x7F]).unwrap().encoder_delta, 127);
        assert_eq!(InputEvent::decode(&[0, 0x00]).unwrap().encoder_delta, 0);
    }

    #[test]
    fn test_decode_all_byte_values() {
        for flags in 0..=255u8 {
            for delta in 0..=255u8 {
                let event = InputEvent::decode(&[flags, delta]).unwrap();
                assert_eq!(event.button_flags, flags);
                assert_eq!(event.encoder_delta, delta as i8);
            }
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        assert!(matches!(
            InputEvent::decode(&[]),
            Err(Error::InputLength(0))
        ));
        assert!(matches!(
            InputEvent::decode(&[1]),
            Err(Error::InputLength(1))
        ));
        assert!(matches!(
            InputEvent::decode(&[1, 2, 3]),
            Err(Error::InputLength(3))
        ));
    }

    #[test]
    fn test_flag_helpers() {
        let event = InputEvent::decode(&[BTN0_STATE | BTN1_LONG, 0]).unwrap();
        assert!(event.button0_pressed());
        assert!(!event.button1_pressed());
        assert!(!event.button0_short_press());
        assert!(event.button1_long_press());
        assert!(!event.is_idle());

        assert!(InputEvent::decode(&[0, 0]).unwrap().is_idle());
    }
}
