//! USB transport abstraction for board communication.
//!
//! Provides a trait-based transport layer so that the real libusb
//! handle and mock devices share the same interface.

use std::time::Duration;

use rusb::{Context, DeviceHandle};

/// USB transfer timeout.
const USB_TIMEOUT: Duration = Duration::from_millis(1000);

/// Abstraction over raw vendor control and bulk transfers.
///
/// All methods block until the transfer completes or errors; this
/// layer performs no retries.
pub trait UsbTransport {
    /// Issues a host-to-device control transfer with no data stage.
    fn control_out(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
    ) -> std::result::Result<(), rusb::Error>;

    /// Issues a device-to-host control transfer, reading up to
    /// `buf.len()` bytes. A short read is not itself an error;
    /// interpretation is the caller's responsibility.
    fn control_in(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> std::result::Result<usize, rusb::Error>;

    /// Writes raw bytes to a bulk OUT endpoint.
    fn write_bulk(&self, endpoint: u8, data: &[u8]) -> std::result::Result<usize, rusb::Error>;
}

/// Production transport backed by an exclusively owned libusb handle.
pub struct UsbHandle {
    handle: DeviceHandle<Context>,
}

impl UsbHandle {
    /// Wraps an opened device handle. The caller has already selected
    /// the configuration and claimed the vendor interface.
    pub(crate) fn new(handle: DeviceHandle<Context>) -> Self {
        Self { handle }
    }
}

impl UsbTransport for UsbHandle {
    fn control_out(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
    ) -> std::result::Result<(), rusb::Error> {
        self.handle
            .write_control(request_type, request, value, index, &[], USB_TIMEOUT)?;
        Ok(())
    }

    fn control_in(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> std::result::Result<usize, rusb::Error> {
        self.handle
            .read_control(request_type, request, value, index, buf, USB_TIMEOUT)
    }

    fn write_bulk(&self, endpoint: u8, data: &[u8]) -> std::result::Result<usize, rusb::Error> {
        self.handle.write_bulk(endpoint, data, USB_TIMEOUT)
    }
}

impl Drop for UsbHandle {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(0);
    }
}

/// A mock USB transport for testing.
///
/// Records every transfer and serves queued control-in payloads.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// One recorded transfer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Transfer {
        ControlOut {
            request_type: u8,
            request: u8,
            value: u16,
            index: u16,
        },
        ControlIn {
            request_type: u8,
            request: u8,
            value: u16,
            index: u16,
            max_len: usize,
        },
        Bulk {
            endpoint: u8,
            data: Vec<u8>,
        },
    }

    /// Mock transport that logs transfers and replays canned replies.
    #[derive(Default)]
    pub struct MockTransport {
        pub transfers: RefCell<Vec<Transfer>>,
        replies: RefCell<VecDeque<Vec<u8>>>,
        fail_with: RefCell<Option<rusb::Error>>,
        bulk_limit: RefCell<Option<usize>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a payload for the next control-in transfer.
        pub fn push_reply(&self, data: &[u8]) {
            self.replies.borrow_mut().push_back(data.to_vec());
        }

        /// Makes every subsequent transfer fail with the given error.
        pub fn fail_with(&self, err: rusb::Error) {
            *self.fail_with.borrow_mut() = Some(err);
        }

        /// Caps how many bytes the bulk endpoint accepts per transfer.
        pub fn limit_bulk(&self, max: usize) {
            *self.bulk_limit.borrow_mut() = Some(max);
        }

        pub fn transfers(&self) -> Vec<Transfer> {
            self.transfers.borrow().clone()
        }

        fn check_failure(&self) -> std::result::Result<(), rusb::Error> {
            match *self.fail_with.borrow() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl UsbTransport for MockTransport {
        fn control_out(
            &self,
            request_type: u8,
            request: u8,
            value: u16,
            index: u16,
        ) -> std::result::Result<(), rusb::Error> {
            self.check_failure()?;
            self.transfers.borrow_mut().push(Transfer::ControlOut {
                request_type,
                request,
                value,
                index,
            });
            Ok(())
        }

        fn control_in(
            &self,
            request_type: u8,
            request: u8,
            value: u16,
            index: u16,
            buf: &mut [u8],
        ) -> std::result::Result<usize, rusb::Error> {
            self.check_failure()?;
            self.transfers.borrow_mut().push(Transfer::ControlIn {
                request_type,
                request,
                value,
                index,
                max_len: buf.len(),
            });
            let reply = self.replies.borrow_mut().pop_front().unwrap_or_default();
            let n = reply.len().min(buf.len());
            buf[..n].copy_from_slice(&reply[..n]);
            Ok(n)
        }

        fn write_bulk(
            &self,
            endpoint: u8,
            data: &[u8],
        ) -> std::result::Result<usize, rusb::Error> {
            self.check_failure()?;
            let accepted = match *self.bulk_limit.borrow() {
                Some(limit) => data.len().min(limit),
                None => data.len(),
            };
            self.transfers.borrow_mut().push(Transfer::Bulk {
                endpoint,
                data: data[..accepted].to_vec(),
            });
            Ok(accepted)
        }
    }
}
