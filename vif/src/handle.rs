//! Moving frames through a provisioned interface.
//!
//! A [`VirtualInterfaceHandle`] is created by the [provisioner](crate::provision). It owns the
//! descriptor of the interface and is the only way to reach it. Frames are passed through
//! unmodified with one exception: on systems whose kernel always prefixes frames with an address
//! family header, the header is removed on receive and added on send when the interface was
//! created with [`InterfaceFlags::STRIP_PACKET_INFO`].
//!
//! ## Blocking and closing
//!
//! All operations block the calling thread by default. `send` and `receive` take `&self` and may
//! run concurrently from different threads, for example with the handle shared in an `Arc`. A
//! call to [`close`](VirtualInterfaceHandle::close) wakes any thread blocked in `receive`, which
//! then fails with [`IoError::Closed`]. Afterwards every operation fails with the same error
//! without touching the OS.
//!
//! The raw descriptor is available through `AsRawFd` for use with an external readiness
//! mechanism. Combine it with [`set_nonblocking`](VirtualInterfaceHandle::set_nonblocking) so
//! that an empty queue is reported as [`IoError::WouldBlock`] instead of waiting.
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::IoError;
use crate::mode::{InterfaceFlags, InterfaceMode};
use crate::packet_info::{self, AddressFamily};
use crate::platform::AddressFamilies;
use crate::sys::{Descriptor, Errno, Interest, Ready, WakePipe};

/// Largest frame accepted by any supported kernel, plus room for a packet information header.
pub const MAX_FRAME: usize = (1 << 16) - 1 + packet_info::LEN;

/// An open virtual interface.
#[derive(Debug)]
pub struct VirtualInterfaceHandle {
    lower: RwLock<Option<Descriptor>>,
    raw: AtomicI32,
    wake: WakePipe,
    closed: AtomicBool,
    nonblocking: AtomicBool,
    name: String,
    mode: InterfaceMode,
    flags: InterfaceFlags,
    framing: Framing,
}

/// How frames on the descriptor relate to the frames the caller sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Framing {
    /// Identical.
    Passthrough,
    /// The descriptor carries an address family header the caller does not see.
    StripFamily(AddressFamilies),
}

impl VirtualInterfaceHandle {
    pub(crate) fn new(
        lower: Descriptor,
        name: String,
        mode: InterfaceMode,
        flags: InterfaceFlags,
        framing: Framing,
    ) -> Result<Self, Errno> {
        let wake = WakePipe::new()?;
        Ok(VirtualInterfaceHandle {
            raw: AtomicI32::new(lower.raw()),
            lower: RwLock::new(Some(lower)),
            wake,
            closed: AtomicBool::new(false),
            nonblocking: AtomicBool::new(false),
            name,
            mode,
            flags,
            framing,
        })
    }

    /// The confirmed name of the interface.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mode the interface was created with.
    pub fn mode(&self) -> InterfaceMode {
        self.mode
    }

    /// The flags the interface was created with.
    pub fn flags(&self) -> InterfaceFlags {
        self.flags
    }

    /// Whether frames exchanged through this handle start with a packet information header.
    pub fn carries_packet_info(&self) -> bool {
        self.flags.keeps_packet_info()
    }

    /// Whether the handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Choose between waiting for the descriptor and failing with `WouldBlock`.
    pub fn set_nonblocking(&self, nonblocking: bool) {
        self.nonblocking.store(nonblocking, Ordering::Relaxed);
    }

    /// Send a single frame.
    pub fn send(&self, frame: &[u8]) -> Result<(), IoError> {
        let written = match self.framing {
            Framing::Passthrough => {
                self.with_lower(Interest::Write, |lower| lower.send(frame))?
            },
            Framing::StripFamily(families) => {
                let family = AddressFamily::for_packet(frame, families).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "frame is neither IPv4 nor IPv6")
                })?;
                let mut head = [0; packet_info::LEN];
                family.emit(&mut head);
                let written = self.with_lower(Interest::Write, |lower| lower.send_split(&head, frame))?;
                written.saturating_sub(packet_info::LEN)
            },
        };

        if written != frame.len() {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "frame was truncated").into());
        }

        net_trace!("{}: sent {} bytes", self.name, written);
        Ok(())
    }

    /// Receive a single frame into `buffer`, returning its length.
    ///
    /// Frames longer than the buffer are truncated by the kernel.
    pub fn receive_into(&self, buffer: &mut [u8]) -> Result<usize, IoError> {
        let len = match self.framing {
            Framing::Passthrough => {
                self.with_lower(Interest::Read, |lower| lower.recv(buffer))?
            },
            Framing::StripFamily(_) => {
                let mut head = [0; packet_info::LEN];
                let len = self.with_lower(Interest::Read, |lower| lower.recv_split(&mut head, buffer))?;
                if len < packet_info::LEN {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "frame shorter than its header").into());
                }
                len - packet_info::LEN
            },
        };

        net_trace!("{}: received {} bytes", self.name, len);
        Ok(len)
    }

    /// Receive a single frame.
    pub fn receive(&self) -> Result<Vec<u8>, IoError> {
        let mut frame = vec![0; MAX_FRAME];
        let len = self.receive_into(&mut frame)?;
        frame.truncate(len);
        Ok(frame)
    }

    /// Release the descriptor.
    ///
    /// Threads blocked in `receive` return with [`IoError::Closed`]. Calling this more than once
    /// has no further effect. Depending on the OS the interface disappears with the descriptor.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.wake.wake();
        self.raw.store(-1, Ordering::Release);
        // Waits for operations that are still past the closed check.
        let lower = self.lower
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(lower);

        net_debug!("{}: closed", self.name);
    }

    fn with_lower(
        &self,
        interest: Interest,
        mut op: impl FnMut(&Descriptor) -> Result<usize, Errno>,
    ) -> Result<usize, IoError> {
        if self.is_closed() {
            return Err(IoError::Closed);
        }

        let guard = self.lower.read().unwrap_or_else(PoisonError::into_inner);
        let lower = guard.as_ref().ok_or(IoError::Closed)?;

        loop {
            if self.is_closed() {
                return Err(IoError::Closed);
            }

            match op(lower) {
                Ok(len) => return Ok(len),
                Err(err) if err.is_interrupted() => continue,
                Err(err) if err.is_would_block() => {
                    if self.nonblocking.load(Ordering::Relaxed) {
                        return Err(IoError::WouldBlock);
                    }

                    match lower.wait(interest, &self.wake) {
                        Ok(Ready::Io) => continue,
                        Ok(Ready::Woken) => return Err(IoError::Closed),
                        Err(err) => return Err(IoError::from_os(err.into())),
                    }
                },
                Err(err) => return Err(IoError::from_os(err.into())),
            }
        }
    }
}

impl AsRawFd for VirtualInterfaceHandle {
    /// The descriptor of the interface, `-1` once closed.
    fn as_raw_fd(&self) -> RawFd {
        self.raw.load(Ordering::Acquire)
    }
}

impl Drop for VirtualInterfaceHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl io::Read for &'_ VirtualInterfaceHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.receive_into(buf)?)
    }
}

impl io::Write for &'_ VirtualInterfaceHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for VirtualInterfaceHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&*self).read(buf)
    }
}

impl io::Write for VirtualInterfaceHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
