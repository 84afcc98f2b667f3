#![allow(unsafe_code)]
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `bsd.rs`
// * `darwin.rs`
// * `linux.rs`
// * `mod.rs`
use std::io;
use std::ffi::CString;
use std::os::unix::io::RawFd;

use libc;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) mod linux;

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"))]
pub(crate) mod bsd;

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) mod darwin;

/// An errno value.
///
/// This is used as the error representation of raw libc calls. It can be converted into a
/// `std::io::Error` which has much more extensive error information.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct Errno(pub libc::c_int);

#[derive(Clone, Copy)]
struct FdResult(pub libc::c_int);

#[derive(Clone, Copy)]
struct IoLenResult(pub libc::ssize_t);

type IoctlResult = FdResult;
#[allow(non_snake_case)] // Emulate type alias also importing constructor.
fn IoctlResult(val: libc::c_int) -> IoctlResult { FdResult(val) }

/// Base for an if ioctl request.
///
/// Contains the name of the interface. The kernel copies a full `struct ifreq` in both directions
/// so requests embedding it must be padded to that size, see [`IFREQ_SIZE`].
#[repr(C)]
#[derive(Clone, Copy, Debug)]
#[allow(non_camel_case_types)]
pub(crate) struct ifreq {
    ifr_name: [libc::c_char; libc::IF_NAMESIZE],
}

/// Size of `struct ifreq` on all supported 64-bit targets, an upper bound for 32-bit ones.
pub(crate) const IFREQ_SIZE: usize = 40;

/// Trait for interpreting integer return values.
///
/// Failure signals may vary between:
/// * `-1`
/// * arbitrary negative values
/// * non-zero
trait LibcResult: Copy {
    fn is_fail(self) -> bool;

    fn errno(self) -> Result<(), Errno> {
        if self.is_fail() {
            Err(Errno::new())
        } else {
            Ok(())
        }
    }
}

/// An owned descriptor of a virtual interface, closed on drop.
#[derive(Debug)]
pub(crate) struct Descriptor {
    lower: libc::c_int,
}

/// Two ends of a pipe used to interrupt waiting operations.
///
/// The pipe is never drained. Once woken, every later wait returns immediately.
#[derive(Debug)]
pub(crate) struct WakePipe {
    read: libc::c_int,
    write: libc::c_int,
}

/// The outcome of waiting on a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ready {
    /// The descriptor is ready for the requested direction.
    Io,
    /// The wake pipe was signalled.
    Woken,
}

/// A direction of I/O to wait for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Interest {
    Read,
    Write,
}

impl Errno {
    pub(crate) fn new() -> Errno {
        Errno(io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }

    pub(crate) fn is_would_block(&self) -> bool {
        self.0 == libc::EWOULDBLOCK || self.0 == libc::EAGAIN
    }

    pub(crate) fn is_interrupted(&self) -> bool {
        self.0 == libc::EINTR
    }
}

impl LibcResult for FdResult {
    fn is_fail(self) -> bool {
        self.0 == -1
    }
}

impl LibcResult for IoLenResult {
    fn is_fail(self) -> bool {
        self.0 == -1
    }
}

impl From<Errno> for io::Error {
    fn from(err: Errno) -> io::Error {
        io::Error::from_raw_os_error(err.0 as i32)
    }
}

impl ifreq {
    /// Prepare a request for the named interface.
    ///
    /// Bytes beyond `IF_NAMESIZE - 1` are dropped, callers validate the length beforehand.
    pub(crate) fn new(name: &str) -> Self {
        let mut ifr_name = [0; libc::IF_NAMESIZE];

        for (slot, byte) in ifr_name[..libc::IF_NAMESIZE - 1].iter_mut().zip(name.as_bytes()) {
            *slot = *byte as libc::c_char
        }

        ifreq {
            ifr_name,
        }
    }

    /// The name as returned by the kernel, up to the first NUL.
    pub(crate) fn name_bytes(&self) -> Vec<u8> {
        self.ifr_name.iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect()
    }
}

impl Descriptor {
    /// Open a device node for reading and writing.
    ///
    /// The descriptor is non-blocking, waiting is done with [`Descriptor::wait`].
    pub(crate) fn open(path: &str) -> Result<Descriptor, Errno> {
        let path = CString::new(path).map_err(|_| Errno(libc::EINVAL))?;
        let lower = unsafe {
            libc::open(
                path.as_ptr(),
                libc::O_RDWR | libc::O_NONBLOCK | libc::O_CLOEXEC)
        };

        FdResult(lower).errno()?;

        Ok(Descriptor { lower })
    }

    /// Take ownership of an open descriptor.
    #[cfg_attr(not(any(test, target_os = "macos", target_os = "ios")), allow(dead_code))]
    pub(crate) fn from_raw(lower: libc::c_int) -> Descriptor {
        Descriptor { lower }
    }

    pub(crate) fn raw(&self) -> RawFd {
        self.lower
    }

    #[cfg_attr(not(any(test, target_os = "macos", target_os = "ios")), allow(dead_code))]
    pub(crate) fn set_nonblocking(&self) -> Result<(), Errno> {
        set_flag(self.lower, libc::F_GETFL, libc::F_SETFL, libc::O_NONBLOCK)
    }

    #[cfg_attr(not(any(target_os = "macos", target_os = "ios")), allow(dead_code))]
    pub(crate) fn set_cloexec(&self) -> Result<(), Errno> {
        set_flag(self.lower, libc::F_GETFD, libc::F_SETFD, libc::FD_CLOEXEC)
    }

    /// Receive a single frame into the buffer.
    pub(crate) fn recv(&self, buffer: &mut [u8]) -> Result<usize, Errno> {
        let len = unsafe {
            libc::read(
                self.lower,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len())
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Send a single frame from the buffer.
    pub(crate) fn send(&self, buffer: &[u8]) -> Result<usize, Errno> {
        let len = unsafe {
            libc::write(
                self.lower,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len())
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Receive a frame whose first bytes go to `head` and the rest to `body`.
    pub(crate) fn recv_split(&self, head: &mut [u8], body: &mut [u8]) -> Result<usize, Errno> {
        let iov = [
            libc::iovec { iov_base: head.as_mut_ptr() as *mut libc::c_void, iov_len: head.len() },
            libc::iovec { iov_base: body.as_mut_ptr() as *mut libc::c_void, iov_len: body.len() },
        ];
        let len = unsafe {
            libc::readv(self.lower, iov.as_ptr(), iov.len() as libc::c_int)
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Send `head` followed by `body` as a single frame.
    pub(crate) fn send_split(&self, head: &[u8], body: &[u8]) -> Result<usize, Errno> {
        let iov = [
            libc::iovec { iov_base: head.as_ptr() as *mut libc::c_void, iov_len: head.len() },
            libc::iovec { iov_base: body.as_ptr() as *mut libc::c_void, iov_len: body.len() },
        ];
        let len = unsafe {
            libc::writev(self.lower, iov.as_ptr(), iov.len() as libc::c_int)
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Wait until the descriptor becomes ready or the pipe is woken.
    pub(crate) fn wait(&self, interest: Interest, wake: &WakePipe) -> Result<Ready, Errno> {
        let events = match interest {
            Interest::Read => libc::POLLIN,
            Interest::Write => libc::POLLOUT,
        };

        let mut fds = [
            libc::pollfd { fd: self.lower, events, revents: 0 },
            libc::pollfd { fd: wake.read, events: libc::POLLIN, revents: 0 },
        ];

        loop {
            let res = unsafe {
                libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1)
            };

            match FdResult(res).errno() {
                Ok(()) => break,
                Err(err) if err.is_interrupted() => continue,
                Err(err) => return Err(err),
            }
        }

        if fds[1].revents != 0 {
            Ok(Ready::Woken)
        } else if fds[0].revents & libc::POLLNVAL != 0 {
            Err(Errno(libc::EBADF))
        } else {
            Ok(Ready::Io)
        }
    }
}

impl Drop for Descriptor {
    fn drop(&mut self) {
        unsafe { libc::close(self.lower); }
    }
}

impl WakePipe {
    pub(crate) fn new() -> Result<WakePipe, Errno> {
        let mut fds = [0; 2];
        let res = unsafe { libc::pipe(fds.as_mut_ptr()) };
        FdResult(res).errno()?;

        let pipe = WakePipe { read: fds[0], write: fds[1] };
        for &fd in &fds {
            set_flag(fd, libc::F_GETFD, libc::F_SETFD, libc::FD_CLOEXEC)?;
            set_flag(fd, libc::F_GETFL, libc::F_SETFL, libc::O_NONBLOCK)?;
        }

        Ok(pipe)
    }

    /// Make all current and future waits return.
    pub(crate) fn wake(&self) {
        let byte = 1u8;
        // A full pipe is already readable, any failure leaves the pipe signalled.
        let _ = unsafe {
            libc::write(self.write, &byte as *const u8 as *const libc::c_void, 1)
        };
    }
}

impl Drop for WakePipe {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.read);
            libc::close(self.write);
        }
    }
}

fn set_flag(
    fd: libc::c_int,
    get: libc::c_int,
    set: libc::c_int,
    flag: libc::c_int,
) -> Result<(), Errno> {
    let current = unsafe { libc::fcntl(fd, get) };
    FdResult(current).errno()?;
    let res = unsafe { libc::fcntl(fd, set, current | flag) };
    FdResult(res).errno()
}

/// Issue an ioctl carrying a pointer argument.
///
/// The request type differs between libc targets, hence the cast from the portable `u64` command
/// codes of the platform profiles.
pub(crate) unsafe fn ioctl_ptr<T>(fd: libc::c_int, cmd: u64, arg: *mut T) -> Result<(), Errno> {
    let res = libc::ioctl(fd, cmd as _, arg);
    IoctlResult(res).errno()
}
