// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use super::{ifreq, ioctl_ptr, Descriptor, Errno, IFREQ_SIZE};
use crate::platform::FlagWord;
use libc;

/// Adds a method to attach a descriptor to an interface.
///
/// This is an extension trait implemented for `ifreq` in Linux.
pub(crate) trait TunSetIf {
    /// Attach to an existing interface or create a new one.
    ///
    /// On success the kernel has written the final interface name back into `self`, which
    /// resolves templates such as `tun%d`.
    fn tun_set_if(&mut self, lower: &Descriptor, cmd: u64, flags: FlagWord) -> Result<(), Errno>;
}

const PAD: usize = IFREQ_SIZE - libc::IF_NAMESIZE - core::mem::size_of::<libc::c_short>();

/// `struct ifreq` with the `ifr_flags` member of its union.
#[repr(C)]
#[derive(Debug)]
struct SetIfRequest {
    interface: ifreq,
    flags: libc::c_short,
    _pad: [u8; PAD],
}

impl TunSetIf for ifreq {
    fn tun_set_if(&mut self, lower: &Descriptor, cmd: u64, flags: FlagWord) -> Result<(), Errno> {
        let mut request = SetIfRequest {
            interface: *self,
            // Every Linux flag is below `0x10000`.
            flags: flags.bits() as u16 as libc::c_short,
            _pad: [0; PAD],
        };

        unsafe { ioctl_ptr(lower.raw(), cmd, &mut request as *mut SetIfRequest)? };

        *self = request.interface;
        Ok(())
    }
}
