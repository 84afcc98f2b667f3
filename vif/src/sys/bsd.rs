use super::{ioctl_ptr, Descriptor, Errno};
use crate::platform::FlagWord;
use libc;

/// Adds a method to toggle the address family header of a tun unit.
pub(crate) trait TunSetHead {
    fn tun_set_head(&self, cmd: u64, flags: FlagWord) -> Result<(), Errno>;
}

impl TunSetHead for Descriptor {
    fn tun_set_head(&self, cmd: u64, flags: FlagWord) -> Result<(), Errno> {
        let mut enable: libc::c_int = flags.bits() as libc::c_int;
        unsafe { ioctl_ptr(self.raw(), cmd, &mut enable as *mut libc::c_int) }
    }
}
