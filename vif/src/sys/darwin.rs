use core::mem;

use super::{ioctl_ptr, Descriptor, Errno, FdResult, LibcResult};
use libc;

/// Connect a kernel control socket to the unit of a registered control.
///
/// Unit `0` lets the kernel choose the next free unit. For `utun`, unit `n + 1` is `utun{n}`.
pub(crate) fn connect_control(control: &str, unit: u32) -> Result<Descriptor, Errno> {
    let fd = unsafe {
        libc::socket(libc::PF_SYSTEM, libc::SOCK_DGRAM, libc::SYSPROTO_CONTROL)
    };
    FdResult(fd).errno()?;

    let lower = Descriptor::from_raw(fd);
    lower.set_cloexec()?;

    let mut info: libc::ctl_info = unsafe { mem::zeroed() };
    let name_len = info.ctl_name.len() - 1;
    for (slot, byte) in info.ctl_name[..name_len].iter_mut().zip(control.as_bytes()) {
        *slot = *byte as libc::c_char;
    }

    unsafe { ioctl_ptr(fd, libc::CTLIOCGINFO as u64, &mut info as *mut libc::ctl_info)? };

    let addr = libc::sockaddr_ctl {
        sc_len: mem::size_of::<libc::sockaddr_ctl>() as libc::c_uchar,
        sc_family: libc::AF_SYSTEM as libc::c_uchar,
        ss_sysaddr: libc::AF_SYS_CONTROL as u16,
        sc_id: info.ctl_id,
        sc_unit: unit,
        sc_reserved: [0; 5],
    };

    let res = unsafe {
        libc::connect(
            fd,
            &addr as *const libc::sockaddr_ctl as *const libc::sockaddr,
            mem::size_of::<libc::sockaddr_ctl>() as libc::socklen_t)
    };
    FdResult(res).errno()?;

    lower.set_nonblocking()?;
    Ok(lower)
}

/// Query the name of the interface behind a connected control socket.
pub(crate) fn control_ifname(lower: &Descriptor, option: libc::c_int) -> Result<Vec<u8>, Errno> {
    let mut name = [0u8; libc::IF_NAMESIZE];
    let mut len = name.len() as libc::socklen_t;

    let res = unsafe {
        libc::getsockopt(
            lower.raw(),
            libc::SYSPROTO_CONTROL,
            option,
            name.as_mut_ptr() as *mut libc::c_void,
            &mut len)
    };
    FdResult(res).errno()?;

    Ok(name[..len as usize].iter()
        .copied()
        .take_while(|&b| b != 0)
        .collect())
}
