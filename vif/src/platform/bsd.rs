//! The BSD family: one node per unit, the node decides between tun and tap.
//!
//! The drivers agree on the naming of nodes but not on the header. FreeBSD and NetBSD can toggle
//! the address family header of a tun with `TUNSIFHEAD` (each with its own number), OpenBSD always
//! prepends it. Tap nodes never carry one.
use super::{bsd_iow, AddressFamilies, ControlCommand, DeviceNode, FlagWord, HeaderPolicy, Platform};
use crate::mode::{InterfaceFlags, InterfaceMode};

/// FreeBSD and DragonFly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FreeBsd;

/// NetBSD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NetBsd;

/// OpenBSD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OpenBsd;

/// Bit of the flag word: frames keep the address family header.
pub(crate) const KEEP_HEADER: u32 = 0x0001;

const UNITS: u32 = 256;

fn numbered(mode: InterfaceMode) -> DeviceNode {
    let prefix = match mode {
        InterfaceMode::Tunnel => "/dev/tun",
        InterfaceMode::Tap => "/dev/tap",
    };

    DeviceNode::Numbered { prefix, units: UNITS }
}

/// The mode is implied by the node, so only the header remains to be encoded.
fn header_word(mode: InterfaceMode, flags: InterfaceFlags) -> FlagWord {
    match mode {
        InterfaceMode::Tunnel if flags.keeps_packet_info() => FlagWord::new(KEEP_HEADER),
        _ => FlagWord::new(0),
    }
}

fn tunnel_header(mode: InterfaceMode, tunnel: HeaderPolicy) -> HeaderPolicy {
    match mode {
        InterfaceMode::Tunnel => tunnel,
        InterfaceMode::Tap => HeaderPolicy::Never,
    }
}

impl FreeBsd {
    /// `_IOW('t', 96, int)`.
    pub(crate) const TUNSIFHEAD: u64 = bsd_iow(b't', 96, core::mem::size_of::<u32>());
}

impl NetBsd {
    /// `_IOW('t', 66, int)`.
    pub(crate) const TUNSIFHEAD: u64 = bsd_iow(b't', 66, core::mem::size_of::<u32>());
}

impl Platform for FreeBsd {
    const NAME: &'static str = "freebsd";

    fn resolve(mode: InterfaceMode, flags: InterfaceFlags) -> FlagWord {
        header_word(mode, flags)
    }

    fn control_command() -> ControlCommand {
        ControlCommand::SetHeader(Self::TUNSIFHEAD)
    }

    fn device_node(mode: InterfaceMode) -> DeviceNode {
        numbered(mode)
    }

    fn header_policy(mode: InterfaceMode) -> HeaderPolicy {
        tunnel_header(mode, HeaderPolicy::Kernel)
    }

    fn address_families() -> AddressFamilies {
        AddressFamilies { inet: 2, inet6: 28 }
    }
}

impl Platform for NetBsd {
    const NAME: &'static str = "netbsd";

    fn resolve(mode: InterfaceMode, flags: InterfaceFlags) -> FlagWord {
        header_word(mode, flags)
    }

    fn control_command() -> ControlCommand {
        ControlCommand::SetHeader(Self::TUNSIFHEAD)
    }

    fn device_node(mode: InterfaceMode) -> DeviceNode {
        numbered(mode)
    }

    fn header_policy(mode: InterfaceMode) -> HeaderPolicy {
        tunnel_header(mode, HeaderPolicy::Kernel)
    }

    fn address_families() -> AddressFamilies {
        AddressFamilies { inet: 2, inet6: 24 }
    }
}

impl Platform for OpenBsd {
    const NAME: &'static str = "openbsd";

    fn resolve(mode: InterfaceMode, flags: InterfaceFlags) -> FlagWord {
        header_word(mode, flags)
    }

    fn control_command() -> ControlCommand {
        ControlCommand::Implied
    }

    fn device_node(mode: InterfaceMode) -> DeviceNode {
        numbered(mode)
    }

    fn header_policy(mode: InterfaceMode) -> HeaderPolicy {
        tunnel_header(mode, HeaderPolicy::Always)
    }

    fn address_families() -> AddressFamilies {
        AddressFamilies { inet: 2, inet6: 24 }
    }
}
