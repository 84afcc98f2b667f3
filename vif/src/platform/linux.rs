use super::{AddressFamilies, ControlCommand, DeviceNode, FlagWord, HeaderPolicy, LinuxIoc, Platform};
use crate::mode::{InterfaceFlags, InterfaceMode};

/// Linux (and Android): one cloning node configured with `TUNSETIFF`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Linux;

impl Linux {
    pub(crate) const IFF_TUN: u32 = 0x0001;
    pub(crate) const IFF_TAP: u32 = 0x0002;
    pub(crate) const IFF_NO_PI: u32 = 0x1000;
    pub(crate) const IFF_TUN_EXCL: u32 = 0x8000;

    /// `_IOW('T', 202, int)`.
    pub(crate) const TUNSETIFF: u64 = LinuxIoc::TARGET.iow(b'T', 202, core::mem::size_of::<u32>());

    const NODE: &'static str = "/dev/net/tun";
}

impl Platform for Linux {
    const NAME: &'static str = "linux";

    fn resolve(mode: InterfaceMode, flags: InterfaceFlags) -> FlagWord {
        let mut bits = match mode {
            InterfaceMode::Tunnel => Self::IFF_TUN,
            InterfaceMode::Tap => Self::IFF_TAP,
        };

        if flags.contains(InterfaceFlags::STRIP_PACKET_INFO) {
            bits |= Self::IFF_NO_PI;
        }

        if flags.contains(InterfaceFlags::EXCLUSIVE) {
            bits |= Self::IFF_TUN_EXCL;
        }

        FlagWord::new(bits)
    }

    fn control_command() -> ControlCommand {
        ControlCommand::SetInterface(Self::TUNSETIFF)
    }

    fn device_node(_: InterfaceMode) -> DeviceNode {
        DeviceNode::Clone(Self::NODE)
    }

    fn header_policy(_: InterfaceMode) -> HeaderPolicy {
        HeaderPolicy::Kernel
    }

    fn address_families() -> AddressFamilies {
        AddressFamilies { inet: 2, inet6: 10 }
    }
}
