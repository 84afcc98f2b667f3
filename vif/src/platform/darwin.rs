use super::bsd::KEEP_HEADER;
use super::{AddressFamilies, ControlCommand, DeviceNode, FlagWord, HeaderPolicy, Platform};
use crate::mode::{InterfaceFlags, InterfaceMode};

/// macOS and iOS: `utun` interfaces behind a kernel control socket.
///
/// There is no tap driver in the base system. A `utun` always prepends the address family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Darwin;

impl Darwin {
    pub(crate) const UTUN_CONTROL: &'static str = "com.apple.net.utun_control";
    /// Socket option of `SYSPROTO_CONTROL` returning the interface name.
    #[cfg_attr(not(any(target_os = "macos", target_os = "ios")), allow(dead_code))]
    pub(crate) const UTUN_OPT_IFNAME: i32 = 2;
}

impl Platform for Darwin {
    const NAME: &'static str = "darwin";

    fn resolve(_: InterfaceMode, flags: InterfaceFlags) -> FlagWord {
        if flags.keeps_packet_info() {
            FlagWord::new(KEEP_HEADER)
        } else {
            FlagWord::new(0)
        }
    }

    fn control_command() -> ControlCommand {
        ControlCommand::Implied
    }

    fn device_node(_: InterfaceMode) -> DeviceNode {
        DeviceNode::ControlSocket { control: Self::UTUN_CONTROL, prefix: "utun" }
    }

    fn header_policy(_: InterfaceMode) -> HeaderPolicy {
        HeaderPolicy::Always
    }

    fn supports(mode: InterfaceMode) -> bool {
        mode == InterfaceMode::Tunnel
    }

    fn address_families() -> AddressFamilies {
        AddressFamilies { inet: 2, inet6: 30 }
    }
}
