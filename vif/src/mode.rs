//! The logical request: which kind of interface and with which options.
use core::fmt;

use bitflags::bitflags;

/// The layer at which an interface exchanges frames with user space.
///
/// Chosen once when the interface is created. Switching requires a new interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterfaceMode {
    /// A point-to-point interface at the IP layer (TUN), frames are raw IP packets.
    Tunnel,
    /// An interface at the Ethernet layer (TAP), frames are raw Ethernet frames.
    Tap,
}

bitflags! {
    /// Independent options requested together with an [`InterfaceMode`].
    ///
    /// The set is typed so that only options this crate knows how to translate can reach the
    /// device-control request. The platform specific bits are produced by
    /// [`Platform::resolve`](crate::platform::Platform::resolve).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InterfaceFlags: u8 {
        /// Frames are exchanged without the packet information header.
        const STRIP_PACKET_INFO = 0b01;
        /// Never attach to an interface that already exists under the requested name.
        ///
        /// Added by the provisioner whenever an explicit name is requested.
        const EXCLUSIVE = 0b10;
    }
}

impl InterfaceMode {
    /// The conventional device prefix of the mode, also used for naming numbered nodes.
    pub fn prefix(self) -> &'static str {
        match self {
            InterfaceMode::Tunnel => "tun",
            InterfaceMode::Tap => "tap",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterfaceMode::Tunnel => f.write_str("tunnel"),
            InterfaceMode::Tap => f.write_str("tap"),
        }
    }
}

impl InterfaceFlags {
    /// Whether frames keep their packet information header.
    pub fn keeps_packet_info(self) -> bool {
        !self.contains(InterfaceFlags::STRIP_PACKET_INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_header() {
        assert!(InterfaceFlags::empty().keeps_packet_info());
        assert!(!InterfaceFlags::STRIP_PACKET_INFO.keeps_packet_info());
        assert_eq!(InterfaceFlags::default(), InterfaceFlags::empty());
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let flags = InterfaceFlags::from_bits_truncate(0xff);
        assert_eq!(flags, InterfaceFlags::all());
        assert!(InterfaceFlags::from_bits(0x04).is_none());
    }

    #[test]
    fn prefixes() {
        assert_eq!(InterfaceMode::Tunnel.prefix(), "tun");
        assert_eq!(InterfaceMode::Tap.prefix(), "tap");
        assert_eq!(InterfaceMode::Tap.to_string(), "tap");
    }
}
