//! The small headers some kernels prepend to frames.
//!
//! Linux prefixes every frame with a `tun_pi` structure unless the interface was created with
//! `IFF_NO_PI`: two bytes of flags followed by the big endian EtherType of the payload. The BSDs
//! and Darwin instead use a single big endian 32-bit address family.
//!
//! Both are four bytes long. The handle uses [`AddressFamily`] to add or remove the header in user
//! space on systems where the kernel can not be told to omit it.
use crate::platform::AddressFamilies;

/// Length of either header in bytes.
pub const LEN: usize = 4;

/// The Linux `tun_pi` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PacketInfo {
    /// Flags set by the kernel, only [`PacketInfo::STRIP`] is defined.
    pub flags: u16,
    /// EtherType of the frame contents.
    pub proto: u16,
}

/// An address family header as used by the BSD drivers and `utun`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressFamily(pub u32);

impl PacketInfo {
    /// The frame was truncated because the read buffer was too small.
    pub const STRIP: u16 = 0x0001;

    /// Read the header at the start of a frame.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        let header = frame.get(..LEN)?;
        Some(PacketInfo {
            flags: u16::from_ne_bytes([header[0], header[1]]),
            proto: u16::from_be_bytes([header[2], header[3]]),
        })
    }

    /// Write the header to the start of a buffer.
    ///
    /// # Panics
    /// This method panics if the buffer is shorter than [`LEN`].
    pub fn emit(&self, buffer: &mut [u8]) {
        buffer[..2].copy_from_slice(&self.flags.to_ne_bytes());
        buffer[2..LEN].copy_from_slice(&self.proto.to_be_bytes());
    }

    /// Whether the kernel reported a truncated frame.
    pub fn truncated(&self) -> bool {
        self.flags & Self::STRIP != 0
    }
}

impl AddressFamily {
    /// Choose the family of an IP packet by its version nibble.
    pub fn for_packet(packet: &[u8], families: AddressFamilies) -> Option<Self> {
        match packet.first()? >> 4 {
            4 => Some(AddressFamily(families.inet)),
            6 => Some(AddressFamily(families.inet6)),
            _ => None,
        }
    }

    /// Read the header at the start of a frame.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        let header = frame.get(..LEN)?;
        Some(AddressFamily(u32::from_be_bytes([header[0], header[1], header[2], header[3]])))
    }

    /// Write the header to the start of a buffer.
    ///
    /// # Panics
    /// This method panics if the buffer is shorter than [`LEN`].
    pub fn emit(&self, buffer: &mut [u8]) {
        buffer[..LEN].copy_from_slice(&self.0.to_be_bytes());
    }
}
