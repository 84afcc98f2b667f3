//! Per-OS translation of logical requests into kernel encodings.
//!
//! Each supported operating system has one profile, a zero-sized type implementing [`Platform`].
//! The profile is the only place that knows device node paths, `ioctl` numbers, flag bit
//! positions and header conventions of its OS. All profiles are compiled on every host, which
//! allows checking their constants anywhere, but only the one aliased as [`Host`] is used for
//! actually provisioning an interface.
//!
//! Porting to another OS means writing one more profile and the matching `sys` plumbing. There are
//! no other conditionals on the target elsewhere in the crate.
use crate::mode::{InterfaceFlags, InterfaceMode};

mod bsd;
mod darwin;
mod linux;

#[cfg(test)]
mod tests;

pub use self::bsd::{FreeBsd, NetBsd, OpenBsd};
pub use self::darwin::Darwin;
pub use self::linux::Linux;

/// The profile of the OS this crate was compiled for.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub type Host = Linux;
/// The profile of the OS this crate was compiled for.
///
/// DragonFly inherited the tunnel driver of FreeBSD together with its `ioctl` numbers.
#[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
pub type Host = FreeBsd;
/// The profile of the OS this crate was compiled for.
#[cfg(target_os = "netbsd")]
pub type Host = NetBsd;
/// The profile of the OS this crate was compiled for.
#[cfg(target_os = "openbsd")]
pub type Host = OpenBsd;
/// The profile of the OS this crate was compiled for.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub type Host = Darwin;

/// The capability table of one operating system.
pub trait Platform {
    /// Name of the profile, for diagnostics.
    const NAME: &'static str;

    /// Size of the interface name buffer in bytes, including the terminating NUL.
    const NAME_LIMIT: usize = 16;

    /// Combine a mode and flags into the flag word this OS expects.
    ///
    /// Pure and infallible, the inputs are a closed set.
    fn resolve(mode: InterfaceMode, flags: InterfaceFlags) -> FlagWord;

    /// The command that applies a flag word to an open descriptor.
    fn control_command() -> ControlCommand;

    /// Where interfaces of the mode are created.
    fn device_node(mode: InterfaceMode) -> DeviceNode;

    /// How frames of the mode relate to the packet information header.
    fn header_policy(mode: InterfaceMode) -> HeaderPolicy;

    /// Whether the OS offers interfaces of the mode at all.
    fn supports(_: InterfaceMode) -> bool {
        true
    }

    /// The values of `AF_INET` and `AF_INET6` used in address family headers.
    fn address_families() -> AddressFamilies;
}

/// An OS specific flag word, the argument of the control command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlagWord(u32);

/// An OS specific control request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    /// Attach the descriptor to a (new) named interface with an `ifreq`, Linux style.
    SetInterface(u64),
    /// Toggle the address family header with an integer argument, BSD style.
    SetHeader(u64),
    /// Nothing to configure, the node already implies mode and header.
    Implied,
}

/// How to reach the control device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceNode {
    /// A single cloning node, each open yields a fresh unattached descriptor.
    Clone(&'static str),
    /// One node per interface unit, `prefix` followed by the unit number.
    Numbered {
        /// Path without the unit number.
        prefix: &'static str,
        /// Number of units tried when no name was requested.
        units: u32,
    },
    /// A kernel control socket, identified by its control name.
    ControlSocket {
        /// The registered control name.
        control: &'static str,
        /// Name of the interfaces, followed by the unit number.
        prefix: &'static str,
    },
}

/// Relation of frames to the packet information header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderPolicy {
    /// The kernel adds or omits the header as configured.
    Kernel,
    /// The kernel always prepends an address family header. Omitting it is done in user space.
    Always,
    /// Frames never carry a header.
    Never,
}

/// Numeric address families of an OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressFamilies {
    /// The value of `AF_INET`.
    pub inet: u32,
    /// The value of `AF_INET6`.
    pub inet6: u32,
}

impl FlagWord {
    pub(crate) const fn new(bits: u32) -> Self {
        FlagWord(bits)
    }

    /// The raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl DeviceNode {
    /// The node path of a unit, for numbered nodes.
    pub fn unit_path(self, unit: u32) -> Option<String> {
        match self {
            DeviceNode::Numbered { prefix, .. } => Some(format!("{}{}", prefix, unit)),
            _ => None,
        }
    }

    /// The unit an interface name refers to, for nodes that name interfaces by unit.
    ///
    /// Returns `None` for cloning nodes, which accept arbitrary names, and for names that do not
    /// follow the `<prefix><number>` scheme of the node.
    pub fn unit_of(self, name: &str) -> Option<u32> {
        let prefix = match self {
            DeviceNode::Clone(_) => return None,
            DeviceNode::Numbered { prefix, .. } => prefix.rsplit('/').next().unwrap_or(prefix),
            DeviceNode::ControlSocket { prefix, .. } => prefix,
        };

        let digits = name.strip_prefix(prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        digits.parse().ok()
    }
}

/// Encoding of `ioctl` numbers in the scheme of Linux.
///
/// Most architectures use a 2-bit direction and 14-bit size field. MIPS, PowerPC and SPARC
/// use a 3-bit direction with a 13-bit size field and a different write bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinuxIoc {
    write: u64,
    size_bits: u32,
}

impl LinuxIoc {
    /// The encoding of most architectures.
    pub const GENERIC: LinuxIoc = LinuxIoc { write: 1, size_bits: 14 };

    /// The encoding of MIPS, PowerPC and SPARC.
    pub const ALTERNATE: LinuxIoc = LinuxIoc { write: 4, size_bits: 13 };

    /// The encoding of the compilation target.
    #[cfg(any(
        target_arch = "mips",
        target_arch = "mips64",
        target_arch = "powerpc",
        target_arch = "powerpc64",
        target_arch = "sparc",
        target_arch = "sparc64"))]
    pub const TARGET: LinuxIoc = LinuxIoc::ALTERNATE;

    /// The encoding of the compilation target.
    #[cfg(not(any(
        target_arch = "mips",
        target_arch = "mips64",
        target_arch = "powerpc",
        target_arch = "powerpc64",
        target_arch = "sparc",
        target_arch = "sparc64")))]
    pub const TARGET: LinuxIoc = LinuxIoc::GENERIC;

    /// `_IOW(ty, nr, size)`.
    pub const fn iow(self, ty: u8, nr: u8, size: usize) -> u64 {
        let dir_shift = 16 + self.size_bits;
        (self.write << dir_shift)
            | (((size as u64) & ((1 << self.size_bits) - 1)) << 16)
            | ((ty as u64) << 8)
            | nr as u64
    }
}

/// `_IOW(group, num, len)` in the scheme shared by the BSDs and Darwin.
pub const fn bsd_iow(group: u8, num: u8, len: usize) -> u64 {
    const IOC_IN: u64 = 0x8000_0000;
    const IOCPARM_MASK: u64 = 0x1fff;
    IOC_IN | (((len as u64) & IOCPARM_MASK) << 16) | ((group as u64) << 8) | num as u64
}
