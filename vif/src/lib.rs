//! Provisioning of TUN/TAP virtual network interfaces.
//!
//! ## Table of contents
//!
//! 1. [Overview](#overview)
//! 2. [Platforms](platform/index.html)
//! 3. [Creating an interface](provision/index.html)
//! 4. [Moving frames](handle/index.html)
//! 5. [Packet information headers](packet_info/index.html)
//!
//! ## Overview
//!
//! Every supported kernel offers a virtual network interface that hands frames to a user space
//! process instead of a wire. They all differ in the details: the device node to open, the number
//! of the `ioctl` that configures it, the bit layout of its flags and whether frames are prefixed
//! by a small header. Getting any of these wrong does not fail loudly, the interface simply
//! behaves differently than requested.
//!
//! This crate keeps all of those details in one table per operating system, the
//! [`platform`](platform/index.html) module, and builds a single provisioning sequence on top of
//! it. The result of a successful provisioning is a [`VirtualInterfaceHandle`] which owns the
//! descriptor and the confirmed interface name.
//!
//! ```no_run
//! use vif::{InterfaceFlags, InterfaceMode, Provisioner};
//!
//! let handle = Provisioner::new(InterfaceMode::Tunnel)
//!     .name("tun-test0")
//!     .flags(InterfaceFlags::STRIP_PACKET_INFO)
//!     .create()
//!     .expect("Couldn't create interface");
//!
//! let frame = handle.receive().expect("Couldn't receive");
//! println!("{} bytes on {}", frame.len(), handle.name());
//! ```
//!
//! Nothing here assigns addresses, touches routes or looks into the frames. The interface name is
//! all that collaborating code needs for that.
#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use] mod macros;

pub mod error;
pub mod handle;
pub mod mode;
pub mod packet_info;
pub mod platform;
pub mod provision;

mod sys;

pub use self::error::{IoError, ProvisionError, Unavailable};
pub use self::handle::VirtualInterfaceHandle;
pub use self::mode::{InterfaceFlags, InterfaceMode};
pub use self::provision::{create, Provisioner};
