//! Turning a logical request into a live interface.
//!
//! The sequence is the same on every OS, only the middle part differs:
//!
//! 1. Validate the request against the [`Platform`] profile, before the OS is involved. An
//!    overlong name fails with [`ProvisionError::NameTooLong`] here.
//! 2. Open the control device and, where the OS requires it, issue the configuration request
//!    with the flag word of the profile.
//! 3. Read back the name the OS assigned or confirmed. A name that differs from an explicitly
//!    requested one is never handed out.
//! 4. Wrap the descriptor into a [`VirtualInterfaceHandle`].
//!
//! Requesting an explicit name always asks for a new interface. On Linux this sets
//! [`InterfaceFlags::EXCLUSIVE`] so that an existing interface of that name results in
//! [`ProvisionError::NameConflict`] instead of silently attaching to it.
//!
//! No step is retried. All failures carry the reason reported by the OS.
use crate::error::ProvisionError;
use crate::handle::{Framing, VirtualInterfaceHandle};
use crate::mode::{InterfaceFlags, InterfaceMode};
use crate::platform::{DeviceNode, FlagWord, HeaderPolicy, Platform};
use crate::sys::Descriptor;

#[cfg(any(target_os = "linux", target_os = "android"))]
#[path = "linux.rs"]
mod host;

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"))]
#[path = "bsd.rs"]
mod host;

#[cfg(any(target_os = "macos", target_os = "ios"))]
#[path = "darwin.rs"]
mod host;

#[cfg(test)]
mod tests;

/// Builder of a provisioning request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provisioner {
    name: Option<String>,
    mode: InterfaceMode,
    flags: InterfaceFlags,
}

/// A validated request, ready for the OS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Request {
    /// The requested name, `None` for automatic naming.
    pub(crate) name: Option<String>,
    pub(crate) mode: InterfaceMode,
    /// The flags as requested plus those implied by the request.
    pub(crate) flags: InterfaceFlags,
    pub(crate) word: FlagWord,
    pub(crate) node: DeviceNode,
    pub(crate) framing: Framing,
}

/// Create an interface on this host.
///
/// An empty or missing `requested_name` lets the OS choose one. See [`Provisioner`] for the
/// same operation as a builder.
pub fn create(
    requested_name: Option<&str>,
    mode: InterfaceMode,
    flags: InterfaceFlags,
) -> Result<VirtualInterfaceHandle, ProvisionError> {
    let mut provisioner = Provisioner::new(mode).flags(flags);
    provisioner.name = requested_name.map(str::to_owned);
    provisioner.create()
}

impl Provisioner {
    /// Start a request for an interface of the given mode.
    ///
    /// By default the OS chooses the name and frames keep their packet information header.
    pub fn new(mode: InterfaceMode) -> Self {
        Provisioner {
            name: None,
            mode,
            flags: InterfaceFlags::empty(),
        }
    }

    /// Request a specific name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the flags of the interface.
    pub fn flags(mut self, flags: InterfaceFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Create the interface.
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "macos",
        target_os = "ios"))]
    pub fn create(&self) -> Result<VirtualInterfaceHandle, ProvisionError> {
        type P = crate::platform::Host;

        let request = self.validate::<P>()?;
        net_debug!("provisioning {} interface {:?} on {}", request.mode, request.name, P::NAME);

        let (lower, reported) = host::attach(&request).map_err(|err| {
            net_warn!("provisioning {:?} failed: {}", request.name, err);
            err
        })?;

        let name = confirm_name::<P>(request.name.as_deref(), reported)?;
        let handle = finish(lower, name, &request)?;

        net_info!("created {} interface {} ({:?})", handle.mode(), handle.name(), handle.flags());
        Ok(handle)
    }

    /// Check the request against a profile.
    pub(crate) fn validate<P: Platform>(&self) -> Result<Request, ProvisionError> {
        let name = match self.name.as_deref() {
            None | Some("") => None,
            Some(name) => Some(name),
        };

        if !P::supports(self.mode) {
            return Err(ProvisionError::unsupported(P::NAME, format!("{} mode", self.mode)));
        }

        let node = P::device_node(self.mode);
        let mut flags = self.flags;

        if let Some(name) = name {
            validate_name::<P>(name, node)?;
            flags |= InterfaceFlags::EXCLUSIVE;
        }

        let framing = match P::header_policy(self.mode) {
            HeaderPolicy::Never if flags.keeps_packet_info() => {
                return Err(ProvisionError::unsupported(
                    P::NAME,
                    format!("packet information header in {} mode", self.mode)));
            },
            HeaderPolicy::Always if !flags.keeps_packet_info() => {
                Framing::StripFamily(P::address_families())
            },
            _ => Framing::Passthrough,
        };

        Ok(Request {
            name: name.map(str::to_owned),
            mode: self.mode,
            flags,
            word: P::resolve(self.mode, flags),
            node,
            framing,
        })
    }
}

fn validate_name<P: Platform>(name: &str, node: DeviceNode) -> Result<(), ProvisionError> {
    if name.len() > P::NAME_LIMIT - 1 {
        return Err(ProvisionError::NameTooLong {
            name: name.to_owned(),
            limit: P::NAME_LIMIT - 1,
        });
    }

    let invalid = name == "."
        || name == ".."
        || name.chars().any(|c| c == '/' || c == ':' || c == '\0' || c.is_whitespace());

    let unnamed_unit = match node {
        DeviceNode::Clone(_) => false,
        _ => node.unit_of(name).is_none(),
    };

    if invalid || unnamed_unit {
        return Err(ProvisionError::InvalidName { name: name.to_owned() });
    }

    Ok(())
}

/// Whether the kernel substitutes a unit number into the name.
fn is_template(name: &str) -> bool {
    name.contains('%')
}

/// Check the name reported by the OS after attaching.
pub(crate) fn confirm_name<P: Platform>(
    requested: Option<&str>,
    reported: Vec<u8>,
) -> Result<String, ProvisionError> {
    let reported = String::from_utf8(reported).map_err(|_| ProvisionError::ConfigurationRejected {
        reason: "interface name reported by the OS is not UTF-8".into(),
        errno: None,
    })?;

    if reported.is_empty() {
        return Err(ProvisionError::ConfigurationRejected {
            reason: "OS reported an empty interface name".into(),
            errno: None,
        });
    }

    if reported.len() > P::NAME_LIMIT - 1 {
        return Err(ProvisionError::NameTooLong { name: reported, limit: P::NAME_LIMIT - 1 });
    }

    match requested {
        Some(requested) if !is_template(requested) && requested != reported => {
            net_warn!("requested interface {:?} but the OS reported {:?}", requested, reported);
            Err(ProvisionError::NameTooLong {
                name: requested.to_owned(),
                limit: P::NAME_LIMIT - 1,
            })
        },
        _ => Ok(reported),
    }
}

#[cfg_attr(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "macos",
    target_os = "ios")), allow(dead_code))]
fn finish(
    lower: Descriptor,
    name: String,
    request: &Request,
) -> Result<VirtualInterfaceHandle, ProvisionError> {
    VirtualInterfaceHandle::new(lower, name, request.mode, request.flags, request.framing)
        .map_err(|err| {
            let errno = err.0;
            ProvisionError::ConfigurationRejected {
                reason: std::io::Error::from(err).to_string(),
                errno: Some(errno),
            }
        })
}
