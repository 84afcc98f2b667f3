//! Typed failures of provisioning and of frame I/O.
//!
//! Nothing in this crate retries. None of these conditions go away when the same request is
//! repeated with the same parameters, so every failure is handed to the immediate caller.
use std::io;

use thiserror::Error;

use crate::mode::InterfaceMode;

/// Why the control device could not be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unavailable {
    /// The device node does not exist or the driver is not loaded.
    Missing,
    /// The process lacks the privilege to open the node or to create interfaces.
    PermissionDenied,
    /// Any other failure of opening the node.
    Other,
}

/// Failure to create or attach a virtual interface.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The control device could not be opened or used.
    #[error("device {path} unavailable ({cause:?}): {source}")]
    DeviceUnavailable {
        /// The node (or control name) that was tried.
        path: String,
        /// Classification of the failure.
        cause: Unavailable,
        /// The error reported by the OS.
        #[source]
        source: io::Error,
    },

    /// An interface with the requested name exists and is in use.
    #[error("interface name {name:?} is already in use")]
    NameConflict {
        /// The requested name.
        name: String,
    },

    /// The requested name does not fit, or the OS shortened it.
    #[error("interface name {name:?} exceeds the limit of {limit} bytes")]
    NameTooLong {
        /// The requested name.
        name: String,
        /// Maximum number of bytes, excluding the terminator.
        limit: usize,
    },

    /// The requested name contains characters no interface name may contain.
    #[error("invalid interface name {name:?}")]
    InvalidName {
        /// The requested name.
        name: String,
    },

    /// The OS refused the configuration request.
    #[error("configuration rejected: {reason}")]
    ConfigurationRejected {
        /// The reason as reported by the OS.
        reason: String,
        /// The raw error number, if any.
        errno: Option<i32>,
    },

    /// The request can not be expressed on this platform.
    #[error("{what} is not supported on {platform}")]
    Unsupported {
        /// Name of the platform profile.
        platform: &'static str,
        /// What was requested.
        what: String,
    },
}

/// Failure of sending or receiving a frame.
#[derive(Debug, Error)]
pub enum IoError {
    /// The handle was closed, before or during the operation.
    #[error("interface handle is closed")]
    Closed,
    /// The descriptor is non-blocking and no frame is queued.
    #[error("operation would block")]
    WouldBlock,
    /// Any other failure reported by the OS.
    #[error(transparent)]
    Other(#[from] io::Error),
}

impl ProvisionError {
    /// Whether the caller can expect success after changing the environment.
    ///
    /// This is only the case for missing privilege: running elevated will help. All other
    /// failures need a different request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProvisionError::DeviceUnavailable { cause: Unavailable::PermissionDenied, .. })
    }

    pub(crate) fn unavailable(path: &str, err: io::Error) -> Self {
        let cause = match err.raw_os_error() {
            Some(libc::ENOENT) | Some(libc::ENXIO) | Some(libc::ENODEV) => Unavailable::Missing,
            Some(libc::EACCES) | Some(libc::EPERM) => Unavailable::PermissionDenied,
            _ => Unavailable::Other,
        };

        ProvisionError::DeviceUnavailable {
            path: path.to_owned(),
            cause,
            source: err,
        }
    }

    /// Classify a rejected configuration request.
    pub(crate) fn rejected(path: &str, name: Option<&str>, err: io::Error) -> Self {
        match (err.raw_os_error(), name) {
            (Some(libc::EBUSY), Some(name)) | (Some(libc::EEXIST), Some(name)) => {
                ProvisionError::NameConflict { name: name.to_owned() }
            },
            (Some(libc::EPERM), _) | (Some(libc::EACCES), _) => {
                ProvisionError::unavailable(path, err)
            },
            (errno, _) => ProvisionError::ConfigurationRejected {
                reason: err.to_string(),
                errno,
            },
        }
    }

    pub(crate) fn unsupported(platform: &'static str, what: impl Into<String>) -> Self {
        ProvisionError::Unsupported {
            platform,
            what: what.into(),
        }
    }
}

impl From<IoError> for io::Error {
    fn from(err: IoError) -> io::Error {
        match err {
            IoError::Closed => io::Error::new(io::ErrorKind::NotConnected, IoError::Closed),
            IoError::WouldBlock => io::ErrorKind::WouldBlock.into(),
            IoError::Other(err) => err,
        }
    }
}

impl IoError {
    pub(crate) fn from_os(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::WouldBlock {
            IoError::WouldBlock
        } else if err.raw_os_error() == Some(libc::EBADF) {
            IoError::Closed
        } else {
            IoError::Other(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(errno: i32) -> io::Error {
        io::Error::from_raw_os_error(errno)
    }

    #[test]
    fn open_failures() {
        let missing = ProvisionError::unavailable("/dev/net/tun", os(libc::ENOENT));
        assert!(matches!(missing, ProvisionError::DeviceUnavailable { cause: Unavailable::Missing, .. }));
        assert!(!missing.is_recoverable());

        let denied = ProvisionError::unavailable("/dev/net/tun", os(libc::EACCES));
        assert!(matches!(denied, ProvisionError::DeviceUnavailable { cause: Unavailable::PermissionDenied, .. }));
        assert!(denied.is_recoverable());

        let other = ProvisionError::unavailable("/dev/net/tun", os(libc::EMFILE));
        assert!(matches!(other, ProvisionError::DeviceUnavailable { cause: Unavailable::Other, .. }));
    }

    #[test]
    fn busy_name_conflicts() {
        let err = ProvisionError::rejected("/dev/net/tun", Some("tun0"), os(libc::EBUSY));
        match err {
            ProvisionError::NameConflict { name } => assert_eq!(name, "tun0"),
            other => panic!("Unexpected {:?}", other),
        }

        // Without a requested name there is nothing to conflict with.
        let err = ProvisionError::rejected("/dev/net/tun", None, os(libc::EBUSY));
        assert!(matches!(err, ProvisionError::ConfigurationRejected { errno: Some(libc::EBUSY), .. }));
    }

    #[test]
    fn rejection_keeps_os_reason() {
        let err = ProvisionError::rejected("/dev/net/tun", Some("tun0"), os(libc::EINVAL));
        match err {
            ProvisionError::ConfigurationRejected { reason, errno } => {
                assert_eq!(errno, Some(libc::EINVAL));
                assert_eq!(reason, os(libc::EINVAL).to_string());
            },
            other => panic!("Unexpected {:?}", other),
        }

        let err = ProvisionError::rejected("/dev/net/tun", Some("tun0"), os(libc::EPERM));
        assert!(err.is_recoverable());
    }

    #[test]
    fn io_classification() {
        assert!(matches!(IoError::from_os(os(libc::EAGAIN)), IoError::WouldBlock));
        assert!(matches!(IoError::from_os(os(libc::EBADF)), IoError::Closed));
        assert!(matches!(IoError::from_os(os(libc::EIO)), IoError::Other(_)));

        let err: io::Error = IoError::Closed.into();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }
}
