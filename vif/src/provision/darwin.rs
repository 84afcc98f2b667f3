use std::io;

use super::Request;
use crate::error::ProvisionError;
use crate::platform::{Darwin, DeviceNode, Host, Platform};
use crate::sys::{darwin, Descriptor};

/// Connect to the `utun` kernel control, the unit selects the interface.
pub(super) fn attach(request: &Request) -> Result<(Descriptor, Vec<u8>), ProvisionError> {
    let control = match request.node {
        DeviceNode::ControlSocket { control, .. } => control,
        other => return Err(ProvisionError::unsupported(Host::NAME, format!("{:?}", other))),
    };

    // Unit 0 picks the next free interface, `utun{n}` is unit `n + 1`.
    let unit = match request.name.as_deref() {
        None => 0,
        Some(name) => request.node.unit_of(name)
            .and_then(|unit| unit.checked_add(1))
            .ok_or_else(|| ProvisionError::InvalidName { name: name.to_owned() })?,
    };

    let lower = darwin::connect_control(control, unit).map_err(|err| {
        let err = io::Error::from(err);
        match err.raw_os_error() {
            Some(libc::ENOENT) | Some(libc::EACCES) | Some(libc::EPERM) => {
                ProvisionError::unavailable(control, err)
            },
            _ => ProvisionError::rejected(control, request.name.as_deref(), err),
        }
    })?;
    net_debug!("connected to {} unit {}", control, unit);

    let name = darwin::control_ifname(&lower, Darwin::UTUN_OPT_IFNAME)
        .map_err(|err| ProvisionError::rejected(control, None, err.into()))?;

    Ok((lower, name))
}
