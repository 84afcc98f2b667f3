use super::Request;
use crate::error::ProvisionError;
use crate::mode::InterfaceMode;
use crate::platform::{ControlCommand, DeviceNode, Host, Platform};
use crate::sys::Descriptor;
use crate::sys::bsd::TunSetHead;

/// Open a unit node, the node itself decides between tun and tap.
pub(super) fn attach(request: &Request) -> Result<(Descriptor, Vec<u8>), ProvisionError> {
    let units = match request.node {
        DeviceNode::Numbered { units, .. } => units,
        other => return Err(ProvisionError::unsupported(Host::NAME, format!("{:?}", other))),
    };

    let (lower, path) = match request.name.as_deref() {
        Some(name) => open_named(request.node, name)?,
        None => open_free(request.node, units)?,
    };
    net_debug!("opened {}", path);

    if request.mode == InterfaceMode::Tunnel {
        if let ControlCommand::SetHeader(cmd) = Host::control_command() {
            lower.tun_set_head(cmd, request.word)
                .map_err(|err| ProvisionError::rejected(&path, None, err.into()))?;
        }
    }

    let name = path.rsplit('/').next().unwrap_or(&path).as_bytes().to_vec();
    Ok((lower, name))
}

fn open_named(node: DeviceNode, name: &str) -> Result<(Descriptor, String), ProvisionError> {
    let path = node.unit_of(name)
        .and_then(|unit| node.unit_path(unit))
        .ok_or_else(|| ProvisionError::InvalidName { name: name.to_owned() })?;

    match Descriptor::open(&path) {
        Ok(lower) => Ok((lower, path)),
        Err(err) if err.0 == libc::EBUSY => {
            Err(ProvisionError::NameConflict { name: name.to_owned() })
        },
        Err(err) => Err(ProvisionError::unavailable(&path, err.into())),
    }
}

fn open_free(node: DeviceNode, units: u32) -> Result<(Descriptor, String), ProvisionError> {
    for unit in 0..units {
        let path = match node.unit_path(unit) {
            Some(path) => path,
            None => break,
        };

        match Descriptor::open(&path) {
            Ok(lower) => return Ok((lower, path)),
            Err(err) if err.0 == libc::EBUSY => {
                net_trace!("{} is busy", path);
                continue
            },
            Err(err) => return Err(ProvisionError::unavailable(&path, err.into())),
        }
    }

    Err(ProvisionError::ConfigurationRejected {
        reason: format!("all {} units are busy", units),
        errno: Some(libc::EBUSY),
    })
}
