use super::Request;
use crate::error::ProvisionError;
use crate::platform::{ControlCommand, DeviceNode, Host, Platform};
use crate::sys::{ifreq, Descriptor};
use crate::sys::linux::TunSetIf;

/// Open the cloning node and attach it to a new interface with `TUNSETIFF`.
pub(super) fn attach(request: &Request) -> Result<(Descriptor, Vec<u8>), ProvisionError> {
    let path = match request.node {
        DeviceNode::Clone(path) => path,
        other => return Err(ProvisionError::unsupported(Host::NAME, format!("{:?}", other))),
    };

    let lower = Descriptor::open(path)
        .map_err(|err| ProvisionError::unavailable(path, err.into()))?;
    net_debug!("opened {}", path);

    let cmd = match Host::control_command() {
        ControlCommand::SetInterface(cmd) => cmd,
        other => return Err(ProvisionError::unsupported(Host::NAME, format!("{:?}", other))),
    };

    let mut ifreq = ifreq::new(request.name.as_deref().unwrap_or(""));
    ifreq.tun_set_if(&lower, cmd, request.word)
        .map_err(|err| ProvisionError::rejected(path, request.name.as_deref(), err.into()))?;
    net_debug!("TUNSETIFF {:#06x} accepted", request.word.bits());

    Ok((lower, ifreq.name_bytes()))
}
