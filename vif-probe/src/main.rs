//! Logs all frames arriving on a freshly provisioned interface.
//!
//! Creates a tunnel (or with `--tap` an ethernet level) interface and prints a short summary of
//! every frame. The interface needs to be configured and brought up by other means, for example:
//!
//! * `vif-probe probe0 &`
//! * `ip addr add 10.0.0.1/24 dev probe0 && ip link set probe0 up`
//!
//! Logging is controlled with `RUST_LOG`, the default level is `info`.
use std::process;

use log::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use vif::{IoError, VirtualInterfaceHandle};

mod config;

/// Bytes of each frame shown in the summary.
const SUMMARY: usize = 32;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = config::Config::from_args();
    debug!("{:?}", config);

    let handle = config.provisioner().create().unwrap_or_else(|err| {
        error!("Couldn't create interface: {}", err);
        if err.is_recoverable() {
            error!("Retry with CAP_NET_ADMIN or as root");
        }
        process::exit(1);
    });

    info!("[+] Listening on {} ({} mode)", handle.name(), handle.mode());

    if let Err(err) = probe(&handle, &config) {
        error!("Error during receive: {}", err);
        process::exit(1);
    }

    info!("[+] Done");
}

fn probe(handle: &VirtualInterfaceHandle, config: &config::Config) -> Result<(), IoError> {
    let mut buffer = vec![0; config.buffer];
    let mut seen = 0;

    while config.count.map_or(true, |count| seen < count) {
        let len = handle.receive_into(&mut buffer)?;
        let frame = &buffer[..len];
        seen += 1;

        info!("#{} {} bytes: {}", seen, len, summary(frame));

        if config.echo {
            match handle.send(frame) {
                Ok(()) => {},
                // A frame the interface would not take back is not fatal.
                Err(IoError::Other(err)) => warn!("Echo of #{} failed: {}", seen, err),
                Err(err) => return Err(err),
            }
        }
    }

    Ok(())
}

fn summary(frame: &[u8]) -> String {
    let mut line = frame.iter()
        .take(SUMMARY)
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ");
    if frame.len() > SUMMARY {
        line.push_str(" ..");
    }
    line
}
