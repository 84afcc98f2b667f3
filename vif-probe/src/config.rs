use structopt::StructOpt;

use vif::{InterfaceFlags, InterfaceMode, Provisioner};

#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "vif-probe", about = "Provision a virtual interface and log its frames")]
pub struct Config {
    /// Name of the interface, chosen by the OS when omitted.
    pub name: Option<String>,

    /// Create an ethernet level (tap) interface instead of a tunnel.
    #[structopt(long)]
    pub tap: bool,

    /// Keep the packet information header on every frame.
    #[structopt(long)]
    pub keep_packet_info: bool,

    /// Send every received frame back unchanged.
    #[structopt(long)]
    pub echo: bool,

    /// Stop after this many frames.
    #[structopt(short = "n", long)]
    pub count: Option<usize>,

    /// Size of the receive buffer in bytes.
    #[structopt(short = "l", long, default_value = "65539")]
    pub buffer: usize,
}

impl Config {
    pub fn from_args() -> Self {
        StructOpt::from_args()
    }

    pub fn mode(&self) -> InterfaceMode {
        if self.tap {
            InterfaceMode::Tap
        } else {
            InterfaceMode::Tunnel
        }
    }

    pub fn flags(&self) -> InterfaceFlags {
        if self.keep_packet_info {
            InterfaceFlags::empty()
        } else {
            InterfaceFlags::STRIP_PACKET_INFO
        }
    }

    pub fn provisioner(&self) -> Provisioner {
        let provisioner = Provisioner::new(self.mode()).flags(self.flags());
        match &self.name {
            Some(name) => provisioner.name(name.as_str()),
            None => provisioner,
        }
    }
}
