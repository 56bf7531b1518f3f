//! # vhostctl Switch
//!
//! vhost-user port control for DPDK virtual switches.
//!
//! This crate provides one interface over two switch backends:
//! - **Open vSwitch** (OVS-DPDK) via `ovs-vsctl` / `ovs-ofctl`
//! - **VPP** via `vppctl`, with host-side tap routing via `ip`
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            VhostSwitch Trait            │
//! │  (create, delete, getmac, config, ...)  │
//! └─────────────────────┬───────────────────┘
//!                       │
//!         ┌─────────────┴─────────────┐
//!         ▼                           ▼
//! ┌───────────────────┐     ┌───────────────────┐
//! │     OvsSwitch     │     │     VppSwitch     │
//! │ (ovs-vsctl/ofctl) │     │  (vppctl + ip)    │
//! └─────────┬─────────┘     └─────────┬─────────┘
//!           └─────────────┬───────────┘
//!                         ▼
//!               ┌───────────────────┐
//!               │   CommandRunner   │
//!               │ (System / Mock)   │
//!               └───────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vhostctl_switch::{OvsSettings, OvsSwitch, SocketPath, VhostMode, VhostSwitch};
//!
//! let ovs = OvsSwitch::new(OvsSettings::default());
//! let socket = SocketPath::parse("/var/lib/cni/vhostuser/abc/abc-net1")?;
//!
//! let port = ovs.create_port(&socket, VhostMode::Server)?;
//! let mac = ovs.get_port_mac(&port)?;
//! ```

pub mod error;
pub mod exec;
pub mod mock;
pub mod ovs;
pub mod traits;
pub mod types;
pub mod vpp;

pub use error::{Result, SwitchError};
pub use exec::{CommandRunner, SystemRunner};
pub use mock::MockRunner;
pub use ovs::{OvsSettings, OvsSwitch};
pub use traits::VhostSwitch;
pub use types::{BackendKind, MacAddress, SocketPath, VhostMode};
pub use vpp::{VppSettings, VppSwitch};

/// Build the backend selected by `kind`, running commands on this host.
pub fn connect(kind: BackendKind, ovs: OvsSettings, vpp: VppSettings) -> Box<dyn VhostSwitch> {
    match kind {
        BackendKind::Ovs => Box::new(OvsSwitch::new(ovs)),
        BackendKind::Vpp => Box::new(VppSwitch::new(vpp)),
    }
}
