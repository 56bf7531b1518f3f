//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use vhostctl_switch::BackendKind;

/// vhostctl - vhost-user port management for OVS-DPDK and VPP
#[derive(Parser, Debug)]
#[command(name = "vhostctl")]
#[command(about = "vhost-user port management for OVS-DPDK and VPP")]
#[command(version)]
pub struct Args {
    /// Path to configuration file (optional, defaults used if not found)
    #[arg(short, long, env = "VHOSTCTL_CONFIG")]
    pub config: Option<String>,

    /// Switch backend (ovs, vpp)
    #[arg(short, long, env = "VHOSTCTL_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VHOSTCTL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// OVS bridge vhost-user ports are attached to
    #[arg(long)]
    pub bridge: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create a vhost-user port and print its name
    Create {
        /// Path of the vhost-user socket
        socket_path: String,

        /// Let the switch connect to a socket owned by the workload
        #[arg(long)]
        client: bool,
    },

    /// Delete a vhost-user port
    Delete {
        /// Port name returned by create
        port: String,
    },

    /// Print the MAC address of a port
    Getmac {
        /// Port name returned by create
        port: String,
    },

    /// Route a container's address through a port
    Config {
        /// Port name returned by create
        port: String,
        /// Container IPv4 address
        container_ip: String,
        /// Container MAC address
        container_mac: String,
    },

    /// Manage switch bridges
    Bridge {
        #[command(subcommand)]
        action: BridgeAction,
    },

    /// Print a random locally administered MAC address
    Genmac,

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

/// Bridge operations. The bridge defaults to the configured one.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum BridgeAction {
    /// Create a netdev bridge
    Add { bridge: Option<String> },
    /// Delete a bridge
    Del { bridge: Option<String> },
    /// Install a NORMAL flow so the bridge switches like an L2 learning bridge
    L2 { bridge: Option<String> },
    /// Print whether the bridge exists
    Exists { bridge: Option<String> },
    /// Print whether the bridge has any ports
    HasPorts { bridge: Option<String> },
}

impl BridgeAction {
    pub fn bridge(&self) -> Option<&str> {
        match self {
            BridgeAction::Add { bridge }
            | BridgeAction::Del { bridge }
            | BridgeAction::L2 { bridge }
            | BridgeAction::Exists { bridge }
            | BridgeAction::HasPorts { bridge } => bridge.as_deref(),
        }
    }
}
