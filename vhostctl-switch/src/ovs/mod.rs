//! Open vSwitch (OVS-DPDK) backend.
//!
//! This module handles:
//! - Adding/removing DPDK vhost-user ports on the switch bridge
//! - Moving server-mode sockets out of the OVS runtime directory
//! - Reading port MAC addresses from `ovs-ofctl show`
//! - Bridge lifecycle (netdev datapath bridges with a NORMAL flow)

pub mod parse;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::error::{Result, SwitchError};
use crate::exec::{collapse_output, CommandRunner, SystemRunner};
use crate::traits::VhostSwitch;
use crate::types::{MacAddress, SocketPath, VhostMode};

/// Default bridge vhost-user ports are attached to.
pub const DEFAULT_BRIDGE: &str = "br0";

/// Directory where OVS creates server-mode vhost-user sockets.
pub const DEFAULT_RUNTIME_DIR: &str = "/usr/local/var/run/openvswitch";

/// Environment variable that overrides [`DEFAULT_RUNTIME_DIR`].
pub const RUNTIME_DIR_ENV: &str = "OVS_SOCKDIR";

/// OVS backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvsSettings {
    /// Bridge ports are added to
    pub bridge: String,
    /// Directory OVS creates server sockets in
    pub runtime_dir: PathBuf,
    /// ovs-vsctl binary
    pub vsctl: String,
    /// ovs-ofctl binary
    pub ofctl: String,
}

impl Default for OvsSettings {
    fn default() -> Self {
        Self {
            bridge: DEFAULT_BRIDGE.to_string(),
            runtime_dir: PathBuf::from(DEFAULT_RUNTIME_DIR),
            vsctl: "ovs-vsctl".to_string(),
            ofctl: "ovs-ofctl".to_string(),
        }
    }
}

/// OVS vhost-user port manager.
pub struct OvsSwitch<R = SystemRunner> {
    settings: OvsSettings,
    runner: R,
}

impl OvsSwitch<SystemRunner> {
    /// Create an OVS backend that runs commands on this host.
    pub fn new(settings: OvsSettings) -> Self {
        Self::with_runner(settings, SystemRunner::new())
    }
}

impl<R: CommandRunner> OvsSwitch<R> {
    /// Create an OVS backend with a custom command runner.
    pub fn with_runner(settings: OvsSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &OvsSettings {
        &self.settings
    }

    fn vsctl(&self, args: &[&str]) -> Result<String> {
        self.runner.exec(&self.settings.vsctl, args)
    }

    fn ofctl(&self, args: &[&str]) -> Result<String> {
        self.runner.exec(&self.settings.ofctl, args)
    }

    /// Move a server socket from the OVS runtime directory next to the caller's path.
    fn relocate_socket(&self, socket: &SocketPath) -> Result<()> {
        let from = self.settings.runtime_dir.join(socket.file_name());
        let to = socket.path();

        debug!(from = %from.display(), to = %to.display(), "Moving vhost-user socket");

        std::fs::rename(&from, &to).map_err(|source| SwitchError::SocketRelocation {
            from,
            to,
            source,
        })
    }
}

impl<R: CommandRunner> VhostSwitch for OvsSwitch<R> {
    fn name(&self) -> &'static str {
        "ovs"
    }

    #[instrument(skip(self, socket), fields(socket = %socket, bridge = %self.settings.bridge))]
    fn create_port(&self, socket: &SocketPath, mode: VhostMode) -> Result<String> {
        let name = socket.file_name();

        // COMMAND: ovs-vsctl add-port <bridge> <name> -- set Interface <name> type=<type> [options]
        let (if_type, server_path) = match mode {
            VhostMode::Server => ("type=dpdkvhostuser", None),
            VhostMode::Client => (
                "type=dpdkvhostuserclient",
                Some(format!("options:vhost-server-path={}", socket.path().display())),
            ),
        };

        let mut args = vec![
            "add-port",
            self.settings.bridge.as_str(),
            name,
            "--",
            "set",
            "Interface",
            name,
            if_type,
        ];
        if let Some(server_path) = server_path.as_deref() {
            args.push(server_path);
        }
        self.vsctl(&args)?;

        if mode == VhostMode::Server {
            self.relocate_socket(socket)?;
        }

        info!(port = %name, mode = ?mode, "Vhost-user port created");

        Ok(name.to_string())
    }

    #[instrument(skip(self), fields(bridge = %self.settings.bridge))]
    fn delete_port(&self, port: &str) -> Result<String> {
        // COMMAND: ovs-vsctl --if-exists del-port <bridge> <port>
        let output = self.vsctl(&["--if-exists", "del-port", &self.settings.bridge, port])?;

        info!(port = %port, "Vhost-user port deleted");

        Ok(collapse_output(&output))
    }

    #[instrument(skip(self), fields(bridge = %self.settings.bridge))]
    fn get_port_mac(&self, port: &str) -> Result<Option<MacAddress>> {
        // COMMAND: ovs-ofctl show <bridge>
        let output = self.ofctl(&["show", &self.settings.bridge])?;
        let mac = parse::find_port_mac(&output, port);

        debug!(port = %port, mac = ?mac.map(|m| m.to_string()), "Port MAC lookup");

        Ok(mac)
    }

    fn configure_route(
        &self,
        _port: &str,
        _container_ip: &str,
        _container_mac: &str,
    ) -> Result<Option<String>> {
        Err(self.unsupported("configure_route"))
    }

    #[instrument(skip(self))]
    fn create_bridge(&self, bridge: &str) -> Result<()> {
        // COMMAND: ovs-vsctl add-br <bridge> -- set bridge <bridge> datapath_type=netdev
        self.vsctl(&["add-br", bridge, "--", "set", "bridge", bridge, "datapath_type=netdev"])?;
        info!(bridge = %bridge, "Bridge created");
        Ok(())
    }

    #[instrument(skip(self))]
    fn configure_l2_bridge(&self, bridge: &str) -> Result<()> {
        // COMMAND: ovs-ofctl add-flow <bridge> actions=NORMAL
        self.ofctl(&["add-flow", bridge, "actions=NORMAL"])?;
        info!(bridge = %bridge, "NORMAL flow installed");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_bridge(&self, bridge: &str) -> Result<()> {
        // COMMAND: ovs-vsctl del-br <bridge>
        self.vsctl(&["del-br", bridge])?;
        info!(bridge = %bridge, "Bridge deleted");
        Ok(())
    }

    fn bridge_exists(&self, bridge: &str) -> Result<bool> {
        // COMMAND: ovs-vsctl --bare --columns=name find bridge name=<bridge>
        let filter = format!("name={}", bridge);
        let output = self.vsctl(&["--bare", "--columns=name", "find", "bridge", &filter])?;
        Ok(parse::has_records(&output))
    }

    fn bridge_has_ports(&self, bridge: &str) -> Result<bool> {
        // COMMAND: ovs-vsctl list-ports <bridge>
        let output = self.vsctl(&["list-ports", bridge])?;
        Ok(parse::has_records(&output))
    }
}
