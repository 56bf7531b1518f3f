//! FD.io VPP backend.
//!
//! Drives VPP through `vppctl` and the host side of tap interfaces through
//! `ip`. Container routing borrows addressing from a loopback interface
//! (IP-unnumbered), so no per-port address allocation is needed.

pub mod parse;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SwitchError};
use crate::exec::{collapse_output, render_command, CommandRunner, SystemRunner};
use crate::traits::VhostSwitch;
use crate::types::{MacAddress, SocketPath, VhostMode};

/// Default loopback interface that vhost-user ports borrow their address from.
pub const DEFAULT_LOOPBACK: &str = "loop0";

/// VPP backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VppSettings {
    /// vppctl binary
    pub vppctl: String,
    /// Loopback interface used for IP-unnumbered ports
    pub loopback: String,
    /// iproute2 binary for host-side tap configuration
    pub ip: String,
}

impl Default for VppSettings {
    fn default() -> Self {
        Self {
            vppctl: "vppctl".to_string(),
            loopback: DEFAULT_LOOPBACK.to_string(),
            ip: "ip".to_string(),
        }
    }
}

/// VPP vhost-user port manager.
pub struct VppSwitch<R = SystemRunner> {
    settings: VppSettings,
    runner: R,
}

impl VppSwitch<SystemRunner> {
    /// Create a VPP backend that runs commands on this host.
    pub fn new(settings: VppSettings) -> Self {
        Self::with_runner(settings, SystemRunner::new())
    }
}

impl<R: CommandRunner> VppSwitch<R> {
    /// Create a VPP backend with a custom command runner.
    pub fn with_runner(settings: VppSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn settings(&self) -> &VppSettings {
        &self.settings
    }

    fn vppctl(&self, args: &[&str]) -> Result<String> {
        self.runner.exec(&self.settings.vppctl, args)
    }

    fn ip(&self, args: &[&str]) -> Result<String> {
        self.runner.exec(&self.settings.ip, args)
    }

    /// Bring a tap device up and route the container address through it.
    fn configure_host_tap(&self, tap: &str, host_route: &str) -> Result<()> {
        // COMMAND: ip link set <tap> up
        self.ip(&["link", "set", tap, "up"])?;
        // COMMAND: ip route add <ip>/32 dev <tap>
        self.ip(&["route", "add", host_route, "dev", tap])?;
        Ok(())
    }
}

impl<R: CommandRunner> VhostSwitch for VppSwitch<R> {
    fn name(&self) -> &'static str {
        "vpp"
    }

    #[instrument(skip(self, socket), fields(socket = %socket))]
    fn create_port(&self, socket: &SocketPath, mode: VhostMode) -> Result<String> {
        let path = socket.path();
        let path = path.to_string_lossy();

        // COMMAND: vppctl create vhost socket <path> [server]
        let mut args = vec!["create", "vhost", "socket", &*path];
        if mode == VhostMode::Server {
            args.push("server");
        }
        let interface = collapse_output(&self.vppctl(&args)?);

        if interface.is_empty() {
            return Err(SwitchError::EmptyResponse {
                command: render_command(&self.settings.vppctl, &args),
            });
        }

        // COMMAND: vppctl set interface state <interface> up
        self.vppctl(&["set", "interface", "state", &interface, "up"])?;

        info!(interface = %interface, mode = ?mode, "Vhost-user interface created");

        Ok(interface)
    }

    #[instrument(skip(self))]
    fn delete_port(&self, port: &str) -> Result<String> {
        // COMMAND: vppctl delete vhost-user <port>
        let output = self.vppctl(&["delete", "vhost-user", port])?;

        info!(interface = %port, "Vhost-user interface deleted");

        Ok(collapse_output(&output))
    }

    #[instrument(skip(self))]
    fn get_port_mac(&self, port: &str) -> Result<Option<MacAddress>> {
        // COMMAND: vppctl show hardware <port>
        let output = self.vppctl(&["show", "hardware", port])?;
        let mac = parse::find_hardware_mac(&output);

        debug!(interface = %port, mac = ?mac.map(|m| m.to_string()), "Port MAC lookup");

        Ok(mac)
    }

    #[instrument(skip(self))]
    fn configure_route(
        &self,
        port: &str,
        container_ip: &str,
        container_mac: &str,
    ) -> Result<Option<String>> {
        let host_route = format!("{}/32", container_ip);

        // COMMAND: vppctl set int unnum <port> use <loopback>
        self.vppctl(&["set", "int", "unnum", port, "use", &self.settings.loopback])?;

        // COMMAND: vppctl ip route add <ip>/32 via <port>
        self.vppctl(&["ip", "route", "add", &host_route, "via", port])?;

        // COMMAND: vppctl set ip arp <port> <ip> <mac>
        self.vppctl(&["set", "ip", "arp", port, container_ip, container_mac])?;

        // COMMAND: vppctl show tap
        let taps = self.vppctl(&["show", "tap"])?;
        let tap = match parse::find_tap_device(&taps, port) {
            Some(tap) => tap,
            None => {
                warn!(interface = %port, "No tap device found for interface");
                return Ok(None);
            }
        };

        self.configure_host_tap(&tap, &host_route)?;

        info!(
            interface = %port,
            tap = %tap,
            container_ip = %container_ip,
            "Container route configured"
        );

        Ok(Some(tap))
    }
}
