//! Switch backend trait definition.

use crate::error::{Result, SwitchError};
use crate::types::{MacAddress, SocketPath, VhostMode};

/// Switch backend trait - implemented by each supported virtual switch.
///
/// Every operation is a short sequence of blocking calls to the switch's
/// management CLI. Nothing is cached between calls; the switch is the only
/// source of truth.
pub trait VhostSwitch {
    /// Short backend name used in logs and errors ("ovs", "vpp").
    fn name(&self) -> &'static str;

    // =========================================================================
    // Vhost-user ports
    // =========================================================================

    /// Create a vhost-user port for `socket`.
    ///
    /// Returns the port identifier the switch assigned.
    fn create_port(&self, socket: &SocketPath, mode: VhostMode) -> Result<String>;

    /// Delete a vhost-user port.
    ///
    /// Returns whatever the switch printed, which is empty on success.
    fn delete_port(&self, port: &str) -> Result<String>;

    /// Look up the MAC address of a port.
    ///
    /// Returns `Ok(None)` if the switch output has no entry for the port.
    fn get_port_mac(&self, port: &str) -> Result<Option<MacAddress>>;

    /// Route traffic for a container through a port.
    ///
    /// Returns the host-side tap device that was configured, if any.
    fn configure_route(
        &self,
        port: &str,
        container_ip: &str,
        container_mac: &str,
    ) -> Result<Option<String>>;

    // =========================================================================
    // Bridges
    // =========================================================================

    /// Create a bridge.
    fn create_bridge(&self, bridge: &str) -> Result<()> {
        let _ = bridge;
        Err(self.unsupported("create_bridge"))
    }

    /// Install a NORMAL (L2 learning) flow on a bridge.
    fn configure_l2_bridge(&self, bridge: &str) -> Result<()> {
        let _ = bridge;
        Err(self.unsupported("configure_l2_bridge"))
    }

    /// Delete a bridge.
    fn delete_bridge(&self, bridge: &str) -> Result<()> {
        let _ = bridge;
        Err(self.unsupported("delete_bridge"))
    }

    /// Check whether a bridge exists.
    fn bridge_exists(&self, bridge: &str) -> Result<bool> {
        let _ = bridge;
        Err(self.unsupported("bridge_exists"))
    }

    /// Check whether a bridge has any ports attached.
    fn bridge_has_ports(&self, bridge: &str) -> Result<bool> {
        let _ = bridge;
        Err(self.unsupported("bridge_has_ports"))
    }

    /// Build the error returned for operations this backend does not offer.
    fn unsupported(&self, operation: &'static str) -> SwitchError {
        SwitchError::Unsupported {
            backend: self.name(),
            operation,
        }
    }
}
