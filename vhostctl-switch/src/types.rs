//! Types shared by the switch backends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SwitchError;

// =============================================================================
// BACKEND SELECTION
// =============================================================================

/// Switch backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Open vSwitch with DPDK (ovs-vsctl / ovs-ofctl)
    #[default]
    Ovs,
    /// FD.io VPP (vppctl)
    Vpp,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Ovs => "ovs",
            BackendKind::Vpp => "vpp",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ovs" | "openvswitch" => Ok(BackendKind::Ovs),
            "vpp" => Ok(BackendKind::Vpp),
            other => Err(format!("unknown backend '{}' (expected ovs or vpp)", other)),
        }
    }
}

// =============================================================================
// VHOST-USER SOCKETS
// =============================================================================

/// Which side of the vhost-user socket the switch plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VhostMode {
    /// Switch creates and listens on the socket
    #[default]
    Server,
    /// Switch connects to a socket created by the workload
    Client,
}

/// A vhost-user control socket path, split into directory and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPath {
    dir: PathBuf,
    file_name: String,
}

impl SocketPath {
    /// Split `path` into directory and file name.
    ///
    /// A bare file name lives in the current directory.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self, SwitchError> {
        let path = path.as_ref();
        let invalid = || SwitchError::InvalidSocketPath(path.display().to_string());

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(invalid)?
            .to_string();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { dir, file_name })
    }

    /// Directory holding the socket.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Socket file name; OVS also uses it as the interface name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the socket.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl fmt::Display for SocketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

// =============================================================================
// MAC ADDRESSES
// =============================================================================

/// An Ethernet MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Generate a random MAC with the locally administered bit set and the
    /// multicast bit cleared.
    pub fn random() -> Self {
        let mut bytes: [u8; 6] = rand::random();
        bytes[0] = (bytes[0] | 0x02) & 0xfe;
        Self(bytes)
    }

    pub fn is_unicast(&self) -> bool {
        self.0[0] & 0x01 == 0
    }

    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl FromStr for MacAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');

        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| format!("invalid MAC address: {}", s))?;
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("invalid MAC address: {}", s));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| format!("invalid MAC address: {}", s))?;
        }

        if parts.next().is_some() {
            return Err(format!("invalid MAC address: {}", s));
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}
