//! Parsers for `vppctl` text output.

use crate::types::MacAddress;

/// Whitespace token index of the MAC in `show hardware <port>` output.
///
/// ```text
///               Name                Idx   Link  Hardware
/// VirtualEthernet0/0/0               1    down  VirtualEthernet0/0/0
///   Ethernet address 02:fe:25:2f:bd:c9
/// ```
const HARDWARE_MAC_TOKEN: usize = 10;

/// Find the port MAC address in `vppctl show hardware <port>` output.
///
/// Reads the token at the fixed position of the known layout first, then
/// falls back to whatever follows `Ethernet address`.
pub fn find_hardware_mac(show_output: &str) -> Option<MacAddress> {
    let tokens: Vec<&str> = show_output.split_whitespace().collect();

    if let Some(mac) = tokens
        .get(HARDWARE_MAC_TOKEN)
        .and_then(|token| token.parse::<MacAddress>().ok())
    {
        return Some(mac);
    }

    tokens
        .windows(3)
        .find(|w| w[0] == "Ethernet" && w[1] == "address")
        .and_then(|w| w[2].parse().ok())
}

/// Find the kernel tap device bound to `port` in `vppctl show tap` output.
///
/// Only rows with exactly three columns are considered; the first column is
/// the VPP interface and the third the tap device.
pub fn find_tap_device(show_output: &str, port: &str) -> Option<String> {
    show_output.lines().find_map(|line| {
        let columns: Vec<&str> = line.split_whitespace().collect();
        match columns.as_slice() {
            [interface, _, tap] if *interface == port => Some(tap.to_string()),
            _ => None,
        }
    })
}
