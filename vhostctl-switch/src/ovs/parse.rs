//! Parsers for `ovs-ofctl` / `ovs-vsctl` text output.

use crate::types::MacAddress;

/// Find the MAC address of `port` in `ovs-ofctl show <bridge>` output.
///
/// Port entries look like:
///
/// ```text
///  1(sock1): addr:aa:bb:cc:dd:ee:ff
///      config:     0
/// ```
///
/// The `LOCAL(br0)` entry is never matched since its port number is not numeric.
pub fn find_port_mac(show_output: &str, port: &str) -> Option<MacAddress> {
    show_output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let header = tokens.next()?;
        let addr = tokens.next()?;

        if port_name(header)? != port {
            return None;
        }

        let (_, mac) = addr.split_once(':')?;
        mac.parse().ok()
    })
}

/// Extract the port name from a `<number>(<name>):` header token.
fn port_name(header: &str) -> Option<&str> {
    let header = header.strip_suffix(':')?;
    let (number, rest) = header.split_once('(')?;

    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    rest.strip_suffix(')')
}

/// `ovs-vsctl` find/list queries print nothing when there is no match.
pub fn has_records(output: &str) -> bool {
    !output.trim().is_empty()
}
