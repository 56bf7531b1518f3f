//! Integration tests for the switch backends.
//!
//! These tests drive both backends through a scripted runner fed with
//! recorded `ovs-ofctl` / `vppctl` output.

use std::fs;

use vhostctl_switch::{
    MockRunner, OvsSettings, OvsSwitch, SocketPath, SwitchError, VhostMode, VhostSwitch,
    VppSettings, VppSwitch,
};

const RPC_ERROR: &str = "rpc error: code = Unavailable desc = all SubConns are in TransientFailure\n";

const OFCTL_SHOW: &str = "\
OFPT_FEATURES_REPLY (xid=0x2): dpid:0000b2c4e2f2a04c
n_tables:254, n_buffers:0
 1(sock1): addr:9e:52:1f:40:7a:01
     config:     0
     state:      LINK_DOWN
 LOCAL(br0): addr:b2:c4:e2:f2:a0:4c
     config:     PORT_DOWN
";

const VPP_SHOW_HARDWARE: &str = "\
              Name                Idx   Link  Hardware
VirtualEthernet0/0/0               1    down  VirtualEthernet0/0/0
  Ethernet address 02:fe:25:2f:bd:c9
  vhost-user interface
";

const VPP_SHOW_TAP: &str = "VirtualEthernet0/0/0    1    tap0\n";

fn is_mac(text: &str) -> bool {
    let octets: Vec<&str> = text.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}

// =============================================================================
// OVS
// =============================================================================

/// Test OVS create moves the socket and returns the file name as the port.
#[test]
fn test_ovs_create_relocates_socket() {
    let runtime = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    fs::write(runtime.path().join("sock1"), b"").unwrap();

    let runner = MockRunner::new();
    let settings = OvsSettings {
        runtime_dir: runtime.path().to_path_buf(),
        ..OvsSettings::default()
    };
    let ovs = OvsSwitch::with_runner(settings, &runner);
    let socket = SocketPath::parse(target.path().join("sock1")).unwrap();

    let port = ovs.create_port(&socket, VhostMode::Server).unwrap();

    assert_eq!(port, "sock1");
    assert_eq!(
        runner.calls(),
        vec!["ovs-vsctl add-port br0 sock1 -- set Interface sock1 type=dpdkvhostuser"]
    );
    assert!(!runtime.path().join("sock1").exists());
    assert!(target.path().join("sock1").exists());
}

/// Test OVS delete uses if-exists semantics and returns empty output.
#[test]
fn test_ovs_delete_returns_empty_on_success() {
    let runner = MockRunner::new().reply("\n");
    let ovs = OvsSwitch::with_runner(OvsSettings::default(), &runner);

    assert_eq!(ovs.delete_port("sock1").unwrap(), "");
    assert_eq!(runner.calls(), vec!["ovs-vsctl --if-exists del-port br0 sock1"]);
}

/// Test deleting a port that was never created does not fault.
#[test]
fn test_delete_of_absent_port() {
    let runner = MockRunner::new().reply("").reply("");
    let ovs = OvsSwitch::with_runner(OvsSettings::default(), &runner);
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);

    assert!(ovs.delete_port("never-created").is_ok());
    assert!(vpp.delete_port("VirtualEthernet0/0/42").is_ok());
}

/// Test create followed by getmac yields a well-formed MAC.
#[test]
fn test_ovs_create_then_getmac() {
    let runner = MockRunner::new().reply("").reply(OFCTL_SHOW);
    let ovs = OvsSwitch::with_runner(OvsSettings::default(), &runner);
    let socket = SocketPath::parse("/run/vhost/sock1").unwrap();

    let port = ovs.create_port(&socket, VhostMode::Client).unwrap();
    let mac = ovs.get_port_mac(&port).unwrap().unwrap();

    assert!(is_mac(&mac.to_string()));
    assert_eq!(mac.to_string(), "9e:52:1f:40:7a:01");
    assert_eq!(runner.calls()[1], "ovs-ofctl show br0");
}

/// Test the bridge name comes from settings, not a literal.
#[test]
fn test_ovs_custom_bridge() {
    let runner = MockRunner::new();
    let settings = OvsSettings {
        bridge: "br-dpdk".to_string(),
        ..OvsSettings::default()
    };
    let ovs = OvsSwitch::with_runner(settings, &runner);

    ovs.delete_port("sock1").unwrap();
    ovs.get_port_mac("sock1").unwrap();

    assert_eq!(
        runner.calls(),
        vec![
            "ovs-vsctl --if-exists del-port br-dpdk sock1",
            "ovs-ofctl show br-dpdk",
        ]
    );
}

// =============================================================================
// VPP
// =============================================================================

/// Test the full VPP attach scenario: create, then config.
#[test]
fn test_vpp_create_and_config_scenario() {
    let runner = MockRunner::new()
        .reply("VirtualEthernet0/0/0\n")
        .reply("")
        .reply("")
        .reply("")
        .reply("")
        .reply(VPP_SHOW_TAP);
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);
    let socket = SocketPath::parse("/tmp/sock1").unwrap();

    let interface = vpp.create_port(&socket, VhostMode::Server).unwrap();
    assert_eq!(interface, "VirtualEthernet0/0/0");

    let tap = vpp
        .configure_route(&interface, "10.0.0.5", "aa:bb:cc:dd:ee:ff")
        .unwrap();
    assert_eq!(tap.as_deref(), Some("tap0"));

    assert_eq!(
        runner.calls(),
        vec![
            "vppctl create vhost socket /tmp/sock1 server",
            "vppctl set interface state VirtualEthernet0/0/0 up",
            "vppctl set int unnum VirtualEthernet0/0/0 use loop0",
            "vppctl ip route add 10.0.0.5/32 via VirtualEthernet0/0/0",
            "vppctl set ip arp VirtualEthernet0/0/0 10.0.0.5 aa:bb:cc:dd:ee:ff",
            "vppctl show tap",
            "ip link set tap0 up",
            "ip route add 10.0.0.5/32 dev tap0",
        ]
    );
}

/// Test config without a matching tap row stops after `show tap`.
#[test]
fn test_vpp_config_without_tap() {
    let runner = MockRunner::new()
        .reply("")
        .reply("")
        .reply("")
        .reply("VirtualEthernet0/0/9    3    tap9\n");
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);

    let tap = vpp
        .configure_route("VirtualEthernet0/0/0", "10.0.0.5", "aa:bb:cc:dd:ee:ff")
        .unwrap();

    assert!(tap.is_none());
    assert_eq!(runner.calls().len(), 4);
    assert_eq!(runner.calls()[3], "vppctl show tap");
}

/// Test VPP getmac reads the hardware listing.
#[test]
fn test_vpp_getmac() {
    let runner = MockRunner::new().reply(VPP_SHOW_HARDWARE);
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);

    let mac = vpp.get_port_mac("VirtualEthernet0/0/0").unwrap().unwrap();

    assert!(is_mac(&mac.to_string()));
    assert_eq!(runner.calls(), vec!["vppctl show hardware VirtualEthernet0/0/0"]);
}

// =============================================================================
// Error suppression and malformed output
// =============================================================================

/// Test every executor-backed operation surfaces `rpc error` as a backend error.
#[test]
fn test_rpc_error_is_backend_error_everywhere() {
    let socket = SocketPath::parse("/tmp/sock1").unwrap();

    let runner = MockRunner::new()
        .reply(RPC_ERROR)
        .reply(RPC_ERROR)
        .reply(RPC_ERROR)
        .reply(RPC_ERROR);
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);
    let results = vec![
        vpp.create_port(&socket, VhostMode::Server).map(|_| ()),
        vpp.delete_port("VirtualEthernet0/0/0").map(|_| ()),
        vpp.get_port_mac("VirtualEthernet0/0/0").map(|_| ()),
        vpp.configure_route("VirtualEthernet0/0/0", "10.0.0.5", "aa:bb:cc:dd:ee:ff")
            .map(|_| ()),
    ];
    for result in results {
        let err = result.unwrap_err();
        assert!(err.is_backend_error());
        assert!(!err.to_string().contains("SubConns"));
    }

    let runner = MockRunner::new().reply(RPC_ERROR).reply(RPC_ERROR).reply(RPC_ERROR);
    let ovs = OvsSwitch::with_runner(OvsSettings::default(), &runner);
    assert!(ovs.create_port(&socket, VhostMode::Server).unwrap_err().is_backend_error());
    assert!(ovs.delete_port("sock1").unwrap_err().is_backend_error());
    assert!(ovs.get_port_mac("sock1").unwrap_err().is_backend_error());
}

/// Test a failing route step aborts config before the tap lookup.
#[test]
fn test_vpp_config_aborts_on_backend_error() {
    let runner = MockRunner::new().reply("").reply(RPC_ERROR);
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);

    let err = vpp
        .configure_route("VirtualEthernet0/0/0", "10.0.0.5", "aa:bb:cc:dd:ee:ff")
        .unwrap_err();

    assert!(err.is_backend_error());
    assert_eq!(runner.calls().len(), 2);
}

/// Test show output without the port yields not-found instead of a fault.
#[test]
fn test_malformed_show_output() {
    let runner = MockRunner::new()
        .reply("garbage\n\n")
        .reply("Name Idx\n")
        .reply("")
        .reply("")
        .reply("")
        .reply("no taps configured\n");
    let ovs = OvsSwitch::with_runner(OvsSettings::default(), &runner);
    let vpp = VppSwitch::with_runner(VppSettings::default(), &runner);

    assert!(ovs.get_port_mac("sock1").unwrap().is_none());
    assert!(vpp.get_port_mac("VirtualEthernet0/0/0").unwrap().is_none());
    assert!(vpp
        .configure_route("VirtualEthernet0/0/0", "10.0.0.5", "aa:bb:cc:dd:ee:ff")
        .unwrap()
        .is_none());
}

/// Test a missing management binary is a local fault, not a backend error.
#[test]
fn test_missing_binary_is_exec_error() {
    let runner = MockRunner::new().fail_spawn();
    let ovs = OvsSwitch::with_runner(OvsSettings::default(), &runner);

    let err = ovs.delete_port("sock1").unwrap_err();

    assert!(matches!(err, SwitchError::Exec { .. }));
    assert!(!err.is_backend_error());
}

/// Test the boxed backend built from a backend kind answers to its name.
#[test]
fn test_connect_selects_backend() {
    use vhostctl_switch::{connect, BackendKind};

    let ovs = connect(BackendKind::Ovs, OvsSettings::default(), VppSettings::default());
    let vpp = connect(BackendKind::Vpp, OvsSettings::default(), VppSettings::default());

    assert_eq!(ovs.name(), "ovs");
    assert_eq!(vpp.name(), "vpp");
}
