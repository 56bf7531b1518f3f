//! # vhostctl
//!
//! Attaches containers to a DPDK switch through vhost-user ports. Called by
//! CNI plugins, which read the single-line result from stdout.
//!
//! ## Usage
//! ```bash
//! vhostctl create /var/lib/cni/vhostuser/<id>/<id>-net1
//! vhostctl getmac <port>
//! vhostctl --backend vpp config <port> 10.0.0.5 aa:bb:cc:dd:ee:ff
//! vhostctl delete <port>
//! ```
//!
//! Results the switch could not produce (backend errors, lookups that found
//! nothing) print `None` and exit 0. Local faults exit 1.

use anyhow::Result;
use clap::Parser;
use std::fmt::Display;
use tracing::{debug, warn};

use vhostctl_switch::{MacAddress, SocketPath, SwitchError, VhostMode, VhostSwitch};

mod cli;
mod config;

use cli::{Args, BridgeAction, Command};
use config::{Config, LogFormat};

/// Printed in place of a result the switch could not provide.
const ABSENT: &str = "None";

fn main() -> Result<()> {
    let args = Args::parse();

    let command = match args.command {
        Some(ref command) => command,
        None => {
            println!("Usage: vhostctl command [options]");
            std::process::exit(1);
        }
    };

    let config = Config::resolve(&args)?;

    match config.log_format {
        LogFormat::Json => vhostctl_common::init_logging_json(&config.log_level)?,
        LogFormat::Pretty => vhostctl_common::init_logging(&config.log_level)?,
    }

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend,
        bridge = %config.ovs.bridge,
        runtime_dir = %config.ovs.runtime_dir.display(),
        "vhostctl configured"
    );

    let switch = vhostctl_switch::connect(config.backend, config.ovs.clone(), config.vpp.clone());

    run(switch.as_ref(), command, &config)
}

/// Execute one subcommand against the selected switch.
fn run(switch: &dyn VhostSwitch, command: &Command, config: &Config) -> Result<()> {
    match command {
        Command::Create { socket_path, client } => {
            let socket = SocketPath::parse(socket_path)?;
            let mode = if *client { VhostMode::Client } else { VhostMode::Server };
            print_result(switch.create_port(&socket, mode).map(Some))
        }
        Command::Delete { port } => print_result(switch.delete_port(port).map(Some)),
        Command::Getmac { port } => print_result(switch.get_port_mac(port)),
        Command::Config { port, container_ip, container_mac } => {
            match switch.configure_route(port, container_ip, container_mac) {
                // No tap device is not a failure; print an empty line.
                Ok(tap) => {
                    println!("{}", tap.unwrap_or_default());
                    Ok(())
                }
                // OVS has no route step; report it like an absent result.
                Err(e @ SwitchError::Unsupported { .. }) => {
                    warn!(error = %e, "Route configuration skipped");
                    println!("{}", ABSENT);
                    Ok(())
                }
                Err(e) => print_result::<String>(Err(e)),
            }
        }
        Command::Bridge { action } => {
            let bridge = action.bridge().unwrap_or(&config.ovs.bridge);
            match action {
                BridgeAction::Add { .. } => finish(switch.create_bridge(bridge)),
                BridgeAction::Del { .. } => finish(switch.delete_bridge(bridge)),
                BridgeAction::L2 { .. } => finish(switch.configure_l2_bridge(bridge)),
                BridgeAction::Exists { .. } => print_result(switch.bridge_exists(bridge).map(Some)),
                BridgeAction::HasPorts { .. } => {
                    print_result(switch.bridge_has_ports(bridge).map(Some))
                }
            }
        }
        Command::Genmac => {
            println!("{}", MacAddress::random());
            Ok(())
        }
        Command::Unknown(argv) => {
            debug!(command = ?argv, "Unknown subcommand");
            println!("Not supported yet!");
            Ok(())
        }
    }
}

/// Print an operation result on stdout.
///
/// Backend-reported errors print `None`, like a lookup that found nothing.
/// Every other error is a local fault and is returned to the caller.
fn print_result<T: Display>(result: vhostctl_switch::Result<Option<T>>) -> Result<()> {
    match result {
        Ok(Some(value)) => println!("{}", value),
        Ok(None) => println!("{}", ABSENT),
        Err(e) => report_error(e)?,
    }
    Ok(())
}

/// Complete an operation that has no result; success prints nothing.
fn finish(result: vhostctl_switch::Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => report_error(e),
    }
}

fn report_error(error: SwitchError) -> Result<()> {
    if error.is_backend_error() {
        warn!(error = %error, "Switch rejected the request");
        println!("{}", ABSENT);
        return Ok(());
    }
    Err(error.into())
}
