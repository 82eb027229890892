//! Network config generator (spec.md §4.7): on a project's first `run`,
//! picks a `172.16.X.0/24` bridge subnet and persists it as pretty-printed
//! JSON at `<netConfigPath>/net.d/<projectName>.conf`; subsequent runs
//! reuse the file.
//!
//! Local interface enumeration — "host-network IP probing" — is named in
//! spec.md §1 as an external collaborator specified only at its interface,
//! so it sits behind the `InterfaceProbe` trait; `PnetInterfaceProbe` is
//! the concrete adapter, the only crate in the retrieved pack offering
//! this capability (`ikeniborn-vpn`'s `pnet` dependency).

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use ipnet::Ipv4Net;
use rand::Rng;
use serde_json;
use shared::model::{Ipam, NetworkConfig, Route};
use shared::Error;

pub trait InterfaceProbe: Send + Sync {
    /// Every address bound on a local interface, as a CIDR (address + the
    /// interface's own prefix length).
    fn local_networks(&self) -> Vec<Ipv4Net>;
}

pub struct PnetInterfaceProbe;

impl InterfaceProbe for PnetInterfaceProbe {
    fn local_networks(&self) -> Vec<Ipv4Net> {
        pnet::datalink::interfaces()
            .iter()
            .flat_map(|iface| iface.ips.iter())
            .filter_map(|ip_network| match ip_network.ip() {
                IpAddr::V4(addr) => Ipv4Net::new(addr, ip_network.prefix()).ok(),
                IpAddr::V6(_) => None,
            })
            .collect()
    }
}

/// Loads the project's persisted network config, generating and writing
/// one if this is the first `run`.
pub async fn load_or_generate(
    net_config_path: &Path,
    project_name: &str,
    probe: &dyn InterfaceProbe,
) -> Result<NetworkConfig, Error> {
    let conf_path = config_path(net_config_path, project_name);

    if let Ok(bytes) = tokio::fs::read(&conf_path).await {
        return serde_json::from_slice(&bytes)
            .map_err(|e| Error::Config(format!("parsing {}: {}", conf_path.display(), e)));
    }

    let config = generate(project_name, probe)?;
    if let Some(parent) = conf_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Io(format!("creating {}: {}", parent.display(), e)))?;
    }
    let pretty = serde_json::to_vec_pretty(&config)
        .map_err(|e| Error::Config(format!("encoding network config: {}", e)))?;
    tokio::fs::write(&conf_path, pretty)
        .await
        .map_err(|e| Error::Io(format!("writing {}: {}", conf_path.display(), e)))?;

    Ok(config)
}

fn config_path(net_config_path: &Path, project_name: &str) -> PathBuf {
    net_config_path
        .join("net.d")
        .join(format!("{}.conf", project_name))
}

/// Picks `172.16.X.0/24` for a random `X`, rejecting any choice that
/// overlaps a subnet actually bound on a local interface.
///
/// The original source compares the candidate's network address against
/// each interface address's trailing octet, which does not correctly
/// detect overlap (spec.md §9 Open Question). This implementation performs
/// a real CIDR-overlap test instead.
fn generate(project_name: &str, probe: &dyn InterfaceProbe) -> Result<NetworkConfig, Error> {
    let local_networks = probe.local_networks();
    let mut rng = rand::rng();

    for _ in 0..256 {
        let x: u8 = rng.random();
        let candidate = format!("172.16.{}.0/24", x);
        let candidate_net: Ipv4Net = candidate
            .parse()
            .map_err(|e| Error::Config(format!("building candidate subnet: {}", e)))?;

        let conflicts = local_networks
            .iter()
            .any(|local| local.contains(&candidate_net.network()) || candidate_net.contains(&local.addr()));

        if !conflicts {
            return Ok(NetworkConfig {
                name: project_name.to_string(),
                type_: "bridge".to_string(),
                bridge: format!("br-{}", project_name),
                is_gateway: true,
                ip_masq: true,
                ipam: Ipam {
                    type_: "host-local".to_string(),
                    subnet: candidate_net.to_string(),
                    routes: vec![Route {
                        dst: "0.0.0.0/0".to_string(),
                    }],
                },
            });
        }
    }

    Err(Error::Config(
        "exhausted 172.16.0.0/16 without finding a non-conflicting /24".to_string(),
    ))
}
