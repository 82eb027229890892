use serde::{Deserialize, Serialize};

/// One extra route added to the bridge's IPAM block.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Route {
    pub dst: String,
}

/// CNI-style IPAM block: a subnet plus any extra routes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ipam {
    #[serde(rename = "type", default = "default_ipam_type")]
    pub type_: String,
    pub subnet: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

fn default_ipam_type() -> String {
    "host-local".to_string()
}

/// The bridge network a project's containers are attached to.
///
/// Generated once per project and persisted as pretty JSON under
/// `<netConfigPath>/net.d/<project>.conf` so repeated runs reuse the same
/// subnet instead of allocating a fresh one each time (spec.md §4, §9).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub bridge: String,
    #[serde(rename = "isGateway")]
    pub is_gateway: bool,
    #[serde(rename = "ipMasq")]
    pub ip_masq: bool,
    pub ipam: Ipam,
}
