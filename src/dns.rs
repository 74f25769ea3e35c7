//! DNS guidance for clusters running without a DNS server.
//!
//! A single-node cluster answers on one host, so every record points at the
//! same address. The IP printed here is a placeholder for the node's address.

pub const PLACEHOLDER_NODE_IP: &str = "192.168.126.10";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsEntry {
    pub hostname: String,
    pub ip: String,
}

/// The records a user must configure (e.g. in /etc/hosts) to reach the
/// cluster: the bare cluster FQDN plus the api, api-int and the three
/// well-known `.apps` routes.
pub fn compute_dns_entries(cluster_name: &str, base_domain: &str) -> Vec<DnsEntry> {
    let fqdn = format!("{cluster_name}.{base_domain}");
    [
        fqdn.clone(),
        format!("api.{fqdn}"),
        format!("api-int.{fqdn}"),
        format!("console-openshift-console.apps.{fqdn}"),
        format!("oauth-openshift.apps.{fqdn}"),
        format!("canary-openshift-ingress-canary.apps.{fqdn}"),
    ]
    .into_iter()
    .map(|hostname| DnsEntry {
        hostname,
        ip: PLACEHOLDER_NODE_IP.to_string(),
    })
    .collect()
}
