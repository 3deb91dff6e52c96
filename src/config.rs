//! Router runtime configurations for tests.
//!
//! [`test_config`] and [`test_ssl_config`] start from the router's defaults
//! and pin every timing, credential and endpoint a test could otherwise
//! trip over, so two fixtures built with the same ports are identical
//! (apart from generated certificates).

use std::time::Duration;

use bon::Builder;

use crate::error::Result;
use crate::generate::generate_rsa_pair;

/// Cipher suites enabled by [`test_ssl_config`].
pub const TEST_CIPHER_STRING: &str =
    "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256:TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384";

/// Shared secret for route-service signatures in fixtures.
pub const TEST_ROUTE_SERVICE_SECRET: &str = "kCvXxNMB0JO2vinxoru9Hg==";

/// Common names of the two certificates [`test_ssl_config`] installs.
pub const TEST_TLS_COMMON_NAMES: [&str; 2] = ["potato.com", "potato2.com"];

#[derive(Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct StatusConfig {
    pub port: u16,
    #[builder(into, default)]
    pub user: String,
    #[builder(into, default)]
    pub pass: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct NatsConfig {
    #[builder(into)]
    pub host: String,
    pub port: u16,
    #[builder(into, default)]
    pub user: String,
    #[builder(into, default)]
    pub pass: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub metron_address: String,
    pub job_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            metron_address: String::new(),
            job_name: "gorouter".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OAuthConfig {
    pub token_endpoint: String,
    pub port: u16,
    pub skip_ssl_validation: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TracingConfig {
    pub enable_zipkin: bool,
}

/// Runtime configuration of the router under test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    pub status: StatusConfig,
    pub nats: Vec<NatsConfig>,
    pub logging: LoggingConfig,
    pub oauth: OAuthConfig,
    pub tracing: TracingConfig,

    pub port: u16,
    pub index: u32,
    pub zone: String,
    pub ip: String,
    pub trace_key: String,

    pub enable_ssl: bool,
    pub ssl_port: u16,
    /// `"{key}\n{cert}"` PEM entries, one per served certificate.
    pub tls_pem: Vec<String>,
    pub cipher_string: String,

    pub route_service_secret: String,

    pub start_response_delay_interval: Duration,
    pub publish_start_message_interval: Duration,
    pub prune_stale_droplets_interval: Duration,
    pub droplet_stale_threshold: Duration,
    pub publish_active_apps_interval: Duration,
    pub endpoint_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            status: StatusConfig::builder().port(8082).build(),
            nats: vec![NatsConfig::builder().host("localhost").port(4222).build()],
            logging: LoggingConfig::default(),
            oauth: OAuthConfig::default(),
            tracing: TracingConfig::default(),

            port: 8081,
            index: 0,
            zone: String::new(),
            ip: String::new(),
            trace_key: String::new(),

            enable_ssl: false,
            ssl_port: 443,
            tls_pem: Vec::new(),
            cipher_string: String::new(),

            route_service_secret: String::new(),

            start_response_delay_interval: Duration::from_secs(5),
            publish_start_message_interval: Duration::from_secs(30),
            prune_stale_droplets_interval: Duration::from_secs(30),
            droplet_stale_threshold: Duration::from_secs(120),
            publish_active_apps_interval: Duration::ZERO,
            endpoint_timeout: Duration::from_secs(60),
        }
    }
}

/// Plain-HTTP router config listening on `proxy_port`, reporting status on
/// `status_port`, with one NATS server per entry in `nats_ports`.
pub fn test_config(status_port: u16, proxy_port: u16, nats_ports: &[u16]) -> RouterConfig {
    RouterConfig {
        port: proxy_port,
        index: 2,
        trace_key: "my_trace_key".to_string(),

        // Keep test traffic on the loopback interface.
        ip: "127.0.0.1".to_string(),

        start_response_delay_interval: Duration::from_secs(1),
        publish_start_message_interval: Duration::from_secs(10),
        prune_stale_droplets_interval: Duration::ZERO,
        droplet_stale_threshold: Duration::from_secs(10),
        publish_active_apps_interval: Duration::ZERO,
        zone: "z1".to_string(),

        endpoint_timeout: Duration::from_millis(500),

        status: StatusConfig::builder()
            .port(status_port)
            .user("user")
            .pass("pass")
            .build(),

        nats: nats_ports
            .iter()
            .map(|&port| {
                NatsConfig::builder()
                    .host("localhost")
                    .port(port)
                    .user("nats")
                    .pass("nats")
                    .build()
            })
            .collect(),

        logging: LoggingConfig {
            level: "debug".to_string(),
            metron_address: "localhost:3457".to_string(),
            job_name: "router_test_z1_0".to_string(),
        },

        oauth: OAuthConfig {
            token_endpoint: "uaa.cf.service.internal".to_string(),
            port: 8443,
            skip_ssl_validation: true,
        },

        route_service_secret: TEST_ROUTE_SERVICE_SECRET.to_string(),

        tracing: TracingConfig {
            enable_zipkin: true,
        },

        ..RouterConfig::default()
    }
}

/// [`test_config`] plus TLS on `ssl_port`, serving freshly generated RSA
/// certificates for each of [`TEST_TLS_COMMON_NAMES`].
pub fn test_ssl_config(
    status_port: u16,
    proxy_port: u16,
    ssl_port: u16,
    nats_ports: &[u16],
) -> Result<RouterConfig> {
    let mut config = test_config(status_port, proxy_port, nats_ports);

    config.enable_ssl = true;
    config.tls_pem = TEST_TLS_COMMON_NAMES
        .iter()
        .map(|cn| -> Result<String> {
            let (key, cert) = generate_rsa_pair(cn)?;
            Ok(format!("{key}\n{cert}"))
        })
        .collect::<Result<Vec<_>>>()?;
    config.ssl_port = ssl_port;
    config.cipher_string = TEST_CIPHER_STRING.to_string();

    log::debug!(
        "built SSL router config with {} certificate(s)",
        config.tls_pem.len()
    );
    Ok(config)
}
