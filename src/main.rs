use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use nyc_address_validator::address::{
    normalize, AddressResolver, ApiKey, ComplaintsClient, Coordinates, GoogleGeocoder,
    KeyProvider, MapType, StaticMap, DEFAULT_RADIUS_KM,
};
use nyc_address_validator::config::{
    GeocoderConfig, DEFAULT_GEOCODE_ENDPOINT, DEFAULT_STATIC_MAP_ENDPOINT, DEFAULT_TIMEOUT_SECS,
};
use nyc_address_validator::server;
use tracing::info;

/// NYC Address Validator
///
/// Checks whether a street address lies within New York City, names the
/// borough, and grades how confident the geocoder was.
///
/// Examples:
///   nycaddr validate "350 5th ave"
///   nycaddr normalize "123 main st."
///   nycaddr map --lat 40.758 --lng -73.9855 --zoom 18 --maptype satellite
///   nycaddr complaints --lat 40.758 --lng -73.9855 --complaints-url http://localhost:8080
///   nycaddr serve --port 3000
#[derive(Parser)]
#[command(name = "nycaddr", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an address and print the verdict as JSON.
    Validate {
        address: String,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Print the geocoder query an address normalizes to. No network.
    Normalize { address: String },

    /// Print a static map image URL for a point.
    Map {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u8).range(0..=21))]
        zoom: u8,

        #[arg(long, default_value = "roadmap")]
        maptype: MapType,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// List noise complaints reported near a point, as JSON.
    Complaints {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        #[arg(long, default_value_t = DEFAULT_RADIUS_KM)]
        radius_km: f64,

        /// Base URL of the complaints service.
        #[arg(long, env = "NYCADDR_COMPLAINTS_URL")]
        complaints_url: String,

        #[arg(long, env = "NYCADDR_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Serve the validator over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1", env = "NYCADDR_HOST")]
        host: String,

        #[arg(long, short, default_value_t = 3000, env = "NYCADDR_PORT")]
        port: u16,

        #[command(flatten)]
        provider: ProviderArgs,
    },
}

#[derive(Args)]
struct ProviderArgs {
    /// Google Maps API key.
    #[arg(long, env = "NYCADDR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// URL returning an API key as plain text, used when no key is configured.
    #[arg(long, env = "NYCADDR_KEY_URL")]
    key_url: Option<String>,

    #[arg(long, env = "NYCADDR_GEOCODE_ENDPOINT", default_value = DEFAULT_GEOCODE_ENDPOINT)]
    geocode_endpoint: String,

    #[arg(long, env = "NYCADDR_STATIC_MAP_ENDPOINT", default_value = DEFAULT_STATIC_MAP_ENDPOINT)]
    static_map_endpoint: String,

    /// Noise complaints service; enables `/api/complaints` when set.
    #[arg(long, env = "NYCADDR_COMPLAINTS_URL")]
    complaints_url: Option<String>,

    /// HTTP timeout in seconds.
    #[arg(long, env = "NYCADDR_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Where a fetched API key is cached.
    #[arg(long, env = "NYCADDR_KEY_STORE")]
    key_store: Option<PathBuf>,
}

impl ProviderArgs {
    fn into_config(self) -> GeocoderConfig {
        let defaults = GeocoderConfig::default();
        GeocoderConfig {
            api_key: self.api_key,
            key_url: self.key_url,
            geocode_endpoint: self.geocode_endpoint,
            static_map_endpoint: self.static_map_endpoint,
            complaints_url: self.complaints_url,
            timeout_secs: self.timeout_secs,
            key_store_path: self.key_store.unwrap_or(defaults.key_store_path),
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "nyc_address_validator=info,nycaddr=info,tower_http=info",
                )
            }),
        )
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Normalize { address } => println!("{}", normalize(&address)),

        Command::Validate { address, provider } => {
            let config = provider.into_config();
            let key = resolve_key(&config);
            let resolver = AddressResolver::new(Arc::new(GoogleGeocoder::new(&config, key)));

            let verdict = resolver.validate(&address);
            eprintln!("  {}", verdict.summary_line());
            if let Some(suggestion) = &verdict.suggested_address {
                eprintln!("  Did you mean: {}?", suggestion);
            }
            println!("{}", to_json(&verdict));
        }

        Command::Map { lat, lng, zoom, maptype, provider } => {
            let center = Coordinates::new(lat, lng);
            if !center.is_valid() {
                fail("Invalid coordinates. Lat: -90..90, Lng: -180..180");
            }
            let config = provider.into_config();
            let key = resolve_key(&config);

            let mut map = StaticMap::new(center).with_zoom(zoom);
            if maptype != map.map_type {
                map = map.with_map_type(maptype);
            }
            match map.url(&config.static_map_endpoint, &key) {
                Ok(url) => println!("{}", url),
                Err(e) => fail(&format!("Invalid static map endpoint: {}", e)),
            }
        }

        Command::Complaints { lat, lng, radius_km, complaints_url, timeout_secs } => {
            let center = Coordinates::new(lat, lng);
            if !center.is_valid() {
                fail("Invalid coordinates. Lat: -90..90, Lng: -180..180");
            }
            let client = ComplaintsClient::new(&complaints_url, Duration::from_secs(timeout_secs));
            let complaints = client.nearby(center, radius_km);
            eprintln!("  {} complaint(s) within {} km", complaints.len(), radius_km);
            println!("{}", to_json(&complaints));
        }

        Command::Serve { host, port, provider } => {
            let config = provider.into_config();
            let key = resolve_key(&config);
            let resolver =
                AddressResolver::new(Arc::new(GoogleGeocoder::new(&config, key.clone())));
            let complaints = config.complaints_url.as_deref().map(|url| {
                ComplaintsClient::new(url, Duration::from_secs(config.timeout_secs))
            });
            let app = server::build_router(
                resolver,
                key,
                config.static_map_endpoint.clone(),
                complaints,
            );

            let runtime = tokio::runtime::Runtime::new()
                .unwrap_or_else(|e| fail(&format!("Cannot start runtime: {}", e)));
            if let Err(e) = runtime.block_on(server::start(&host, port, app)) {
                fail(&format!("Server error on {}:{}: {}", host, port, e));
            }
        }
    }
}

fn resolve_key(config: &GeocoderConfig) -> ApiKey {
    match KeyProvider::from_config(config).resolve() {
        Ok((key, source)) => {
            info!(source = %source, key_len = key.len(), "API key ready");
            key
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fail(&format!("Cannot encode output: {}", e)))
}

fn fail(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}
