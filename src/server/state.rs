use crate::address::{AddressResolver, ApiKey, ComplaintsClient};

pub struct AppState {
    pub resolver: AddressResolver,
    pub key: ApiKey,
    pub static_map_endpoint: String,
    pub complaints: Option<ComplaintsClient>,
}
