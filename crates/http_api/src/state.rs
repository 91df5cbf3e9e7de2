use rand::RngCore;

use app_api::AppContext;

/// Header carrying the per-process token on every API call.
pub const CSRF_HEADER: &str = "x-footprint-token";

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    pub csrf_token: String,
}

impl HttpState {
    pub fn new(context: AppContext, csrf_token: String) -> Self {
        Self {
            context,
            csrf_token,
        }
    }
}

pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
