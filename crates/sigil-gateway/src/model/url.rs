use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateLinkRequest {
    pub long_url: String,
    pub custom_suffix: Option<String>,
}

#[derive(Serialize)]
pub struct CreateLinkResponse {
    pub token: String,
    pub short_url: String,
    pub long_url: String,
}
