//! User resolution documents
//!
//! Request: `{"UsersInfo": [["<XUID hex16>", "<gamertag>"], ...]}`
//!
//! Response: `[{"xuid": "<hex16>", "gamertag": "<text>"}, ...]`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xonline_domain::entities::{UserResolutionEntry, UserResolutionRequest, UserResolutionResponse};
use xonline_domain::ids::Xuid;
use xonline_domain::value_objects::Gamertag;

use crate::error::BridgeError;
use crate::json_object::{hex_field, require_array, xuid_to_hex, JsonObject};

#[derive(Debug, Serialize)]
struct UsersInfoDocument {
    #[serde(rename = "UsersInfo")]
    users_info: Vec<(String, String)>,
}

#[derive(Debug, Default, Deserialize)]
struct ResolvedUserDto {
    #[serde(default)]
    xuid: Option<Value>,
    #[serde(default)]
    gamertag: Option<String>,
}

/// Pairs a lookup request with the backend's answer.
#[derive(Debug, Clone, Default)]
pub struct UserResolution {
    request: UserResolutionRequest,
    response: UserResolutionResponse,
}

impl UserResolution {
    pub fn new(request: UserResolutionRequest) -> Self {
        Self {
            request,
            response: UserResolutionResponse::default(),
        }
    }

    pub fn request(&self) -> &UserResolutionRequest {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut UserResolutionRequest {
        &mut self.request
    }

    pub fn response(&self) -> &UserResolutionResponse {
        &self.response
    }

    pub fn into_response(self) -> UserResolutionResponse {
        self.response
    }
}

fn decode_entry(index: usize, item: &Value) -> UserResolutionEntry {
    let dto = match ResolvedUserDto::deserialize(item) {
        Ok(dto) => dto,
        Err(e) => {
            tracing::warn!(index, error = %e, "skipping malformed user resolution entry");
            ResolvedUserDto::default()
        }
    };

    let xuid = hex_field(dto.xuid.as_ref()).map(Xuid::new);
    let gamertag = dto.gamertag.map(|text| {
        let (gamertag, fit) = Gamertag::truncated(&text);
        if fit.is_truncated() {
            tracing::warn!(index, received = %text, "backend gamertag exceeds field width, truncated");
        }
        gamertag
    });
    UserResolutionEntry { xuid, gamertag }
}

impl JsonObject for UserResolution {
    const KIND: &'static str = "user resolution";

    /// Missing XUIDs or gamertags are sent as empty strings, never omitted.
    fn serialize(&self) -> Result<String, BridgeError> {
        let users_info = self
            .request
            .entries()
            .iter()
            .map(|entry| {
                (
                    entry.xuid.map(xuid_to_hex).unwrap_or_default(),
                    entry
                        .gamertag
                        .as_ref()
                        .map(|tag| tag.as_str().to_string())
                        .unwrap_or_default(),
                )
            })
            .collect();
        Ok(serde_json::to_string(&UsersInfoDocument { users_info })?)
    }

    /// Replaces the previous response; fails unless the document is a list.
    fn from_json(&mut self, document: &Value) -> Result<(), BridgeError> {
        let items = require_array(Self::KIND, document)?;
        let mut response = UserResolutionResponse::new();
        for (index, item) in items.iter().enumerate() {
            response.push(decode_entry(index, item));
        }
        self.response = response;
        Ok(())
    }
}
