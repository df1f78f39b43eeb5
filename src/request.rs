use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::error::{Error, Result};
use crate::helpers::load_yaml;
use crate::message::encode_value;
use crate::transport::{Method, Request};
use crate::types::{Config, Device};

pub const ORIGIN: &str = "https://android.clients.google.com";

/// Client identity sent as `User-Agent` on every operation but `details`.
pub const USER_AGENT: &str = "Android-Finsky (sdk=99,versionCode=99999999)";

/// How long a device ID stays unusable after [`Client::upload`](crate::Client::upload).
/// Not enforced by the client.
pub const UPLOAD_COOLDOWN: Duration = Duration::from_secs(16);

/// Endpoint settings injected into every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub origin: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: ORIGIN.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delivery,
    Details,
    Purchase,
    Upload,
}

impl Operation {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Delivery => "/fdfe/delivery",
            Self::Details => "/fdfe/details",
            Self::Purchase => "/fdfe/purchase",
            Self::Upload => "/fdfe/uploadDeviceConfig",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Delivery | Self::Details => Method::Get,
            Self::Purchase | Self::Upload => Method::Post,
        }
    }

    fn sends_user_agent(&self) -> bool {
        !matches!(self, Self::Details)
    }
}

#[derive(Serialize)]
struct UploadDeviceConfigRequest<'a> {
    #[serde(rename = "1")]
    device_configuration: &'a Config,
}

/// `application/x-www-form-urlencoded` pairs, spaces as `+`. Used for both
/// query strings and form bodies.
fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Builds the authenticated request for each operation.
pub(crate) struct RequestBuilder<'a> {
    config: &'a ClientConfig,
    token: &'a str,
    device: &'a Device,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig, token: &'a str, device: &'a Device) -> Self {
        Self {
            config,
            token,
            device,
        }
    }

    fn base(&self, operation: Operation, query: Option<String>) -> Result<Request> {
        let valid = Url::parse(&self.config.origin).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https")
                && url.has_host()
                && url.query().is_none()
                && url.fragment().is_none()
        });
        if !valid {
            return Err(Error::InvalidOrigin(self.config.origin.clone()));
        }
        let origin = self.config.origin.trim_end_matches('/');
        let mut url = format!("{}{}", origin, operation.path());
        if let Some(query) = query {
            url.push('?');
            url.push_str(&query);
        }

        let mut headers = IndexMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.token));
        if operation.sends_user_agent() {
            headers.insert("User-Agent".to_string(), self.config.user_agent.clone());
        }
        headers.insert("X-DFE-Device-ID".to_string(), self.device.to_string());

        Ok(Request {
            method: operation.method(),
            url,
            headers,
            body: Vec::new(),
        })
    }

    pub fn delivery(&self, app: &str, version_code: u64) -> Result<Request> {
        let version_code = version_code.to_string();
        let query = encode_pairs(&[("doc", app), ("vc", &version_code)]);
        self.base(Operation::Delivery, Some(query))
    }

    pub fn details(&self, app: &str) -> Result<Request> {
        self.base(Operation::Details, Some(encode_pairs(&[("doc", app)])))
    }

    pub fn purchase(&self, app: &str) -> Result<Request> {
        let mut request = self.base(Operation::Purchase, None)?;
        request.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        request.body = encode_pairs(&[("doc", app)]).into_bytes();
        Ok(request)
    }

    pub fn upload(&self, config: &Config) -> Result<Request> {
        let mut request = self.base(Operation::Upload, None)?;
        let keyed = serde_json::to_value(UploadDeviceConfigRequest {
            device_configuration: config,
        })?;
        request.body = encode_value(&keyed)?.to_vec();
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{TaggedMessage, TaggedValue};

    const DEVICE: Device = Device { android_id: 0xabc };

    fn builder(config: &ClientConfig) -> RequestBuilder<'_> {
        RequestBuilder::new(config, "tok", &DEVICE)
    }

    #[test]
    fn delivery_request() {
        let config = ClientConfig::default();
        let request = builder(&config).delivery("com.example.app", 42).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url,
            "https://android.clients.google.com/fdfe/delivery?doc=com.example.app&vc=42"
        );
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));
        assert_eq!(request.header("User-Agent"), Some(USER_AGENT));
        assert_eq!(request.header("X-DFE-Device-ID"), Some("abc"));
        assert!(request.body.is_empty());
    }

    #[test]
    fn details_request_has_no_user_agent() {
        let config = ClientConfig::default();
        let request = builder(&config).details("com.example.app").unwrap();
        assert_eq!(
            request.url,
            "https://android.clients.google.com/fdfe/details?doc=com.example.app"
        );
        assert_eq!(request.header("User-Agent"), None);
        assert_eq!(request.headers.len(), 2);
    }

    #[test]
    fn purchase_is_form_post() {
        let config = ClientConfig::default();
        let request = builder(&config).purchase("com.example.app").unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://android.clients.google.com/fdfe/purchase");
        assert_eq!(
            request.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body, b"doc=com.example.app");
    }

    #[test]
    fn query_values_are_escaped() {
        let config = ClientConfig::default();
        let request = builder(&config).details("a b&c").unwrap();
        assert!(request.url.ends_with("?doc=a+b%26c"), "{}", request.url);
    }

    #[test]
    fn form_body_uses_plus_for_spaces() {
        let config = ClientConfig::default();
        let request = builder(&config).purchase("a b/c").unwrap();
        assert_eq!(request.body, b"doc=a+b%2Fc");
    }

    #[test]
    fn upload_wraps_config_in_field_one() {
        let config = ClientConfig::default();
        let device_config = Config::default();
        let request = builder(&config).upload(&device_config).unwrap();
        assert_eq!(request.url, "https://android.clients.google.com/fdfe/uploadDeviceConfig");
        assert_eq!(request.header("Content-Type"), None);
        assert_eq!(request.header("User-Agent"), Some(USER_AGENT));

        let decoded = TaggedMessage::decode(&request.body).unwrap();
        let profile = decoded.get(1).and_then(TaggedValue::as_message).unwrap();
        assert_eq!(profile.get(1), Some(&TaggedValue::Varint(3)));
        let platforms: Vec<_> = profile.get_all(11).iter().filter_map(TaggedValue::as_str).collect();
        assert_eq!(platforms, ["arm64-v8a", "armeabi-v7a", "armeabi"]);
    }

    #[test]
    fn substituted_origin_and_agent() {
        let config = ClientConfig {
            origin: "http://127.0.0.1:8080/".to_string(),
            user_agent: "test-agent".to_string(),
        };
        let request = builder(&config).delivery("app", 1).unwrap();
        assert_eq!(request.url, "http://127.0.0.1:8080/fdfe/delivery?doc=app&vc=1");
        assert_eq!(request.header("User-Agent"), Some("test-agent"));
    }

    #[test]
    fn malformed_origin() {
        let config = ClientConfig {
            origin: "android.clients.google.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            builder(&config).details("app"),
            Err(Error::InvalidOrigin(_))
        ));

        for origin in ["ftp://host", "https://host?x=1", "https://host#top", "https://"] {
            let config = ClientConfig {
                origin: origin.to_string(),
                ..ClientConfig::default()
            };
            assert!(
                matches!(builder(&config).details("app"), Err(Error::InvalidOrigin(_))),
                "{}",
                origin
            );
        }
    }
}
