use std::io::Read;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::message::TaggedMessage;
use crate::projection::{project, ResponseWrapper};
use crate::request::{ClientConfig, RequestBuilder};
use crate::status::check_status;
use crate::transport::{Request, Transport, UreqTransport};
use crate::types::{Config, Delivery, Details, Device};

/// Store frontend client bound to one set of credentials.
///
/// Holds no state between calls; each operation is a single round trip with
/// no retries.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    credentials: Credentials,
    config: ClientConfig,
    transport: T,
}

impl Client {
    /// Client over a default `ureq` agent and the production origin.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self::new(credentials, UreqTransport::default())
    }
}

impl<T: Transport> Client<T> {
    pub fn new(credentials: Credentials, transport: T) -> Self {
        Self::with_config(credentials, ClientConfig::default(), transport)
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        Self {
            credentials,
            config,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn builder<'a>(&'a self, device: &'a Device) -> RequestBuilder<'a> {
        RequestBuilder::new(&self.config, self.credentials.auth(), device)
    }

    /// Resolve the download location of `app` at `version_code`.
    ///
    /// A decoded status of [`PURCHASE_REQUIRED`](crate::PURCHASE_REQUIRED) is
    /// returned as [`Error::Status`]; other status codes stay on the value.
    pub fn delivery(&self, device: &Device, app: &str, version_code: u64) -> Result<Delivery> {
        let request = self.builder(device).delivery(app, version_code)?;
        let delivery = self.fetch(request)?.payload.delivery_response;
        if let Err(err) = check_status(delivery.status) {
            log::warn!("delivery of {} refused: {}", app, err);
            return Err(err.into());
        }
        Ok(delivery)
    }

    pub fn details(&self, device: &Device, app: &str) -> Result<Details> {
        let request = self.builder(device).details(app)?;
        Ok(self.fetch(request)?.payload.details_response)
    }

    /// Acquire `app` for the account. Only needed once per account.
    ///
    /// The response carries no reliable success signal, so `Ok` only means the
    /// request went through: confirm with [`details`](Self::details) or
    /// [`delivery`](Self::delivery).
    pub fn purchase(&self, device: &Device, app: &str) -> Result<()> {
        let request = self.builder(device).purchase(app)?;
        self.send(request)
    }

    /// Register `config` as the profile of `device`.
    ///
    /// The store accepts invalid profiles with a success status too; the only
    /// check is a later read with the same device. The device ID is not usable
    /// until [`UPLOAD_COOLDOWN`](crate::UPLOAD_COOLDOWN) has passed.
    pub fn upload(&self, device: &Device, config: &Config) -> Result<()> {
        let request = self.builder(device).upload(config)?;
        self.send(request)
    }

    fn fetch(&self, request: Request) -> Result<ResponseWrapper> {
        log::debug!("{} {}", request.method, request.url);
        let mut response = self.transport.round_trip(request)?;
        let mut buf = Vec::new();
        response.body.read_to_end(&mut buf).map_err(Error::Body)?;
        drop(response);
        log::trace!("read {} byte response", buf.len());
        let message = TaggedMessage::decode(&buf)?;
        project(&message)
    }

    fn send(&self, request: Request) -> Result<()> {
        log::debug!("{} {}", request.method, request.url);
        let response = self.transport.round_trip(request)?;
        log::trace!("response status {}", response.status);
        Ok(())
    }
}
