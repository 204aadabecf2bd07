// ── NetworkUpdater ──
//
// The ready-to-run bundle: loaded devices, a dispatcher over the validated
// endpoint and payload, and an established token session. `build` is the
// only way to get one, so a dispatcher never exists without its inputs.

use tracing::{debug, info};

use netpush_api::{
    Endpoint, RemoteTokenProvider, Session, StaticTokenProvider, TokenSource, TransportConfig,
    UpdateDispatcher,
};

use crate::config::{TokenConfig, UpdaterConfig};
use crate::error::CoreError;
use crate::loader::{load_config_document, load_device_list};
use crate::model::{MacAddress, RunReport};
use crate::orchestrator::RetryOrchestrator;

pub struct NetworkUpdater {
    devices: Vec<MacAddress>,
    dispatcher: UpdateDispatcher,
    session: Session<TokenSource>,
    orchestrator: RetryOrchestrator,
}

impl NetworkUpdater {
    /// Load inputs, validate the endpoint and obtain the first token.
    ///
    /// Steps run in order (host file, payload, endpoint, HTTP client,
    /// token) and the first failure aborts construction.
    pub async fn build(config: UpdaterConfig) -> Result<Self, CoreError> {
        let devices = load_device_list(&config.hosts_file)?;
        let payload = load_config_document(&config.payload_file)?;
        let endpoint = Endpoint::new(config.base_url, config.port)?;

        let transport = TransportConfig {
            connect_timeout: config.connect_timeout,
            timeout: config.timeout,
        };
        let http = transport.build_client()?;

        let provider = match config.token {
            TokenConfig::Static { token } => TokenSource::Static(StaticTokenProvider::new(token)),
            TokenConfig::Remote {
                issuer_url,
                access_token,
            } => {
                debug!("using remote token issuer at {issuer_url}");
                TokenSource::Remote(RemoteTokenProvider::new(
                    http.clone(),
                    issuer_url,
                    access_token,
                ))
            }
        };

        let session = Session::establish(provider).await?;
        let dispatcher = UpdateDispatcher::with_client(http, endpoint, payload.into_bytes());

        let orchestrator = RetryOrchestrator::new(config.retry_budget, config.fail_fast);

        info!(
            devices = devices.len(),
            endpoint = dispatcher.endpoint().base(),
            retry_budget = orchestrator.retry_budget(),
            fail_fast = orchestrator.fail_fast(),
            "updater ready"
        );

        Ok(Self {
            devices,
            dispatcher,
            session,
            orchestrator,
        })
    }

    pub fn devices(&self) -> &[MacAddress] {
        &self.devices
    }

    pub fn dispatcher(&self) -> &UpdateDispatcher {
        &self.dispatcher
    }

    pub fn session(&self) -> &Session<TokenSource> {
        &self.session
    }

    /// Push the payload to every loaded device.
    pub async fn run(&mut self) -> RunReport {
        self.orchestrator
            .run(&self.dispatcher, &mut self.session, &self.devices)
            .await
    }
}
