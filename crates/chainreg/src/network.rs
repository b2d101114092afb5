//! Transport dispatch: one `Prober` covering both HTTP and WebSocket URLs.

use std::time::Duration;

use async_trait::async_trait;

use chainreg_core::{EndpointStatus, Prober, RegistryError, TransportKind};
use chainreg_http::{HttpProber, HttpProberConfig};
use chainreg_ws::WsProber;

#[derive(Debug, Clone)]
pub struct NetworkProber {
    http: HttpProber,
    ws: WsProber,
}

impl NetworkProber {
    pub fn new(http: HttpProberConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            http: HttpProber::new(http)?,
            ws: WsProber::new(),
        })
    }
}

#[async_trait]
impl Prober for NetworkProber {
    async fn probe(&self, url: &str, transport: TransportKind, timeout: Duration) -> EndpointStatus {
        match transport {
            TransportKind::Http => self.http.probe(url, transport, timeout).await,
            TransportKind::WebSocket => self.ws.probe(url, transport, timeout).await,
        }
    }
}
