use crate::core::{config::TileLoadingConfig, geo::TileCoord};
use crate::prelude::HashSet;
use crate::Result;
use crossbeam_channel::Sender;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Shared blocking HTTP client. Public tile servers reject requests
/// without a User-Agent.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(20))
        .build()
        .unwrap_or_else(|err| {
            log::warn!("falling back to default tile client: {}", err);
            Client::new()
        })
});

/// Outcome of one tile download
#[derive(Debug)]
pub struct TileResponse {
    pub url: String,
    pub coord: TileCoord,
    pub result: std::result::Result<Vec<u8>, String>,
}

/// Fetches tiles on detached worker threads and reports them over a channel.
/// A URL already in flight is not requested twice.
pub struct TileLoader {
    tx: Sender<TileResponse>,
    config: TileLoadingConfig,
    pending: Arc<Mutex<HashSet<String>>>,
}

impl TileLoader {
    pub fn new(tx: Sender<TileResponse>, config: TileLoadingConfig) -> Self {
        Self {
            tx,
            config,
            pending: Arc::new(Mutex::new(HashSet::default())),
        }
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending
            .lock()
            .map(|pending| pending.contains(url))
            .unwrap_or(false)
    }

    /// Starts downloading `url`. Returns false when it is already in flight.
    pub fn start_download(&self, url: String, coord: TileCoord) -> bool {
        match self.pending.lock() {
            Ok(mut pending) => {
                if !pending.insert(url.clone()) {
                    return false;
                }
            }
            Err(_) => return false,
        }

        let tx = self.tx.clone();
        let pending = Arc::clone(&self.pending);
        let attempts = self.config.max_retries + 1;
        let retry_delay = Duration::from_millis(self.config.retry_delay_ms);

        thread::spawn(move || {
            let mut last_error = String::new();
            for attempt in 1..=attempts {
                log::debug!("fetch tile {:?} attempt {}", coord, attempt);
                match fetch(&url) {
                    Ok(data) => {
                        log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len());
                        finish(&pending, &tx, TileResponse { url, coord, result: Ok(data) });
                        return;
                    }
                    Err(e) => {
                        log::warn!("tile {:?} download failed on attempt {}: {}", coord, attempt, e);
                        last_error = e.to_string();
                        if attempt < attempts {
                            thread::sleep(retry_delay);
                        }
                    }
                }
            }
            log::error!("giving up on tile {:?}", coord);
            finish(&pending, &tx, TileResponse { url, coord, result: Err(last_error) });
        });
        true
    }
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let resp = HTTP_CLIENT.get(url).send()?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

fn finish(pending: &Mutex<HashSet<String>>, tx: &Sender<TileResponse>, response: TileResponse) {
    if let Ok(mut pending) = pending.lock() {
        pending.remove(&response.url);
    }
    // receiver gone means the viewer closed
    let _ = tx.send(response);
}
