// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use gallery_app::{ArtworkPage, PageRequest};
use gallery_catalog::Client;
use gallery_testkit::DemoCatalog;
use gallery_tui::{AppRuntime, FetchEvent, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

pub const DEMO_SEED: u64 = 42;
pub const DEMO_ARTWORKS: usize = 137;

/// Fetches pages from the remote catalog on a worker thread per request.
pub struct CatalogRuntime {
    client: Client,
}

impl CatalogRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for CatalogRuntime {
    fn fetch_page(&mut self, request: PageRequest) -> Result<ArtworkPage> {
        self.client.fetch_page(request.index, request.size)
    }

    fn spawn_fetch_page(&mut self, request: PageRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("fetch-{}", request.request_id))
            .spawn(move || {
                let event = match client.fetch_page(request.index, request.size) {
                    Ok(page) => FetchEvent::Loaded {
                        request_id: request.request_id,
                        page,
                    },
                    Err(error) => FetchEvent::Failed {
                        request_id: request.request_id,
                        error: format!("{error:#}"),
                    },
                };
                if tx.send(InternalEvent::Fetch(event)).is_err() {
                    tracing::debug!(
                        request_id = request.request_id,
                        "fetch finished after UI shut down"
                    );
                }
            })
            .context("spawn fetch thread")?;
        Ok(())
    }
}

/// Offline catalog for `--demo`; pages are served inline.
pub struct DemoRuntime {
    catalog: DemoCatalog,
}

impl DemoRuntime {
    pub fn new() -> Self {
        Self {
            catalog: DemoCatalog::new(DEMO_SEED, DEMO_ARTWORKS),
        }
    }
}

impl Default for DemoRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl AppRuntime for DemoRuntime {
    fn fetch_page(&mut self, request: PageRequest) -> Result<ArtworkPage> {
        Ok(self.catalog.page(request.index, request.size))
    }
}
