// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use octofit_api::Client;
use octofit_app::{LoadOutcome, LoadTicket, ResourceKind, normalize_body};
use octofit_testkit::DemoDataset;
use octofit_tui::{AppRuntime, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

/// Fetches collections from the live API on background threads.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn outcome_from(client: &Client, resource: ResourceKind) -> LoadOutcome {
    match client.fetch_collection(resource) {
        Ok(fetched) => LoadOutcome::Loaded(fetched),
        Err(error) => LoadOutcome::Failed(error.to_string()),
    }
}

impl AppRuntime for ApiRuntime {
    fn endpoint(&self, resource: ResourceKind) -> String {
        self.client.endpoint(resource)
    }

    fn load_collection(&mut self, resource: ResourceKind) -> LoadOutcome {
        outcome_from(&self.client, resource)
    }

    fn spawn_load(
        &mut self,
        resource: ResourceKind,
        ticket: LoadTicket,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name(format!("load-{}", resource.as_str()))
            .spawn(move || {
                let outcome = outcome_from(&client, resource);
                let _ = tx.send(InternalEvent::LoadFinished {
                    resource,
                    ticket,
                    outcome,
                });
            })
            .with_context(|| format!("spawn loader for {}", resource.as_str()))?;
        Ok(())
    }
}

/// Serves a fixed dataset in-process, for `--demo`.
pub struct DemoRuntime {
    dataset: DemoDataset,
}

impl DemoRuntime {
    pub fn new(dataset: DemoDataset) -> Self {
        Self { dataset }
    }
}

impl AppRuntime for DemoRuntime {
    fn endpoint(&self, resource: ResourceKind) -> String {
        format!("demo://{}/", resource.as_str())
    }

    fn load_collection(&mut self, resource: ResourceKind) -> LoadOutcome {
        LoadOutcome::Loaded(normalize_body(self.dataset.body(resource)))
    }
}
