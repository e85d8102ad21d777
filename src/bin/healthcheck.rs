// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Container health probe: exits 0 when `/health/ready` answers 200.

use std::{process::ExitCode, time::Duration};

use iota_did_service::config::{EnvSource, ProcessEnv, PORT_ENV};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let port = ProcessEnv.var_or(PORT_ENV, "8080");
    let url = format!("http://127.0.0.1:{port}/health/ready");

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("healthcheck: {e}");
            return ExitCode::FAILURE;
        }
    };

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => ExitCode::SUCCESS,
        Ok(response) => {
            eprintln!("healthcheck: {url} returned {}", response.status());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("healthcheck: {e}");
            ExitCode::FAILURE
        }
    }
}
