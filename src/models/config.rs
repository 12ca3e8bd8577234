// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::env;

const DEFAULT_PORT: u16 = 3000;

/// Agent configuration, read once at startup from the hosting environment.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Upstream endpoint serving the precomputed corpus.
    pub api_url: String,
    /// Permitted cross-origin value for the `Access-Control-Allow-Origin` header.
    pub cross_origin_url: String,
    /// Listen port for the HTTP server.
    pub port: u16,
}

impl AgentConfig {
    /// Read configuration from environment variables.
    /// Panics if a required variable is missing or invalid.
    pub fn from_env() -> Self {
        let api_url = env::var("API_URL").expect("API_URL environment variable must be set");
        url::Url::parse(&api_url).expect("API_URL must be a valid URL");

        let cross_origin_url = env::var("CROSS_ORIGIN_URL")
            .expect("CROSS_ORIGIN_URL environment variable must be set");

        let port = match env::var("PORT") {
            Ok(raw) => Self::parse_port(&raw),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            api_url,
            cross_origin_url,
            port,
        }
    }

    /// Parse a listen port value.
    /// Panics if the value is not a valid port number.
    fn parse_port(raw: &str) -> u16 {
        raw.parse()
            .unwrap_or_else(|_| panic!("PORT must be a valid port number, got: {}", raw))
    }
}
