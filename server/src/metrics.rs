//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use anyhow::{anyhow, Context, Result};
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Request metrics middleware, exposed at `/metrics`.
pub fn build() -> Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow!("metrics builder: {e}"))
}

/// Application counters, registered next to the request metrics.
#[derive(Clone)]
pub struct Counters {
    pub logins: IntCounterVec,
    pub upstream_failures: IntCounter,
}

impl Counters {
    pub fn new() -> Result<Self> {
        Ok(Counters {
            logins: IntCounterVec::new(
                Opts::new("logins_total", "Completed logins by kind"),
                &["kind"],
            )?,
            upstream_failures: IntCounter::new(
                "upstream_failures_total",
                "Failed calls to the Twitch API",
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> Result<()> {
        registry
            .register(Box::new(self.logins.clone()))
            .context("registering logins_total")?;
        registry
            .register(Box::new(self.upstream_failures.clone()))
            .context("registering upstream_failures_total")?;
        Ok(())
    }

    pub fn login(&self, created: bool) {
        let kind = if created { "new" } else { "returning" };
        self.logins.with_label_values(&[kind]).inc();
    }
}
