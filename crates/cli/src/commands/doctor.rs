use std::net::ToSocketAddrs;

use catalogo_core::catalog::Catalog;
use catalogo_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_bind_addresses(&config));
            checks.push(check_catalog_seed(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "bind_address_resolution",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_seed",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_bind_addresses(config: &AppConfig) -> DoctorCheck {
    let api = (config.server.bind_address.as_str(), config.server.port);
    let health = (config.server.bind_address.as_str(), config.server.health_check_port);

    match (api.to_socket_addrs(), health.to_socket_addrs()) {
        (Ok(_), Ok(_)) => DoctorCheck {
            name: "bind_address_resolution",
            status: CheckStatus::Pass,
            details: format!(
                "`{}` resolves for ports {} (api) and {} (health)",
                config.server.bind_address, config.server.port, config.server.health_check_port
            ),
        },
        (Err(error), _) | (_, Err(error)) => DoctorCheck {
            name: "bind_address_resolution",
            status: CheckStatus::Fail,
            details: format!(
                "failed to resolve bind address `{}`: {error}",
                config.server.bind_address
            ),
        },
    }
}

fn check_catalog_seed(config: &AppConfig) -> DoctorCheck {
    let catalog =
        if config.catalog.seed_demo_data { Catalog::with_demo_data() } else { Catalog::new() };

    DoctorCheck {
        name: "catalog_seed",
        status: CheckStatus::Pass,
        details: format!("catalog starts with {} products", catalog.len()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
