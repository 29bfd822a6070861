//! The probe run: one login, the configured checks, one logout, one report.
//!
//! [`run_probe`] is the whole plugin behind the command line. It never
//! returns an error; whatever goes wrong is folded into the [`Report`] as a
//! verdict downgrade, because a monitoring probe answers with a verdict even
//! when it cannot do its job.

use std::collections::BTreeSet;

use eveprobe_api::{EveClient, EveSession};
use eveprobe_config::{CheckPolicy, ProbeConfig};
use eveprobe_core::{LabId, Result};
use eveprobe_report::{PerfData, Report, Status};

/// First-line message when no check had anything to complain about.
const DEFAULT_MESSAGE: &str = "checked";

/// Lab list entry that expands to every lab on the server.
const ALL_LABS_DIRECTIVE: &str = "all";

/// Run the whole probe: log in, read the subsystem counters, check the
/// configured labs, log out.
///
/// Failures before login (bad connection parameters, rejected credentials)
/// short-circuit to an UNKNOWN report. Once login succeeded, logout is
/// attempted on every path, and its failure is itself a finding.
pub async fn run_probe(config: &ProbeConfig) -> Report {
    let mut report = Report::new(DEFAULT_MESSAGE);
    report.set_json_labels(config.policy.json_labels);

    let client = match EveClient::new(&config.connection) {
        Ok(client) => client,
        Err(err) => {
            report.update_status(Status::Unknown, err.to_string());
            return report;
        }
    };
    let session = match client.login().await {
        Ok(session) => session,
        Err(err) => {
            report.update_status(Status::Unknown, err.to_string());
            return report;
        }
    };

    run_checks(&session, &config.policy, &mut report).await;

    if let Err(err) = session.logout().await {
        tracing::warn!("logout failed: {}", err);
        report.update_status(Status::Unknown, format!("logout failed: {err}"));
    }
    report
}

async fn run_checks(session: &EveSession, policy: &CheckPolicy, report: &mut Report) {
    check_subsystems(session, report).await;

    let labs = match resolve_labs(session, &policy.labs).await {
        Ok(labs) => labs,
        Err(err) => {
            report.update_status(Status::Unknown, format!("cannot resolve the lab list: {err}"));
            return;
        }
    };
    for lab in &labs {
        check_lab(session, policy, lab, report).await;
    }
}

/// Report the running-instance counter of every subsystem the server knows
/// about. Counters the server does not report yield no data point at all.
async fn check_subsystems(session: &EveSession, report: &mut Report) {
    let status = match session.subsystem_status().await {
        Ok(status) => status,
        Err(err) => {
            report.update_status(Status::Unknown, err.to_string());
            return;
        }
    };
    for (subsystem, value) in status.gauges() {
        let point = PerfData::gauge(subsystem.metric_name(), value);
        if let Err(err) = report.add_perfdata(point) {
            report.update_status(
                Status::Unknown,
                format!("cannot record performance data: {err}"),
            );
        }
    }
}

/// Expand the operator's lab list into the set of labs to check.
///
/// Every `all` entry is dropped; if there was at least one, the server's
/// full catalog is merged in. The set form means a lab named both
/// explicitly and via `all` is checked once.
async fn resolve_labs(session: &EveSession, requested: &[String]) -> Result<BTreeSet<LabId>> {
    let mut labs: BTreeSet<LabId> = requested
        .iter()
        .filter(|name| name.as_str() != ALL_LABS_DIRECTIVE)
        .map(|name| LabId::new(name.as_str()))
        .collect();
    if requested.iter().any(|name| name.as_str() == ALL_LABS_DIRECTIVE) {
        labs.extend(session.list_all_labs().await?);
    }
    tracing::debug!("checking {} labs", labs.len());
    Ok(labs)
}

async fn check_lab(session: &EveSession, policy: &CheckPolicy, lab: &LabId, report: &mut Report) {
    let nodes = match session.lab_nodes(lab).await {
        Ok(nodes) => nodes,
        Err(err) => {
            if policy.labs_exist && err.is_lab_not_found() {
                report.update_status(Status::Critical, format!("lab {lab} does not exist!"));
            } else {
                report.update_status(Status::Unknown, format!("cannot inspect lab {lab}: {err}"));
            }
            return;
        }
    };

    // Exclusion silences the verdict only; the counts keep every node.
    let mut nodes_up = 0.0;
    let mut nodes_down = 0.0;
    for node in nodes.values() {
        if node.is_up() {
            nodes_up += 1.0;
            continue;
        }
        nodes_down += 1.0;
        if policy.all_nodes_up && !policy.is_excluded(&node.uuid) {
            report.update_status(
                Status::Critical,
                format!(
                    "node {} ({}) in lab {} is down! (uuid: {})",
                    node.name, node.image, lab, node.uuid
                ),
            );
        }
    }
    tracing::debug!("lab '{}': {} up, {} down", lab, nodes_up, nodes_down);

    if policy.lab_performance_data {
        let up = PerfData::gauge("nodes_up", nodes_up).with_label(lab.as_str());
        let down = PerfData::gauge("nodes_down", nodes_down).with_label(lab.as_str());
        for point in [up, down] {
            if let Err(err) = report.add_perfdata(point) {
                report.update_status(
                    Status::Unknown,
                    format!("cannot record performance data: {err}"),
                );
            }
        }
    }
}
