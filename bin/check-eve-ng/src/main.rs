use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use eveprobe_config::{
    load_from_path, CheckPolicy, ConnectionConfig, FileConfig, ProbeConfig, Protocol,
};
use eveprobe_core::Result;
use eveprobe_report::Report;
use eveprobe_telemetry;

/// Exit code monitoring cores read as UNKNOWN.
const UNKNOWN_EXIT: i32 = 3;

/// check_eve_ng - EVE-NG monitoring plugin
///
/// One probe run per invocation:
/// - Log in to the EVE-NG HTTP API
/// - Report the running-instance counter of every virtualization subsystem
///   (iol, dynamips, qemu, docker, vpcs) as performance data
/// - Check the configured labs against the given policy
/// - Log out, print one plugin-protocol line on stdout, exit with the
///   matching code (0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN)
///
/// Connection parameters come from the command line or from a TOML file
/// given via `--config PATH`; command-line values win per field. There are
/// no default search locations and no environment variables: monitoring
/// cores invoke plugins with explicit arguments.
#[derive(Debug, Parser)]
#[command(
    name = "check_eve_ng",
    version,
    about = "EVE-NG monitoring plugin",
    long_about = "check_eve_ng probes an EVE-NG server over its HTTP API: it reports the virtualization subsystem counters as performance data and checks lab and node health against the configured policy, Nagios-style.",
    disable_help_subcommand = true
)]
struct Cli {
    /// Host name or IP address of the EVE-NG server.
    #[arg(long = "hostname", short = 'H', value_name = "HOST")]
    hostname: Option<String>,

    /// Username for the EVE-NG API.
    #[arg(long = "username", value_name = "USER")]
    username: Option<String>,

    /// Password for the EVE-NG API.
    ///
    /// Prefer supplying the password via `--config` so it does not show up
    /// in the process list.
    #[arg(long = "password", value_name = "PASS")]
    password: Option<String>,

    /// Port of the EVE-NG API.
    ///
    /// Defaults to the standard port of the chosen protocol (443, or 80
    /// with `--force-http`).
    #[arg(long = "port", value_name = "PORT")]
    port: Option<u16>,

    /// Use plain http towards the server instead of https.
    #[arg(long = "force-http", action = ArgAction::SetTrue)]
    force_http: bool,

    /// Lab to monitor; repeat the flag for several labs.
    ///
    /// Folder-qualified names (`folder/lab`) address labs inside folders;
    /// give the name without the `.unl` extension. The special value `all`
    /// expands to every lab on the server.
    #[arg(long = "lab", value_name = "LAB")]
    labs: Vec<String>,

    /// Alert CRITICAL when a node in a monitored lab is not running.
    #[arg(long = "all-nodes-up", action = ArgAction::SetTrue)]
    all_nodes_up: bool,

    /// Alert CRITICAL when a monitored lab does not exist on the server.
    ///
    /// Only meaningful for explicitly named labs; `--lab all` alone is
    /// rejected in combination with this flag, since the server cannot miss
    /// a lab taken from its own catalog.
    #[arg(long = "labs-exist", action = ArgAction::SetTrue)]
    labs_exist: bool,

    /// Emit nodes_up/nodes_down performance data for every monitored lab.
    #[arg(long = "lab-performance-data", action = ArgAction::SetTrue)]
    lab_performance_data: bool,

    /// Node UUID to exempt from `--all-nodes-up`; repeat for several nodes.
    #[arg(long = "exclude-node", value_name = "UUID")]
    exclude_nodes: Vec<String>,

    /// Render performance-data labels as JSON objects.
    ///
    /// Emits the structured `'{"metric":...,"label":...}'` key form instead
    /// of the flat `metric_label` form.
    #[arg(long = "performance-data-json-label", action = ArgAction::SetTrue)]
    performance_data_json_label: bool,

    /// Path to a TOML file with connection parameters.
    ///
    /// Its `[connection]` table may set hostname, username, password,
    /// force_http and port.
    #[arg(long = "config", short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (overrides RUST_LOG if set).
    ///
    /// Accepts standard tracing levels (trace, debug, info, warn, error) or
    /// a full filter expression. Diagnostics never touch stdout, so the
    /// plugin line stays parseable.
    #[arg(long = "log-level", short = 'L', value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialise telemetry as early as possible so subsequent failures are
    // logged through the configured subscriber. Diagnostics go to stderr;
    // stdout is reserved for the plugin line.
    if let Err(err) = eveprobe_telemetry::init(cli.log_level.as_deref()) {
        eprintln!("check_eve_ng: failed to initialise telemetry: {}", err);
        process::exit(UNKNOWN_EXIT);
    }

    // The only fallible step in assembly is the config file; its error
    // names the file and the cause, and is printed verbatim.
    let config = match assemble_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("cannot assemble the probe configuration: {}", err);
            println!("{}", err);
            process::exit(UNKNOWN_EXIT);
        }
    };

    // Reject contradictory flag combinations before any network activity.
    if let Err(err) = config.validate() {
        tracing::error!("configuration validation failed: {}", err);
        println!("invalid arguments: {}", err);
        process::exit(UNKNOWN_EXIT);
    }

    tracing::debug!(
        "probing {}://{} as '{}'",
        config.connection.protocol,
        config.connection.hostname,
        config.connection.username
    );

    let report = match run_probe_blocking(&config) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("cannot start the probe runtime: {}", err);
            println!("UNKNOWN: cannot start the probe runtime: {}", err);
            process::exit(UNKNOWN_EXIT);
        }
    };

    let (output, code) = report.finish();
    println!("{}", output);
    process::exit(code);
}

/// Merge command-line values over config-file values.
///
/// The file only carries connection parameters; the check policy comes from
/// the command line alone. Hostname and credential shape is validated later
/// by the session opener, inside the probe run, so a broken value yields an
/// UNKNOWN plugin line rather than a usage error.
fn assemble_config(cli: &Cli) -> Result<ProbeConfig> {
    let file = match cli.config.as_deref() {
        Some(path) => {
            let file = load_from_path(path)?;
            tracing::debug!("loaded connection defaults from {}", path.display());
            file
        }
        None => FileConfig::default(),
    };
    Ok(merge_config(cli, file))
}

fn merge_config(cli: &Cli, file: FileConfig) -> ProbeConfig {
    let defaults = file.connection;
    let force_http = cli.force_http || defaults.force_http.unwrap_or(false);
    let connection = ConnectionConfig {
        hostname: cli
            .hostname
            .clone()
            .or(defaults.hostname)
            .unwrap_or_default(),
        username: cli
            .username
            .clone()
            .or(defaults.username)
            .unwrap_or_default(),
        password: cli
            .password
            .clone()
            .or(defaults.password)
            .unwrap_or_default(),
        protocol: Protocol::from_force_http(force_http),
        port: cli.port.or(defaults.port),
    };
    let policy = CheckPolicy {
        labs: cli.labs.clone(),
        all_nodes_up: cli.all_nodes_up,
        labs_exist: cli.labs_exist,
        lab_performance_data: cli.lab_performance_data,
        exclude_nodes: cli.exclude_nodes.clone(),
        json_labels: cli.performance_data_json_label,
    };
    ProbeConfig { connection, policy }
}

/// Run the async probe under a Tokio runtime.
///
/// This helper exists so `main` can remain synchronous while the probe runs
/// asynchronously under the hood. One invocation, one thread; the probe has
/// no use for more.
fn run_probe_blocking(
    config: &ProbeConfig,
) -> std::result::Result<Report, Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(rt.block_on(eveprobe_checks::run_probe(config)))
}
