use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kore_device::{Backend, Device, DeviceError, DeviceType, UNSPECIFIED_INDEX};

const BANNER: &str = r#"
 _  _____  ____  _____
| |/ / _ \|  _ \| ____|
| ' / | | | |_) |  _|
| . \ |_| |  _ <| |___
|_|\_\___/|_| \_\_____|"#;

#[derive(Parser)]
#[command(
    name = "kore",
    about = "Kore device tool",
    long_about = "Inspect, validate and convert Kore device strings.\n\nA device is a type (cpu, cuda) plus an optional index, written as\n`cpu`, `cpu:0` or `cuda:1`.",
    version,
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List device types and the backend table
    Info,
    /// Parse a device string and show its parts
    Parse {
        /// Device string, e.g. cuda:1
        #[arg(env = "KORE_DEVICE", default_value = "cpu")]
        descriptor: String,
    },
    /// Build a device from a type and index
    Check {
        /// Device type: cpu or cuda
        #[arg(long = "type", value_parser = parse_device_type)]
        device_type: DeviceType,
        /// Device index (-1 for the current device)
        #[arg(long, default_value_t = UNSPECIFIED_INDEX, allow_hyphen_values = true)]
        index: i32,
    },
    /// Build a device from a backend name (CPU, CUDA, SparseCPU, SparseCUDA)
    Backend {
        #[arg(value_parser = parse_backend)]
        backend: Backend,
        /// Device index (-1 for the current device)
        #[arg(long, default_value_t = UNSPECIFIED_INDEX, allow_hyphen_values = true)]
        index: i32,
    },
}

fn parse_device_type(s: &str) -> Result<DeviceType, String> {
    s.parse().map_err(|e: kore_device::ParseError| e.to_string())
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse().map_err(|e: kore_device::ParseError| e.to_string())
}

/// What the CLI prints for a successfully built device.
#[derive(Debug, PartialEq, Serialize)]
struct DeviceReport {
    device: Device,
    device_type: DeviceType,
    index: i32,
    has_index: bool,
    is_accelerator: bool,
}

impl From<Device> for DeviceReport {
    fn from(device: Device) -> Self {
        Self {
            device,
            device_type: device.device_type(),
            index: device.index(),
            has_index: device.has_index(),
            is_accelerator: device.is_accelerator(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info => cmd_info(cli.json),
        Commands::Parse { descriptor } => {
            report(Device::parse(&descriptor), cli.json)
                .with_context(|| format!("invalid device string {:?}", descriptor))
        }
        Commands::Check { device_type, index } => {
            report(Device::new(device_type, index), cli.json)
                .with_context(|| format!("cannot build a {} device with index {}", device_type, index))
        }
        Commands::Backend { backend, index } => {
            report(Device::from_backend(backend, index), cli.json)
                .with_context(|| format!("cannot build a device from backend {}", backend))
        }
    }
}

fn report(result: Result<Device, DeviceError>, json: bool) -> anyhow::Result<()> {
    let device = result.map_err(|e| {
        tracing::debug!(kind = ?e.kind(), "device construction failed: {}", e);
        e
    })?;
    tracing::info!(%device, "device built");

    let report = DeviceReport::from(device);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Device:      {}", report.device);
        println!("  type:      {}", report.device_type);
        println!("  index:     {}", report.index);
        println!("  has_index: {}", report.has_index);
        println!("  accel:     {}", report.is_accelerator);
    }
    Ok(())
}

#[derive(Serialize)]
struct BackendRow {
    backend: Backend,
    name: &'static str,
    sparse: bool,
    device_type: Option<DeviceType>,
}

fn backend_table() -> Vec<BackendRow> {
    Backend::ALL
        .iter()
        .map(|b| BackendRow {
            backend: *b,
            name: b.as_str(),
            sparse: b.is_sparse(),
            device_type: b.device_type(),
        })
        .collect()
}

fn cmd_info(json: bool) -> anyhow::Result<()> {
    let rows = backend_table();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", BANNER);
    println!("  v{}  -  Device tool\n", env!("CARGO_PKG_VERSION"));

    println!("Device types");
    for ty in [DeviceType::Cpu, DeviceType::Cuda] {
        let range = if ty == DeviceType::Cpu { "-1 or 0" } else { "-1 or >= 0" };
        println!("  {:<6} index {}", ty, range);
    }

    println!("\nBackends");
    println!("  {:<18} {:>8} {:>8}", "Backend", "Sparse", "Device");
    println!("  {}", "-".repeat(36));
    for row in rows {
        let device = row
            .device_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<18} {:>8} {:>8}", row.name, row.sparse, device);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_accepts_sentinel_index() {
        let cli = Cli::try_parse_from(["kore", "check", "--type", "cuda", "--index", "-1"]).unwrap();
        match cli.command {
            Commands::Check { device_type, index } => {
                assert_eq!(device_type, DeviceType::Cuda);
                assert_eq!(index, -1);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_unknown_backend_rejected_by_clap() {
        assert!(Cli::try_parse_from(["kore", "backend", "metal"]).is_err());
    }

    #[test]
    fn test_report_fields() {
        let report = DeviceReport::from(Device::cuda(2).unwrap());
        assert_eq!(report.index, 2);
        assert!(report.has_index);
        assert!(report.is_accelerator);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["device"], "cuda:2");
        assert_eq!(json["device_type"], "cuda");
    }

    #[test]
    fn test_report_propagates_error() {
        let err = report(Device::new(DeviceType::Cpu, 4), true).unwrap_err();
        assert!(err.downcast_ref::<DeviceError>().is_some());
    }

    #[test]
    fn test_backend_table_covers_all() {
        let rows = backend_table();
        assert_eq!(rows.len(), Backend::ALL.len());
        assert!(rows.iter().any(|r| r.device_type.is_none()));
    }
}
