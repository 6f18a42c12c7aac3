// Linux procfs/sysfs readers: /proc/stat, /proc/meminfo, /proc/net/dev, /sys/class/hwmon.

use std::collections::BTreeMap;
use std::path::Path;

/// Kernel clock ticks per second used by /proc/stat.
const USER_HZ: f64 = 100.0;

/// Per-core CPU time in seconds, one field per mode.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CpuTimes {
    pub cpu: String,
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
}

impl CpuTimes {
    pub fn modes(&self) -> [(&'static str, f64); 8] {
        [
            ("user", self.user),
            ("nice", self.nice),
            ("system", self.system),
            ("idle", self.idle),
            ("iowait", self.iowait),
            ("irq", self.irq),
            ("softirq", self.softirq),
            ("steal", self.steal),
        ]
    }
}

/// Per-core lines of /proc/stat ("cpu0 ...", "cpu1 ..."); the aggregate "cpu" line is skipped.
pub(super) fn parse_proc_stat(content: &str) -> Vec<CpuTimes> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let cpu = fields.next()?.strip_prefix("cpu")?;
            if cpu.is_empty() || !cpu.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let ticks: Vec<f64> = fields
                .take(8)
                .map(|f| f.parse::<u64>().map(|t| t as f64 / USER_HZ))
                .collect::<Result<_, _>>()
                .ok()?;
            if ticks.len() < 4 {
                return None;
            }
            // Older kernels stop before the iowait/irq/steal columns.
            let tick = |i: usize| ticks.get(i).copied().unwrap_or(0.0);
            Some(CpuTimes {
                cpu: cpu.to_string(),
                user: tick(0),
                nice: tick(1),
                system: tick(2),
                idle: tick(3),
                iowait: tick(4),
                irq: tick(5),
                softirq: tick(6),
                steal: tick(7),
            })
        })
        .collect()
}

/// /proc/meminfo as (metric-safe field name, value). kB fields are converted to bytes.
pub(super) fn parse_meminfo(content: &str) -> Vec<(String, f64)> {
    content
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let mut parts = rest.split_whitespace();
            let value: f64 = parts.next()?.parse().ok()?;
            let value = match parts.next() {
                Some("kB") => value * 1024.0,
                _ => value,
            };
            let key = key
                .trim()
                .replace(['(', ')'], "_")
                .trim_end_matches('_')
                .to_string();
            Some((key, value))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct NetDevStats {
    pub device: String,
    pub rx_bytes: f64,
    pub rx_packets: f64,
    pub tx_bytes: f64,
    pub tx_packets: f64,
}

/// /proc/net/dev rows after the two header lines.
pub(super) fn parse_net_dev(content: &str) -> Vec<NetDevStats> {
    content
        .lines()
        .skip(2)
        .filter_map(|line| {
            let (device, rest) = line.split_once(':')?;
            let fields: Vec<f64> = rest
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<_, _>>()
                .ok()?;
            if fields.len() < 16 {
                return None;
            }
            Some(NetDevStats {
                device: device.trim().to_string(),
                rx_bytes: fields[0],
                rx_packets: fields[1],
                tx_bytes: fields[8],
                tx_packets: fields[9],
            })
        })
        .collect()
}

/// One hwmon temperature channel.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct HwmonTemp {
    pub chip: String,
    pub sensor: String,
    pub celsius: Option<f64>,
    pub label: Option<String>,
}

/// Lowercase and replace anything outside `[a-z0-9:_]` with `_`, trimming `_`.
fn clean_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == ':' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

/// Stable chip name for a hwmon directory: `<bus>_<device>` from the resolved
/// device link (e.g. "platform_coretemp_0"), else the `name` file, else the directory name.
pub(super) fn hwmon_chip_name(hwmon_dir: &Path) -> String {
    if let Ok(device) = std::fs::canonicalize(hwmon_dir.join("device")) {
        let dev_name = device
            .file_name()
            .map(|n| clean_name(&n.to_string_lossy()))
            .unwrap_or_default();
        let dev_type = device
            .parent()
            .and_then(Path::file_name)
            .map(|n| clean_name(&n.to_string_lossy()))
            .unwrap_or_default();
        if !dev_type.is_empty() && !dev_name.is_empty() {
            return format!("{dev_type}_{dev_name}");
        }
        if !dev_name.is_empty() {
            return dev_name;
        }
    }
    if let Ok(name) = std::fs::read_to_string(hwmon_dir.join("name")) {
        let name = clean_name(&name);
        if !name.is_empty() {
            return name;
        }
    }
    hwmon_dir
        .file_name()
        .map(|n| clean_name(&n.to_string_lossy()))
        .unwrap_or_default()
}

/// Temperature channels (`tempN_input`, `tempN_label`) of every chip under `<sysfs>/class/hwmon`.
/// Older kernels expose the channel files under `hwmonX/device/` instead.
pub(super) fn read_hwmon_temps(sysfs_root: &Path) -> std::io::Result<Vec<HwmonTemp>> {
    let mut temps = Vec::new();
    let mut dirs: Vec<_> = std::fs::read_dir(sysfs_root.join("class/hwmon"))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    dirs.sort();

    for dir in dirs {
        let chip = hwmon_chip_name(&dir);
        let mut channels: BTreeMap<String, HwmonTemp> = BTreeMap::new();
        read_temp_channels(&dir.join("device"), &chip, &mut channels);
        read_temp_channels(&dir, &chip, &mut channels);
        temps.extend(channels.into_values());
    }
    Ok(temps)
}

/// Merge the `temp*` attributes found directly in `dir` into `channels`.
/// A missing or unreadable directory contributes nothing.
fn read_temp_channels(dir: &Path, chip: &str, channels: &mut BTreeMap<String, HwmonTemp>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some((sensor, attr)) = file_name.split_once('_') else {
            continue;
        };
        if !sensor.starts_with("temp") {
            continue;
        }
        let channel = || HwmonTemp {
            chip: chip.to_string(),
            sensor: sensor.to_string(),
            celsius: None,
            label: None,
        };
        match attr {
            "input" => {
                let millis = std::fs::read_to_string(entry.path())
                    .ok()
                    .and_then(|s| s.trim().parse::<f64>().ok());
                if let Some(millis) = millis {
                    channels.entry(sensor.to_string()).or_insert_with(channel).celsius =
                        Some(millis / 1000.0);
                }
            }
            "label" => {
                if let Ok(label) = std::fs::read_to_string(entry.path()) {
                    channels.entry(sensor.to_string()).or_insert_with(channel).label =
                        Some(label.trim().to_string());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_STAT: &str = "\
cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0
cpu1 1335 10 200 40000 5 1 2 3 0 0
intr 1462898
ctxt 5629924
";

    #[test]
    fn parse_proc_stat_reads_per_core_lines() {
        let cpus = parse_proc_stat(PROC_STAT);
        assert_eq!(cpus.len(), 2);
        assert_eq!(cpus[0].cpu, "0");
        assert!((cpus[0].idle - 133432.92).abs() < 1e-6);
        assert_eq!(cpus[1].cpu, "1");
        assert!((cpus[1].user - 13.35).abs() < 1e-9);
        assert!((cpus[1].steal - 0.03).abs() < 1e-9);
        assert_eq!(cpus[1].modes()[3], ("idle", 400.0));
    }

    #[test]
    fn parse_meminfo_converts_kb_and_cleans_names() {
        let content = "MemTotal:       16316412 kB\nMemFree:         1024 kB\nActive(anon):    10 kB\nHugePages_Total:       0\n";
        let fields = parse_meminfo(content);
        assert_eq!(fields[0], ("MemTotal".to_string(), 16316412.0 * 1024.0));
        assert_eq!(fields[1], ("MemFree".to_string(), 1024.0 * 1024.0));
        assert_eq!(fields[2], ("Active_anon".to_string(), 10240.0));
        assert_eq!(fields[3], ("HugePages_Total".to_string(), 0.0));
    }

    #[test]
    fn parse_net_dev_skips_headers() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 2776770   11307    0    0    0     0          0         0  2776770   11307    0    0    0     0       0          0
  eth0: 1215645    2751    0    0    0     0          0         0  1782404    4324    0    0    0   427       0          0
";
        let devs = parse_net_dev(content);
        assert_eq!(devs.len(), 2);
        assert_eq!(devs[1].device, "eth0");
        assert_eq!(devs[1].rx_bytes, 1215645.0);
        assert_eq!(devs[1].tx_bytes, 1782404.0);
        assert_eq!(devs[1].tx_packets, 4324.0);
    }

    #[test]
    fn clean_name_matches_metric_charset() {
        assert_eq!(clean_name("coretemp.0"), "coretemp_0");
        assert_eq!(clean_name("  NVMe \n"), "nvme");
    }

    #[test]
    fn hwmon_chip_name_prefers_device_path() {
        let root = tempfile::TempDir::new().unwrap();
        let device = root.path().join("devices/platform/coretemp.0");
        std::fs::create_dir_all(&device).unwrap();
        let hwmon = root.path().join("hwmon1");
        std::fs::create_dir_all(&hwmon).unwrap();
        std::fs::write(hwmon.join("name"), "coretemp\n").unwrap();
        assert_eq!(hwmon_chip_name(&hwmon), "coretemp");

        std::os::unix::fs::symlink(&device, hwmon.join("device")).unwrap();
        assert_eq!(hwmon_chip_name(&hwmon), "platform_coretemp_0");
    }

    #[test]
    fn read_hwmon_temps_includes_device_directory_channels() {
        let root = tempfile::TempDir::new().unwrap();
        let device = root.path().join("devices/platform/coretemp.0");
        std::fs::create_dir_all(&device).unwrap();
        std::fs::write(device.join("temp2_input"), "47000\n").unwrap();
        std::fs::write(device.join("temp2_label"), "Core 0\n").unwrap();

        let hwmon = root.path().join("class/hwmon/hwmon0");
        std::fs::create_dir_all(&hwmon).unwrap();
        std::fs::write(hwmon.join("name"), "coretemp\n").unwrap();
        std::fs::write(hwmon.join("temp1_input"), "45000\n").unwrap();
        std::os::unix::fs::symlink(&device, hwmon.join("device")).unwrap();

        let temps = read_hwmon_temps(root.path()).unwrap();
        assert_eq!(temps.len(), 2);
        assert_eq!(temps[0].chip, "platform_coretemp_0");
        assert_eq!(temps[0].sensor, "temp1");
        assert_eq!(temps[0].celsius, Some(45.0));
        assert_eq!(temps[1].sensor, "temp2");
        assert_eq!(temps[1].celsius, Some(47.0));
        assert_eq!(temps[1].label.as_deref(), Some("Core 0"));
    }
}
