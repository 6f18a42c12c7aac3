// Collection cycle: timed capture pair, section containment, state carried between cycles

mod common;

use common::*;
use nodesnap::collector::{Collector, ReportState};
use nodesnap::extract::{MEM_FREE_BYTES, MEM_TOTAL_BYTES, RECEIVE_BYTES, TRANSMIT_BYTES};
use nodesnap::models::{MetricSample, USAGE_UNAVAILABLE};
use std::sync::Arc;
use std::time::Duration;

const DELAY: Duration = Duration::from_millis(1000);

fn previous_set() -> Vec<MetricSample> {
    cpu_samples("0", &[("idle", 100.0), ("user", 60.0), ("system", 40.0)])
}

fn last_set() -> Vec<MetricSample> {
    let mut samples = cpu_samples("0", &[("idle", 150.0), ("user", 90.0), ("system", 40.0)]);
    samples.push(sensor_label("platform_coretemp_0", "temp2", "Core 0"));
    samples.push(temp_reading("platform_coretemp_0", "temp2", 45.0));
    samples.push(MetricSample::counter(RECEIVE_BYTES, &[("device", "eth0")], 10.0));
    samples.push(MetricSample::counter(TRANSMIT_BYTES, &[("device", "eth0")], 20.0));
    samples.push(MetricSample::gauge(MEM_TOTAL_BYTES, &[], 8192.0));
    samples.push(MetricSample::gauge(MEM_FREE_BYTES, &[], 1024.0));
    samples
}

fn collector(source: ScriptedSource) -> Collector {
    Collector::new(
        Arc::new(source),
        Arc::new(FixedDisks(vec![disk("sda1")])),
        DELAY,
    )
}

#[tokio::test(start_paused = true)]
async fn capture_pair_waits_for_delay_and_keeps_sets_apart() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(previous_set()), Ok(last_set())]));
    let c = Collector::new(source.clone(), Arc::new(FixedDisks(vec![])), DELAY);
    let (previous, last) = c.capture_pair().await;

    let times = source.gather_times();
    assert_eq!(times.len(), 2);
    assert!(times[1] - times[0] >= DELAY);
    assert_eq!(previous.unwrap(), previous_set());
    assert_eq!(last.unwrap(), last_set());
}

#[tokio::test(start_paused = true)]
async fn run_cycle_assembles_every_section() {
    let c = collector(ScriptedSource::new(vec![Ok(previous_set()), Ok(last_set())]));
    let mut state = ReportState::default();
    let snapshot = c.run_cycle(&mut state).await;

    assert_eq!(snapshot.cpu.usage.len(), 1);
    assert_eq!(snapshot.cpu.usage[0].id, "0");
    assert_eq!(snapshot.cpu.usage[0].value, "0.38");

    assert_eq!(snapshot.cpu.temperature.len(), 1);
    assert_eq!(snapshot.cpu.temperature[0].id, "0_0");
    assert_eq!(snapshot.cpu.temperature[0].value, "45.00");

    assert_eq!(snapshot.network["eth0"].receive, 10.0);
    assert_eq!(snapshot.network["eth0"].transmit, 20.0);
    assert_eq!(snapshot.memory.total, 8192.0);
    assert_eq!(snapshot.memory.free, 1024.0);
    assert_eq!(snapshot.disks, vec![disk("sda1")]);
    assert_eq!(snapshot, state.snapshot());
}

#[tokio::test(start_paused = true)]
async fn failed_previous_capture_keeps_old_usage_but_refreshes_other_sections() {
    let c = collector(ScriptedSource::new(vec![
        Ok(previous_set()),
        Ok(last_set()),
        Err(unavailable()),
    ]));
    let mut state = ReportState::default();
    let first = c.run_cycle(&mut state).await;

    // Second cycle: previous capture fails, last capture repeats the final good set.
    let second = c.run_cycle(&mut state).await;
    assert_eq!(second.cpu.usage, first.cpu.usage);
    assert_eq!(second.memory, first.memory);
}

#[tokio::test(start_paused = true)]
async fn unavailable_source_leaves_defaults_without_failing() {
    let c = Collector::new(
        Arc::new(ScriptedSource::new(vec![])),
        Arc::new(FailingDisks),
        DELAY,
    );
    let mut state = ReportState::default();
    let snapshot = c.run_cycle(&mut state).await;
    assert!(snapshot.cpu.usage.is_empty());
    assert!(snapshot.cpu.temperature.is_empty());
    assert!(snapshot.network.is_empty());
    assert!(snapshot.disks.is_empty());
    assert_eq!(snapshot.memory.total, 0.0);
}

#[tokio::test(start_paused = true)]
async fn identical_captures_yield_unavailable_usage() {
    let c = collector(ScriptedSource::new(vec![Ok(previous_set()), Ok(previous_set())]));
    let mut state = ReportState::default();
    let snapshot = c.run_cycle(&mut state).await;
    assert_eq!(snapshot.cpu.usage[0].value, USAGE_UNAVAILABLE);
}

#[tokio::test(start_paused = true)]
async fn network_map_is_merged_across_cycles() {
    let mut second_last = cpu_samples("0", &[("idle", 200.0), ("user", 100.0)]);
    second_last.push(MetricSample::counter(RECEIVE_BYTES, &[("device", "wlan0")], 5.0));
    let c = collector(ScriptedSource::new(vec![
        Ok(previous_set()),
        Ok(last_set()),
        Ok(last_set()),
        Ok(second_last),
    ]));
    let mut state = ReportState::default();
    c.run_cycle(&mut state).await;
    let snapshot = c.run_cycle(&mut state).await;
    assert_eq!(snapshot.network.len(), 2);
    assert_eq!(snapshot.network["eth0"].transmit, 20.0);
    assert_eq!(snapshot.network["wlan0"].receive, 5.0);
    // Replaced wholesale: no memory metrics in the latest set.
    assert_eq!(snapshot.memory.total, 0.0);
}
