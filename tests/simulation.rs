// ==============================================
// SIMULATION DRIVER TESTS (integration)
// ==============================================
//
// File-backed traces through `Simulator` and the `lirsim` binary.

use std::io::Write;
use std::process::Command;

use lirsim::config::CacheConfig;
use lirsim::error::{SimError, TraceError};
use lirsim::sim::{Experiment, PolicyKind, Simulator};
use tempfile::NamedTempFile;

const SCENARIO: &str = "1,R\n2,R\n3,R\n1,R\n2,R\n4,R\n1,R\n2,R\n3,R\n";

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn loop_trace(blocks: u64, rounds: u64) -> String {
    let mut text = String::new();
    for _ in 0..rounds {
        for block in 0..blocks {
            text.push_str(&format!("{block},R\n"));
        }
    }
    text
}

// ==============================================
// Simulator
// ==============================================

mod simulator {
    use super::*;

    #[test]
    fn scenario_from_file() {
        let file = trace_file(SCENARIO);
        let sim = Simulator::new(file.path());
        let config = CacheConfig::try_with_capacities(2, 1).unwrap();
        let report = sim.run(&Experiment::lirs(config)).unwrap();

        assert_eq!(report.stats.hits, 4);
        assert_eq!(report.stats.misses, 5);
        assert_eq!(report.summary_line(), "!LIRS|3|4|9|");
    }

    #[test]
    fn run_all_keeps_experiment_order() {
        let file = trace_file(&loop_trace(50, 20));
        let sim = Simulator::new(file.path());
        let sizes = [10usize, 40, 60, 100];
        let experiments: Vec<_> = sizes
            .iter()
            .map(|&size| Experiment::lirs(CacheConfig::try_new(size, 10).unwrap()))
            .collect();

        let results = sim.run_all(&experiments);
        assert_eq!(results.len(), sizes.len());
        for (result, &size) in results.iter().zip(&sizes) {
            let report = result.as_ref().unwrap();
            assert_eq!(report.stats.cache_size, size);
            assert_eq!(report.stats.accesses(), 1_000);
        }

        // A cache holding the whole loop only misses on first touch.
        let full = results[3].as_ref().unwrap();
        assert_eq!(full.stats.misses, 50);
    }

    #[test]
    fn concurrent_runs_match_sequential_runs() {
        let file = trace_file(&loop_trace(30, 10));
        let sim = Simulator::new(file.path());
        let experiments = [
            Experiment::lirs(CacheConfig::try_new(20, 10).unwrap()),
            Experiment::new(PolicyKind::Lru, CacheConfig::try_new(20, 10).unwrap()),
        ];

        let concurrent = sim.run_all(&experiments);
        for (experiment, result) in experiments.iter().zip(concurrent) {
            let sequential = sim.run(experiment).unwrap();
            assert_eq!(result.unwrap().stats, sequential.stats);
        }
    }

    #[test]
    fn long_mixed_trace_replays_cleanly() {
        let mut state = 7u64;
        let mut text = String::new();
        for line in 0..2_000u64 {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let op = if line % 5 == 0 { 'W' } else { 'R' };
            text.push_str(&format!("{},{op}\n", (state >> 33) % 30));
        }
        let file = trace_file(&text);
        let sim = Simulator::new(file.path());
        let report = sim
            .run(&Experiment::lirs(CacheConfig::try_new(10, 20).unwrap()))
            .unwrap();

        assert_eq!(report.stats.accesses(), 2_000);
        assert_eq!(report.stats.writes, 400);
    }

    #[test]
    fn failing_trace_fails_every_experiment_independently() {
        let file = trace_file("1,R\n2,R\nbogus,R\n3,R\n");
        let sim = Simulator::new(file.path());
        let experiments = [
            Experiment::lirs(CacheConfig::try_new(4, 25).unwrap()),
            Experiment::new(PolicyKind::Lru, CacheConfig::try_new(4, 25).unwrap()),
        ];

        for result in sim.run_all(&experiments) {
            match result {
                Err(SimError::Trace(err)) => assert_eq!(err.line(), Some(3)),
                other => panic!("expected trace error, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_trace_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let sim = Simulator::new(dir.path().join("absent.trace"));
        let err = sim
            .run(&Experiment::lirs(CacheConfig::new(10).unwrap()))
            .unwrap_err();
        assert!(matches!(err, SimError::Trace(TraceError::Open { .. })));
    }

    #[test]
    fn cancelled_simulator_stops_all_experiments() {
        let file = trace_file(&loop_trace(10, 5));
        let sim = Simulator::new(file.path());
        sim.cancel_flag()
            .store(true, std::sync::atomic::Ordering::Relaxed);

        let experiments = [Experiment::lirs(CacheConfig::new(8).unwrap())];
        for result in sim.run_all(&experiments) {
            assert!(matches!(result, Err(SimError::Cancelled { .. })));
        }
    }
}

// ==============================================
// Command line
// ==============================================

mod cli {
    use super::*;

    fn lirsim() -> Command {
        Command::new(env!("CARGO_BIN_EXE_lirsim"))
    }

    #[test]
    fn prints_summary_line_per_size() {
        let file = trace_file(&loop_trace(20, 5));
        let output = lirsim()
            .arg(file.path())
            .args(["100", "200", "--quiet"])
            .env("RUST_LOG", "off")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines, ["!LIRS|100|80|100|", "!LIRS|200|80|100|"]);
    }

    #[test]
    fn full_report_and_lru_policy() {
        let file = trace_file(SCENARIO);
        let output = lirsim()
            .arg(file.path())
            .arg("3")
            .args(["--policy", "lru"])
            .env("RUST_LOG", "off")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("cache size : 3"));
        assert!(stdout.contains("!LRU|3|"));
    }

    #[test]
    fn lru_accepts_single_block_cache() {
        let file = trace_file(SCENARIO);
        let output = lirsim()
            .arg(file.path())
            .args(["1", "--policy", "lru", "--quiet"])
            .env("RUST_LOG", "off")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(stdout.trim(), "!LRU|1|0|9|");
    }

    #[test]
    fn missing_trace_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let output = lirsim()
            .arg(dir.path().join("absent.trace"))
            .arg("10")
            .env("RUST_LOG", "off")
            .output()
            .unwrap();

        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("does not exist"));
    }

    #[test]
    fn invalid_size_fails_but_others_still_run() {
        let file = trace_file(SCENARIO);
        let output = lirsim()
            .arg(file.path())
            .args(["0", "3", "--quiet"])
            .env("RUST_LOG", "off")
            .output()
            .unwrap();

        assert!(!output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(stdout.trim(), "!LIRS|3|4|9|");
    }
}
