use criterion::{criterion_group, criterion_main, Criterion};
use regression_driver::config::parse_config_str;
use regression_driver::core::analysis::scan_log;
use regression_driver::core::fault_link::link_faults;
use regression_driver::models::{CaseOutcome, CaseStatus, ExecResult};
use std::hint::black_box;
use std::path::{Path, PathBuf};

/// A simulator-like log: many info lines, a handful of errors, a pass marker.
fn synthetic_log(lines: usize) -> String {
    let mut log = String::with_capacity(lines * 64);
    for i in 0..lines {
        if i % 5000 == 4999 {
            log.push_str(&format!("UVM_ERROR @ {}ns [SCB] data mismatch at 0x{:X}\n", i * 10, i));
        } else {
            log.push_str(&format!("UVM_INFO @ {}ns [SEQ] item {} sent\n", i * 10, i));
        }
    }
    log.push_str("TEST PASSED\n");
    log
}

fn bench_scan_log(c: &mut Criterion) {
    let cfg = parse_config_str("[config]\nsim_mode = \"all\"\n", Path::new(".")).unwrap();
    let patterns = cfg.compile_patterns().unwrap();
    let log = synthetic_log(100_000);

    c.bench_function("scan_log_100k_lines", |b| {
        b.iter(|| scan_log(black_box(&log), &patterns));
    });
}

fn bench_link_faults(c: &mut Criterion) {
    let outcomes = (0..2_000)
        .map(|i| CaseOutcome {
            name: format!("case_{i}"),
            status: if i % 3 == 0 { CaseStatus::Passed } else { CaseStatus::Failed },
            log_path: PathBuf::from(format!("log/case_{i}.log")),
            error_count: 1,
            first_error: Some(format!(
                "UVM_ERROR @ {}ns [CHK{}] timeout at 0x{:X}",
                i * 7,
                i % 12,
                i * 16
            )),
        })
        .collect();
    let result = ExecResult::new(outcomes);

    c.bench_function("link_faults_2k_cases", |b| {
        b.iter(|| link_faults(black_box(&result)));
    });
}

criterion_group!(benches, bench_scan_log, bench_link_faults);
criterion_main!(benches);
