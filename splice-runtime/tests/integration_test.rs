//! Integration tests for the SPLICE runtime

use splice_assembler::assemble;
use splice_runtime::{RuntimeError, Vm};
use splice_spec::{
    pack_float, ImageFormat, ImagerCommand, LogLevel, TaskId, TaskStatus, Telemetry, VmConfig,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn vm_with(tasks: &[&[&str]]) -> Vm {
    init_tracing();
    let mut vm = Vm::new(VmConfig::DEFAULT).unwrap();
    for lines in tasks {
        vm.load_task(assemble(lines).unwrap()).unwrap();
    }
    vm
}

/// Run `ticks` ticks and collect every VM log line
fn run_ticks(vm: &mut Vm, ticks: u32) -> Vec<(u64, String)> {
    let mut log = Vec::new();
    for _ in 0..ticks {
        let report = vm.tick().unwrap();
        let out = vm.drain_outbox();
        log.extend(out.log.into_iter().map(|line| (report.vm_time, line)));
    }
    log
}

const FMA_SAMPLE: &[&str] = &[
    "1,1,10,7",
    "OP_LEA, FREG_A, 1, 1",
    "OP_LEA, FREG_B, 1, 2",
    "OP_LEA, FREG_C, 1, 3",
    "OP_FMA, FREG_A, FREG_B, FREG_C",
    "OP_MOV, PRE_MOV_RAM, FREG_C, 3",
    "OP_STR, PRE_STR_FPU, FREG_C",
    "OP_HLT",
    "1.0f",
    "2.0f",
    "1.0f",
];

// ============================================================================
// Sample Program
// ============================================================================

#[test]
fn test_fma_sample_prints_at_ten_seconds() {
    let mut vm = vm_with(&[FMA_SAMPLE]);
    let log = run_ticks(&mut vm, 10);
    assert_eq!(log, vec![(10, "1:1:3.0".to_string())]);
    assert_eq!(vm.task_status(TaskId::new(1, 1)), TaskStatus::Completed);
}

#[test]
fn test_fma_sample_accumulates_through_memory() {
    let mut vm = vm_with(&[FMA_SAMPLE]);
    let log = run_ticks(&mut vm, 20);
    assert_eq!(
        log,
        vec![(10, "1:1:3.0".to_string()), (20, "1:1:7.0".to_string())]
    );
    let id = TaskId::new(1, 1);
    assert_eq!(vm.memory().read(id, 3).unwrap(), Some(pack_float(7.0)));
}

#[test]
fn test_periodic_task_is_unmet_between_runs() {
    let mut vm = vm_with(&[FMA_SAMPLE]);
    let id = TaskId::new(1, 1);
    let report = vm.tick().unwrap();
    assert_eq!(report.unready, vec![id]);
    assert_eq!(vm.task_status(id), TaskStatus::ConditionUnmet);
}

// ============================================================================
// Task Isolation
// ============================================================================

#[test]
fn test_fault_does_not_touch_other_tasks() {
    let faulty: &[&str] = &[
        "1,1,127,4",
        "OP_MOV, PRE_MOV_RAM, AREG_A, 0",
        "OP_FMA, AREG_A, FREG_B, FREG_C",
        "OP_HLT",
        "5i",
    ];
    let healthy: &[&str] = &[
        "1,2,127,4",
        "OP_LEA, AREG_A, 2, 0",
        "OP_STR, PRE_STR_ALU, AREG_A",
        "OP_HLT",
        "42i",
    ];
    let mut vm = vm_with(&[faulty, healthy]);
    let before = vm.memory().get(TaskId::new(1, 2)).unwrap().task.clone();

    let report = vm.tick().unwrap();
    assert_eq!(report.status_of(TaskId::new(1, 1)), Some(TaskStatus::ErrorOpcode));
    assert_eq!(report.status_of(TaskId::new(1, 2)), Some(TaskStatus::Completed));
    assert_eq!(vm.memory().get(TaskId::new(1, 2)).unwrap().task, before);

    let log: Vec<_> = vm.drain_outbox().log.into_iter().collect();
    assert_eq!(log, vec!["1:1:ERROR bad operand at 2", "1:2:42"]);
}

#[test]
fn test_task_status_gate() {
    let first: &[&str] = &["1,1,127,2", "OP_HLT"];
    let second: &[&str] = &[
        "1,2,127,5",
        "OP_LEA, AREG_A, 2, 0",
        "OP_CMP, TSX_EQ, 1, AREG_A",
        "OP_STR, PRE_STR_ALU, AREG_A",
        "OP_HLT",
        "255i",
    ];
    let mut vm = vm_with(&[first, second]);
    let log = run_ticks(&mut vm, 1);
    assert_eq!(log, vec![(1, "1:2:255".to_string())]);
}

#[test]
fn test_task_status_gate_fails_for_unloaded() {
    let gate: &[&str] = &[
        "1,2,127,4",
        "OP_LEA, AREG_A, 2, 0",
        "OP_CMP, TSX_EQ, 7, AREG_A",
        "OP_HLT",
        "255i",
    ];
    let mut vm = vm_with(&[gate]);
    let log = run_ticks(&mut vm, 1);
    assert_eq!(log, vec![(1, "1:2:INFO condition unmet at 2".to_string())]);
    assert_eq!(vm.task_status(TaskId::new(1, 2)), TaskStatus::ConditionUnmet);
}

#[test]
fn test_lea_from_unloaded_task_is_fatal() {
    let reader: &[&str] = &["1,1,127,3", "OP_LEA, AREG_A, 9, 0", "OP_HLT"];
    let mut vm = vm_with(&[reader]);
    assert_eq!(
        vm.tick(),
        Err(RuntimeError::TaskNotLoaded { group: 1, task: 9 })
    );
}

#[test]
fn test_lea_copies_non_float_word_into_fpu() {
    let copier: &[&str] = &[
        "1,1,127,4",
        "OP_LEA, FREG_A, 1, 0",
        "OP_MOV, PRE_MOV_RAM, FREG_A, 1",
        "OP_HLT",
        "-1i",
        "0i",
    ];
    let mut vm = vm_with(&[copier]);
    let id = TaskId::new(1, 1);

    assert!(run_ticks(&mut vm, 1).is_empty());
    assert_eq!(vm.task_status(id), TaskStatus::Completed);
    assert_eq!(vm.memory().read(id, 1).unwrap(), Some(0xFFFF_FFFF));
}

// ============================================================================
// Instruments
// ============================================================================

#[test]
fn test_get_reads_the_mirror() {
    let task: &[&str] = &[
        "1,1,127,5",
        "OP_GET, INST_GPS, P_GPS_ALTT, FREG_A",
        "OP_STR, PRE_STR_FPU, FREG_A",
        "OP_ACT, INST_IMG, A_IMG_DO_JPG, AREG_A",
        "OP_HLT",
    ];
    let mut vm = vm_with(&[task]);
    let mut telemetry = Telemetry::default();
    telemetry.gps.alt = 512.5;
    vm.sync_telemetry(telemetry);

    vm.tick().unwrap();
    let out = vm.drain_outbox();
    assert_eq!(out.log.front().map(String::as_str), Some("1:1:512.5"));
    assert_eq!(
        out.imager,
        vec![ImagerCommand::Snapshot {
            format: ImageFormat::Jpg
        }]
    );
}

#[test]
fn test_set_log_level_from_bytecode() {
    let task: &[&str] = &[
        "1,1,127,5",
        "OP_LEA, AREG_A, 1, 0",
        "OP_SET, INST_VXM, P_VXM_DBUG, AREG_A",
        "OP_STR, PRE_STR_ALU, AREG_A",
        "OP_HLT",
        "1i",
    ];
    let mut vm = vm_with(&[task]);
    let log = run_ticks(&mut vm, 1);
    assert!(log.is_empty());
    assert_eq!(vm.config().log_level, LogLevel::Error);
}

#[test]
fn test_vm_time_and_nmf_clock() {
    let task: &[&str] = &[
        "1,1,127,5",
        "OP_GET, INST_VXM, P_VXM_TIME, AREG_A",
        "OP_GET, INST_NMF, P_NMF_TIME, AREG_B",
        "OP_STR, PRE_STR_ALU, AREG_A",
        "OP_STR, PRE_STR_ALU, AREG_B",
    ];
    let mut vm = vm_with(&[task]);
    vm.set_nmf_clock(1_606_595_176);
    let log = run_ticks(&mut vm, 3);
    let lines: Vec<_> = log.into_iter().map(|(_, line)| line).collect();
    assert_eq!(
        &lines[4..],
        &["1:1:3".to_string(), "1:1:1606595176".to_string()]
    );
}

#[test]
fn test_log_capacity() {
    let mut config = VmConfig::DEFAULT;
    config.max_log_lines = 2;
    let mut vm = Vm::new(config).unwrap();
    let task = assemble(&[
        "1,1,127,5",
        "OP_STR, PRE_STR_ALU, AREG_A",
        "OP_STR, PRE_STR_ALU, AREG_B",
        "OP_STR, PRE_STR_ALU, AREG_C",
        "OP_HLT",
    ])
    .unwrap();
    vm.load_task(task).unwrap();
    vm.tick().unwrap();
    assert_eq!(vm.bus().dropped_lines(), 1);
    assert_eq!(vm.drain_outbox().log.len(), 2);
}
