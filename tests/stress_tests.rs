//! Stress tests: many tasks, maximum-size tasks, long missions

use splice_assembler::assemble;
use splice_mission::{CircularOrbit, Mission, MissionConfig, MissionSimulator, EVENT_LOG_CAPACITY};
use splice_runtime::Vm;
use splice_spec::{TaskId, TaskStatus, VmConfig, MAX_TASK_WORDS};

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/splice-mission/tests/fixtures/mission_44878.json"
);

/// A task that prints `group * 100 + task` every second
fn printer(group: u8, task: u8) -> Vec<String> {
    vec![
        format!("{},{},127,4", group, task),
        format!("OP_LEA, AREG_A, {}, 0", task),
        "OP_STR, PRE_STR_ALU, AREG_A".to_string(),
        "OP_HLT".to_string(),
        format!("{}i", group as u32 * 100 + task as u32),
    ]
}

fn mission() -> (MissionSimulator<CircularOrbit>, Mission) {
    let config = MissionConfig::from_path(FIXTURE).unwrap();
    let sim = MissionSimulator::new(CircularOrbit);
    let mission = sim.create_from_config(&config).unwrap();
    (sim, mission)
}

// ============================================================================
// Scheduler
// ============================================================================

#[test]
fn test_many_tasks_run_in_id_order() {
    let mut vm = Vm::new(VmConfig {
        max_log_lines: 4096,
        ..VmConfig::DEFAULT
    })
    .unwrap();

    // load in reverse so that insertion order disagrees with id order
    for group in (1..=16u8).rev() {
        for task in (1..=8u8).rev() {
            vm.load_task(assemble(&printer(group, task)).unwrap()).unwrap();
        }
    }
    assert_eq!(vm.memory().len(), 128);

    let report = vm.tick().unwrap();
    assert_eq!(report.runs.len(), 128);
    assert!(report.runs.iter().all(|run| run.status == TaskStatus::Completed));

    let log: Vec<String> = vm.drain_outbox().log.into_iter().collect();
    let expected: Vec<String> = (1..=16u32)
        .flat_map(|g| (1..=8u32).map(move |t| format!("{}:{}:{}", g, t, g * 100 + t)))
        .collect();
    assert_eq!(log, expected);
}

#[test]
fn test_sustained_ticks_keep_every_task_alive() {
    let mut vm = Vm::new(VmConfig {
        max_log_lines: 4096,
        ..VmConfig::DEFAULT
    })
    .unwrap();
    for group in 1..=4u8 {
        for task in 1..=4u8 {
            vm.load_task(assemble(&printer(group, task)).unwrap()).unwrap();
        }
    }

    let mut lines = 0;
    for _ in 0..1000 {
        vm.tick().unwrap();
        lines += vm.drain_outbox().log.len();
    }
    assert_eq!(lines, 16 * 1000);
    assert_eq!(vm.vm_time(), 1000);
}

#[test]
fn test_log_capacity_under_load() {
    let mut vm = Vm::new(VmConfig {
        max_log_lines: 10,
        ..VmConfig::DEFAULT
    })
    .unwrap();
    for task in 1..=20u8 {
        vm.load_task(assemble(&printer(1, task)).unwrap()).unwrap();
    }
    vm.tick().unwrap();

    let log: Vec<String> = vm.drain_outbox().log.into_iter().collect();
    assert_eq!(log.len(), 10);
    assert_eq!(log.first().unwrap(), "1:11:111");
    assert_eq!(log.last().unwrap(), "1:20:120");
}

// ============================================================================
// Task Size
// ============================================================================

fn largest_task() -> Vec<String> {
    let mut lines = vec!["1,1,127,255".to_string()];
    lines.extend((0..252).map(|_| "OP_LEA, AREG_A, 1, 255".to_string()));
    lines.push("OP_STR, PRE_STR_ALU, AREG_A".to_string());
    lines.push("OP_HLT".to_string());
    lines.extend((0..256).map(|k| format!("{}i", k)));
    lines
}

#[test]
fn test_largest_task_runs() {
    let lines = largest_task();
    assert_eq!(lines.len(), MAX_TASK_WORDS);

    let mut vm = Vm::new(VmConfig::DEFAULT).unwrap();
    let id = vm.load_task(assemble(&lines).unwrap()).unwrap();
    vm.tick().unwrap();

    assert_eq!(vm.task_status(id), TaskStatus::Completed);
    let log: Vec<String> = vm.drain_outbox().log.into_iter().collect();
    assert_eq!(log, ["1:1:255"]);
}

#[test]
fn test_oversized_task_is_rejected() {
    let mut lines = largest_task();
    lines.push("0i".to_string());
    assert!(assemble(&lines).is_err());
}

// ============================================================================
// Long Missions
// ============================================================================

#[test]
fn test_two_orbit_mission_stays_physical() {
    let (sim, mut mission) = mission();
    for _ in 0..20 {
        mission = sim.simulate_steps(mission, 600).unwrap();
        let track = mission.environment.ground_track.unwrap();
        assert!((-90.0..=90.0).contains(&track.lat));
        assert!((-180.0..=180.0).contains(&track.lng));
        assert!((400.0..700.0).contains(&track.alt), "altitude {}", track.alt);
    }

    assert_eq!(mission.environment.elapsed_timer, 12_000);
    assert_eq!(mission.environment.event_log().len(), EVENT_LOG_CAPACITY);
    assert_eq!(
        mission.environment.event_log().back().unwrap().message(),
        "Mission event 12000"
    );
    assert_eq!(
        mission.environment.current_date.to_string(),
        "23:46:16, 28 Nov 2020"
    );
}

#[test]
fn test_identical_runs_are_deterministic() {
    let run = || {
        let (sim, mission) = mission();
        let mut mission = sim.load_task(mission, &printer(3, 1)).unwrap();
        for step in 0..30 {
            mission = sim.simulate_steps(mission, 20).unwrap();
            if step % 7 == 0 {
                mission = sim.execute_action(mission, "take_photo").unwrap();
            }
        }
        mission
    };

    let a = run();
    let b = run();
    assert_eq!(a, b);
    assert_eq!(a.hash_id().unwrap(), b.hash_id().unwrap());
    assert_eq!(a.satellite.snapshots().len(), 5);
    assert_eq!(
        a.satellite.subsystems.obdh.vm().task_status(TaskId::new(3, 1)),
        TaskStatus::Completed
    );
}
