//! # SPLICE Runtime
//!
//! Execute SPLICE tasks on the onboard virtual machine.
//!
//! ## Features
//!
//! - **Register file**: 16 integer and 32 floating-point registers
//! - **Task memory**: flat arena of loaded tasks, addressed by `(group, task)`
//! - **Scheduler**: frequency-coded readiness, one pass per tick in id order
//! - **Bus mirror**: telemetry snapshot for GET, outbox for SET/ACT/STR
//!
//! ## Example
//!
//! ```rust
//! use splice_runtime::Vm;
//! use splice_spec::{TaskHeader, VmConfig};
//!
//! let mut vm = Vm::new(VmConfig::DEFAULT).unwrap();
//! let id = vm
//!     .load_words(vec![TaskHeader::new(1, 1, 0x7F, 2).to_word(), 0x0700_0000])
//!     .unwrap();
//! let report = vm.tick().unwrap();
//! assert!(report.ran(id));
//! ```

pub mod error;
pub mod state;
pub mod memory;
pub mod bus;
pub mod execute;
pub mod scheduler;
pub mod vm;

pub use bus::{Outbox, VBus};
pub use error::{Result, RuntimeError};
pub use execute::{execute, ExecContext, ExecStatus};
pub use memory::{TaskMemory, TaskSlot};
pub use scheduler::{readiness, Readiness, TaskRun, TickReport};
pub use state::{RegisterFile, Value, VmState};
pub use vm::Vm;
