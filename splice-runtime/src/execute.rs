//! Instruction execution for the SPLICE VM
//!
//! Every handler reports an [`ExecStatus`]. Faults that belong to the
//! running task (wrong register class, division by zero, out of range
//! address) are statuses; only references to unloaded tasks are errors.

use crate::bus::VBus;
use crate::error::Result;
use crate::memory::TaskMemory;
use crate::state::{Value, VmState};
use splice_spec::register::same_class;
use splice_spec::{
    Action, AdcsCommand, AdcsParam, CmpOperand, Comparison, FnMode, GainChannel, GpsParam,
    ImagerCommand, ImagerParam, Instruction, LogLevel, MovMode, NmfParam, Param, Register,
    RegisterClass, StrFormat, TaskId, TrigFn, VxmParam,
};

/// Outcome of one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    /// Continue with the next word
    Fine,
    /// HLT reached
    Halt,
    /// A CMP evaluated to false
    CheckFalse,
    BadOperand(&'static str),
    UnknownOpcode(u8),
}

impl ExecStatus {
    /// Short reason used in VM error lines
    pub fn kind(self) -> &'static str {
        match self {
            ExecStatus::Fine => "fine",
            ExecStatus::Halt => "halt",
            ExecStatus::CheckFalse => "condition unmet",
            ExecStatus::BadOperand(_) => "bad operand",
            ExecStatus::UnknownOpcode(_) => "unknown opcode",
        }
    }

    #[inline]
    pub fn is_fault(self) -> bool {
        matches!(self, ExecStatus::BadOperand(_) | ExecStatus::UnknownOpcode(_))
    }
}

/// Everything an instruction may touch while task `current` runs
pub struct ExecContext<'a> {
    pub state: &'a mut VmState,
    pub memory: &'a mut TaskMemory,
    pub bus: &'a mut VBus,
    pub current: TaskId,
}

#[inline]
fn bad(reason: &'static str) -> ExecStatus {
    ExecStatus::BadOperand(reason)
}

/// Execute a single decoded instruction
pub fn execute(instr: &Instruction, ctx: &mut ExecContext<'_>) -> Result<ExecStatus> {
    let status = match *instr {
        Instruction::Nop => ExecStatus::Fine,
        Instruction::Hlt => ExecStatus::Halt,

        // ========== Memory ==========
        Instruction::Mov { mode, src, dest } => return mov(ctx, mode, src, dest),
        Instruction::Lea { dest, task, address } => {
            let id = TaskId::new(ctx.current.group, task);
            match ctx.memory.read(id, address as usize)? {
                Some(word) => {
                    ctx.state.registers.load_word(dest, word);
                    ExecStatus::Fine
                }
                None => bad("address outside the referenced task"),
            }
        }

        // ========== Control ==========
        Instruction::Cmp { op, lhs, rhs } => compare(ctx, op, lhs, rhs),

        // ========== Instruments ==========
        Instruction::Set { param, src } => set(ctx, param, src),
        Instruction::Get { param, dest } => get(ctx, param, dest),
        Instruction::Act { action, src } => act(ctx, action, src),

        // ========== Output ==========
        Instruction::Str { format, src } => store(ctx, format, src),

        // ========== Arithmetic ==========
        Instruction::Fma { a, b, c } => fma(ctx, a, b, c),
        Instruction::Fsd { a, b, c } => fsd(ctx, a, b, c),
        Instruction::Trig { func, mode, src, dest } => trig(ctx, func, mode, src, dest),
        Instruction::Pow { mode, src, dest } => pow(ctx, mode, src, dest),
        Instruction::Nor { a, b, c } => match same_class(&[a, b, c]) {
            Some(RegisterClass::Alu) => {
                let regs = &mut ctx.state.registers;
                regs.alu[c.index()] = !(regs.alu[a.index()] | regs.alu[b.index()]);
                ExecStatus::Fine
            }
            _ => bad("NOR needs integer registers"),
        },
    };

    Ok(status)
}

// ========== Memory ==========

fn mov(ctx: &mut ExecContext<'_>, mode: MovMode, src: Register, dest: u8) -> Result<ExecStatus> {
    let value = ctx.state.registers.read(src);
    let address = match mode {
        MovMode::Reg => {
            let Some(dest) = Register::from_id(dest) else {
                return Ok(bad("MOV destination is not a register"));
            };
            if dest.class() != src.class() {
                return Ok(bad("MOV between register classes"));
            }
            ctx.state.registers.write(dest, value);
            return Ok(ExecStatus::Fine);
        }
        MovMode::Ram => dest as usize,
        MovMode::Ind => {
            let Some(reg @ Register::Alu(_)) = Register::from_id(dest) else {
                return Ok(bad("indirect address must be an integer register"));
            };
            match usize::try_from(ctx.state.registers.read(reg).as_int()) {
                Ok(address) => address,
                Err(_) => return Ok(bad("negative indirect address")),
            }
        }
    };

    if ctx.memory.write(ctx.current, address, value.to_word())? {
        Ok(ExecStatus::Fine)
    } else {
        Ok(bad("address outside the task"))
    }
}

// ========== Control ==========

fn compare(ctx: &ExecContext<'_>, op: Comparison, lhs: CmpOperand, rhs: Register) -> ExecStatus {
    let regs = &ctx.state.registers;
    let truth = match lhs {
        CmpOperand::Task(task) => {
            if !rhs.is_alu() {
                return bad("task status compares against an integer register");
            }
            let status = ctx.memory.status(TaskId::new(ctx.current.group, task)).code();
            let expected = regs.alu[rhs.index()] as u32;
            match op {
                Comparison::TsxEq => status == expected,
                Comparison::TsxNe => status != expected,
                _ => return bad("register comparison on a task id"),
            }
        }
        CmpOperand::Reg(lhs) if op.is_alu() => {
            if !(lhs.is_alu() && rhs.is_alu()) {
                return bad("ALU comparison needs integer registers");
            }
            let (a, b) = (regs.alu[lhs.index()], regs.alu[rhs.index()]);
            match op {
                Comparison::AluEq => a == b,
                Comparison::AluNe if ctx.state.config.quirks.alu_ne_matches_eq => a == b,
                Comparison::AluNe => a != b,
                Comparison::AluGt => a > b,
                Comparison::AluLt => a < b,
                Comparison::AluGe => a >= b,
                Comparison::AluLe => a <= b,
                _ => return bad("unknown ALU comparison"),
            }
        }
        CmpOperand::Reg(lhs) if op.is_fpu() => {
            if !(lhs.is_fpu() && rhs.is_fpu()) {
                return bad("FPU comparison needs float registers");
            }
            let (a, b) = (regs.fpu[lhs.index()], regs.fpu[rhs.index()]);
            let eq = (a - b).abs() < ctx.state.config.fp_precision;
            match op {
                Comparison::FpuEq => eq,
                Comparison::FpuNe => !eq,
                Comparison::FpuGt => a > b && !eq,
                Comparison::FpuLt => a < b && !eq,
                _ => return bad("unknown FPU comparison"),
            }
        }
        CmpOperand::Reg(_) => return bad("task status comparison on a register"),
    };

    if truth {
        ExecStatus::Fine
    } else {
        ExecStatus::CheckFalse
    }
}

// ========== Instruments ==========

fn set(ctx: &mut ExecContext<'_>, param: Param, src: Register) -> ExecStatus {
    let value = ctx.state.registers.read(src);
    match param {
        Param::Imager(p) => {
            let level = value.as_float();
            if !level.is_finite() {
                return bad("imager setting is not finite");
            }
            let command = match (p, GainChannel::from_param(p)) {
                (_, Some(channel)) => ImagerCommand::SetGain { channel, value: level },
                (ImagerParam::Expose, None) => ImagerCommand::SetExposure(level),
                _ => return bad("read-only imager parameter"),
            };
            ctx.bus.push_imager(command);
        }
        Param::Vxm(p) => {
            let config = &mut ctx.state.config;
            match p {
                VxmParam::Precision => {
                    let eps = value.as_float();
                    if !(eps.is_finite() && eps > 0.0) {
                        return bad("precision must be positive");
                    }
                    config.fp_precision = eps;
                }
                VxmParam::Timeslice => match u32::try_from(value.as_int()) {
                    Ok(secs) if secs > 0 => config.timeslice = secs,
                    _ => return bad("timeslice must be at least one second"),
                },
                VxmParam::Debug => {
                    let level = u8::try_from(value.as_int()).ok().and_then(LogLevel::from_u8);
                    match level {
                        Some(level) => config.log_level = level,
                        None => return bad("unknown log level"),
                    }
                }
                VxmParam::Time => return bad("VM time is read only"),
            }
        }
        Param::Adcs(_) | Param::Gps(_) | Param::Fpu(_) | Param::Nmf(_) => {
            return bad("parameter is read only")
        }
    }
    ExecStatus::Fine
}

fn get(ctx: &mut ExecContext<'_>, param: Param, dest: Register) -> ExecStatus {
    let telemetry = ctx.bus.telemetry();
    let config = &ctx.state.config;
    let int = |v: i64| i32::try_from(v).map(Value::Int).ok();

    let value = match param {
        Param::Fpu(c) => Some(Value::Float(c.value())),
        Param::Vxm(p) => match p {
            VxmParam::Time => int(ctx.state.vm_time() as i64),
            VxmParam::Precision => Some(Value::Float(config.fp_precision)),
            VxmParam::Timeslice => int(config.timeslice as i64),
            VxmParam::Debug => Some(Value::Int(config.log_level.to_u8() as i32)),
        },
        Param::Nmf(NmfParam::Time) => int(ctx.state.nmf_clock),
        Param::Imager(p) => {
            let imager = &telemetry.imager;
            match (p, GainChannel::from_param(p)) {
                (_, Some(channel)) => Some(Value::Float(imager.gain[channel.index()])),
                (ImagerParam::Expose, None) => Some(Value::Float(imager.exposure)),
                (ImagerParam::Number, None) => int(imager.number as i64),
                _ => return bad("imager status is not readable"),
            }
        }
        Param::Gps(p) => {
            let gps = &telemetry.gps;
            match p {
                GpsParam::Latitude => Some(Value::Float(gps.lat)),
                GpsParam::Longitude => Some(Value::Float(gps.lng)),
                GpsParam::Altitude => Some(Value::Float(gps.alt)),
                GpsParam::Time => int(gps.time),
            }
        }
        Param::Adcs(p) => Some(adcs_value(ctx, p)),
    };

    match value {
        Some(value) => {
            ctx.state.registers.write(dest, value);
            ExecStatus::Fine
        }
        None => bad("value does not fit a register"),
    }
}

fn adcs_value(ctx: &ExecContext<'_>, param: AdcsParam) -> Value {
    let adcs = &ctx.bus.telemetry().adcs;
    let float = match param {
        AdcsParam::Mode => return Value::Int(adcs.mode.to_u8() as i32),
        AdcsParam::MagX => adcs.mag[0],
        AdcsParam::MagY => adcs.mag[1],
        AdcsParam::MagZ => adcs.mag[2],
        AdcsParam::SunX => adcs.sun[0],
        AdcsParam::SunY => adcs.sun[1],
        AdcsParam::SunZ => adcs.sun[2],
        AdcsParam::AngX => adcs.ang[0],
        AdcsParam::AngY => adcs.ang[1],
        AdcsParam::AngZ => adcs.ang[2],
        AdcsParam::QtnA => adcs.qtn[0],
        AdcsParam::QtnB => adcs.qtn[1],
        AdcsParam::QtnC => adcs.qtn[2],
        AdcsParam::QtnD => adcs.qtn[3],
        AdcsParam::MtqX => adcs.mtq[0],
        AdcsParam::MtqY => adcs.mtq[1],
        AdcsParam::MtqZ => adcs.mtq[2],
    };
    Value::Float(float)
}

fn act(ctx: &mut ExecContext<'_>, action: Action, src: Register) -> ExecStatus {
    match action {
        Action::Adcs(a) => {
            let Ok(duration) = u32::try_from(ctx.state.registers.read(src).as_int()) else {
                return bad("negative ADCS mode duration");
            };
            ctx.bus.push_adcs(AdcsCommand::SetMode {
                mode: a.into(),
                duration,
            });
        }
        Action::Imager(a) => ctx.bus.push_imager(ImagerCommand::Snapshot { format: a.into() }),
    }
    ExecStatus::Fine
}

// ========== Output ==========

fn store(ctx: &mut ExecContext<'_>, format: StrFormat, src: Register) -> ExecStatus {
    let text = match (format, src) {
        (StrFormat::Alu, Register::Alu(_)) => ctx.state.registers.alu[src.index()].to_string(),
        (StrFormat::Fpu, Register::Fpu(_)) => format!("{:?}", ctx.state.registers.fpu[src.index()]),
        (StrFormat::Bin, Register::Alu(_)) => {
            format!("{:032b}", ctx.state.registers.alu[src.index()] as u32)
        }
        _ => return bad("STR prefix does not match the register class"),
    };

    let config = &ctx.state.config;
    if config.log_level.allows(LogLevel::Info) {
        ctx.bus
            .push_log(format!("{}:{}", ctx.current, text), config.max_log_lines);
    }
    ExecStatus::Fine
}

// ========== Arithmetic ==========

#[inline]
fn finite(ctx: &mut ExecContext<'_>, dest: Register, value: f32) -> ExecStatus {
    if value.is_finite() {
        ctx.state.registers.fpu[dest.index()] = value;
        ExecStatus::Fine
    } else {
        bad("result is not a finite number")
    }
}

fn fma(ctx: &mut ExecContext<'_>, a: Register, b: Register, c: Register) -> ExecStatus {
    let regs = &mut ctx.state.registers;
    match same_class(&[a, b, c]) {
        Some(RegisterClass::Alu) => {
            let (va, vb, vc) = (regs.alu[a.index()], regs.alu[b.index()], regs.alu[c.index()]);
            regs.alu[c.index()] = vc.wrapping_mul(vb).wrapping_add(va);
            ExecStatus::Fine
        }
        Some(RegisterClass::Fpu) => {
            let (va, vb, vc) = (regs.fpu[a.index()], regs.fpu[b.index()], regs.fpu[c.index()]);
            finite(ctx, c, vc * vb + va)
        }
        None => bad("FMA mixes register classes"),
    }
}

fn fsd(ctx: &mut ExecContext<'_>, a: Register, b: Register, c: Register) -> ExecStatus {
    let eps = ctx.state.config.fp_precision;
    let checks_addend = ctx.state.config.quirks.fsd_checks_addend;
    let regs = &mut ctx.state.registers;
    match same_class(&[a, b, c]) {
        Some(RegisterClass::Alu) => {
            let (va, vb, vc) = (regs.alu[a.index()], regs.alu[b.index()], regs.alu[c.index()]);
            let guard = if checks_addend { va } else { vb };
            if guard == 0 {
                return bad("division by zero");
            }
            match vc.checked_div(vb) {
                Some(q) => {
                    regs.alu[c.index()] = q.wrapping_sub(va);
                    ExecStatus::Fine
                }
                None if vb == 0 => bad("division by zero"),
                None => bad("division overflow"),
            }
        }
        Some(RegisterClass::Fpu) => {
            let (va, vb, vc) = (regs.fpu[a.index()], regs.fpu[b.index()], regs.fpu[c.index()]);
            if vb.abs() < eps {
                return bad("division by zero");
            }
            finite(ctx, c, vc / vb - va)
        }
        None => bad("FSD mixes register classes"),
    }
}

fn trig(
    ctx: &mut ExecContext<'_>,
    func: TrigFn,
    mode: FnMode,
    src: Register,
    dest: Register,
) -> ExecStatus {
    if !(src.is_fpu() && dest.is_fpu()) {
        return bad("trigonometry needs float registers");
    }
    let x = ctx.state.registers.fpu[src.index()];
    let y = match (func, mode) {
        (TrigFn::Sin, FnMode::Normal) => x.sin(),
        (TrigFn::Sin, FnMode::Invert) => x.asin(),
        (TrigFn::Cos, FnMode::Normal) => x.cos(),
        (TrigFn::Cos, FnMode::Invert) => x.acos(),
        (TrigFn::Tan, FnMode::Normal) => x.tan(),
        (TrigFn::Tan, FnMode::Invert) => x.atan(),
    };
    finite(ctx, dest, y)
}

fn pow(ctx: &mut ExecContext<'_>, mode: FnMode, src: Register, dest: Register) -> ExecStatus {
    if !(src.is_fpu() && dest.is_fpu()) {
        return bad("POW needs float registers");
    }
    let x = ctx.state.registers.fpu[src.index()];
    let y = match mode {
        FnMode::Normal => ctx.state.registers.fpu[dest.index()].powf(x),
        FnMode::Invert => x.ln(),
    };
    finite(ctx, dest, y)
}
