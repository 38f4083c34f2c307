//! Integration tests for the SPLICE assembler
//!
//! Assembles full task listings and checks the packed words through the
//! decoder, so operand placement is verified against the instruction model.

use proptest::prelude::*;
use splice_assembler::{assemble, assemble_source, Assembler};
use splice_disassembler::decode;
use splice_spec::operand::{AdcsAction, GpsParam, ImagerAction, VxmParam};
use splice_spec::{
    pack_float, pack_int, Action, CmpOperand, Comparison, FnMode, Instruction, MovMode, Param,
    Register, StrFormat, TaskHeader, TrigFn,
};

// ============================================================================
// Full Listings
// ============================================================================

#[test]
fn test_fma_sample_listing() {
    let lines = [
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
    let task = assemble(&lines).unwrap();

    assert_eq!(task.header, TaskHeader::new(1, 1, 10, 7));
    assert_eq!(task.len(), lines.len());
    assert_eq!(task.data(), &[pack_float(1.0), pack_float(2.0), pack_float(1.0)]);

    assert_eq!(
        decode(task.words[1]).unwrap(),
        Instruction::Lea {
            dest: Register::Fpu(0x10),
            task: 1,
            address: 1
        }
    );
    assert_eq!(
        decode(task.words[4]).unwrap(),
        Instruction::Fma {
            a: Register::Fpu(0x10),
            b: Register::Fpu(0x11),
            c: Register::Fpu(0x12)
        }
    );
    assert_eq!(
        decode(task.words[5]).unwrap(),
        Instruction::Mov {
            mode: MovMode::Ram,
            src: Register::Fpu(0x12),
            dest: 3
        }
    );
    assert_eq!(
        decode(task.words[6]).unwrap(),
        Instruction::Str {
            format: StrFormat::Fpu,
            src: Register::Fpu(0x12)
        }
    );
    assert_eq!(decode(task.words[7]).unwrap(), Instruction::Hlt);
}

#[test]
fn test_instrument_listing() {
    let task = assemble(&[
        "3,2,0x3C,7",
        "OP_GET, INST_GPS, P_GPS_LATT, FREG_A",
        "OP_GET, INST_VXM, P_VXM_TIME, AREG_A",
        "OP_SET, INST_VXM, P_VXM_PRSN, FREG_B",
        "OP_ACT, INST_IMG, A_IMG_DO_JPG, AREG_A",
        "OP_ACT, INST_ADC, A_ADC_NADIR, AREG_B",
        "OP_CMP, TSX_EQ, 1, AREG_C",
        "60i",
    ])
    .unwrap();

    let decoded: Vec<_> = task.code().iter().map(|w| decode(*w).unwrap()).collect();
    assert_eq!(
        decoded,
        vec![
            Instruction::Get {
                param: Param::Gps(GpsParam::Latitude),
                dest: Register::Fpu(0x10)
            },
            Instruction::Get {
                param: Param::Vxm(VxmParam::Time),
                dest: Register::Alu(0)
            },
            Instruction::Set {
                param: Param::Vxm(VxmParam::Precision),
                src: Register::Fpu(0x11)
            },
            Instruction::Act {
                action: Action::Imager(ImagerAction::Jpg),
                src: Register::Alu(0)
            },
            Instruction::Act {
                action: Action::Adcs(AdcsAction::Nadir),
                src: Register::Alu(1)
            },
            Instruction::Cmp {
                op: Comparison::TsxEq,
                lhs: CmpOperand::Task(1),
                rhs: Register::Alu(2)
            },
        ]
    );
    assert_eq!(task.data(), &[pack_int(60)]);
}

#[test]
fn test_math_listing() {
    let task = assemble_source(
        "1,2,127,5
         OP_SIN, PRE_NORMAL, FREG_A, FREG_B
         OP_TAN, PRE_INVERT, FREG_B, FREG_C
         OP_POW, PRE_INVERT, FREG_C, FREG_D
         OP_NOR, AREG_A, AREG_B, AREG_C",
    )
    .unwrap();

    assert_eq!(
        decode(task.words[2]).unwrap(),
        Instruction::Trig {
            func: TrigFn::Tan,
            mode: FnMode::Invert,
            src: Register::Fpu(0x11),
            dest: Register::Fpu(0x12)
        }
    );
    assert_eq!(
        decode(task.words[4]).unwrap(),
        Instruction::Nor {
            a: Register::Alu(0),
            b: Register::Alu(1),
            c: Register::Alu(2)
        }
    );
}

// ============================================================================
// Word Layout
// ============================================================================

#[test]
fn test_one_word_per_line() {
    let lines = ["9,9,0,4", "OP_NOP", "OP_NOP", "OP_HLT", "1i", "2i", "3.5f"];
    let task = assemble(&lines).unwrap();
    assert_eq!(task.words.len(), lines.len());
    assert_eq!(task.data().len(), 3);
}

#[test]
fn test_hex_and_decimal_immediates_agree() {
    let a = assemble(&["1,1,127,2", "OP_LEA, AREG_A, 0x01, 0x0A"]).unwrap();
    let b = assemble(&["1,1,127,2", "OP_LEA, AREG_A, 1, 10"]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_mnemonic_comma_optional() {
    let a = assemble(&["1,1,127,2", "OP_FMA FREG_A, FREG_B, FREG_C"]).unwrap();
    let b = assemble(&["1,1,127,2", "OP_FMA, FREG_A, FREG_B, FREG_C"]).unwrap();
    assert_eq!(a.words, b.words);
}

#[test]
fn test_assembler_reuse() {
    let asm = Assembler::new();
    let first = asm.assemble(&["1,1,127,1"]).unwrap();
    let second = asm.assemble(&["1,2,127,1"]).unwrap();
    assert_ne!(first.id(), second.id());
    assert!(asm.symbols().contains("P_IMG_NUMBER"));
}

proptest! {
    #[test]
    fn prop_header_fields_survive(group: u8, task: u8, freq in 0u8..=0x7F, offset in 1u8..=2) {
        let header = format!("{},{},{},{}", group, task, freq, offset);
        let assembled = assemble(&[header.as_str(), "OP_HLT", "0i"]).unwrap();
        prop_assert_eq!(assembled.header, TaskHeader::new(group, task, freq, offset));
    }

    #[test]
    fn prop_int_literal_packs(value: i32) {
        let literal = format!("{}i", value);
        let task = assemble(&["1,1,127,1", literal.as_str()]).unwrap();
        prop_assert_eq!(task.words[1], pack_int(value));
    }
}
