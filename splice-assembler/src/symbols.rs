//! Symbol table
//!
//! Maps assembly mnemonics to byte codes. Lookups that fail yield the
//! [`UNRESOLVED`] sentinel instead of an error; the packed word then carries
//! 0xFF in that field and the VM rejects it when the instruction executes.

use splice_spec::operand::{
    AdcsAction, AdcsParam, Comparison, FnMode, FpuConst, GpsParam, ImagerAction, ImagerParam,
    Instrument, MovMode, NmfParam, StrFormat, VxmParam,
};
use splice_spec::{Opcode, Register};
use std::collections::HashMap;

/// Sentinel for a symbol that could not be resolved
pub const UNRESOLVED: i32 = -1;

/// Operand symbol table
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<&'static str, u8>,
}

impl SymbolTable {
    /// Table with every SPLICE operand mnemonic
    pub fn new() -> Self {
        let mut symbols = HashMap::new();

        macro_rules! insert_all {
            ($($ty:ty),+ $(,)?) => {
                $(
                    for v in <$ty>::ALL {
                        symbols.insert(v.mnemonic(), v.to_u8());
                    }
                )+
            };
        }

        insert_all!(
            MovMode,
            StrFormat,
            FnMode,
            Comparison,
            Instrument,
            AdcsParam,
            ImagerParam,
            GpsParam,
            NmfParam,
            VxmParam,
            FpuConst,
            AdcsAction,
            ImagerAction,
        );

        Self { symbols }
    }

    /// Resolve an opcode mnemonic
    pub fn opcode(&self, name: &str) -> i32 {
        Opcode::from_mnemonic(name).map_or(UNRESOLVED, |op| op.to_u8() as i32)
    }

    /// Resolve an operand mnemonic (register, prefix, operator, instrument,
    /// parameter or action)
    pub fn operand(&self, name: &str) -> i32 {
        if let Some(reg) = Register::from_name(name) {
            return reg.id() as i32;
        }
        self.symbols.get(name).map_or(UNRESOLVED, |code| *code as i32)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operand(name) != UNRESOLVED
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
