//! # Operand Vocabularies
//!
//! Closed sets of codes that appear in operand fields: addressing prefixes,
//! comparison operators, instruments, instrument parameters and actions.
//! Codes overlap between vocabularies; which one applies is decided by the
//! opcode (and, for parameters and actions, by the instrument).

use serde::{Deserialize, Serialize};

/// Declares a byte-coded operand enum with its assembly mnemonics.
macro_rules! operand_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $mnemonic:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Decode from the operand byte
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }

            #[inline]
            pub const fn to_u8(self) -> u8 {
                self as u8
            }

            /// Assembly mnemonic
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( $name::$variant => $mnemonic, )+
                }
            }

            /// Look up by assembly mnemonic
            pub fn from_mnemonic(name: &str) -> Option<Self> {
                match name {
                    $( $mnemonic => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.mnemonic())
            }
        }
    };
}

// ========== Prefixes ==========

operand_enum! {
    /// MOV addressing mode
    pub enum MovMode {
        /// Register to register
        Reg = 0x01 => "PRE_MOV_REG",
        /// Register to task memory, immediate address
        Ram = 0x02 => "PRE_MOV_RAM",
        /// Register to task memory, address held in an integer register
        Ind = 0x03 => "PRE_MOV_IND",
    }
}

operand_enum! {
    /// STR display mode
    pub enum StrFormat {
        /// Integer, decimal
        Alu = 0x01 => "PRE_STR_ALU",
        /// Float, decimal
        Fpu = 0x02 => "PRE_STR_FPU",
        /// Integer, 32-bit binary
        Bin = 0x03 => "PRE_STR_BIN",
    }
}

operand_enum! {
    /// Direction of trigonometric and power functions
    pub enum FnMode {
        Normal = 0x01 => "PRE_NORMAL",
        Invert = 0x02 => "PRE_INVERT",
    }
}

// ========== Comparison ==========

operand_enum! {
    /// CMP operator
    pub enum Comparison {
        AluEq = 0x01 => "ALU_EQ",
        AluNe = 0x02 => "ALU_NE",
        AluGt = 0x03 => "ALU_GT",
        AluLt = 0x04 => "ALU_LT",
        AluGe = 0x05 => "ALU_GE",
        AluLe = 0x06 => "ALU_LE",
        FpuEq = 0x07 => "FPU_EQ",
        FpuNe = 0x08 => "FPU_NE",
        FpuGt = 0x09 => "FPU_GT",
        FpuLt = 0x0A => "FPU_LT",
        /// Status of another task equals an integer register
        TsxEq = 0x0D => "TSX_EQ",
        /// Status of another task differs from an integer register
        TsxNe = 0x0E => "TSX_NE",
    }
}

impl Comparison {
    #[inline]
    pub const fn is_alu(self) -> bool {
        (self as u8) >= 0x01 && (self as u8) <= 0x06
    }

    #[inline]
    pub const fn is_fpu(self) -> bool {
        (self as u8) >= 0x07 && (self as u8) <= 0x0A
    }

    #[inline]
    pub const fn is_task_status(self) -> bool {
        matches!(self, Comparison::TsxEq | Comparison::TsxNe)
    }
}

// ========== Instruments ==========

operand_enum! {
    /// Instrument addressed by GET / SET / ACT
    pub enum Instrument {
        /// Attitude determination and control
        Adc = 0x01 => "INST_ADC",
        Gps = 0x02 => "INST_GPS",
        /// Imager payload
        Img = 0x03 => "INST_IMG",
        /// Floating-point constants
        Fpu = 0x04 => "INST_FPU",
        /// External (ground) clock
        Nmf = 0x06 => "INST_NMF",
        /// VM internal settings
        Vxm = 0x07 => "INST_VXM",
    }
}

// ========== Parameters ==========

operand_enum! {
    /// ADCS parameters
    pub enum AdcsParam {
        Mode = 0x01 => "P_ADC_MODE",
        MagX = 0x02 => "P_ADC_MAGX",
        MagY = 0x03 => "P_ADC_MAGY",
        MagZ = 0x04 => "P_ADC_MAGZ",
        SunX = 0x05 => "P_ADC_SUNX",
        SunY = 0x06 => "P_ADC_SUNY",
        SunZ = 0x07 => "P_ADC_SUNZ",
        AngX = 0x08 => "P_ADC_ANGX",
        AngY = 0x09 => "P_ADC_ANGY",
        AngZ = 0x0A => "P_ADC_ANGZ",
        QtnA = 0x0B => "P_ADC_QTNA",
        QtnB = 0x0C => "P_ADC_QTNB",
        QtnC = 0x0D => "P_ADC_QTNC",
        QtnD = 0x0E => "P_ADC_QTND",
        MtqX = 0x0F => "P_ADC_MTQX",
        MtqY = 0x10 => "P_ADC_MTQY",
        MtqZ = 0x11 => "P_ADC_MTQZ",
    }
}

operand_enum! {
    /// Imager parameters
    pub enum ImagerParam {
        GainR = 0x01 => "P_IMG_GAIN_R",
        GainG = 0x02 => "P_IMG_GAIN_G",
        GainB = 0x03 => "P_IMG_GAIN_B",
        Expose = 0x04 => "P_IMG_EXPOSE",
        /// Reserved, never readable
        Status = 0x05 => "P_IMG_STATUS",
        /// Number of snapshots taken
        Number = 0x06 => "P_IMG_NUMBER",
    }
}

operand_enum! {
    /// GPS parameters
    pub enum GpsParam {
        Latitude = 0x01 => "P_GPS_LATT",
        Longitude = 0x02 => "P_GPS_LONG",
        Altitude = 0x03 => "P_GPS_ALTT",
        Time = 0x04 => "P_GPS_TIME",
    }
}

operand_enum! {
    /// External clock parameters
    pub enum NmfParam {
        Time = 0x01 => "P_NMF_TIME",
    }
}

operand_enum! {
    /// VM settings
    pub enum VxmParam {
        /// VM time in seconds (read only)
        Time = 0x01 => "P_VXM_TIME",
        /// Float comparison precision
        Precision = 0x02 => "P_VXM_PRSN",
        /// Scheduler timeslice in seconds
        Timeslice = 0x03 => "P_VXM_TLSC",
        /// Log level
        Debug = 0x04 => "P_VXM_DBUG",
    }
}

operand_enum! {
    /// Floating-point constants
    pub enum FpuConst {
        Nil = 0x00 => "P_FPU_NIL",
        One = 0x01 => "P_FPU_ONE",
        Exp = 0x02 => "P_FPU_EXP",
        Pie = 0x03 => "P_FPU_PIE",
    }
}

impl FpuConst {
    pub fn value(self) -> f32 {
        match self {
            FpuConst::Nil => 0.0,
            FpuConst::One => 1.0,
            FpuConst::Exp => std::f32::consts::E,
            FpuConst::Pie => std::f32::consts::PI,
        }
    }
}

/// A parameter decoded in the context of its instrument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Param {
    Adcs(AdcsParam),
    Gps(GpsParam),
    Imager(ImagerParam),
    Fpu(FpuConst),
    Nmf(NmfParam),
    Vxm(VxmParam),
}

impl Param {
    /// Decode a parameter byte for the given instrument
    pub fn decode(instrument: Instrument, code: u8) -> Option<Self> {
        match instrument {
            Instrument::Adc => AdcsParam::from_u8(code).map(Param::Adcs),
            Instrument::Gps => GpsParam::from_u8(code).map(Param::Gps),
            Instrument::Img => ImagerParam::from_u8(code).map(Param::Imager),
            Instrument::Fpu => FpuConst::from_u8(code).map(Param::Fpu),
            Instrument::Nmf => NmfParam::from_u8(code).map(Param::Nmf),
            Instrument::Vxm => VxmParam::from_u8(code).map(Param::Vxm),
        }
    }

    pub const fn instrument(self) -> Instrument {
        match self {
            Param::Adcs(_) => Instrument::Adc,
            Param::Gps(_) => Instrument::Gps,
            Param::Imager(_) => Instrument::Img,
            Param::Fpu(_) => Instrument::Fpu,
            Param::Nmf(_) => Instrument::Nmf,
            Param::Vxm(_) => Instrument::Vxm,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Param::Adcs(p) => p.to_u8(),
            Param::Gps(p) => p.to_u8(),
            Param::Imager(p) => p.to_u8(),
            Param::Fpu(p) => p.to_u8(),
            Param::Nmf(p) => p.to_u8(),
            Param::Vxm(p) => p.to_u8(),
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Param::Adcs(p) => p.mnemonic(),
            Param::Gps(p) => p.mnemonic(),
            Param::Imager(p) => p.mnemonic(),
            Param::Fpu(p) => p.mnemonic(),
            Param::Nmf(p) => p.mnemonic(),
            Param::Vxm(p) => p.mnemonic(),
        }
    }
}

// ========== Actions ==========

operand_enum! {
    /// ADCS attitude mode requested through ACT
    pub enum AdcsAction {
        Nadir = 0x05 => "A_ADC_NADIR",
        ToSun = 0x06 => "A_ADC_TOSUN",
        Bdot = 0x07 => "A_ADC_BDOTT",
        Track = 0x08 => "A_ADC_TRACK",
        Unset = 0x09 => "A_ADC_UNSET",
    }
}

operand_enum! {
    /// Imager snapshot format requested through ACT
    pub enum ImagerAction {
        Jpg = 0x07 => "A_IMG_DO_JPG",
        Raw = 0x08 => "A_IMG_DO_RAW",
        Bmp = 0x09 => "A_IMG_DO_BMP",
        Png = 0x0A => "A_IMG_DO_PNG",
    }
}

/// An action decoded in the context of its instrument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Adcs(AdcsAction),
    Imager(ImagerAction),
}

impl Action {
    /// Decode an action byte; only the ADCS and the imager accept actions
    pub fn decode(instrument: Instrument, code: u8) -> Option<Self> {
        match instrument {
            Instrument::Adc => AdcsAction::from_u8(code).map(Action::Adcs),
            Instrument::Img => ImagerAction::from_u8(code).map(Action::Imager),
            _ => None,
        }
    }

    pub const fn instrument(self) -> Instrument {
        match self {
            Action::Adcs(_) => Instrument::Adc,
            Action::Imager(_) => Instrument::Img,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Action::Adcs(a) => a.to_u8(),
            Action::Imager(a) => a.to_u8(),
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Action::Adcs(a) => a.mnemonic(),
            Action::Imager(a) => a.mnemonic(),
        }
    }
}
