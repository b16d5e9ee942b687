use std::fmt;

/// Target processor named by the `Machine` field of a COFF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineType {
    Unknown,
    I386,
    R3000,
    R4000,
    R10000,
    WceMipsV2,
    Alpha,
    Sh3,
    Sh3Dsp,
    Sh3E,
    Sh4,
    Sh5,
    Arm,
    Thumb,
    ArmNt,
    Am33,
    PowerPc,
    PowerPcFp,
    Ia64,
    Mips16,
    /// Also known as AXP64.
    Alpha64,
    MipsFpu,
    MipsFpu16,
    TriCore,
    Cef,
    Ebc,
    Amd64,
    M32R,
    Cee,
}

impl MachineType {
    /// Looks up a machine-type code. Unlisted codes map to `Unknown`.
    pub fn from_code(code: u16) -> Self {
        match code {
            0x014c => MachineType::I386,
            0x0162 => MachineType::R3000,
            0x0166 => MachineType::R4000,
            0x0168 => MachineType::R10000,
            0x0169 => MachineType::WceMipsV2,
            0x0184 => MachineType::Alpha,
            0x01a2 => MachineType::Sh3,
            0x01a3 => MachineType::Sh3Dsp,
            0x01a4 => MachineType::Sh3E,
            0x01a6 => MachineType::Sh4,
            0x01a8 => MachineType::Sh5,
            0x01c0 => MachineType::Arm,
            0x01c2 => MachineType::Thumb,
            0x01c4 => MachineType::ArmNt,
            0x01d3 => MachineType::Am33,
            0x01f0 => MachineType::PowerPc,
            0x01f1 => MachineType::PowerPcFp,
            0x0200 => MachineType::Ia64,
            0x0266 => MachineType::Mips16,
            0x0284 => MachineType::Alpha64,
            0x0366 => MachineType::MipsFpu,
            0x0466 => MachineType::MipsFpu16,
            0x0520 => MachineType::TriCore,
            0x0cef => MachineType::Cef,
            0x0ebc => MachineType::Ebc,
            0x8664 => MachineType::Amd64,
            0x9041 => MachineType::M32R,
            0xc0ee => MachineType::Cee,
            _ => MachineType::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MachineType::Unknown => "UNKNOWN",
            MachineType::I386 => "I386",
            MachineType::R3000 => "R3000",
            MachineType::R4000 => "R4000",
            MachineType::R10000 => "R10000",
            MachineType::WceMipsV2 => "WCEMIPSV2",
            MachineType::Alpha => "ALPHA",
            MachineType::Sh3 => "SH3",
            MachineType::Sh3Dsp => "SH3DSP",
            MachineType::Sh3E => "SH3E",
            MachineType::Sh4 => "SH4",
            MachineType::Sh5 => "SH5",
            MachineType::Arm => "ARM",
            MachineType::Thumb => "THUMB",
            MachineType::ArmNt => "ARMNT",
            MachineType::Am33 => "AM33",
            MachineType::PowerPc => "POWERPC",
            MachineType::PowerPcFp => "POWERPCFP",
            MachineType::Ia64 => "IA64",
            MachineType::Mips16 => "MIPS16",
            MachineType::Alpha64 => "ALPHA64",
            MachineType::MipsFpu => "MIPSFPU",
            MachineType::MipsFpu16 => "MIPSFPU16",
            MachineType::TriCore => "TRICORE",
            MachineType::Cef => "CEF",
            MachineType::Ebc => "EBC",
            MachineType::Amd64 => "AMD64",
            MachineType::M32R => "M32R",
            MachineType::Cee => "CEE",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
