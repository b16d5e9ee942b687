use crate::error::{Error, Result};
use crate::header::{Header, MachineType};
use byteorder::{ReadBytesExt, LE};
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

pub const DOS_MAGIC: [u8; 2] = *b"MZ";
pub const PE_SIGNATURE: [u8; 2] = *b"PE";
pub const DOS_HEADER_SIZE: usize = 64;

/// The MS-DOS stub header at the start of every PE image.
///
/// Only the two fields needed to reach the PE header are kept; the 58 bytes
/// between them are skipped.
#[derive(Debug, Clone, Copy)]
pub struct DosHeader {
    /// Should be `MZ`.
    pub e_magic: [u8; 2],

    /// File offset of the PE signature.
    pub e_lfanew: i32,
}

impl DosHeader {
    pub fn from_reader<R: Read>(cur: &mut R) -> Result<DosHeader> {
        let mut raw = [0u8; DOS_HEADER_SIZE];
        cur.read_exact(&mut raw).map_err(truncated("DOS header"))?;

        let mut fields = Cursor::new(&raw[..]);
        let mut e_magic = [0u8; 2];
        fields.read_exact(&mut e_magic)?;
        fields.seek(SeekFrom::Current(58))?;
        let e_lfanew = fields.read_i32::<LE>()?;

        Ok(DosHeader { e_magic, e_lfanew })
    }

    pub fn is_valid(&self) -> bool {
        self.e_magic == DOS_MAGIC
    }
}

/// The PE signature followed by the COFF `Machine` field.
#[derive(Debug, Clone, Copy)]
pub struct PeHeader {
    /// Should be `PE`.
    pub signature: [u8; 2],

    /// The two NUL bytes completing `PE\0\0`.
    pub reserved: [u8; 2],

    /// Target machine code, e.g. `0x8664` for AMD64.
    pub machine: u16,
}

impl PeHeader {
    pub fn from_reader<R: Read>(cur: &mut R) -> Result<PeHeader> {
        let mut raw = [0u8; 6];
        cur.read_exact(&mut raw).map_err(truncated("PE header"))?;

        let mut fields = Cursor::new(&raw[..]);
        let mut signature = [0u8; 2];
        let mut reserved = [0u8; 2];
        fields.read_exact(&mut signature)?;
        fields.read_exact(&mut reserved)?;

        Ok(PeHeader {
            signature,
            reserved,
            machine: fields.read_u16::<LE>()?,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.signature == PE_SIGNATURE
    }
}

impl Header for PeHeader {
    fn machine(&self) -> u16 {
        self.machine
    }

    fn format_name(&self) -> &'static str {
        "PE"
    }
}

/// Reads the DOS and PE headers from `reader` and returns the PE header.
pub fn read_pe_header<R: Read + Seek>(reader: &mut R) -> Result<PeHeader> {
    let dos = DosHeader::from_reader(reader)?;
    // The four bytes after the DOS header are not used.
    io::copy(&mut reader.by_ref().take(4), &mut io::sink())?;

    if !dos.is_valid() {
        return Err(Error::NotExecutable(format!(
            "bad DOS magic {:02x?}",
            dos.e_magic
        )));
    }

    let offset = u64::try_from(dos.e_lfanew).map_err(|_| {
        Error::NotExecutable(format!("negative PE header offset {}", dos.e_lfanew))
    })?;
    log::debug!("PE header offset {:#x}", offset);

    reader.seek(SeekFrom::Start(offset))?;
    let pe = PeHeader::from_reader(reader)?;

    if !pe.is_valid() {
        return Err(Error::NotExecutable(format!(
            "bad PE signature {:02x?}",
            pe.signature
        )));
    }

    log::debug!("{} machine code {:#06x}", pe.format_name(), pe.machine);
    Ok(pe)
}

/// Symbolic machine type of the PE image read from `reader`.
pub fn read_machine_type<R: Read + Seek>(reader: &mut R) -> Result<MachineType> {
    Ok(read_pe_header(reader)?.machine_type())
}

/// Symbolic machine type of the PE file at `path`.
pub fn shared_library_machine<P: AsRef<Path>>(path: P) -> Result<MachineType> {
    let mut file = std::fs::File::open(&path)?;
    read_machine_type(&mut file)
}

fn truncated(what: &'static str) -> impl Fn(io::Error) -> Error {
    move |e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::NotExecutable(format!("truncated {}", what)),
        _ => Error::Io(e),
    }
}
