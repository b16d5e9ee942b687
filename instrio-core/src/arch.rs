use crate::error::{Error, Result};
use crate::header::pe::shared_library_machine;
use crate::header::MachineType;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// Command used to identify file types on Unix-like hosts.
pub const FILE_TOOL: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bitness {
    Bits32,
    Bits64,
}

impl Bitness {
    pub fn bits(self) -> u32 {
        match self {
            Bitness::Bits32 => 32,
            Bitness::Bits64 => 64,
        }
    }
}

/// Word sizes a binary was built for. Empty when unknown, both for
/// universal binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArchitectureSet(BTreeSet<Bitness>);

impl ArchitectureSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bitness: Bitness) {
        self.0.insert(bitness);
    }

    pub fn contains(&self, bitness: Bitness) -> bool {
        self.0.contains(&bitness)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Bitness> + '_ {
        self.0.iter().copied()
    }

    pub fn bits(&self) -> Vec<u32> {
        self.iter().map(Bitness::bits).collect()
    }
}

impl FromIterator<Bitness> for ArchitectureSet {
    fn from_iter<I: IntoIterator<Item = Bitness>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ArchitectureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: Vec<String> = self.iter().map(|b| b.bits().to_string()).collect();
        write!(f, "{}", bits.join(", "))
    }
}

impl Serialize for ArchitectureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(Bitness::bits))
    }
}

/// Host platform families with a probing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            other => Platform::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

pub fn architecture_from_machine(machine: MachineType) -> ArchitectureSet {
    match machine {
        MachineType::I386 => [Bitness::Bits32].into_iter().collect(),
        MachineType::Ia64 | MachineType::Amd64 => [Bitness::Bits64].into_iter().collect(),
        _ => ArchitectureSet::empty(),
    }
}

/// Classifies the output of `file <path>`.
pub fn architecture_from_file_output(platform: &Platform, output: &str) -> ArchitectureSet {
    let markers: [(&str, Bitness); 2] = match platform {
        Platform::Linux => [("32-bit", Bitness::Bits32), ("64-bit", Bitness::Bits64)],
        Platform::MacOs => [
            ("(for architecture i386)", Bitness::Bits32),
            ("(for architecture x86_64)", Bitness::Bits64),
        ],
        _ => return ArchitectureSet::empty(),
    };

    markers
        .into_iter()
        .filter(|(marker, _)| output.contains(*marker))
        .map(|(_, bitness)| bitness)
        .collect()
}

/// Probes `path` using the strategy for the host platform.
pub fn probe_architecture<P: AsRef<Path>>(path: P) -> Result<ArchitectureSet> {
    probe_architecture_on(&Platform::current(), path)
}

pub fn probe_architecture_on<P: AsRef<Path>>(
    platform: &Platform,
    path: P,
) -> Result<ArchitectureSet> {
    let path = path.as_ref();
    match platform {
        Platform::Windows => {
            let machine = shared_library_machine(path)?;
            log::debug!("{} is a {} image", path.display(), machine);
            Ok(architecture_from_machine(machine))
        }
        Platform::Linux | Platform::MacOs => {
            let output = run_file_tool(path)?;
            Ok(architecture_from_file_output(platform, &output))
        }
        Platform::Other(name) => Err(Error::UnsupportedPlatform(name.clone())),
    }
}

fn run_file_tool(path: &Path) -> Result<String> {
    run_tool(FILE_TOOL, path)
}

/// Runs `tool <path>` and returns stdout followed by stderr.
pub(crate) fn run_tool(tool: &str, path: &Path) -> Result<String> {
    let failure = |reason: String| Error::ExternalToolFailure {
        tool: tool.to_string(),
        reason,
    };

    log::debug!("Running `{} {}`", tool, path.display());
    let output = Command::new(tool)
        .arg(path)
        .output()
        .map_err(|e| failure(e.to_string()))?;

    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);

    if !output.status.success() {
        return Err(failure(format!(
            "exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&combined).trim()
        )));
    }

    if !combined.is_ascii() {
        return Err(failure("output is not ASCII".into()));
    }
    String::from_utf8(combined).map_err(|e| failure(e.to_string()))
}
