pub mod machine;
pub mod pe;

pub use machine::MachineType;

pub trait Header: std::fmt::Debug + Send + Sync {
    /// Returns the raw machine-type code.
    fn machine(&self) -> u16;

    /// Returns a short human-readable name, e.g. "PE".
    fn format_name(&self) -> &'static str;

    /// Returns the symbolic machine type, `MachineType::Unknown` for codes
    /// outside the table.
    fn machine_type(&self) -> MachineType {
        MachineType::from_code(self.machine())
    }
}
