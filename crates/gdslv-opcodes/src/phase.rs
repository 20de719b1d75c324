//! The discrete operational phases of the GDSL abstract machine.

/// The operational phase of the abstract machine Γ.
///
/// `Build` and `Finished` are transient/terminal: `Build` is only the
/// initial phase before the first `BEGIN_STREAM`, and `Finished` is only
/// reached via the stream terminator. Neither is a valid target of a
/// user-issued phase transition other than those two cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the first `BEGIN_STREAM`.
    Build,
    /// Between `BEGIN_STREAM` and `SUBMIT`; commands are being recorded.
    Record,
    /// A fence is outstanding; GPU work is notionally in flight.
    Submitted,
    /// All fences waited; safe for snapshot/host access.
    Idle,
    /// Terminal phase reached at end of stream.
    Finished,
}

impl Phase {
    /// Stable name used in diagnostics, independent of `Debug` formatting.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Record => "Record",
            Self::Submitted => "Submitted",
            Self::Idle => "Idle",
            Self::Finished => "Finished",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a resource is readable/writable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Domain {
    /// GPU-only access.
    Device = 0,
    /// CPU-only access.
    Host = 1,
    /// Both GPU and CPU may access.
    Coherent = 2,
}

impl Domain {
    /// Stable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Device => "Device",
            Self::Host => "Host",
            Self::Coherent => "Coherent",
        }
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for Domain {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Device),
            1 => Ok(Self::Host),
            2 => Ok(Self::Coherent),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names_are_stable() {
        assert_eq!(Phase::Build.name(), "Build");
        assert_eq!(Phase::Finished.to_string(), "Finished");
    }

    #[test]
    fn domain_round_trips_through_u32() {
        for d in [Domain::Device, Domain::Host, Domain::Coherent] {
            assert_eq!(Domain::try_from(d as u32), Ok(d));
        }
        assert_eq!(Domain::try_from(99), Err(99));
    }
}
