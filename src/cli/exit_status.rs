use std::process::ExitCode;

/// Process exit status of a podcat command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every catalog was written or compiled.
    Success,
    /// The command ran but reported errors, e.g. a locale catalog that failed
    /// to compile or an existing config file that `init-config` left alone.
    Failure,
    /// The command aborted, e.g. on an invalid config or a malformed template.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(match status {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Error => 2,
        })
    }
}
