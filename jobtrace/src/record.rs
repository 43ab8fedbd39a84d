//! Process execution records

/// Wall-clock timestamp, in seconds
pub type Timestamp = f64;

/// Wall-clock duration, in seconds
pub type Duration = f64;

/// Execution record of one process spawned during the build
///
/// Build logs only write such a record once the process has finished, which is
/// why a parent's record always comes after the records of its children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessRecord {
    /// Process identifier
    pub pid: Box<str>,

    /// Identifier of the parent process, None for the toplevel build process
    pub ppid: Option<Box<str>>,

    /// Real time at which the process started
    pub start: Timestamp,

    /// Real time at which the process ended
    pub end: Timestamp,

    /// Name of the tool that was executed
    pub tool: Box<str>,

    /// Full command line
    pub cmdline: Box<str>,

    /// Make target that this process was building, if known
    pub make_target: Option<Box<str>>,
}
//
impl ProcessRecord {
    /// Record with only identity and timing information
    pub fn new(
        pid: impl Into<Box<str>>,
        ppid: Option<&str>,
        start: Timestamp,
        end: Timestamp,
    ) -> Self {
        Self {
            pid: pid.into(),
            ppid: ppid.map(Box::from),
            start,
            end,
            ..Self::default()
        }
    }

    /// Set the executed tool and its command line
    pub fn with_command(mut self, tool: impl Into<Box<str>>, cmdline: impl Into<Box<str>>) -> Self {
        self.tool = tool.into();
        self.cmdline = cmdline.into();
        self
    }

    /// Set the make target
    pub fn with_target(mut self, target: impl Into<Box<str>>) -> Self {
        self.make_target = Some(target.into());
        self
    }

    /// Real time spent running this process
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Truth that this is the toplevel build process
    pub fn is_root(&self) -> bool {
        self.ppid.is_none()
    }
}
