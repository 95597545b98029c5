use thiserror::Error;

pub type Result<T> = std::result::Result<T, SedIoError>;

#[derive(Error, Debug)]
pub enum SedIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("you do not have permission to open {0} in read/write mode")]
    DevicePermission(String),

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("error opening device {0}: errno {1}")]
    DeviceOpen(String, i32),

    #[error("data buffer does not satisfy the I/O alignment requirement")]
    NotAligned,

    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("device did not return an ATA passthrough response")]
    NotAtaResponse,

    #[error("target reported error status 0x{0:02X}")]
    Target(u8),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported on this platform: {0}")]
    Unsupported(String),

    #[error("generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl SedIoError {
    pub fn transport<T: Into<String>>(msg: T) -> Self {
        Self::Transport(msg.into())
    }

    pub fn unsupported_command<T: Into<String>>(msg: T) -> Self {
        Self::UnsupportedCommand(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        Self::Parse(msg.into())
    }

    pub fn unsupported<T: Into<String>>(msg: T) -> Self {
        Self::Unsupported(msg.into())
    }
}
