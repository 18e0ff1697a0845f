//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error (unknown command, bad arguments)
pub const USAGE: i32 = 64;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error (broken config file or command manifest)
pub const CONFIG: i32 = 78;
