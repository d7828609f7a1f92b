use std::io;
use tracing::debug;

use crate::error::{TraceError, TraceResult};

/// Give up set-uid/set-gid rights once the raw socket is open.
///
/// Group first: after setuid a non-root process can no longer change its gid.
pub fn drop_privileges() -> TraceResult<()> {
    // SAFETY: plain syscalls, no pointers involved
    let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };

    if unsafe { libc::setgid(gid) } == -1 {
        return Err(TraceError::PrivilegeDrop(io::Error::last_os_error()));
    }
    if unsafe { libc::setuid(uid) } == -1 {
        return Err(TraceError::PrivilegeDrop(io::Error::last_os_error()));
    }

    debug!(uid, gid, "dropped privileges");
    Ok(())
}

/// Echo identifier for this process: the pid, truncated to 16 bits.
pub fn probe_identifier() -> u16 {
    // SAFETY: getpid cannot fail
    let pid = unsafe { libc::getpid() };
    pid as u16
}
