//! Process-wide client configuration.
//!
//! Timeouts and the connection TTL apply to every client in the process.
//! Changing them while clients are active is not safe; set them once, right
//! at the beginning.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

/// Used when dialing brokers (partition leaders, group coordinators,
/// bootstrap hosts).
static DIAL_TIMEOUT_MS: AtomicU64 = AtomicU64::new(5_000);

/// Deadline for a single request-response round trip on an established
/// connection. Zero disables connection deadlines. `MaxWaitTimeMs` for
/// fetch requests must be smaller than this.
static REQUEST_TIMEOUT_MS: AtomicU64 = AtomicU64::new(60_000);

/// Max time a connection stays open, counted from when it was opened, not
/// when it was last used. The connection is closed on the first request
/// after the TTL. Zero disables the check.
static CONNECTION_TTL_MS: AtomicU64 = AtomicU64::new(0);

pub fn set_dial_timeout(d: Duration) {
    DIAL_TIMEOUT_MS.store(d.as_millis() as u64, Ordering::Relaxed);
}

pub fn dial_timeout() -> Duration {
    Duration::from_millis(DIAL_TIMEOUT_MS.load(Ordering::Relaxed))
}

pub fn set_request_timeout(d: Duration) {
    REQUEST_TIMEOUT_MS.store(d.as_millis() as u64, Ordering::Relaxed);
}

/// None when request deadlines are disabled.
pub fn request_timeout() -> Option<Duration> {
    match REQUEST_TIMEOUT_MS.load(Ordering::Relaxed) {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    }
}

pub fn set_connection_ttl(d: Duration) {
    CONNECTION_TTL_MS.store(d.as_millis() as u64, Ordering::Relaxed);
}

/// None when the TTL check is disabled.
pub fn connection_ttl() -> Option<Duration> {
    match CONNECTION_TTL_MS.load(Ordering::Relaxed) {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    }
}

/// Resolves a DNS SRV name into `host:port` strings.
pub type SrvLookup = fn(&str) -> io::Result<Vec<String>>;

static SRV_LOOKUP: RwLock<Option<SrvLookup>> = RwLock::new(None);

/// Install the process-wide SRV resolver used to interpret bootstrap
/// addresses. Without one every bootstrap string is treated as a literal
/// `host:port`.
pub fn set_srv_lookup(f: SrvLookup) {
    *SRV_LOOKUP.write() = Some(f);
}

pub(crate) fn srv_lookup(name: &str) -> io::Result<Vec<String>> {
    match *SRV_LOOKUP.read() {
        Some(f) => f(name),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no srv resolver configured",
        )),
    }
}
