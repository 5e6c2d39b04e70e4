//! Log setup shared by the pose tracker nodes.
//!
//! The subscriber is installed for the calling thread only; the dora
//! runtime keeps whatever global subscriber it sets up.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with a thread-local subscriber.
///
/// - Respects the RUST_LOG environment variable (defaults to "info")
/// - Outputs compact logs without file/line metadata
///
/// The returned guard must be kept alive for as long as the node runs.
///
/// # Example
/// ```no_run
/// use pose_tracker_lib::init_tracing;
///
/// fn main() {
///     let _guard = init_tracing();
///     // Node code here
/// }
/// ```
pub fn init_tracing() -> DefaultGuard {
    use tracing_subscriber::layer::SubscriberExt;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(fmt_layer);

    tracing::subscriber::set_default(subscriber)
}
