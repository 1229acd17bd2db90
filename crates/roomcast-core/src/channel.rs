//! Pub/sub channel naming.
//!
//! Format: `{prefix}#{namespace}#`, plus `{room}#` when exactly one room is
//! targeted. Zero or several rooms leave the suffix off; subscribers filter
//! multi-room emits on the envelope's `rooms` option instead.

/// Channel segment separator.
pub const DELIMITER: char = '#';

/// Default subscribe key shared by publishers and subscribers.
pub const DEFAULT_PREFIX: &str = "socket.io";

/// Namespace used when an emit does not select one.
pub const DEFAULT_NAMESPACE: &str = "/";

/// Build the channel an emit is published on.
pub fn build_channel<S: AsRef<str>>(prefix: &str, namespace: &str, rooms: &[S]) -> String {
    let mut channel = String::with_capacity(prefix.len() + namespace.len() + 2);
    channel.push_str(prefix);
    channel.push(DELIMITER);
    channel.push_str(namespace);
    channel.push(DELIMITER);

    if let [room] = rooms {
        channel.push_str(room.as_ref());
        channel.push(DELIMITER);
    }
    channel
}
