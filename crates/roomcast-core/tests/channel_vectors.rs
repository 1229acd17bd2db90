//! Channel naming vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use roomcast_core::channel::build_channel;

mod vector_loader;
use vector_loader::ChannelVector;

#[test]
fn channel_vectors() {
    let s = fs::read_to_string("tests/vectors/channels.json").unwrap();
    let vectors: Vec<ChannelVector> = serde_json::from_str(&s).unwrap();
    assert!(!vectors.is_empty());

    for v in vectors {
        assert_eq!(
            build_channel(&v.prefix, &v.nsp, &v.rooms),
            v.channel,
            "prefix={} nsp={} rooms={:?}",
            v.prefix,
            v.nsp,
            v.rooms
        );
    }
}
