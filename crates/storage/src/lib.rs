// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! On-disk state for the TTS message bus: atomic writes, the queue
//! directory, the playback state store, and the daemon heartbeat.

pub mod atomic;
pub mod heartbeat;
pub mod playback_state_store;
pub mod queue;
pub mod session_store;

pub use atomic::{AtomicWriteError, AtomicWriter, FsAtomicWriter};
pub use heartbeat::{Heartbeat, HeartbeatError};
pub use playback_state_store::{PlaybackStateError, PlaybackStateStore};
pub use queue::{QueueDirectory, QueueEntry, QueueError};
pub use session_store::{SessionStore, SessionStoreError};
