//! Key-value records emitted by environments and the episode driver.
//!
//! Environments return a [`Record`] from every [`step`](crate::ParallelEnv::step)
//! and the driver merges it with its own per-step values (step index, reward of
//! each agent, size of the active set) before handing it to a [`Recorder`].
//!
//! ```rust
//! use harvest_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("step", RecordValue::Scalar(3.0));
//! record.insert("reward/player_0", RecordValue::Scalar(-1.0));
//! assert_eq!(record.get_scalar("step").unwrap(), 3.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
