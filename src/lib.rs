//! A dictionary with a fixed maximum number of entries and pluggable eviction.
//!
//! [`StaticDict`] remembers the order in which keys were last inserted or updated. When an insert
//! of a new key would exceed the capacity, an [`EvictionPolicy`] picks one existing entry to drop
//! first. Reads never change that order.
//!
//! # Features
//!
//! - FIFO eviction by default, custom policies through [`EvictionPolicy`]
//! - O(1) insert, update, lookup and removal
//! - Failed evictions leave the dictionary untouched
//! - No unsafe code
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```rust
//! use static_dict::StaticDict;
//!
//! // Create a dictionary holding at most 2 items
//! let mut dict = StaticDict::new(2).unwrap();
//!
//! dict.insert("key1", "value1").unwrap();
//! dict.insert("key2", "value2").unwrap();
//!
//! // The oldest entry makes room for the new one
//! dict.insert("key3", "value3").unwrap();
//! assert_eq!(dict.get("key1"), None);
//! assert_eq!(dict.len(), 2);
//! ```
//!
//! Updating existing values:
//!
//! ```rust
//! use static_dict::StaticDict;
//!
//! let mut dict = StaticDict::new(2).unwrap();
//! dict.insert("key1", "value1").unwrap();
//! dict.insert("key2", "value2").unwrap();
//!
//! // Update the value and get the old one. "key1" is now the most recent key.
//! let old_value = dict.insert("key1", "new_value").unwrap();
//! assert_eq!(old_value, Some("value1"));
//!
//! dict.insert("key3", "value3").unwrap();
//! assert_eq!(dict.get("key2"), None);
//! assert_eq!(dict.get("key1"), Some(&"new_value"));
//! ```
//!
//! Switching policies:
//!
//! ```rust
//! use static_dict::{DropRandomEviction, Error, StaticDict};
//!
//! let mut dict = StaticDict::new(1).unwrap();
//! dict.insert(1, "one").unwrap();
//!
//! dict.set_eviction_policy(Some(Box::new(DropRandomEviction)));
//! assert_eq!(
//!     dict.insert(2, "two"),
//!     Err(Error::NotImplemented { policy: "drop-random" })
//! );
//! assert_eq!(dict.get(&1), Some(&"one"));
//!
//! // Back to FIFO
//! dict.set_eviction_policy(None);
//! assert_eq!(dict.insert(2, "two"), Ok(None));
//! ```

#![forbid(unsafe_code)]
pub mod dict;
pub mod error;

pub use dict::StaticDict;
pub use dict::policy;
pub use dict::policy::{DropFirstEviction, DropRandomEviction, EvictionPolicy, FifoEviction};
pub use dict::stats::Stats;
pub use error::Error;
