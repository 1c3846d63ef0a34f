// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Event records, attribute values and timestamp helpers shared by the
//! pattern engine and the search driver.

pub mod event;
pub mod timestamp;
pub mod value;
