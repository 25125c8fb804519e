// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // pipeline config + loaders
pub mod engine;        // stages, orchestrator, statistics
pub mod errors;        // error handling
pub mod model;         // raw records, schema, typed entities
pub mod observability;
pub mod source;        // CSV reading + width validation
pub mod traits;        // parser / aggregation seams
