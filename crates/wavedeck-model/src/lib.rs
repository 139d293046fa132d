// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod columns;
pub mod filter;
pub mod record;
pub mod serial;
pub mod state;

pub use columns::*;
pub use filter::*;
pub use record::*;
pub use state::*;
