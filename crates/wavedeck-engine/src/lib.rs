// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod correlate;
pub mod filter;
pub mod group;
pub mod page;

pub use correlate::*;
pub use filter::*;
pub use group::*;
pub use page::*;
