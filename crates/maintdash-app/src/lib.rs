// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod chart;
pub mod model;
pub mod paging;
pub mod range;
pub mod state;

pub use chart::*;
pub use model::*;
pub use paging::*;
pub use range::*;
pub use state::*;
