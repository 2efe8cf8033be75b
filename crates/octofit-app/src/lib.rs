// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod list_view;
pub mod record;
pub mod resource;
pub mod state;

pub use list_view::*;
pub use record::*;
pub use resource::*;
pub use state::*;
