// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod agent;
pub mod resolve;
pub mod trigger;
