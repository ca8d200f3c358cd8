// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session data model.

pub mod annotation;
pub mod draft;
pub mod image;
pub mod navigator;
pub mod session;
pub mod store;
