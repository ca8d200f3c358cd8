// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Backend access, media decoding and settings files.

pub mod http;
pub mod media;
pub mod repository;
pub mod serialization;

#[cfg(test)]
pub mod fake;
