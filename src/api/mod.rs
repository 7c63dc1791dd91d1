// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gateway to the backend REST API.

pub mod client;

pub use client::ApiClient;
