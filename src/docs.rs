// SPDX-FileCopyrightText: The newsbox authors
// SPDX-License-Identifier: MPL-2.0

//! Documentation of the markup dialect and the feed file format

#![allow(rustdoc::invalid_rust_codeblocks)] // Do not interpret code blocks, e.g. license comments.
#![doc = include_str!("../README.md")]
